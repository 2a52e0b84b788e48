use tracing::{debug, trace, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use super::WindowDetector;

/// Reads the `WM_CLASS` of the window named by `_NET_ACTIVE_WINDOW`.
pub struct X11WindowDetector {
    connection: RustConnection,
    root_window: Window,
    active_window_atom: u32,
}

impl X11WindowDetector {
    pub fn new() -> Option<Self> {
        let (connection, screen_number) = RustConnection::connect(None)
            .map_err(|error| {
                warn!(%error, "failed to connect to X11 display");
            })
            .ok()?;

        let root_window = connection.setup().roots.get(screen_number)?.root;

        let active_window_atom = connection
            .intern_atom(false, b"_NET_ACTIVE_WINDOW")
            .ok()?
            .reply()
            .ok()?
            .atom;

        debug!("X11 window detector initialized");

        Some(Self {
            connection,
            root_window,
            active_window_atom,
        })
    }

    fn get_active_window(&self) -> Option<Window> {
        let reply = self
            .connection
            .get_property(
                false,
                self.root_window,
                self.active_window_atom,
                AtomEnum::WINDOW,
                0,
                1,
            )
            .ok()?
            .reply()
            .ok()?;

        let window = reply.value32()?.next()?;
        (window != 0).then_some(window)
    }

    fn get_window_class(&self, window: Window) -> Option<String> {
        let reply = self
            .connection
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 2048)
            .ok()?
            .reply()
            .ok()?;

        parse_wm_class(&reply.value)
    }
}

impl WindowDetector for X11WindowDetector {
    fn get_active_application(&self) -> Option<String> {
        let window = self.get_active_window()?;
        let class = self.get_window_class(window)?;

        trace!(window, class = %class, "active window");
        Some(class)
    }
}

/// `WM_CLASS` holds two NUL-terminated strings, instance then class. The class
/// is preferred; the instance is the fallback.
fn parse_wm_class(value: &[u8]) -> Option<String> {
    let parts: Vec<&str> = std::str::from_utf8(value)
        .ok()?
        .split('\0')
        .filter(|part| !part.is_empty())
        .collect();

    parts.get(1).or(parts.first()).map(|part| part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_is_preferred_over_instance() {
        assert_eq!(
            parse_wm_class(b"navigator\0firefox\0"),
            Some("firefox".to_string())
        );
    }

    #[test]
    fn instance_is_used_when_class_is_missing() {
        assert_eq!(parse_wm_class(b"xterm\0"), Some("xterm".to_string()));
    }

    #[test]
    fn empty_property_has_no_class() {
        assert_eq!(parse_wm_class(b""), None);
        assert_eq!(parse_wm_class(b"\0\0"), None);
    }

    #[test]
    fn detector_can_be_created_or_fails_gracefully() {
        let detector = X11WindowDetector::new();

        match detector {
            Some(_) => println!("X11 detector created successfully"),
            None => println!("X11 not available (expected in CI)"),
        }
    }
}
