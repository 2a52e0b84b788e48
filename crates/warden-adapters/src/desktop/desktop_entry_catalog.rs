use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use warden_core::{AppCatalog, AppCatalogError, ApplicationId, CatalogEntry, InstalledApp};

use super::DesktopEntry;

const DEFAULT_SYSTEM_DATA_DIRS: &str = "/usr/local/share:/usr/share";

/// Installed applications from the XDG `applications` directories.
///
/// Entries in the user directory shadow system entries with the same file name.
pub struct DesktopEntryCatalog {
    user_dir: Option<PathBuf>,
    system_dirs: Vec<PathBuf>,
}

impl DesktopEntryCatalog {
    pub fn from_environment() -> Self {
        let user_dir = dirs::data_dir().map(|dir| dir.join("applications"));

        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_DATA_DIRS.to_string());

        let system_dirs = data_dirs
            .split(':')
            .filter(|dir| !dir.is_empty())
            .map(|dir| PathBuf::from(dir).join("applications"))
            .collect();

        Self::with_directories(user_dir, system_dirs)
    }

    pub fn with_directories(user_dir: Option<PathBuf>, system_dirs: Vec<PathBuf>) -> Self {
        Self {
            user_dir,
            system_dirs,
        }
    }

    fn scan_directory(
        &self,
        directory: &Path,
        is_system: bool,
        seen: &mut HashSet<String>,
        entries: &mut Vec<CatalogEntry>,
    ) -> Result<(), AppCatalogError> {
        let read_dir = match fs::read_dir(directory) {
            Ok(read_dir) => read_dir,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(directory = %directory.display(), "applications directory not found");
                return Ok(());
            }
            Err(error) => {
                return Err(AppCatalogError::Io {
                    message: format!("{}: {}", directory.display(), error),
                })
            }
        };

        let mut paths: Vec<PathBuf> = read_dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|extension| extension == "desktop"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().to_string())
            else {
                continue;
            };

            if !seen.insert(file_name) {
                continue;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(error) => {
                    warn!(%error, path = %path.display(), "failed to read desktop entry");
                    continue;
                }
            };

            if let Some(entry) = to_catalog_entry(&path, &DesktopEntry::parse(&content), is_system)
            {
                entries.push(entry);
            }
        }

        Ok(())
    }
}

impl AppCatalog for DesktopEntryCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>, AppCatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        if let Some(ref user_dir) = self.user_dir {
            self.scan_directory(user_dir, false, &mut seen, &mut entries)?;
        }

        for system_dir in &self.system_dirs {
            self.scan_directory(system_dir, true, &mut seen, &mut entries)?;
        }

        debug!(count = entries.len(), "desktop entries scanned");
        Ok(entries)
    }
}

/// The identifier is `StartupWMClass` when valid, else the desktop file stem.
/// Entries without `StartupWMClass` may not match the X11 `WM_CLASS` that the
/// sampler records.
fn to_catalog_entry(path: &Path, entry: &DesktopEntry, is_system: bool) -> Option<CatalogEntry> {
    let file_stem = path.file_stem()?.to_string_lossy().to_string();

    let identifier = entry
        .startup_wm_class
        .as_deref()
        .and_then(|class| ApplicationId::parse(class).ok())
        .or_else(|| ApplicationId::parse(file_stem.as_str()).ok())?;

    let display_name = entry
        .name
        .clone()
        .unwrap_or_else(|| identifier.to_string());

    Some(CatalogEntry {
        app: InstalledApp {
            identifier,
            display_name,
            is_system,
        },
        launchable: entry.is_launchable(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        root: PathBuf,
    }

    impl Fixture {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "warden-catalog-{}-{}",
                name,
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(root.join("user")).unwrap();
            fs::create_dir_all(root.join("system")).unwrap();
            Self { root }
        }

        fn user_dir(&self) -> PathBuf {
            self.root.join("user")
        }

        fn system_dir(&self) -> PathBuf {
            self.root.join("system")
        }

        fn write(&self, directory: &Path, file_name: &str, content: &str) {
            fs::write(directory.join(file_name), content).unwrap();
        }

        fn catalog(&self) -> DesktopEntryCatalog {
            DesktopEntryCatalog::with_directories(Some(self.user_dir()), vec![self.system_dir()])
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn lists_system_and_user_entries() {
        let fixture = Fixture::new("lists");
        fixture.write(
            &fixture.system_dir(),
            "org.mozilla.firefox.desktop",
            "[Desktop Entry]\nType=Application\nName=Firefox\nExec=firefox\nStartupWMClass=firefox\n",
        );
        fixture.write(
            &fixture.user_dir(),
            "game.desktop",
            "[Desktop Entry]\nType=Application\nName=My Game\nExec=/opt/game/run\n",
        );

        let entries = fixture.catalog().entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].app.identifier.as_str(), "game");
        assert_eq!(entries[0].app.display_name, "My Game");
        assert!(!entries[0].app.is_system);
        assert_eq!(entries[1].app.identifier.as_str(), "firefox");
        assert!(entries[1].app.is_system);
        assert!(entries.iter().all(|entry| entry.launchable));
    }

    #[test]
    fn user_entry_shadows_system_entry() {
        let fixture = Fixture::new("shadow");
        fixture.write(
            &fixture.system_dir(),
            "editor.desktop",
            "[Desktop Entry]\nType=Application\nName=Editor\nExec=editor\n",
        );
        fixture.write(
            &fixture.user_dir(),
            "editor.desktop",
            "[Desktop Entry]\nType=Application\nName=Editor\nExec=editor\nHidden=true\n",
        );

        let entries = fixture.catalog().entries().unwrap();

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].launchable);
        assert!(!entries[0].app.is_system);
    }

    #[test]
    fn missing_directories_yield_empty_catalog() {
        let catalog = DesktopEntryCatalog::with_directories(
            Some(PathBuf::from("/nonexistent/warden/user")),
            vec![PathBuf::from("/nonexistent/warden/system")],
        );

        assert!(catalog.entries().unwrap().is_empty());
    }

    #[test]
    fn non_desktop_files_are_ignored() {
        let fixture = Fixture::new("ignored");
        fixture.write(&fixture.system_dir(), "mimeinfo.cache", "[MIME Cache]\n");

        assert!(fixture.catalog().entries().unwrap().is_empty());
    }

    #[test]
    fn invalid_wm_class_falls_back_to_file_stem() {
        let fixture = Fixture::new("fallback");
        fixture.write(
            &fixture.system_dir(),
            "org.gnome.Terminal.desktop",
            "[Desktop Entry]\nType=Application\nName=Terminal\nExec=gnome-terminal\nStartupWMClass=Gnome Terminal\n",
        );

        let entries = fixture.catalog().entries().unwrap();

        assert_eq!(entries[0].app.identifier.as_str(), "org.gnome.Terminal");
    }
}
