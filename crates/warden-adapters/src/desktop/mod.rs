mod desktop_entry;
mod desktop_entry_catalog;

pub use desktop_entry::DesktopEntry;
pub use desktop_entry_catalog::DesktopEntryCatalog;
