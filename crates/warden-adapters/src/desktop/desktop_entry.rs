const MAIN_GROUP: &str = "[Desktop Entry]";

/// The subset of a freedesktop `.desktop` file needed to list launchable applications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub entry_type: Option<String>,
    pub name: Option<String>,
    pub exec: Option<String>,
    pub startup_wm_class: Option<String>,
    pub no_display: bool,
    pub hidden: bool,
}

impl DesktopEntry {
    pub fn parse(content: &str) -> Self {
        let mut entry = Self::default();
        let mut in_main_group = false;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with('[') {
                in_main_group = trimmed == MAIN_GROUP;
                continue;
            }

            if !in_main_group {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "Type" => entry.entry_type = Some(value.to_string()),
                "Name" => entry.name = Some(value.to_string()),
                "Exec" => entry.exec = Some(value.to_string()).filter(|exec| !exec.is_empty()),
                "StartupWMClass" => entry.startup_wm_class = Some(value.to_string()),
                "NoDisplay" => entry.no_display = value == "true",
                "Hidden" => entry.hidden = value == "true",
                _ => {}
            }
        }

        entry
    }

    /// True when the entry has a launch command and is meant to be shown to users.
    pub fn is_launchable(&self) -> bool {
        self.entry_type.as_deref() == Some("Application")
            && self.exec.is_some()
            && !self.no_display
            && !self.hidden
    }
}
