use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::ui::TranscriptTheme;

/// Scroll region the demo transcript registers under.
pub const DEFAULT_REGION: &str = "transcript";

/// Persisted viewer preferences.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ViewerSettings {
    /// "dark" or "light"; anything else falls back to dark.
    pub theme: String,
    #[serde(default)]
    pub twelve_hour_clock: bool,
    /// Show the per-item state overlay in the demo.
    #[serde(default)]
    pub show_state_overlay: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            twelve_hour_clock: false,
            show_state_overlay: false,
        }
    }
}

impl ViewerSettings {
    pub fn theme(&self) -> TranscriptTheme {
        match self.theme.as_str() {
            "light" => TranscriptTheme::light(),
            _ => TranscriptTheme::dark(),
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "transcriptview", "transcript-view") {
        let dir = proj.config_dir();
        if let Err(e) = fs::create_dir_all(dir) {
            log::warn!("failed to create config dir: {}", e);
            return None;
        }
        return Some(dir.join("settings.json"));
    }
    None
}

pub fn load_settings() -> Option<ViewerSettings> {
    let path = settings_path()?;
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn save_settings(settings: &ViewerSettings) -> std::io::Result<()> {
    if let Some(path) = settings_path() {
        let mut file = fs::File::create(path)?;
        let data = serde_json::to_string_pretty(settings).unwrap();
        file.write_all(data.as_bytes())?;
    }
    Ok(())
}
