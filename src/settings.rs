//! Settings persistence module
//!
//! Saves and loads app preferences to/from disk. Unreadable or corrupt
//! settings fall back to defaults rather than failing the app.

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SETTINGS_FILE: &str = "settings.json";
const APP_NAME: &str = "StyleSync";

/// App preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Theme preference: "light" or "dark"
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

impl AppSettings {
    pub fn is_dark(&self) -> bool {
        self.theme == "dark"
    }

    pub fn toggle_theme(&mut self) {
        self.theme = if self.is_dark() {
            "light".to_string()
        } else {
            "dark".to_string()
        };
    }
}

/// Get the settings directory path
fn get_settings_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME))
}

fn get_settings_path() -> Option<PathBuf> {
    get_settings_dir().map(|p| p.join(SETTINGS_FILE))
}

/// Load settings from disk
pub fn load_settings() -> AppSettings {
    let path = match get_settings_path() {
        Some(p) => p,
        None => {
            debug!("Could not determine settings path, using defaults");
            return AppSettings::default();
        }
    };

    if !path.exists() {
        debug!("Settings file does not exist, using defaults");
        return AppSettings::default();
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                error!("Failed to parse settings file: {}", e);
                AppSettings::default()
            }
        },
        Err(e) => {
            error!("Failed to read settings file: {}", e);
            AppSettings::default()
        }
    }
}

/// Save settings to disk
pub fn save_settings(settings: &AppSettings) -> Result<(), String> {
    let dir = match get_settings_dir() {
        Some(d) => d,
        None => return Err("Could not determine settings directory".to_string()),
    };

    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(&dir) {
            return Err(format!("Failed to create settings directory: {}", e));
        }
    }

    let path = dir.join(SETTINGS_FILE);

    let json = match serde_json::to_string_pretty(settings) {
        Ok(j) => j,
        Err(e) => return Err(format!("Failed to serialize settings: {}", e)),
    };

    match fs::write(&path, json) {
        Ok(_) => {
            info!("Saved settings to {:?}", path);
            Ok(())
        }
        Err(e) => Err(format!("Failed to write settings file: {}", e)),
    }
}
