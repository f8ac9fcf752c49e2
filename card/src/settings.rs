use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const MIN_WINDOW_WIDTH: u32 = 320;
pub const MIN_WINDOW_HEIGHT: u32 = 240;
const MAX_WINDOW_SIDE: u32 = 8192;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            title: "Will you be my Valentine?".to_string(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MotionSettings {
    /// Freezes decorative loops (bobbing, pulsing, wiggling) at rest.
    pub reduce_motion: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub motion: MotionSettings,
    /// Fixed RNG seed; a fresh one is drawn per session when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            window: WindowSettings::default(),
            motion: MotionSettings::default(),
            seed: None,
        }
    }
}

impl CardSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.window.width = self.window.width.clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_SIDE);
        self.window.height = self.window.height.clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_SIDE);
        if self.window.title.trim().is_empty() {
            self.window.title = WindowSettings::default().title;
        }
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("VALENTINE_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("valentine-card");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load(&self) -> CardSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return CardSettings::default();
        };
        match serde_json::from_slice::<CardSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt settings: {err}");
                CardSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &CardSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("valentine-card-settings-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn sanitized_clamps_window_and_restores_title() {
        let settings = CardSettings {
            version: 42,
            window: WindowSettings {
                width: 10,
                height: 100_000,
                title: "   ".to_string(),
                vsync: false,
            },
            ..CardSettings::default()
        }
        .sanitized();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.window.width, MIN_WINDOW_WIDTH);
        assert_eq!(settings.window.height, MAX_WINDOW_SIDE);
        assert_eq!(settings.window.title, WindowSettings::default().title);
        assert!(!settings.window.vsync);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: CardSettings = serde_json::from_str(r#"{"motion":{"reduce_motion":true}}"#)
            .expect("settings JSON should parse");
        assert!(parsed.motion.reduce_motion);
        assert_eq!(parsed.window, WindowSettings::default());
        assert_eq!(parsed.seed, None);
        assert_eq!(parsed.version, 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = SettingsStore::new(temp_path("round_trip/settings.json"));
        let settings = CardSettings {
            seed: Some(7),
            motion: MotionSettings { reduce_motion: true },
            ..CardSettings::default()
        };
        store.save(&settings).expect("save settings");
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn corrupt_or_missing_file_loads_defaults() {
        let missing = SettingsStore::new(temp_path("missing/settings.json"));
        assert_eq!(missing.load(), CardSettings::default());

        let path = temp_path("corrupt/settings.json");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, b"{ not json").expect("write corrupt file");
        assert_eq!(SettingsStore::new(path).load(), CardSettings::default());
    }
}
