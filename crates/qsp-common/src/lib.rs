//! Common utilities and types shared across the QSP GUI crates
//!
//! - [`Settings`]: persisted player settings (volume, mute, channel budget)
//! - [`paths`]: resolution of engine-supplied file names against the game directory

pub mod paths;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file name used when neither `--config` nor `QSP_CONFIG` is given
pub const SETTINGS_FILE_NAME: &str = "qspgui.toml";

/// Default number of simultaneously open sound channels
pub const DEFAULT_MAX_CHANNELS: usize = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Player settings persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overall volume (0.0 – 1.0)
    pub volume: f32,
    /// Silences every channel without forgetting `volume`
    pub muted: bool,
    /// Channel budget handed to the audio system at startup
    pub max_channels: usize,
    /// Last opened game file
    pub last_game: Option<PathBuf>,
    /// Default tracing directive when `RUST_LOG` is not set
    pub log_level: String,
    /// Render message and input dialogs as HTML
    pub html_dialogs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            max_channels: DEFAULT_MAX_CHANNELS,
            last_game: None,
            log_level: "info".to_string(),
            html_dialogs: false,
        }
    }
}

impl Settings {
    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write settings as TOML, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Startup value of the global volume coefficient
    pub fn volume_coefficient(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            clamp_coefficient(self.volume)
        }
    }
}

/// What reading the settings file produced
#[derive(Debug)]
pub enum SettingsSource {
    Loaded(Settings),
    Missing,
    /// The file exists but could not be read or parsed
    Broken(ConfigError),
}

impl SettingsSource {
    pub fn read(path: &Path) -> Self {
        if !path.exists() {
            return Self::Missing;
        }
        match Settings::load(path) {
            Ok(settings) => Self::Loaded(settings),
            Err(e) => Self::Broken(e),
        }
    }

    /// Settings to start with: the file's values or the defaults
    pub fn settings(&self) -> Settings {
        match self {
            Self::Loaded(settings) => settings.clone(),
            Self::Missing | Self::Broken(_) => Settings::default(),
        }
    }

    /// False for a broken file; saving over it would discard the user's values
    pub fn may_overwrite(&self) -> bool {
        !matches!(self, Self::Broken(_))
    }

    pub fn log(&self, path: &Path) {
        match self {
            Self::Loaded(_) => tracing::info!("Loaded settings from {}", path.display()),
            Self::Missing => {
                tracing::info!("No settings file at {}, using defaults", path.display())
            }
            Self::Broken(e) => tracing::warn!("{}, using defaults", e),
        }
    }
}

/// Clamp a volume coefficient into [0, 1]; NaN counts as silence
pub fn clamp_coefficient(coeff: f32) -> f32 {
    if coeff.is_nan() {
        0.0
    } else {
        coeff.clamp(0.0, 1.0)
    }
}

/// Settings location: `QSP_CONFIG`, else next to the executable
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = std::env::var("QSP_CONFIG") {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SETTINGS_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
}
