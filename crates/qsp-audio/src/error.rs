use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio output unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Audio system is not running")]
    NotRunning,

    #[error("Failed to open sound file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode sound file {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to start playback: {0}")]
    Playback(String),

    #[error("All {0} sound channels are in use")]
    ChannelsExhausted(usize),

    #[error("Empty sound file name")]
    EmptyFileName,
}

pub type Result<T> = std::result::Result<T, AudioError>;
