//! Audio side of the QSP GUI callback bridge
//!
//! This crate handles:
//! - The audio subsystem seam ([`AudioBackend`] / [`Channel`])
//! - Per-file sound channels with volume scaling ([`SoundChannelManager`])
//! - Real playback through rodio (`playback` feature)

mod backend;
mod channels;
mod error;
#[cfg(feature = "playback")]
mod rodio_backend;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use backend::{AudioBackend, Channel, NullBackend, NullChannel, NullSound};
pub use channels::{SoundChannelManager, MAX_VOLUME};
pub use error::{AudioError, Result};
#[cfg(feature = "playback")]
pub use rodio_backend::{RodioBackend, RodioChannel, RodioSound};
