//! Audio subsystem seam
//!
//! A backend turns a path into a decoded sound and a sound into a playing
//! channel. Both handles own their resources: dropping a channel stops it
//! and dropping a sound releases it, so the manager never frees anything by
//! hand. Dropping the backend shuts the subsystem down.

use std::path::Path;

use crate::error::{AudioError, Result};

/// A playback slot in the audio subsystem
pub trait Channel {
    /// Set output volume (0.0 – 1.0)
    fn set_volume(&self, volume: f32);

    /// Current output volume (0.0 – 1.0)
    fn volume(&self) -> f32;

    /// True until playback has ended or been stopped (paused counts as playing)
    fn is_playing(&self) -> bool;

    /// Stop playback; the channel cannot be restarted afterwards
    fn stop(&self);
}

/// The external audio library
pub trait AudioBackend {
    /// Decoded sound resource, released on drop
    type Sound;
    /// Playback channel, stopped on drop
    type Channel: Channel;

    /// Load and decode a sound file
    fn load(&self, path: &Path) -> Result<Self::Sound>;

    /// Create a channel and start playing `sound` at `volume` (0.0 – 1.0)
    fn play(&self, sound: &Self::Sound, volume: f32) -> Result<Self::Channel>;
}

/// Backend for builds without audio output: every load fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

/// Never constructed
#[derive(Debug)]
pub enum NullSound {}

/// Never constructed
#[derive(Debug)]
pub enum NullChannel {}

impl Channel for NullChannel {
    fn set_volume(&self, _volume: f32) {
        match *self {}
    }

    fn volume(&self) -> f32 {
        match *self {}
    }

    fn is_playing(&self) -> bool {
        match *self {}
    }

    fn stop(&self) {
        match *self {}
    }
}

impl AudioBackend for NullBackend {
    type Sound = NullSound;
    type Channel = NullChannel;

    fn load(&self, path: &Path) -> Result<NullSound> {
        tracing::debug!("No audio output, ignoring {}", path.display());
        Err(AudioError::DeviceUnavailable(
            "built without the `playback` feature".to_string(),
        ))
    }

    fn play(&self, sound: &NullSound, _volume: f32) -> Result<NullChannel> {
        match *sound {}
    }
}
