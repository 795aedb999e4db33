//! Sound-channel manager
//!
//! One entry per normalized file name. An entry owns its channel and its
//! decoded sound; removing it from the table stops and releases both.
//! Effective channel volume is always `volume / 100 × coefficient`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use qsp_common::clamp_coefficient;
use qsp_common::paths::{normalize_key, resolve_path};

use crate::backend::{AudioBackend, Channel};
use crate::error::{AudioError, Result};

/// Upper bound of a per-file volume
pub const MAX_VOLUME: u8 = 100;

struct SoundEntry<B: AudioBackend> {
    // Declared before the sound: the channel goes first
    channel: B::Channel,
    _sound: B::Sound,
    volume: u8,
}

impl<B: AudioBackend> Drop for SoundEntry<B> {
    fn drop(&mut self) {
        self.channel.stop();
    }
}

/// Owns every open sound and the audio backend
pub struct SoundChannelManager<B: AudioBackend> {
    // Declared before the backend: entries are released first
    sounds: HashMap<String, SoundEntry<B>>,
    backend: Option<B>,
    base_dir: PathBuf,
    coefficient: f32,
    max_channels: usize,
}

impl<B: AudioBackend> SoundChannelManager<B> {
    /// Manager driving `backend`, full volume, default channel budget
    pub fn new(backend: B) -> Self {
        Self::with_backend(Some(backend))
    }

    /// Manager whose subsystem failed to start; every play request fails
    pub fn unavailable() -> Self {
        Self::with_backend(None)
    }

    fn with_backend(backend: Option<B>) -> Self {
        Self {
            sounds: HashMap::new(),
            backend,
            base_dir: PathBuf::new(),
            coefficient: 1.0,
            max_channels: qsp_common::DEFAULT_MAX_CHANNELS,
        }
    }

    /// Limit how many files may be open at once (at least one)
    pub fn with_max_channels(mut self, max_channels: usize) -> Self {
        self.max_channels = max_channels.max(1);
        self
    }

    /// Start with a global coefficient other than 1.0
    pub fn with_overall_volume(mut self, coeff: f32) -> Self {
        self.coefficient = clamp_coefficient(coeff);
        self
    }

    /// Directory relative file names are resolved against
    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = dir.into();
        tracing::debug!("Sound base directory: {}", self.base_dir.display());
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// False once shut down or if the subsystem never started
    pub fn is_running(&self) -> bool {
        self.backend.is_some()
    }

    /// Number of open entries (playing or finished but not yet reclaimed)
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    fn key(&self, file: &str) -> Option<String> {
        normalize_key(&self.base_dir, file)
    }

    /// True iff the file has an entry whose channel is still playing
    pub fn is_playing(&self, file: &str) -> bool {
        self.key(file)
            .and_then(|key| self.sounds.get(&key))
            .map_or(false, |entry| entry.channel.is_playing())
    }

    /// Play a file at `volume` (0 – 100, clamped).
    ///
    /// A file that is still playing is only rescaled. A finished entry that
    /// has not been reclaimed yet is replaced by fresh playback.
    pub fn play_file(&mut self, file: &str, volume: i32) -> Result<()> {
        let key = self.key(file).ok_or(AudioError::EmptyFileName)?;
        let volume = clamp_volume(volume);

        if self.rescale(&key, volume) {
            tracing::debug!("Already playing {}, volume {}", key, volume);
            return Ok(());
        }
        if self.sounds.remove(&key).is_some() {
            tracing::debug!("Replacing finished sound {}", key);
        }
        self.update_sounds();

        let backend = self.backend.as_ref().ok_or(AudioError::NotRunning)?;
        if self.sounds.len() >= self.max_channels {
            return Err(AudioError::ChannelsExhausted(self.max_channels));
        }
        let path = resolve_path(&self.base_dir, file).ok_or(AudioError::EmptyFileName)?;

        let sound = backend.load(&path)?;
        let channel = backend.play(&sound, effective(volume, self.coefficient))?;
        tracing::debug!("Playing {} at volume {}", path.display(), volume);

        self.sounds.insert(
            key,
            SoundEntry {
                channel,
                _sound: sound,
                volume,
            },
        );
        Ok(())
    }

    /// Stop and release a file; an empty name closes every file
    pub fn close_file(&mut self, file: &str) {
        if file.is_empty() {
            self.close_all();
            return;
        }
        if let Some(key) = self.key(file) {
            if self.sounds.remove(&key).is_some() {
                tracing::debug!("Closed {}", key);
            }
        }
    }

    /// Stop and release every file
    pub fn close_all(&mut self) {
        if !self.sounds.is_empty() {
            tracing::debug!("Closing {} sound(s)", self.sounds.len());
            self.sounds.clear();
        }
    }

    /// Change the volume of a playing file; false if it is not playing
    pub fn set_volume(&mut self, file: &str, volume: i32) -> bool {
        match self.key(file) {
            Some(key) => self.rescale(&key, clamp_volume(volume)),
            None => false,
        }
    }

    fn rescale(&mut self, key: &str, volume: u8) -> bool {
        let coefficient = self.coefficient;
        match self.sounds.get_mut(key) {
            Some(entry) if entry.channel.is_playing() => {
                entry.volume = volume;
                entry.channel.set_volume(effective(volume, coefficient));
                true
            }
            _ => false,
        }
    }

    /// Set the global coefficient (clamped to [0, 1]) and apply it to every channel
    pub fn set_overall_volume(&mut self, coeff: f32) {
        self.coefficient = clamp_coefficient(coeff);
        for entry in self.sounds.values() {
            entry.channel.set_volume(effective(entry.volume, self.coefficient));
        }
        tracing::debug!(
            "Overall volume {:.2} applied to {} channel(s)",
            self.coefficient,
            self.sounds.len()
        );
    }

    pub fn overall_volume(&self) -> f32 {
        self.coefficient
    }

    /// Per-file volume of an open entry (0 – 100)
    pub fn volume(&self, file: &str) -> Option<u8> {
        self.key(file)
            .and_then(|key| self.sounds.get(&key))
            .map(|entry| entry.volume)
    }

    /// Volume the entry's channel is playing at, on the 0 – 100 scale
    pub fn effective_volume(&self, file: &str) -> Option<f32> {
        self.key(file)
            .and_then(|key| self.sounds.get(&key))
            .map(|entry| entry.channel.volume() * f32::from(MAX_VOLUME))
    }

    /// Release entries whose playback ended on its own; returns how many
    pub fn update_sounds(&mut self) -> usize {
        let before = self.sounds.len();
        self.sounds.retain(|key, entry| {
            let alive = entry.channel.is_playing();
            if !alive {
                tracing::debug!("Finished {}", key);
            }
            alive
        });
        before - self.sounds.len()
    }

    /// Release every entry, then the audio subsystem. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.close_all();
        if self.backend.take().is_some() {
            tracing::info!("Sound channels shut down");
        }
    }
}

impl<B: AudioBackend> Drop for SoundChannelManager<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn clamp_volume(volume: i32) -> u8 {
    volume.clamp(0, i32::from(MAX_VOLUME)) as u8
}

/// Channel volume for a per-file volume and the global coefficient
fn effective(volume: u8, coefficient: f32) -> f32 {
    f32::from(volume) / f32::from(MAX_VOLUME) * coefficient
}
