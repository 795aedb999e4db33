//! Audio output via rodio
//!
//! Sounds are decoded lazily from the file and buffered, so the same decoded
//! sound can feed a fresh sink without reopening the file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::backend::{AudioBackend, Channel};
use crate::error::{AudioError, Result};

/// rodio output stream plus the handle sinks are created from
pub struct RodioBackend {
    /// rodio output stream (must be kept alive)
    _stream: OutputStream,
    /// Handle for creating new sinks
    handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        tracing::info!("Audio output initialized");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        tracing::info!("Audio output closed");
    }
}

/// Decoded sound shared between the entry and its sink
pub struct RodioSound {
    source: Buffered<Decoder<BufReader<File>>>,
}

/// One sink per playing file
pub struct RodioChannel {
    sink: Sink,
}

impl Channel for RodioChannel {
    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn is_playing(&self) -> bool {
        !self.sink.empty()
    }

    fn stop(&self) {
        self.sink.stop();
    }
}

impl AudioBackend for RodioBackend {
    type Sound = RodioSound;
    type Channel = RodioChannel;

    fn load(&self, path: &Path) -> Result<RodioSound> {
        let file = File::open(path).map_err(|source| AudioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(RodioSound {
            source: decoder.buffered(),
        })
    }

    fn play(&self, sound: &RodioSound, volume: f32) -> Result<RodioChannel> {
        let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
        sink.set_volume(volume);
        sink.append(sound.source.clone());
        Ok(RodioChannel { sink })
    }
}
