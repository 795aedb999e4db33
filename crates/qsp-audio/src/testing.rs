//! Scripted in-memory backend
//!
//! Every path loads successfully unless registered with [`FakeBackend::fail_on`].
//! Channels play until [`FakeBackend::finish`] or a stop. Queries match
//! paths by their trailing components, so `"a.wav"` finds `game/a.wav`.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::backend::{AudioBackend, Channel};
use crate::error::{AudioError, Result};

#[derive(Default)]
struct FakeState {
    failing: Vec<PathBuf>,
    loads: usize,
    releases: usize,
    stops: usize,
    channels: Vec<Rc<ChannelState>>,
}

struct ChannelState {
    path: PathBuf,
    playing: Cell<bool>,
    volume: Cell<f32>,
}

/// Handle to the shared fake audio state; clones observe the same state
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `path` fail with a decode error
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().failing.push(path.into());
    }

    /// Number of sounds loaded
    pub fn loads(&self) -> usize {
        self.state.borrow().loads
    }

    /// Number of sounds released
    pub fn releases(&self) -> usize {
        self.state.borrow().releases
    }

    /// Sounds loaded and not yet released
    pub fn live_sounds(&self) -> usize {
        let state = self.state.borrow();
        state.loads - state.releases
    }

    /// Number of channel stops
    pub fn stops(&self) -> usize {
        self.state.borrow().stops
    }

    /// How many times playback of `path` was started
    pub fn starts(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.state
            .borrow()
            .channels
            .iter()
            .filter(|c| c.path.ends_with(path))
            .count()
    }

    /// Volume of the most recent channel playing `path`
    pub fn volume(&self, path: impl AsRef<Path>) -> Option<f32> {
        self.latest(path.as_ref()).map(|c| c.volume.get())
    }

    /// Whether the most recent channel for `path` is still playing
    pub fn is_channel_playing(&self, path: impl AsRef<Path>) -> bool {
        self.latest(path.as_ref()).map_or(false, |c| c.playing.get())
    }

    /// Let the most recent channel for `path` reach its natural end
    pub fn finish(&self, path: impl AsRef<Path>) {
        if let Some(channel) = self.latest(path.as_ref()) {
            channel.playing.set(false);
        }
    }

    fn latest(&self, path: &Path) -> Option<Rc<ChannelState>> {
        self.state
            .borrow()
            .channels
            .iter()
            .rev()
            .find(|c| c.path.ends_with(path))
            .cloned()
    }
}

/// Counts its own release
pub struct FakeSound {
    path: PathBuf,
    state: Rc<RefCell<FakeState>>,
}

impl Drop for FakeSound {
    fn drop(&mut self) {
        self.state.borrow_mut().releases += 1;
    }
}

pub struct FakeChannel {
    channel: Rc<ChannelState>,
    state: Rc<RefCell<FakeState>>,
}

impl Channel for FakeChannel {
    fn set_volume(&self, volume: f32) {
        self.channel.volume.set(volume);
    }

    fn volume(&self) -> f32 {
        self.channel.volume.get()
    }

    fn is_playing(&self) -> bool {
        self.channel.playing.get()
    }

    fn stop(&self) {
        if self.channel.playing.replace(false) {
            self.state.borrow_mut().stops += 1;
        }
    }
}

impl AudioBackend for FakeBackend {
    type Sound = FakeSound;
    type Channel = FakeChannel;

    fn load(&self, path: &Path) -> Result<FakeSound> {
        let mut state = self.state.borrow_mut();
        if state.failing.iter().any(|f| path.ends_with(f)) {
            return Err(AudioError::Decode {
                path: path.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        state.loads += 1;
        Ok(FakeSound {
            path: path.to_path_buf(),
            state: Rc::clone(&self.state),
        })
    }

    fn play(&self, sound: &FakeSound, volume: f32) -> Result<FakeChannel> {
        let channel = Rc::new(ChannelState {
            path: sound.path.clone(),
            playing: Cell::new(true),
            volume: Cell::new(volume),
        });
        self.state.borrow_mut().channels.push(Rc::clone(&channel));
        Ok(FakeChannel {
            channel,
            state: Rc::clone(&self.state),
        })
    }
}
