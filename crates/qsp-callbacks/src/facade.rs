//! Callback facade: one method per engine entry point
//!
//! Every method runs synchronously on the engine thread. Nothing here fails
//! the engine: load errors, cancelled dialogs and unknown keys degrade to
//! false, empty or the menu sentinel, and are logged.

use std::path::{Path, PathBuf};
use std::time::Duration;

use qsp_audio::{AudioBackend, SoundChannelManager};
use qsp_common::paths::resolve_path;

use crate::clock::{pace, MsClock};
use crate::engine::GamePersistence;
use crate::error::{CallbackError, Result};
use crate::shell::{FileRequest, MenuItem, Pane, Shell};
use crate::text::BoundedText;
use crate::version::VersionInfo;

/// Most items a menu may carry
pub const MAX_LIST_ITEMS: usize = 1000;

/// Menu result reported to the engine when nothing was chosen
pub const MENU_CANCELLED: i32 = -1;

/// Engine encoding of a menu choice: the 0-based index or [`MENU_CANCELLED`]
pub fn menu_index(choice: Option<usize>) -> i32 {
    choice
        .and_then(|index| i32::try_from(index).ok())
        .unwrap_or(MENU_CANCELLED)
}

pub struct CallbackFacade<S: Shell, B: AudioBackend> {
    shell: S,
    sounds: SoundChannelManager<B>,
    persistence: Box<dyn GamePersistence>,
    version: VersionInfo,
    clock: MsClock,
    html: bool,
    game_path: Option<PathBuf>,
}

impl<S: Shell, B: AudioBackend> CallbackFacade<S, B> {
    pub fn new(
        shell: S,
        sounds: SoundChannelManager<B>,
        persistence: impl GamePersistence + 'static,
    ) -> Self {
        tracing::debug!("Callback facade initialized");
        Self {
            shell,
            sounds,
            persistence: Box::new(persistence),
            version: VersionInfo::new(),
            clock: MsClock::new(),
            html: false,
            game_path: None,
        }
    }

    /// Replace the version table (before the engine starts asking)
    pub fn with_version_info(mut self, version: VersionInfo) -> Self {
        self.version = version;
        self
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn sounds(&self) -> &SoundChannelManager<B> {
        &self.sounds
    }

    pub fn sounds_mut(&mut self) -> &mut SoundChannelManager<B> {
        &mut self.sounds
    }

    /// Render message and input dialogs as HTML
    pub fn set_html_mode(&mut self, html: bool) {
        self.html = html;
    }

    /// Game file loaded by the last successful `open_game`
    pub fn game_path(&self) -> Option<&Path> {
        self.game_path.as_deref()
    }

    /// Directory engine file names are relative to
    pub fn game_dir(&self) -> &Path {
        self.sounds.base_dir()
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    pub fn refresh_int(&mut self, is_forced: bool) {
        self.shell.request_redraw(is_forced);
    }

    /// Arm the timer; zero or negative disables it
    pub fn set_timer(&mut self, msecs: i32) {
        let interval = u64::try_from(msecs)
            .ok()
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis);
        tracing::debug!("Timer: {:?}", interval);
        self.shell.set_timer(interval);
    }

    pub fn set_input_str_text(&mut self, text: &str) {
        self.shell.set_input_text(text);
    }

    /// Show or hide a pane given the engine's pane constant; unknown ones are ignored
    pub fn show_pane(&mut self, pane_type: i32, to_show: bool) {
        match Pane::try_from(pane_type) {
            Ok(pane) => self.shell.show_pane(pane, to_show),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    /// Show an image relative to the game directory; empty clears the pane
    pub fn show_image(&mut self, file: &str) {
        let path = resolve_path(self.game_dir(), file);
        self.shell.show_image(path.as_deref());
    }

    // -----------------------------------------------------------------------
    // Timing
    // -----------------------------------------------------------------------

    /// Block for `msecs`, keeping the window responsive. Always runs the full duration.
    pub fn sleep(&mut self, msecs: i32) {
        self.refresh_int(false);
        let duration = Duration::from_millis(u64::try_from(msecs).unwrap_or(0));
        let shell = &mut self.shell;
        pace(duration, || shell.pump_events());
    }

    pub fn get_ms_count(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    // -----------------------------------------------------------------------
    // Modal dialogs
    // -----------------------------------------------------------------------

    pub fn msg(&mut self, text: &str) {
        self.refresh_int(false);
        self.shell.show_message(text, self.html);
    }

    /// Present a menu; `Ok(None)` when cancelled.
    ///
    /// More than [`MAX_LIST_ITEMS`] items is refused without showing anything.
    pub fn show_menu(&mut self, items: &[MenuItem]) -> Result<Option<usize>> {
        if items.len() > MAX_LIST_ITEMS {
            tracing::warn!("Refusing menu with {} items", items.len());
            return Err(CallbackError::TooManyMenuItems {
                count: items.len(),
                max: MAX_LIST_ITEMS,
            });
        }
        if items.is_empty() {
            return Ok(None);
        }
        self.refresh_int(false);
        let choice = self
            .shell
            .choose_menu_item(items)
            .filter(|&index| index < items.len());
        tracing::debug!("Menu choice: {:?}", choice);
        Ok(choice)
    }

    /// Text entry; the answer is cut to `max_len` characters, cancel gives empty text
    pub fn input(&mut self, text: &str, max_len: usize) -> BoundedText {
        self.refresh_int(false);
        match self.shell.prompt_input(text, self.html) {
            Some(answer) => BoundedText::new(&answer, max_len),
            None => {
                tracing::debug!("Input cancelled");
                BoundedText::empty()
            }
        }
    }

    pub fn version(&self, param: &str, max_len: usize) -> BoundedText {
        self.version
            .get(param)
            .map_or_else(BoundedText::empty, |value| BoundedText::new(value, max_len))
    }

    // -----------------------------------------------------------------------
    // Sound
    // -----------------------------------------------------------------------

    pub fn is_play(&self, file: &str) -> bool {
        self.sounds.is_playing(file)
    }

    /// Empty name closes every file
    pub fn close_file(&mut self, file: &str) {
        self.sounds.close_file(file);
    }

    pub fn play_file(&mut self, file: &str, volume: i32) {
        if let Err(e) = self.sounds.play_file(file, volume) {
            tracing::warn!("Cannot play '{}': {}", file, e);
        }
    }

    pub fn set_overall_volume(&mut self, coeff: f32) {
        self.sounds.set_overall_volume(coeff);
    }

    /// Reclaim finished sounds; call from the shell's idle loop
    pub fn update_sounds(&mut self) {
        self.sounds.update_sounds();
    }

    // -----------------------------------------------------------------------
    // Game files
    // -----------------------------------------------------------------------

    fn pick_path(&mut self, file: &str, request: FileRequest) -> Option<PathBuf> {
        if let Some(path) = resolve_path(self.game_dir(), file) {
            return Some(path);
        }
        let chosen = self.shell.choose_file(request);
        if chosen.is_none() {
            tracing::debug!("{} cancelled", request.title());
        }
        chosen
    }

    /// Load a game world; with no name, ask the user for one
    pub fn open_game(&mut self, file: &str, is_new_game: bool) {
        let Some(path) = self.pick_path(file, FileRequest::OpenGame) else {
            return;
        };
        match self.persistence.load_game_world(&path, is_new_game) {
            Ok(()) => {
                tracing::info!("Opened game {}", path.display());
                if let Some(dir) = path.parent() {
                    self.sounds.set_base_dir(dir);
                }
                self.game_path = Some(path);
            }
            Err(e) => tracing::warn!("Failed to open game {}: {:#}", path.display(), e),
        }
    }

    pub fn open_game_status(&mut self, file: &str) {
        let Some(path) = self.pick_path(file, FileRequest::OpenSavedGame) else {
            return;
        };
        match self.persistence.open_saved_game(&path) {
            Ok(()) => tracing::info!("Restored saved game {}", path.display()),
            Err(e) => tracing::warn!("Failed to restore {}: {:#}", path.display(), e),
        }
    }

    pub fn save_game_status(&mut self, file: &str) {
        let Some(path) = self.pick_path(file, FileRequest::SaveGame) else {
            return;
        };
        match self.persistence.save_game(&path) {
            Ok(()) => tracing::info!("Saved game to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save {}: {:#}", path.display(), e),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Close every sound and the audio subsystem
    pub fn shutdown(&mut self) {
        self.sounds.shutdown();
    }
}
