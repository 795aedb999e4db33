//! Callback facade for the QSP interpreter engine
//!
//! The engine calls a fixed table of entry points while it runs a game.
//! [`CallbackFacade`] implements each of them by dispatching to a GUI
//! [`Shell`], to the sound channels, or to the engine's own persistence
//! routines ([`GamePersistence`]).
//!
//! ## Entry points
//! ```text
//! RefreshInt(isForced)          -> refresh_int
//! SetTimer(msecs)               -> set_timer
//! SetInputStrText(text)         -> set_input_str_text
//! IsPlay(file)                  -> is_play
//! CloseFile(file)               -> close_file
//! PlayFile(file, volume)        -> play_file
//! ShowPane(type, toShow)        -> show_pane
//! Sleep(msecs)                  -> sleep
//! GetMSCount()                  -> get_ms_count
//! Msg(str)                      -> msg
//! ShowMenu(items, count)        -> show_menu
//! Input(text, buffer, maxLen)   -> input
//! ShowImage(file)               -> show_image
//! OpenGame(file, isNewGame)     -> open_game
//! OpenGameStatus(file)          -> open_game_status
//! SaveGameStatus(file)          -> save_game_status
//! Version(param, buffer, maxLen)-> version
//! ```

mod clock;
mod engine;
mod error;
mod facade;
mod shell;
mod text;
mod version;

pub use clock::{pace, MsClock, SLEEP_SLICE};
pub use engine::GamePersistence;
pub use error::{CallbackError, Result};
pub use facade::{menu_index, CallbackFacade, MAX_LIST_ITEMS, MENU_CANCELLED};
pub use shell::{FileRequest, MenuItem, Pane, Shell};
pub use text::BoundedText;
pub use version::VersionInfo;
