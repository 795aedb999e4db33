//! GUI shell seam
//!
//! Everything the facade asks of the desktop window. Modal methods block
//! until the user dismisses the dialog.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CallbackError;

/// UI regions the engine can show or hide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Actions,
    Objects,
    Variables,
    Input,
}

impl Pane {
    pub const ALL: [Pane; 4] = [Pane::Actions, Pane::Objects, Pane::Variables, Pane::Input];

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Pane::Actions => "actions",
            Pane::Objects => "objects",
            Pane::Variables => "vars",
            Pane::Input => "input",
        }
    }

    /// Engine pane constant
    pub fn code(self) -> i32 {
        match self {
            Pane::Actions => 0,
            Pane::Objects => 1,
            Pane::Variables => 2,
            Pane::Input => 3,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|pane| pane.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl TryFrom<i32> for Pane {
    type Error = CallbackError;

    /// Engine pane constants: 0 actions, 1 objects, 2 variables, 3 input line
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Pane::ALL
            .into_iter()
            .find(|pane| pane.code() == value)
            .ok_or(CallbackError::UnknownPane(value))
    }
}

/// One entry of a selection menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub image: Option<PathBuf>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Which file chooser to present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRequest {
    OpenGame,
    OpenSavedGame,
    SaveGame,
}

impl FileRequest {
    pub fn title(&self) -> &'static str {
        match self {
            FileRequest::OpenGame => "Select game file",
            FileRequest::OpenSavedGame => "Select saved game file",
            FileRequest::SaveGame => "Save game",
        }
    }

    pub fn filter_name(&self) -> &'static str {
        match self {
            FileRequest::OpenGame => "QSP games",
            FileRequest::OpenSavedGame | FileRequest::SaveGame => "Saved game files",
        }
    }

    /// File extensions without the dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileRequest::OpenGame => &["qsp", "gam"],
            FileRequest::OpenSavedGame | FileRequest::SaveGame => &["sav"],
        }
    }

    /// Save dialog rather than open dialog
    pub fn is_save(&self) -> bool {
        matches!(self, FileRequest::SaveGame)
    }
}

/// The desktop window the facade presents through
pub trait Shell {
    /// Redraw the presentation surface; `forced` skips any coalescing
    fn request_redraw(&mut self, forced: bool);

    /// Arm the engine timer, or disarm it with `None`
    fn set_timer(&mut self, interval: Option<Duration>);

    /// Replace the text of the input line
    fn set_input_text(&mut self, text: &str);

    fn show_pane(&mut self, pane: Pane, visible: bool);

    /// Modal informational message
    fn show_message(&mut self, text: &str, html: bool);

    /// Modal single choice; `None` when cancelled
    fn choose_menu_item(&mut self, items: &[MenuItem]) -> Option<usize>;

    /// Modal text entry pre-filled with `initial`; `None` when cancelled
    fn prompt_input(&mut self, initial: &str, html: bool) -> Option<String>;

    /// Show an image, or clear the image pane with `None`
    fn show_image(&mut self, path: Option<&Path>);

    /// Modal file chooser; `None` when cancelled
    fn choose_file(&mut self, request: FileRequest) -> Option<PathBuf>;

    /// Process pending window events; called between sleep slices
    fn pump_events(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_from_engine_constant() {
        assert_eq!(Pane::try_from(0), Ok(Pane::Actions));
        assert_eq!(Pane::try_from(3), Ok(Pane::Input));
        assert_eq!(Pane::try_from(7), Err(CallbackError::UnknownPane(7)));
        for pane in Pane::ALL {
            assert_eq!(Pane::try_from(pane.code()), Ok(pane));
        }
    }

    #[test]
    fn pane_from_name() {
        assert_eq!(Pane::from_name("VARS"), Some(Pane::Variables));
        assert_eq!(Pane::from_name(" objects "), Some(Pane::Objects));
        assert_eq!(Pane::from_name("status"), None);
    }

    #[test]
    fn save_request_is_save_dialog() {
        assert!(FileRequest::SaveGame.is_save());
        assert!(!FileRequest::OpenSavedGame.is_save());
        assert_eq!(FileRequest::OpenGame.extensions(), &["qsp", "gam"]);
    }
}
