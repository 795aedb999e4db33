use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Menu has {count} items, at most {max} can be shown")]
    TooManyMenuItems { count: usize, max: usize },

    #[error("Unknown pane type: {0}")]
    UnknownPane(i32),
}

pub type Result<T> = std::result::Result<T, CallbackError>;
