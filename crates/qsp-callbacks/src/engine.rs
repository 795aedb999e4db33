use std::path::Path;

/// The engine's own load/save routines. The save-file format belongs to the
/// engine; the facade only decides which path to hand over.
pub trait GamePersistence {
    /// Load a game world; `is_new_game` resets the engine state first
    fn load_game_world(&mut self, path: &Path, is_new_game: bool) -> anyhow::Result<()>;

    /// Restore a saved game
    fn open_saved_game(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Write the current game state
    fn save_game(&mut self, path: &Path) -> anyhow::Result<()>;
}
