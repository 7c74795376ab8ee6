//! Failures reported while loading blueprints and saved games.

use thiserror::Error;
use tower_defense_core::{InvalidSavedGame, PathBlocked};

/// Loading a blueprint or a saved game failed; the running game is unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The blueprint's map offers no route from the entrance to the exit.
    #[error("blueprint is not playable: {0}")]
    Unplayable(#[from] PathBlocked),
    /// The saved game could not be read or rebuilt.
    #[error(transparent)]
    SavedGame(#[from] InvalidSavedGame),
}
