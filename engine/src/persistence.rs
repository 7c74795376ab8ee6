//! Contract of the save/load collaborator.

use std::path::Path;

use tower_defense_core::{Blueprint, GameState, InvalidSavedGame};

/// Moves blueprints and saved games between storage and memory.
///
/// Implementations choose the encoding; the engine only exchanges
/// [`Blueprint`] and [`GameState`] values through this trait.
pub trait PersistenceService {
    /// Reads the blueprint stored at `path`.
    fn load_blueprint(&self, path: &Path) -> Result<Blueprint, InvalidSavedGame>;

    /// Writes `state` to `path`, replacing any previous save.
    fn save_state(&self, state: &GameState, path: &Path) -> Result<(), InvalidSavedGame>;

    /// Reads the saved game stored at `path`.
    fn load_state(&self, path: &Path) -> Result<GameState, InvalidSavedGame>;
}
