#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! JSON file persistence for blueprints and saved games.
//!
//! Blueprints are read as plain JSON documents. Saved games are wrapped in an
//! envelope carrying a format tag and a revision number so that files written
//! by another producer, or by an incompatible revision, are refused before
//! their payload is interpreted.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tower_defense_core::{Blueprint, GameState, InvalidSavedGame};
use tower_defense_engine::PersistenceService;
use tracing::{debug, info};

/// Format tag written into every saved game.
pub const SAVE_FORMAT: &str = "tower-defense-save";
/// Saved-game revision this adapter reads and writes.
pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    format: &'a str,
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    format: String,
    version: u32,
    state: serde_json::Value,
}

/// Reads and writes game files as JSON on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonPersistence {
    pretty: bool,
}

impl JsonPersistence {
    /// Creates an adapter writing compact JSON.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Switches the adapter to indented output.
    #[must_use]
    pub const fn pretty(self) -> Self {
        Self { pretty: true }
    }

    /// Encodes a game state inside the versioned envelope.
    pub fn encode_state(&self, state: &GameState) -> Result<String, serde_json::Error> {
        let envelope = EnvelopeOut {
            format: SAVE_FORMAT,
            version: SAVE_VERSION,
            state,
        };
        if self.pretty {
            serde_json::to_string_pretty(&envelope)
        } else {
            serde_json::to_string(&envelope)
        }
    }

    /// Decodes a game state from its envelope. `origin` only labels errors.
    pub fn decode_state(text: &str, origin: &Path) -> Result<GameState, InvalidSavedGame> {
        let envelope: EnvelopeIn =
            serde_json::from_str(text).map_err(|error| malformed(origin, &error))?;

        if envelope.format != SAVE_FORMAT {
            return Err(InvalidSavedGame::UnsupportedFormat {
                found: envelope.format,
            });
        }
        if envelope.version != SAVE_VERSION {
            return Err(InvalidSavedGame::UnsupportedVersion {
                found: envelope.version,
            });
        }

        serde_json::from_value(envelope.state).map_err(|error| malformed(origin, &error))
    }

    /// Decodes a blueprint document. `origin` only labels errors.
    pub fn decode_blueprint(text: &str, origin: &Path) -> Result<Blueprint, InvalidSavedGame> {
        serde_json::from_str(text).map_err(|error| malformed(origin, &error))
    }
}

impl PersistenceService for JsonPersistence {
    fn load_blueprint(&self, path: &Path) -> Result<Blueprint, InvalidSavedGame> {
        let text = read(path)?;
        let blueprint = Self::decode_blueprint(&text, path)?;
        debug!(
            path = %path.display(),
            towers = blueprint.tower_schemas.len(),
            waves = blueprint.wave_schemas.len(),
            "blueprint read"
        );
        Ok(blueprint)
    }

    fn save_state(&self, state: &GameState, path: &Path) -> Result<(), InvalidSavedGame> {
        let text = self
            .encode_state(state)
            .map_err(|error| malformed(path, &error))?;

        // An interrupted write must not truncate an existing save.
        let staging = staging_path(path);
        fs::write(&staging, text).map_err(|source| io_error(&staging, source))?;
        fs::rename(&staging, path).map_err(|source| io_error(path, source))?;

        info!(path = %path.display(), clock = state.clock, "game saved");
        Ok(())
    }

    fn load_state(&self, path: &Path) -> Result<GameState, InvalidSavedGame> {
        let text = read(path)?;
        let state = Self::decode_state(&text, path)?;
        debug!(path = %path.display(), clock = state.clock, "saved game read");
        Ok(state)
    }
}

fn read(path: &Path) -> Result<String, InvalidSavedGame> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: io::Error) -> InvalidSavedGame {
    InvalidSavedGame::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, error: &serde_json::Error) -> InvalidSavedGame {
    InvalidSavedGame::Malformed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_core::{MonsterSpawnSchema, PlacedTower, Player, TileCoord, WaveSpawnSchema};

    fn state() -> GameState {
        GameState {
            columns: 12,
            rows: 8,
            towers: vec![PlacedTower {
                tile: TileCoord::new(5, 7),
                name: "arrow".to_owned(),
            }],
            wave_schemas: vec![
                WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("goblin", 3))
            ],
            current_wave: 1,
            survival_mode: false,
            clock: 240,
            player: Player::new(75, 4),
        }
    }

    #[test]
    fn envelope_carries_format_and_version() {
        let encoded = JsonPersistence::new()
            .encode_state(&state())
            .expect("encodes");
        let value: serde_json::Value = serde_json::from_str(&encoded).expect("valid json");

        assert_eq!(value["format"], SAVE_FORMAT);
        assert_eq!(value["version"], SAVE_VERSION);
        assert_eq!(value["state"]["clock"], 240);
    }

    #[test]
    fn pretty_output_decodes_to_the_same_state() {
        let encoded = JsonPersistence::new()
            .pretty()
            .encode_state(&state())
            .expect("encodes");
        assert!(encoded.contains('\n'));

        let decoded =
            JsonPersistence::decode_state(&encoded, Path::new("save.json")).expect("decodes");
        assert_eq!(decoded, state());
    }

    #[test]
    fn foreign_format_is_refused() {
        let text = r#"{"format":"level-editor","version":1,"state":{}}"#;
        let error = JsonPersistence::decode_state(text, Path::new("save.json"))
            .expect_err("wrong producer");
        assert!(matches!(
            error,
            InvalidSavedGame::UnsupportedFormat { found } if found == "level-editor"
        ));
    }

    #[test]
    fn future_revision_is_refused() {
        let text = format!(r#"{{"format":"{SAVE_FORMAT}","version":7,"state":{{}}}}"#);
        let error = JsonPersistence::decode_state(&text, Path::new("save.json"))
            .expect_err("unknown revision");
        assert!(matches!(error, InvalidSavedGame::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn truncated_payload_reports_the_file() {
        let text = format!(r#"{{"format":"{SAVE_FORMAT}","version":1,"state":{{"columns":3}}}}"#);
        let error = JsonPersistence::decode_state(&text, Path::new("slot.json"))
            .expect_err("missing fields");
        match error {
            InvalidSavedGame::Malformed { path, .. } => assert_eq!(path, Path::new("slot.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn staging_file_sits_beside_the_target() {
        assert_eq!(
            staging_path(Path::new("saves/slot.json")),
            Path::new("saves/slot.json.partial")
        );
    }
}
