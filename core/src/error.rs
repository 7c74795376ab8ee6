//! Error taxonomy reported by factories, the pathfinder and player actions.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::TileCoord;

/// The factory could not build the requested entity.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("could not create `{name}`: {reason}")]
pub struct CreationFailure {
    /// Schema name the caller asked for.
    pub name: String,
    /// Human readable cause.
    pub reason: String,
}

impl CreationFailure {
    /// Creates a failure for the named schema.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// A route to the exit no longer exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no route from ({}, {}) to the exit", origin.column(), origin.row())]
pub struct PathBlocked {
    /// Tile whose route to the exit was severed.
    pub origin: TileCoord,
}

/// Attribute lookup against a schema that was never loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no schema named `{name}`")]
pub struct SchemaMissing {
    /// Name that failed to resolve.
    pub name: String,
}

/// Saving or loading a game failed.
#[derive(Debug, Error)]
pub enum InvalidSavedGame {
    /// The file could not be read or written.
    #[error("could not access `{}`: {source}", path.display())]
    Io {
        /// Location of the saved game.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file contents could not be decoded.
    #[error("could not decode `{}`: {reason}", path.display())]
    Malformed {
        /// Location of the saved game.
        path: PathBuf,
        /// Decoder diagnostic.
        reason: String,
    },
    /// The file was written by an unknown producer.
    #[error("unsupported save format `{found}`")]
    UnsupportedFormat {
        /// Format tag found in the file.
        found: String,
    },
    /// The file was written by a newer or older format revision.
    #[error("unsupported save version {found}")]
    UnsupportedVersion {
        /// Version number found in the file.
        found: u32,
    },
    /// The decoded state does not describe a playable game.
    #[error("saved game rejected: {reason}")]
    Rejected {
        /// Validation failure.
        reason: String,
    },
}

/// Reasons a synchronous player action may be rejected.
///
/// A rejected action never changes money, the grid or any entity.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The requested tile lies outside the map.
    #[error("tile ({}, {}) is outside the map", tile.column(), tile.row())]
    OutOfBounds {
        /// Tile provided by the caller.
        tile: TileCoord,
    },
    /// A tower already occupies the requested tile.
    #[error("tile ({}, {}) already holds a tower", tile.column(), tile.row())]
    Occupied {
        /// Tile provided by the caller.
        tile: TileCoord,
    },
    /// No tower occupies the requested tile.
    #[error("tile ({}, {}) holds no tower", tile.column(), tile.row())]
    NoTower {
        /// Tile provided by the caller.
        tile: TileCoord,
    },
    /// The tower on the requested tile has no upgrade.
    #[error("tower on ({}, {}) cannot be upgraded", tile.column(), tile.row())]
    NoUpgrade {
        /// Tile provided by the caller.
        tile: TileCoord,
    },
    /// The player cannot pay for the action.
    #[error("costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// Price of the action.
        cost: u32,
        /// Money held by the player.
        available: u32,
    },
    /// The factory failed to build the entity.
    #[error(transparent)]
    Creation(#[from] CreationFailure),
    /// The edit would cut the route to the exit.
    #[error(transparent)]
    PathBlocked(#[from] PathBlocked),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_tile() {
        let error = ActionError::from(PathBlocked {
            origin: TileCoord::new(0, 5),
        });
        assert_eq!(error.to_string(), "no route from (0, 5) to the exit");

        let error = ActionError::InsufficientFunds {
            cost: 30,
            available: 10,
        };
        assert_eq!(error.to_string(), "costs 30 but only 10 is available");
    }
}
