#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tower defense engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems and the adapters. Coordinates, entity handles and the
//! schemas loaded from a blueprint live here, together with the persisted
//! [`GameState`] snapshot and the error taxonomy every player action reports
//! through. The engine broadcasts [`Event`] values while stepping a tick so
//! hosts can react without inspecting internal state.

pub mod environment;
pub mod error;
pub mod schema;
pub mod state;

pub use environment::{EnvironmentKnowledge, MonsterSnapshot, TowerSnapshot};
pub use error::{ActionError, CreationFailure, InvalidSavedGame, PathBlocked, SchemaMissing};
pub use schema::{
    Attributes, BehaviorKind, Blueprint, DetectorKind, GameScenario, ItemKind, ItemSchema,
    MapSchema, MonsterSchema, MonsterSpawnSchema, TileSchema, TowerSchema, WaveSpawnSchema,
};
pub use state::{GameState, PlacedTower, Player};

use serde::{Deserialize, Serialize};

/// Content identifier reserved for walkable terrain.
pub const WALKABLE_CID: u32 = 0;

/// Content identifier written into a tile occupied by a tower.
pub const TOWER_CID: u32 = 2;

/// Events broadcast by the engine while stepping a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Clock value after the advance, measured in ticks.
        clock: u64,
    },
    /// Confirms that a wave swarm entered the map.
    WaveSpawned {
        /// Monotonic index of the spawned wave.
        wave: u32,
        /// Number of monsters created for the wave.
        monsters: usize,
    },
    /// Reports that the spawn step aborted because a monster could not be built.
    SpawnFailed {
        /// Index of the wave that failed to spawn.
        wave: u32,
    },
    /// Confirms that a dying monster released its resurrection swarm.
    MonsterResurrected {
        /// Identifier of the monster whose death triggered the swarm.
        source: MonsterId,
        /// Number of monsters merged into the live set.
        spawned: usize,
    },
    /// Reports that a monster was killed and its reward granted.
    MonsterKilled {
        /// Identifier of the killed monster.
        monster: MonsterId,
        /// Money granted to the player.
        reward: u32,
    },
    /// Reports that a monster reached the exit and cost the player a life.
    MonsterEscaped {
        /// Identifier of the escaped monster.
        monster: MonsterId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Monster targeted by the projectile.
        target: MonsterId,
    },
    /// Confirms that a monster took damage.
    MonsterDamaged {
        /// Monster that was hit.
        monster: MonsterId,
        /// Amount of damage applied.
        damage: u32,
    },
    /// Confirms that a monster was frozen in place.
    MonsterFrozen {
        /// Monster that was frozen.
        monster: MonsterId,
        /// Number of ticks the monster stays frozen.
        ticks: u32,
    },
    /// Confirms that the player received money outside of kill rewards.
    MoneyGranted {
        /// Amount of money granted.
        amount: u32,
    },
    /// Confirms that an item fired its one-time action.
    ItemActivated {
        /// Identifier of the item.
        item: ItemId,
        /// Kind of action the item performed.
        kind: ItemKind,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new grid tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Continuous point at the centre of the tile.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position measured in tile units.
///
/// The integer part of each axis selects a tile, so `(3.5, 2.5)` is the
/// centre of tile `(3, 2)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a point from its horizontal and vertical components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component in tile units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in tile units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Tile that contains the point. Negative components clamp to zero.
    #[must_use]
    pub fn tile(self) -> TileCoord {
        TileCoord::new(self.x.max(0.0) as u32, self.y.max(0.0) as u32)
    }

    /// Moves towards `target` by at most `max_step`, reporting arrival.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, max_step: f32) -> (WorldPoint, bool) {
        let distance = self.distance(target);
        if distance <= max_step || distance <= f32::EPSILON {
            return (target, true);
        }

        let ratio = max_step / distance;
        let next = WorldPoint::new(
            self.x + (target.x - self.x) * ratio,
            self.y + (target.y - self.y) * ratio,
        );
        (next, false)
    }
}

/// Describes the discrete tile layout of the map.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in screen units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Converts a screen-space location into the tile beneath it.
    ///
    /// Hosts use this to translate pointer input before forwarding it to the
    /// structural player actions.
    #[must_use]
    pub fn tile_at(&self, x: f32, y: f32) -> Option<TileCoord> {
        if self.tile_length <= 0.0 || x < 0.0 || y < 0.0 {
            return None;
        }

        let tile = TileCoord::new(
            (x / self.tile_length) as u32,
            (y / self.tile_length) as u32,
        );
        self.contains(tile).then_some(tile)
    }
}
