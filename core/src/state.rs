//! Player wallet and the persisted game snapshot.

use serde::{Deserialize, Serialize};

use crate::{ActionError, TileCoord, WaveSpawnSchema};

/// Money, lives and score of the player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    money: u32,
    lives: u32,
    score: u64,
}

impl Player {
    /// Creates a player with the provided starting money and lives.
    #[must_use]
    pub const fn new(money: u32, lives: u32) -> Self {
        Self {
            money,
            lives,
            score: 0,
        }
    }

    /// Money currently held.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Checks that the player could pay `cost` without spending it.
    pub fn ensure_affordable(&self, cost: u32) -> Result<(), ActionError> {
        if self.money >= cost {
            Ok(())
        } else {
            Err(ActionError::InsufficientFunds {
                cost,
                available: self.money,
            })
        }
    }

    /// Deducts `cost`, refusing when the wallet would go negative.
    pub fn spend(&mut self, cost: u32) -> Result<(), ActionError> {
        self.ensure_affordable(cost)?;
        self.money -= cost;
        Ok(())
    }

    /// Adds money to the wallet.
    pub fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Adds points to the score.
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Removes one life.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Restores one life.
    pub fn gain_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Reports whether every life has been lost.
    #[must_use]
    pub const fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }
}

/// Tower recorded in a saved game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTower {
    /// Tile the tower occupies.
    pub tile: TileCoord,
    /// Schema name the tower was built from.
    pub name: String,
}

/// Snapshot exchanged with the persistence collaborator.
///
/// Towers are recorded by schema name and rebuilt through the entity factory
/// on load. Live monsters, items and projectiles are not part of the
/// snapshot; a loaded game replays the wave that was on the map, from its
/// start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Grid width the towers were placed on.
    pub columns: u32,
    /// Grid height the towers were placed on.
    pub rows: u32,
    /// Towers in row-major tile order.
    pub towers: Vec<PlacedTower>,
    /// Every wave of the scenario.
    pub wave_schemas: Vec<WaveSpawnSchema>,
    /// Index of the next wave to spawn after loading. A save taken while a
    /// wave is on the map records that wave, so it is replayed in full.
    pub current_wave: u32,
    /// Whether the all-waves-cleared win condition is disabled.
    #[serde(default)]
    pub survival_mode: bool,
    /// Simulation clock in ticks.
    pub clock: u64,
    /// Player wallet, lives and score.
    pub player: Player,
}
