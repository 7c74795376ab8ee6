//! Tunable constants of the simulation.

use serde::{Deserialize, Serialize};
use tower_defense_system_tower_behaviors::BehaviorTuning;

/// Engine parameters that are not part of a blueprint.
///
/// Every field has a default, so a configuration file only needs to list
/// the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of a tile in screen units, used to convert pointer input.
    pub tile_length: f32,
    /// Share of a tower's cost returned when it is removed, in percent.
    pub refund_percent: u32,
    /// Distance a projectile travels per tick, in tiles.
    pub projectile_speed: f32,
    /// Distance at which a projectile touches its target, in tiles.
    pub projectile_hit_radius: f32,
    /// Ticks a projectile may fly before it is discarded.
    pub projectile_lifetime: u32,
    /// Ticks a freeze keeps a monster in place.
    pub freeze_ticks: u32,
    /// Money granted per farming action.
    pub farm_amount: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let tuning = BehaviorTuning::default();
        Self {
            tile_length: 32.0,
            refund_percent: 50,
            projectile_speed: 0.5,
            projectile_hit_radius: 0.35,
            projectile_lifetime: 120,
            freeze_ticks: tuning.freeze_ticks,
            farm_amount: tuning.farm_amount,
        }
    }
}

impl EngineConfig {
    /// Behavior tuning derived from the configuration.
    #[must_use]
    pub const fn tuning(&self) -> BehaviorTuning {
        BehaviorTuning {
            freeze_ticks: self.freeze_ticks,
            farm_amount: self.farm_amount,
        }
    }

    /// Money returned for removing a tower that cost `cost`, rounded down.
    #[must_use]
    pub fn refund_for(&self, cost: u32) -> u32 {
        let refund = u64::from(cost) * u64::from(self.refund_percent.min(100)) / 100;
        u32::try_from(refund).unwrap_or(cost)
    }
}
