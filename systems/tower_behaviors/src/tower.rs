//! Tower capability and its ordered behavior chain.

use tower_defense_core::{
    BehaviorKind, EnvironmentKnowledge, TileCoord, TowerSchema, WorldPoint,
};

use crate::{behavior_for, BehaviorTuning, Effect, TowerBehavior};

/// Read-only attributes of a tower.
///
/// Every behavior in the chain sees the same stats, which is what keeps the
/// chain transparent to cost, range and upgrade queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerStats {
    name: String,
    tile: TileCoord,
    cost: u32,
    range: f32,
    damage: u32,
    buildup: u32,
    upgrade: Option<String>,
}

impl TowerStats {
    /// Creates tower stats from explicit values.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        tile: TileCoord,
        cost: u32,
        range: f32,
        damage: u32,
        buildup: u32,
    ) -> Self {
        Self {
            name: name.into(),
            tile,
            cost,
            range,
            damage,
            buildup,
            upgrade: None,
        }
    }

    /// Sets the schema name the tower upgrades into.
    #[must_use]
    pub fn with_upgrade(mut self, upgrade: Option<String>) -> Self {
        self.upgrade = upgrade;
        self
    }

    /// Schema name of the tower.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile the tower occupies.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Purchase price.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Action radius in tiles.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Damage dealt by offensive behaviors.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Ticks between actions.
    #[must_use]
    pub const fn buildup(&self) -> u32 {
        self.buildup
    }

    /// Schema name the tower upgrades into, if any.
    #[must_use]
    pub fn upgrade_name(&self) -> Option<&str> {
        self.upgrade.as_deref()
    }

    /// Centre of the tower's tile.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        self.tile.center()
    }
}

/// Live tower: stats, buildup timer and behavior chain.
#[derive(Debug)]
pub struct Tower {
    stats: TowerStats,
    charge: u32,
    behaviors: Vec<Box<dyn TowerBehavior>>,
}

impl Tower {
    /// Assembles a tower from stats and an ordered behavior list.
    ///
    /// Later duplicates of a behavior kind are dropped; the remaining order
    /// is never changed afterwards.
    #[must_use]
    pub fn new(stats: TowerStats, behaviors: Vec<Box<dyn TowerBehavior>>) -> Self {
        let mut chain: Vec<Box<dyn TowerBehavior>> = Vec::with_capacity(behaviors.len());
        for behavior in behaviors {
            if chain.iter().all(|existing| existing.kind() != behavior.kind()) {
                chain.push(behavior);
            }
        }

        Self {
            stats,
            charge: 0,
            behaviors: chain,
        }
    }

    /// Builds a tower at `tile` from its schema.
    #[must_use]
    pub fn from_schema(schema: &TowerSchema, tile: TileCoord, tuning: BehaviorTuning) -> Self {
        let stats = TowerStats::new(
            schema.name.clone(),
            tile,
            schema.cost,
            schema.range,
            schema.damage,
            schema.buildup,
        )
        .with_upgrade(schema.upgrade.clone());
        let behaviors = schema
            .behaviors
            .iter()
            .map(|kind| behavior_for(*kind, schema.detector, tuning))
            .collect();
        Self::new(stats, behaviors)
    }

    /// Read-only attributes of the tower.
    #[must_use]
    pub fn stats(&self) -> &TowerStats {
        &self.stats
    }

    /// Tile the tower occupies.
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        self.stats.tile()
    }

    /// Purchase price.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.stats.cost()
    }

    /// Action radius in tiles.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.stats.range()
    }

    /// Schema name of the tower.
    #[must_use]
    pub fn name(&self) -> &str {
        self.stats.name()
    }

    /// Schema name the tower upgrades into, if any.
    #[must_use]
    pub fn upgrade_name(&self) -> Option<&str> {
        self.stats.upgrade_name()
    }

    /// Behavior kinds in chain order.
    #[must_use]
    pub fn behavior_kinds(&self) -> Vec<BehaviorKind> {
        self.behaviors.iter().map(|behavior| behavior.kind()).collect()
    }

    /// Runs one frame of the chain.
    ///
    /// The base capability charges the buildup timer and lets the chain
    /// proceed once charged. Each link runs only if the previous link
    /// returned `true`; the result of the last link that ran is returned.
    /// The timer restarts whenever at least one link acted.
    pub fn call_actions(
        &mut self,
        environment: &EnvironmentKnowledge,
        out: &mut Vec<Effect>,
    ) -> bool {
        self.charge = self.charge.saturating_add(1);
        if self.charge < self.stats.buildup {
            return false;
        }

        let mut gate = true;
        let mut acted = false;
        for behavior in &mut self.behaviors {
            if !gate {
                break;
            }
            gate = behavior.act(&self.stats, environment, out);
            acted |= gate;
        }

        if acted {
            self.charge = 0;
        }
        gate
    }
}
