//! Declarative schemas loaded from a game blueprint.
//!
//! Schemas are plain data. The engine's entity factory turns them into live
//! towers, monsters and items; the persistence adapter moves them between
//! disk and memory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::TileCoord;

/// Attribute mapping exposed to hosts for display, keyed by attribute name.
pub type Attributes = BTreeMap<String, String>;

/// Attribute key shared by every schema.
pub const NAME: &str = "name";
/// Attribute key for the purchase price.
pub const COST: &str = "cost";
/// Attribute key for damage dealt per action.
pub const DAMAGE: &str = "damage";
/// Attribute key for the action radius in tiles.
pub const RANGE: &str = "range";
/// Attribute key for the buildup time in ticks.
pub const BUILDUP: &str = "buildup";

/// Per-frame action a tower may layer onto its base capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Launches a projectile at the detected monster.
    Shoot,
    /// Freezes the detected monster in place for a few ticks.
    Freeze,
    /// Grants the player money.
    FarmMoney,
    /// Damages every monster inside the tower's range.
    Bomb,
}

impl BehaviorKind {
    /// Stable lowercase label used in attribute listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shoot => "shoot",
            Self::Freeze => "freeze",
            Self::FarmMoney => "farm_money",
            Self::Bomb => "bomb",
        }
    }
}

/// Rule a tower uses to pick a target among the monsters in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Monster nearest to the tower.
    #[default]
    Nearest,
    /// Monster nearest to the exit.
    ClosestToExit,
}

/// Describes a buildable tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSchema {
    /// Unique schema name used by placement requests.
    pub name: String,
    /// Purchase price.
    pub cost: u32,
    /// Action radius measured in tiles.
    pub range: f32,
    /// Damage dealt by offensive behaviors.
    pub damage: u32,
    /// Ticks the tower charges between actions.
    pub buildup: u32,
    /// Behaviors layered onto the tower, in declaration order.
    #[serde(default)]
    pub behaviors: Vec<BehaviorKind>,
    /// Target selection rule.
    #[serde(default)]
    pub detector: DetectorKind,
    /// Name of the schema this tower upgrades into.
    #[serde(default)]
    pub upgrade: Option<String>,
}

impl TowerSchema {
    /// Flattens the schema into a display mapping.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        let behaviors: Vec<&str> = self.behaviors.iter().map(|kind| kind.label()).collect();
        let mut attributes = Attributes::new();
        let _ = attributes.insert(NAME.to_owned(), self.name.clone());
        let _ = attributes.insert(COST.to_owned(), self.cost.to_string());
        let _ = attributes.insert(RANGE.to_owned(), self.range.to_string());
        let _ = attributes.insert(DAMAGE.to_owned(), self.damage.to_string());
        let _ = attributes.insert(BUILDUP.to_owned(), self.buildup.to_string());
        let _ = attributes.insert("behaviors".to_owned(), behaviors.join(","));
        if let Some(upgrade) = &self.upgrade {
            let _ = attributes.insert("upgrade".to_owned(), upgrade.clone());
        }
        attributes
    }
}

/// Describes a monster species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterSchema {
    /// Unique schema name referenced by wave schemas.
    pub name: String,
    /// Hit points at spawn.
    pub health: u32,
    /// Distance travelled per tick in tiles.
    pub speed: f32,
    /// Money granted when the monster is killed.
    pub reward: u32,
    /// Swarm released where the monster dies.
    #[serde(default)]
    pub resurrect: Option<WaveSpawnSchema>,
}

impl MonsterSchema {
    /// Flattens the schema into a display mapping.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        let _ = attributes.insert(NAME.to_owned(), self.name.clone());
        let _ = attributes.insert("health".to_owned(), self.health.to_string());
        let _ = attributes.insert("speed".to_owned(), self.speed.to_string());
        let _ = attributes.insert("reward".to_owned(), self.reward.to_string());
        if let Some(schema) = &self.resurrect {
            let _ = attributes.insert(
                "resurrect".to_owned(),
                schema.monster_count().to_string(),
            );
        }
        attributes
    }
}

/// One-time action performed by an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Damages every live monster on the map.
    Annihilator,
    /// Damages every monster within range of the item.
    Bomb,
    /// Restores one life to the player.
    LifeSaver,
    /// Freezes every live monster on the map.
    InstantFreeze,
}

/// Describes a purchasable item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSchema {
    /// Unique schema name used by placement requests.
    pub name: String,
    /// Action performed once the item charges.
    pub kind: ItemKind,
    /// Purchase price.
    pub cost: u32,
    /// Ticks between placement and activation.
    pub buildup: u32,
    /// Damage dealt by offensive kinds.
    #[serde(default)]
    pub damage: u32,
    /// Radius in tiles for area kinds.
    #[serde(default)]
    pub range: f32,
}

impl ItemSchema {
    /// Flattens the schema into a display mapping.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        let _ = attributes.insert(NAME.to_owned(), self.name.clone());
        let _ = attributes.insert(COST.to_owned(), self.cost.to_string());
        let _ = attributes.insert(BUILDUP.to_owned(), self.buildup.to_string());
        let _ = attributes.insert(DAMAGE.to_owned(), self.damage.to_string());
        let _ = attributes.insert(RANGE.to_owned(), self.range.to_string());
        attributes
    }
}

/// Which monster to create and how many of it per swarm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSpawnSchema {
    /// Monster schema name.
    pub monster: String,
    /// Number of monsters created by the unit.
    pub swarm_size: u32,
}

impl MonsterSpawnSchema {
    /// Creates a spawn unit.
    #[must_use]
    pub fn new(monster: impl Into<String>, swarm_size: u32) -> Self {
        Self {
            monster: monster.into(),
            swarm_size,
        }
    }
}

/// Ordered list of spawn units making up one wave.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSpawnSchema {
    units: Vec<MonsterSpawnSchema>,
}

impl WaveSpawnSchema {
    /// Creates a wave from the provided units.
    #[must_use]
    pub fn new(units: Vec<MonsterSpawnSchema>) -> Self {
        Self { units }
    }

    /// Appends a spawn unit to the wave.
    #[must_use]
    pub fn with_unit(mut self, unit: MonsterSpawnSchema) -> Self {
        self.units.push(unit);
        self
    }

    /// Spawn units in spawn order.
    #[must_use]
    pub fn units(&self) -> &[MonsterSpawnSchema] {
        &self.units
    }

    /// Total number of monsters the wave creates.
    #[must_use]
    pub fn monster_count(&self) -> u32 {
        self.units
            .iter()
            .fold(0u32, |total, unit| total.saturating_add(unit.swarm_size))
    }
}

/// Global parameters of a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScenario {
    /// Money the player starts with.
    pub money: u32,
    /// Lives the player starts with.
    pub lives: u32,
    /// Disables the "all waves cleared" win condition.
    #[serde(default)]
    pub survival_mode: bool,
    /// Grid width used when no map schema is supplied.
    pub columns: u32,
    /// Grid height used when no map schema is supplied.
    pub rows: u32,
    /// Tile where monsters enter.
    pub entrance: TileCoord,
    /// Tile monsters try to reach.
    pub exit: TileCoord,
}

/// Content identifier assigned to one map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSchema {
    /// Column of the tile.
    pub column: u32,
    /// Row of the tile.
    pub row: u32,
    /// Content identifier written into the tile.
    pub cid: u32,
}

/// Terrain layout of a map. Tiles not listed are walkable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSchema {
    /// Display name of the map.
    pub name: String,
    /// Grid width.
    pub columns: u32,
    /// Grid height.
    pub rows: u32,
    /// Non-default tiles.
    #[serde(default)]
    pub tiles: Vec<TileSchema>,
}

/// Everything the authoring environment produces for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Scenario parameters.
    pub game_scenario: GameScenario,
    /// Buildable towers.
    pub tower_schemas: Vec<TowerSchema>,
    /// Monster species.
    pub monster_schemas: Vec<MonsterSchema>,
    /// Purchasable items.
    #[serde(default)]
    pub item_schemas: Vec<ItemSchema>,
    /// Waves in play order.
    pub wave_schemas: Vec<WaveSpawnSchema>,
    /// Terrain layouts; the first one is played.
    #[serde(default)]
    pub map_schemas: Vec<MapSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_counts_every_unit() {
        let wave = WaveSpawnSchema::default()
            .with_unit(MonsterSpawnSchema::new("goblin", 3))
            .with_unit(MonsterSpawnSchema::new("orc", 2));
        assert_eq!(wave.monster_count(), 5);
        assert_eq!(wave.units()[1].monster, "orc");
    }

    #[test]
    fn tower_attributes_list_behaviors_in_order() {
        let schema = TowerSchema {
            name: "frost".to_owned(),
            cost: 25,
            range: 3.0,
            damage: 4,
            buildup: 10,
            behaviors: vec![BehaviorKind::Shoot, BehaviorKind::Freeze],
            detector: DetectorKind::Nearest,
            upgrade: Some("frost-2".to_owned()),
        };

        let attributes = schema.attributes();
        assert_eq!(attributes.get(COST).map(String::as_str), Some("25"));
        assert_eq!(
            attributes.get("behaviors").map(String::as_str),
            Some("shoot,freeze")
        );
        assert_eq!(attributes.get("upgrade").map(String::as_str), Some("frost-2"));
    }
}
