//! Construction of live entities from loaded schemas.

use std::fmt;

use tower_defense_core::{
    Attributes, CreationFailure, ItemSchema, MonsterSchema, SchemaMissing, TileCoord, TowerSchema,
    WorldPoint,
};
use tower_defense_system_tower_behaviors::{BehaviorTuning, Item, Tower};
use tower_defense_world::Monster;

/// Builds towers, items and monsters by schema name.
pub trait EntityFactory: fmt::Debug {
    /// Builds the named tower on `tile`.
    fn place_tower(&self, tile: TileCoord, name: &str) -> Result<Tower, CreationFailure>;

    /// Builds the named item on `tile`.
    fn place_item(&self, tile: TileCoord, name: &str) -> Result<Item, CreationFailure>;

    /// Builds the named monster at `position`, walking `path`.
    fn place_monster(
        &self,
        position: WorldPoint,
        name: &str,
        path: Vec<TileCoord>,
    ) -> Result<Monster, CreationFailure>;

    /// Replaces the known tower schemas.
    fn load_tower_schemas(&mut self, schemas: Vec<TowerSchema>);

    /// Replaces the known monster schemas.
    fn load_monster_schemas(&mut self, schemas: Vec<MonsterSchema>);

    /// Replaces the known item schemas.
    fn load_item_schemas(&mut self, schemas: Vec<ItemSchema>);

    /// Names of the buildable towers in declaration order.
    fn possible_tower_names(&self) -> Vec<String>;

    /// Names of the purchasable items in declaration order.
    fn possible_item_names(&self) -> Vec<String>;

    /// Display attributes of any schema by name.
    fn attributes(&self, name: &str) -> Result<Attributes, SchemaMissing>;
}

/// Factory backed by the schemas of a loaded blueprint.
#[derive(Clone, Debug, Default)]
pub struct SchemaFactory {
    tuning: BehaviorTuning,
    towers: Vec<TowerSchema>,
    monsters: Vec<MonsterSchema>,
    items: Vec<ItemSchema>,
}

impl SchemaFactory {
    /// Creates a factory with no schemas, building behaviors with `tuning`.
    #[must_use]
    pub fn new(tuning: BehaviorTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    fn tower_schema(&self, name: &str) -> Option<&TowerSchema> {
        self.towers.iter().find(|schema| schema.name == name)
    }

    fn monster_schema(&self, name: &str) -> Option<&MonsterSchema> {
        self.monsters.iter().find(|schema| schema.name == name)
    }

    fn item_schema(&self, name: &str) -> Option<&ItemSchema> {
        self.items.iter().find(|schema| schema.name == name)
    }
}

impl EntityFactory for SchemaFactory {
    fn place_tower(&self, tile: TileCoord, name: &str) -> Result<Tower, CreationFailure> {
        let schema = self
            .tower_schema(name)
            .ok_or_else(|| CreationFailure::new(name, "unknown tower"))?;
        if !schema.range.is_finite() || schema.range < 0.0 {
            return Err(CreationFailure::new(name, "range must be a non-negative number"));
        }
        Ok(Tower::from_schema(schema, tile, self.tuning))
    }

    fn place_item(&self, tile: TileCoord, name: &str) -> Result<Item, CreationFailure> {
        let schema = self
            .item_schema(name)
            .ok_or_else(|| CreationFailure::new(name, "unknown item"))?;
        Ok(Item::from_schema(schema, tile, self.tuning))
    }

    fn place_monster(
        &self,
        position: WorldPoint,
        name: &str,
        path: Vec<TileCoord>,
    ) -> Result<Monster, CreationFailure> {
        let schema = self
            .monster_schema(name)
            .ok_or_else(|| CreationFailure::new(name, "unknown monster"))?;
        if schema.health == 0 {
            return Err(CreationFailure::new(name, "health must be positive"));
        }
        if !schema.speed.is_finite() || schema.speed < 0.0 {
            return Err(CreationFailure::new(name, "speed must be a non-negative number"));
        }

        Ok(Monster::new(
            schema.name.clone(),
            position,
            schema.health,
            schema.speed,
            schema.reward,
            path,
        )
        .with_resurrection(schema.resurrect.clone()))
    }

    fn load_tower_schemas(&mut self, schemas: Vec<TowerSchema>) {
        self.towers = schemas;
    }

    fn load_monster_schemas(&mut self, schemas: Vec<MonsterSchema>) {
        self.monsters = schemas;
    }

    fn load_item_schemas(&mut self, schemas: Vec<ItemSchema>) {
        self.items = schemas;
    }

    fn possible_tower_names(&self) -> Vec<String> {
        self.towers.iter().map(|schema| schema.name.clone()).collect()
    }

    fn possible_item_names(&self) -> Vec<String> {
        self.items.iter().map(|schema| schema.name.clone()).collect()
    }

    fn attributes(&self, name: &str) -> Result<Attributes, SchemaMissing> {
        self.tower_schema(name)
            .map(TowerSchema::attributes)
            .or_else(|| self.monster_schema(name).map(MonsterSchema::attributes))
            .or_else(|| self.item_schema(name).map(ItemSchema::attributes))
            .ok_or_else(|| SchemaMissing {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_core::{
        schema::COST, BehaviorKind, DetectorKind, ItemKind, MonsterSpawnSchema, WaveSpawnSchema,
    };

    fn factory() -> SchemaFactory {
        let mut factory = SchemaFactory::new(BehaviorTuning::default());
        factory.load_tower_schemas(vec![
            TowerSchema {
                name: "arrow".to_owned(),
                cost: 10,
                range: 3.0,
                damage: 2,
                buildup: 5,
                behaviors: vec![BehaviorKind::Shoot],
                detector: DetectorKind::Nearest,
                upgrade: Some("longbow".to_owned()),
            },
            TowerSchema {
                name: "broken".to_owned(),
                cost: 1,
                range: -1.0,
                damage: 0,
                buildup: 0,
                behaviors: Vec::new(),
                detector: DetectorKind::Nearest,
                upgrade: None,
            },
        ]);
        factory.load_monster_schemas(vec![MonsterSchema {
            name: "slime".to_owned(),
            health: 4,
            speed: 0.25,
            reward: 1,
            resurrect: Some(
                WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("droplet", 2)),
            ),
        }]);
        factory.load_item_schemas(vec![ItemSchema {
            name: "nuke".to_owned(),
            kind: ItemKind::Annihilator,
            cost: 40,
            buildup: 3,
            damage: 100,
            range: 0.0,
        }]);
        factory
    }

    #[test]
    fn unknown_names_fail_creation() {
        let factory = factory();
        let failure = factory
            .place_tower(TileCoord::new(0, 0), "catapult")
            .expect_err("not loaded");
        assert_eq!(failure.name, "catapult");
        assert!(factory.place_item(TileCoord::new(0, 0), "arrow").is_err());
        assert!(factory
            .place_monster(WorldPoint::new(0.5, 0.5), "dragon", Vec::new())
            .is_err());
    }

    #[test]
    fn invalid_schema_values_fail_creation() {
        let failure = factory()
            .place_tower(TileCoord::new(0, 0), "broken")
            .expect_err("negative range");
        assert_eq!(failure.reason, "range must be a non-negative number");
    }

    #[test]
    fn monsters_carry_their_resurrection_swarm() {
        let slime = factory()
            .place_monster(WorldPoint::new(0.5, 0.5), "slime", vec![TileCoord::new(1, 0)])
            .expect("known monster");
        assert_eq!(slime.health(), 4);
        assert_eq!(slime.resurrection().map(WaveSpawnSchema::monster_count), Some(2));
    }

    #[test]
    fn names_and_attributes_are_exposed() {
        let factory = factory();
        assert_eq!(factory.possible_tower_names(), vec!["arrow", "broken"]);
        assert_eq!(factory.possible_item_names(), vec!["nuke"]);
        assert_eq!(
            factory.attributes("nuke").expect("item")[COST],
            "40".to_owned()
        );
        assert_eq!(
            factory.attributes("ghost"),
            Err(SchemaMissing {
                name: "ghost".to_owned()
            })
        );
    }
}
