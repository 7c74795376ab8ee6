#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine orchestrating the per-tick step order.
//!
//! [`SimulationEngine`] is the single context that owns the world, the wave
//! scheduler, the collision system and the entity factory. Hosts call
//! [`SimulationEngine::update_game`] followed by
//! [`SimulationEngine::check_collisions`] once per tick and forward player
//! input to the structural actions between ticks. Every structural action is
//! transactional: it either commits completely or leaves the game untouched.

mod config;
mod error;
mod factory;
mod persistence;

pub use config::EngineConfig;
pub use error::EngineError;
pub use factory::{EntityFactory, SchemaFactory};
pub use persistence::PersistenceService;

use std::path::Path;

use tower_defense_core::{
    ActionError, Attributes, Blueprint, Event, GameState, InvalidSavedGame, ItemId, MonsterId,
    MonsterSnapshot, PathBlocked, Player, SchemaMissing, TileCoord, TileGrid, TowerId,
    WaveSpawnSchema,
};
use tower_defense_system_collision::CollisionManager;
use tower_defense_system_level::{LevelManager, WavePhase};
use tower_defense_system_tower_behaviors::{Effect, Tower};
use tower_defense_world::{query, Monster, Projectile, TileMap, World};
use tracing::{debug, info, warn};

/// Authored terrain and endpoints of the loaded blueprint.
#[derive(Clone, Debug)]
struct Layout {
    map: TileMap,
    entrance: TileCoord,
    exit: TileCoord,
}

impl Layout {
    fn stage(&self, config: &EngineConfig, player: Player) -> Result<World, PathBlocked> {
        World::new(
            self.map.clone(),
            self.entrance,
            self.exit,
            config.tile_length,
            player,
        )
    }
}

/// Tower defense simulation driven one tick at a time.
#[derive(Debug)]
pub struct SimulationEngine {
    config: EngineConfig,
    factory: Box<dyn EntityFactory>,
    layout: Layout,
    world: World,
    level: LevelManager,
    collisions: CollisionManager,
}

impl SimulationEngine {
    /// Creates an engine playing `blueprint`.
    pub fn new(
        config: EngineConfig,
        mut factory: Box<dyn EntityFactory>,
        blueprint: Blueprint,
    ) -> Result<Self, EngineError> {
        let (layout, world) = stage_blueprint(&config, &blueprint)?;
        load_schemas(factory.as_mut(), &blueprint);

        let mut level = LevelManager::new(blueprint.game_scenario.survival_mode);
        level.clean_load_wave_schemas(blueprint.wave_schemas, 0);

        Ok(Self {
            collisions: CollisionManager::new(config.projectile_hit_radius),
            config,
            factory,
            layout,
            world,
            level,
        })
    }

    /// Creates an engine using the schema-backed factory.
    pub fn with_schema_factory(
        config: EngineConfig,
        blueprint: Blueprint,
    ) -> Result<Self, EngineError> {
        let factory = Box::new(SchemaFactory::new(config.tuning()));
        Self::new(config, factory, blueprint)
    }

    /// Replaces the running game with a fresh one built from `blueprint`.
    ///
    /// The new map is validated before anything is replaced; on failure the
    /// running game continues unchanged.
    pub fn load_blueprint(&mut self, blueprint: Blueprint) -> Result<(), EngineError> {
        let (layout, world) = stage_blueprint(&self.config, &blueprint)?;

        load_schemas(self.factory.as_mut(), &blueprint);
        self.layout = layout;
        self.world = world;
        self.level = LevelManager::new(blueprint.game_scenario.survival_mode);
        self.level.clean_load_wave_schemas(blueprint.wave_schemas, 0);
        info!(
            columns = self.layout.map.columns(),
            rows = self.layout.map.rows(),
            "blueprint loaded"
        );
        Ok(())
    }

    /// Advances the simulation by one tick.
    pub fn update_game(&mut self, out_events: &mut Vec<Event>) {
        let clock = self.world.advance_clock();
        out_events.push(Event::TimeAdvanced { clock });

        if self.world.has_no_monsters() {
            self.spawn_wave(out_events);
        }

        self.world.advance_monsters(out_events);
        self.world.advance_projectiles();

        let mut tower_effects = Vec::new();
        self.world.run_towers(&mut tower_effects);
        for (tower, effect) in tower_effects {
            self.apply_effect(Some(tower), effect, out_events);
        }

        let mut item_effects = Vec::new();
        for (item, kind) in self.world.run_items(&mut item_effects) {
            out_events.push(Event::ItemActivated { item, kind });
        }
        for effect in item_effects {
            self.apply_effect(None, effect, out_events);
        }

        self.clean_up_dead_monsters(out_events);
    }

    /// Resolves projectile hits. Hosts call this once per tick.
    pub fn check_collisions(&mut self, out_events: &mut Vec<Event>) {
        self.collisions
            .check_all_collisions(&mut self.world, out_events);
    }

    fn spawn_wave(&mut self, out_events: &mut Vec<Event>) {
        let wave = self.level.current_wave();
        let position = self.layout.entrance.center();
        let path = self.world.spawn_path().to_vec();
        let factory = &self.factory;

        match self
            .level
            .spawn_next_wave(|name| factory.place_monster(position, name, path.clone()))
        {
            Ok(Some(monsters)) => {
                let count = monsters.len();
                for monster in monsters {
                    let _ = self.world.insert_monster(monster);
                }
                out_events.push(Event::WaveSpawned {
                    wave,
                    monsters: count,
                });
            }
            Ok(None) => {}
            Err(failure) => {
                warn!(wave, %failure, "wave spawn aborted");
                out_events.push(Event::SpawnFailed { wave });
            }
        }
    }

    fn apply_effect(
        &mut self,
        tower: Option<TowerId>,
        effect: Effect,
        out_events: &mut Vec<Event>,
    ) {
        match effect {
            Effect::FireProjectile {
                origin,
                target,
                damage,
            } => {
                self.world.launch_projectile(Projectile::new(
                    origin,
                    target,
                    damage,
                    self.config.projectile_speed,
                    self.config.projectile_lifetime,
                ));
                if let Some(tower) = tower {
                    out_events.push(Event::ProjectileFired { tower, target });
                }
            }
            Effect::Damage { target, amount } => {
                if let Some(monster) = self.world.monster_mut(target) {
                    if !monster.is_dead() {
                        let _ = monster.take_damage(amount);
                        out_events.push(Event::MonsterDamaged {
                            monster: target,
                            damage: amount,
                        });
                    }
                }
            }
            Effect::Freeze { target, ticks } => {
                if let Some(monster) = self.world.monster_mut(target) {
                    if !monster.is_dead() {
                        monster.freeze(ticks);
                        out_events.push(Event::MonsterFrozen {
                            monster: target,
                            ticks,
                        });
                    }
                }
            }
            Effect::GrantMoney { amount } => {
                self.world.player_mut().earn(amount);
                out_events.push(Event::MoneyGranted { amount });
            }
            Effect::GainLife => self.world.player_mut().gain_life(),
        }
    }

    fn clean_up_dead_monsters(&mut self, out_events: &mut Vec<Event>) {
        let mut resurrections: Vec<(MonsterId, Vec<Monster>)> = Vec::new();

        for (id, monster) in self.world.drain_dead_monsters() {
            if monster.has_escaped() {
                continue;
            }

            if let Some(schema) = monster.resurrection() {
                if let Some(swarm) = self.build_resurrection(id, &monster, schema) {
                    resurrections.push((id, swarm));
                }
            }

            let reward = monster.reward();
            let player = self.world.player_mut();
            player.earn(reward);
            player.add_score(u64::from(reward));
            out_events.push(Event::MonsterKilled {
                monster: id,
                reward,
            });
        }

        for (source, swarm) in resurrections {
            let spawned = swarm.len();
            for monster in swarm {
                let _ = self.world.insert_monster(monster);
            }
            out_events.push(Event::MonsterResurrected { source, spawned });
        }
    }

    fn build_resurrection(
        &mut self,
        id: MonsterId,
        monster: &Monster,
        schema: &WaveSpawnSchema,
    ) -> Option<Vec<Monster>> {
        let Some(path) = self.world.path_from(monster.tile()) else {
            warn!(monster = id.get(), "no route from the death tile, resurrection skipped");
            return None;
        };
        let position = monster.position();
        let factory = &self.factory;

        match LevelManager::spawn_resurrection(schema, |name| {
            factory.place_monster(position, name, path.clone())
        }) {
            Ok(swarm) => Some(swarm),
            Err(failure) => {
                warn!(monster = id.get(), %failure, "resurrection aborted");
                None
            }
        }
    }

    /// Builds a tower on `tile`, charging its cost.
    pub fn place_tower(&mut self, tile: TileCoord, name: &str) -> Result<TowerId, ActionError> {
        if !query::tile_grid(&self.world).contains(tile) {
            return Err(ActionError::OutOfBounds { tile });
        }
        if self.world.tower_at(tile).is_some() {
            return Err(ActionError::Occupied { tile });
        }

        let tower = self.factory.place_tower(tile, name)?;
        match self.world.place_tower(tower) {
            Ok(id) => {
                info!(
                    tower = id.get(),
                    name,
                    column = tile.column(),
                    row = tile.row(),
                    "tower built"
                );
                Ok(id)
            }
            Err(error) => {
                debug!(name, %error, "tower placement rejected");
                Err(error)
            }
        }
    }

    /// Removes the tower on `tile`, refunding part of its cost.
    ///
    /// Returns `false` when the tile holds no tower.
    pub fn check_and_remove_tower(&mut self, tile: TileCoord) -> bool {
        let Some(tower) = self.world.remove_tower(tile) else {
            return false;
        };

        let refund = self.config.refund_for(tower.cost());
        self.world.player_mut().earn(refund);
        info!(name = tower.name(), refund, "tower removed");
        true
    }

    /// Replaces the tower on `tile` with its upgrade, charging the upgrade's cost.
    pub fn upgrade_tower(&mut self, tile: TileCoord) -> Result<TowerId, ActionError> {
        let Some(existing) = self.world.tower_at(tile) else {
            return Err(ActionError::NoTower { tile });
        };
        let Some(upgrade) = existing.upgrade_name().map(str::to_owned) else {
            return Err(ActionError::NoUpgrade { tile });
        };

        let tower = self.factory.place_tower(tile, &upgrade)?;
        let id = self.world.replace_tower(tower)?;
        info!(tower = id.get(), name = %upgrade, "tower upgraded");
        Ok(id)
    }

    /// Buys the named item and places it on `tile`.
    pub fn place_item(&mut self, tile: TileCoord, name: &str) -> Result<ItemId, ActionError> {
        if !query::tile_grid(&self.world).contains(tile) {
            return Err(ActionError::OutOfBounds { tile });
        }

        let item = self.factory.place_item(tile, name)?;
        let id = self.world.place_item(item)?;
        info!(item = id.get(), name, "item placed");
        Ok(id)
    }

    /// Captures the persisted snapshot of the running game.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        GameState {
            columns: self.layout.map.columns(),
            rows: self.layout.map.rows(),
            towers: query::placed_towers(&self.world),
            wave_schemas: self.level.all_waves().to_vec(),
            current_wave: self.resume_wave(),
            survival_mode: self.level.survival_mode(),
            clock: self.world.clock(),
            player: self.world.player().clone(),
        }
    }

    /// Wave a restored game starts from: the wave still on the map, if any.
    fn resume_wave(&self) -> u32 {
        let next = self.level.current_wave();
        if self.world.has_no_monsters() {
            next
        } else {
            next.saturating_sub(1)
        }
    }

    /// Replaces the running game with a saved one.
    ///
    /// The saved towers are rebuilt on a staged copy of the authored map and
    /// only swapped in once every tower was placed successfully. Live
    /// monsters, items and projectiles are discarded; play resumes at the
    /// start of the saved wave.
    pub fn restore(&mut self, state: GameState) -> Result<(), EngineError> {
        if state.columns != self.layout.map.columns() || state.rows != self.layout.map.rows() {
            return Err(rejected(format!(
                "saved grid is {}x{} but the map is {}x{}",
                state.columns,
                state.rows,
                self.layout.map.columns(),
                self.layout.map.rows()
            )));
        }

        let mut staged = self
            .layout
            .stage(&self.config, state.player.clone())
            .map_err(|blocked| rejected(blocked.to_string()))?;
        for placed in &state.towers {
            let tower = self
                .factory
                .place_tower(placed.tile, &placed.name)
                .map_err(|failure| rejected(failure.to_string()))?;
            let _ = staged
                .restore_tower(tower)
                .map_err(|error| rejected(error.to_string()))?;
        }
        staged.set_clock(state.clock);

        self.world = staged;
        self.level
            .clean_load_wave_schemas(state.wave_schemas, state.current_wave);
        self.level.set_survival_mode(state.survival_mode);
        info!(
            towers = state.towers.len(),
            wave = state.current_wave,
            clock = state.clock,
            "saved game restored"
        );
        Ok(())
    }

    /// Writes the running game through the persistence collaborator.
    pub fn save_game(
        &self,
        persistence: &dyn PersistenceService,
        path: &Path,
    ) -> Result<(), InvalidSavedGame> {
        persistence.save_state(&self.game_state(), path)
    }

    /// Reads a saved game through the persistence collaborator and restores it.
    pub fn load_game(
        &mut self,
        persistence: &dyn PersistenceService,
        path: &Path,
    ) -> Result<(), EngineError> {
        let state = persistence.load_state(path)?;
        self.restore(state)
    }

    /// Money held by the player.
    #[must_use]
    pub fn money(&self) -> u32 {
        self.world.player().money()
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.world.player().lives()
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.world.player().score()
    }

    /// Simulation clock in ticks.
    #[must_use]
    pub fn clock(&self) -> u64 {
        self.world.clock()
    }

    /// Reports whether every life has been lost.
    #[must_use]
    pub fn is_game_lost(&self) -> bool {
        self.world.player().is_out_of_lives()
    }

    /// Reports whether every wave was spawned and no monster is left.
    #[must_use]
    pub fn is_game_won(&self) -> bool {
        !self.is_game_lost() && self.level.all_waves_done() && self.world.has_no_monsters()
    }

    /// Tower occupying `tile`, if any.
    #[must_use]
    pub fn tower_at(&self, tile: TileCoord) -> Option<&Tower> {
        self.world.tower_at(tile)
    }

    /// Live monsters in handle order.
    #[must_use]
    pub fn monster_view(&self) -> Vec<MonsterSnapshot> {
        query::monster_view(&self.world)
    }

    /// Names of the buildable towers.
    #[must_use]
    pub fn possible_tower_names(&self) -> Vec<String> {
        self.factory.possible_tower_names()
    }

    /// Names of the purchasable items.
    #[must_use]
    pub fn possible_item_names(&self) -> Vec<String> {
        self.factory.possible_item_names()
    }

    /// Display attributes of a schema.
    pub fn attributes(&self, name: &str) -> Result<Attributes, SchemaMissing> {
        self.factory.attributes(name)
    }

    /// Phase of the wave scheduler.
    #[must_use]
    pub fn level_phase(&self) -> WavePhase {
        let live = query::monster_view(&self.world).len();
        self.level.phase(live)
    }

    /// Tile layout used to convert pointer input.
    #[must_use]
    pub fn tile_grid(&self) -> &TileGrid {
        query::tile_grid(&self.world)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the engine was created with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn stage_blueprint(
    config: &EngineConfig,
    blueprint: &Blueprint,
) -> Result<(Layout, World), EngineError> {
    let scenario = &blueprint.game_scenario;
    let map = blueprint
        .map_schemas
        .first()
        .map_or_else(|| TileMap::blank(scenario.columns, scenario.rows), TileMap::from_schema);
    let layout = Layout {
        map,
        entrance: scenario.entrance,
        exit: scenario.exit,
    };
    let world = layout.stage(config, Player::new(scenario.money, scenario.lives))?;
    Ok((layout, world))
}

fn load_schemas(factory: &mut dyn EntityFactory, blueprint: &Blueprint) {
    factory.load_tower_schemas(blueprint.tower_schemas.clone());
    factory.load_monster_schemas(blueprint.monster_schemas.clone());
    factory.load_item_schemas(blueprint.item_schemas.clone());
}

fn rejected(reason: String) -> EngineError {
    EngineError::SavedGame(InvalidSavedGame::Rejected { reason })
}
