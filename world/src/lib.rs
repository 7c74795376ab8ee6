#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the tower defense engine.
//!
//! The world owns the tile map, the route cache and every live entity. Towers,
//! monsters and items live in id-keyed registries; the tower grid and the
//! behavior snapshot only ever hold handles. Structural edits go through
//! [`PathfinderManager::try_set_tile`] so a rejected edit leaves the map
//! exactly as it was.

mod map;
mod monsters;
mod navigation;
mod paths;
mod projectiles;
mod towers;

pub use map::TileMap;
pub use monsters::{Monster, MonsterStep};
pub use navigation::Pathfinder;
pub use paths::PathfinderManager;
pub use projectiles::Projectile;

use std::collections::BTreeMap;

use tower_defense_core::{
    ActionError, Event, ItemId, ItemKind, MonsterId, PathBlocked, Player, TileCoord, TileGrid,
    TowerId, TOWER_CID,
};
use tower_defense_system_tower_behaviors::{Effect, Item, Tower};
use tracing::{debug, warn};

use crate::towers::TowerRegistry;

/// Represents the authoritative game world.
#[derive(Debug)]
pub struct World {
    tile_grid: TileGrid,
    map: TileMap,
    paths: PathfinderManager,
    towers: TowerRegistry,
    monsters: BTreeMap<MonsterId, Monster>,
    next_monster_id: MonsterId,
    items: BTreeMap<ItemId, Item>,
    next_item_id: ItemId,
    projectiles: Vec<Projectile>,
    player: Player,
    clock: u64,
}

impl World {
    /// Creates a world over `map` with no entities.
    ///
    /// Fails when the exit cannot be reached from the entrance.
    pub fn new(
        map: TileMap,
        entrance: TileCoord,
        exit: TileCoord,
        tile_length: f32,
        player: Player,
    ) -> Result<Self, PathBlocked> {
        let paths = PathfinderManager::new(&map, entrance, exit)?;
        Ok(Self {
            tile_grid: TileGrid::new(map.columns(), map.rows(), tile_length),
            towers: TowerRegistry::new(map.columns(), map.rows()),
            map,
            paths,
            monsters: BTreeMap::new(),
            next_monster_id: MonsterId::new(0),
            items: BTreeMap::new(),
            next_item_id: ItemId::new(0),
            projectiles: Vec::new(),
            player,
            clock: 0,
        })
    }

    /// Player wallet, lives and score.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player wallet, lives and score.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Simulation clock in ticks.
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Overwrites the simulation clock.
    pub fn set_clock(&mut self, clock: u64) {
        self.clock = clock;
    }

    /// Advances the clock by one tick and returns the new value.
    pub fn advance_clock(&mut self) -> u64 {
        self.clock = self.clock.saturating_add(1);
        self.clock
    }

    /// Builds a tower, charging its cost.
    ///
    /// Bounds, occupancy, affordability and path validity are checked before
    /// anything changes; a rejected placement leaves the world untouched.
    pub fn place_tower(&mut self, tower: Tower) -> Result<TowerId, ActionError> {
        let cost = tower.cost();
        self.install_tower(tower, cost)
    }

    /// Rebuilds a tower from a saved game without charging for it.
    pub fn restore_tower(&mut self, tower: Tower) -> Result<TowerId, ActionError> {
        self.install_tower(tower, 0)
    }

    fn install_tower(&mut self, tower: Tower, cost: u32) -> Result<TowerId, ActionError> {
        let tile = tower.tile();
        if !self.map.contains(tile) {
            return Err(ActionError::OutOfBounds { tile });
        }
        if self.towers.id_at(tile).is_some() {
            return Err(ActionError::Occupied { tile });
        }
        self.player.ensure_affordable(cost)?;

        self.paths
            .try_set_tile(&mut self.map, &mut self.monsters, tile, TOWER_CID)?;
        let Some(id) = self.towers.insert(tower) else {
            self.revert_tile(tile);
            return Err(ActionError::Occupied { tile });
        };
        self.player.spend(cost)?;

        debug!(
            tower = id.get(),
            column = tile.column(),
            row = tile.row(),
            cost,
            "tower placed"
        );
        Ok(id)
    }

    /// Removes the tower on `tile` and restores the authored terrain.
    ///
    /// Route recomputation after the removal is best effort: a failure is
    /// logged and the removal still stands.
    pub fn remove_tower(&mut self, tile: TileCoord) -> Option<Tower> {
        let (id, tower) = self.towers.remove_at(tile)?;
        self.revert_tile(tile);
        debug!(tower = id.get(), column = tile.column(), row = tile.row(), "tower removed");
        Some(tower)
    }

    fn revert_tile(&mut self, tile: TileCoord) {
        if let Err(blocked) = self
            .paths
            .restore_tile(&mut self.map, &mut self.monsters, tile)
        {
            warn!(%blocked, "route recomputation failed after restoring a tile");
        }
    }

    /// Swaps the tower on the replacement's tile for `replacement`, charging its cost.
    ///
    /// The tile stays occupied throughout, so routes are unaffected.
    pub fn replace_tower(&mut self, replacement: Tower) -> Result<TowerId, ActionError> {
        let tile = replacement.tile();
        if self.towers.id_at(tile).is_none() {
            return Err(ActionError::NoTower { tile });
        }
        self.player.spend(replacement.cost())?;

        let previous = self.towers.remove_at(tile).map(|(id, _)| id);
        let Some(id) = self.towers.insert(replacement) else {
            return Err(ActionError::Occupied { tile });
        };
        debug!(
            previous = previous.map(|id| id.get()),
            tower = id.get(),
            "tower replaced"
        );
        Ok(id)
    }

    /// Tower occupying the tile, if any.
    #[must_use]
    pub fn tower_at(&self, tile: TileCoord) -> Option<&Tower> {
        self.towers.at(tile)
    }

    /// Buys an item and places it on its tile.
    pub fn place_item(&mut self, item: Item) -> Result<ItemId, ActionError> {
        let tile = item.tile();
        if !self.map.contains(tile) {
            return Err(ActionError::OutOfBounds { tile });
        }
        self.player.spend(item.cost())?;

        let id = self.next_item_id;
        self.next_item_id = ItemId::new(id.get().saturating_add(1));
        debug!(item = id.get(), name = item.name(), "item placed");
        let _ = self.items.insert(id, item);
        Ok(id)
    }

    /// Cached route from the entrance to the exit.
    #[must_use]
    pub fn spawn_path(&self) -> &[TileCoord] {
        self.paths.spawn_path()
    }

    /// Computes a route from `tile` to the exit on the current map.
    pub fn path_from(&mut self, tile: TileCoord) -> Option<Vec<TileCoord>> {
        self.paths.path_from(&self.map, tile)
    }

    /// Adds a monster to the live set and returns its handle.
    pub fn insert_monster(&mut self, monster: Monster) -> MonsterId {
        let id = self.next_monster_id;
        self.next_monster_id = MonsterId::new(id.get().saturating_add(1));
        let _ = self.monsters.insert(id, monster);
        id
    }

    /// Monster with the given handle.
    #[must_use]
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    /// Mutable access to the monster with the given handle.
    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    /// Live monsters in handle order.
    pub fn monsters(&self) -> impl Iterator<Item = (MonsterId, &Monster)> {
        self.monsters.iter().map(|(id, monster)| (*id, monster))
    }

    /// Reports whether the live monster list is empty.
    #[must_use]
    pub fn has_no_monsters(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Moves every monster along its route.
    ///
    /// A monster that reaches the exit costs the player a life and is marked
    /// dead for the cleanup pass.
    pub fn advance_monsters(&mut self, out_events: &mut Vec<Event>) {
        for (id, monster) in &mut self.monsters {
            if monster.advance() == MonsterStep::ReachedExit {
                monster.mark_escaped();
                self.player.lose_life();
                out_events.push(Event::MonsterEscaped { monster: *id });
            }
        }
    }

    /// Adds a projectile to the battlefield.
    pub fn launch_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Moves every projectile towards its target and discards spent ones.
    pub fn advance_projectiles(&mut self) {
        let monsters = &self.monsters;
        for projectile in &mut self.projectiles {
            let destination = monsters
                .get(&projectile.target())
                .filter(|monster| !monster.is_dead())
                .map(Monster::position);
            projectile.advance(destination);
        }
        self.projectiles.retain(|projectile| !projectile.is_spent());
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Splits the world into the projectiles and the monsters they may hit.
    pub fn projectiles_and_monsters_mut(
        &mut self,
    ) -> (&mut Vec<Projectile>, &mut BTreeMap<MonsterId, Monster>) {
        (&mut self.projectiles, &mut self.monsters)
    }

    /// Runs every tower's behavior chain in row-major tile order.
    ///
    /// All towers observe the same snapshot; the effects they request are
    /// appended to `out` tagged with the tower that requested them.
    pub fn run_towers(&mut self, out: &mut Vec<(TowerId, Effect)>) {
        let environment = query::environment(self);
        let mut effects = Vec::new();
        for id in self.towers.row_major_ids() {
            let Some(tower) = self.towers.get_mut(id) else {
                continue;
            };
            let _ = tower.call_actions(&environment, &mut effects);
            out.extend(effects.drain(..).map(|effect| (id, effect)));
        }
    }

    /// Removes spent items and charges the rest.
    ///
    /// Returns the items that fired this tick; their effects are appended to
    /// `out`.
    pub fn run_items(&mut self, out: &mut Vec<Effect>) -> Vec<(ItemId, ItemKind)> {
        self.items.retain(|_, item| !item.is_dead());

        let environment = query::environment(self);
        let mut activated = Vec::new();
        for (id, item) in &mut self.items {
            if item.do_action(&environment, out) {
                activated.push((*id, item.kind()));
            }
        }
        activated
    }

    /// Number of items waiting to fire or to be removed.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Removes every dead monster from the live set, in handle order.
    pub fn drain_dead_monsters(&mut self) -> Vec<(MonsterId, Monster)> {
        let dead: Vec<MonsterId> = self
            .monsters
            .iter()
            .filter(|(_, monster)| monster.is_dead())
            .map(|(id, _)| *id)
            .collect();

        dead.into_iter()
            .filter_map(|id| self.monsters.remove(&id).map(|monster| (id, monster)))
            .collect()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tower_defense_core::{
        EnvironmentKnowledge, MonsterSnapshot, PlacedTower, TileCoord, TileGrid, TowerSnapshot,
    };

    use super::{TileMap, World};

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Provides read-only access to the tile content identifiers.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.map
    }

    /// Tile where monsters enter.
    #[must_use]
    pub fn entrance(world: &World) -> TileCoord {
        world.paths.entrance()
    }

    /// Tile monsters try to reach.
    #[must_use]
    pub fn exit(world: &World) -> TileCoord {
        world.paths.exit()
    }

    /// Captures a read-only view of the live monsters in handle order.
    #[must_use]
    pub fn monster_view(world: &World) -> Vec<MonsterSnapshot> {
        world
            .monsters
            .iter()
            .filter(|(_, monster)| !monster.is_dead())
            .map(|(id, monster)| monster.snapshot(*id))
            .collect()
    }

    /// Captures every tower in row-major tile order.
    #[must_use]
    pub fn tower_view(world: &World) -> Vec<TowerSnapshot> {
        world
            .towers
            .iter_row_major()
            .map(|(id, tower)| TowerSnapshot {
                id,
                tile: tower.tile(),
                name: tower.name().to_owned(),
                range: tower.range(),
            })
            .collect()
    }

    /// Towers recorded by tile and schema name, as stored in a saved game.
    #[must_use]
    pub fn placed_towers(world: &World) -> Vec<PlacedTower> {
        world.towers.placed()
    }

    /// Number of towers on the map.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Builds the snapshot handed to tower and item behaviors.
    ///
    /// Monsters already marked dead are left out so no behavior targets them.
    #[must_use]
    pub fn environment(world: &World) -> EnvironmentKnowledge {
        EnvironmentKnowledge::new(
            monster_view(world),
            tower_view(world),
            world.player.clone(),
            exit(world).center(),
        )
    }
}
