//! Route cache kept consistent with the tile map.

use std::collections::BTreeMap;

use tower_defense_core::{MonsterId, PathBlocked, TileCoord};
use tracing::debug;

use crate::{map::TileMap, monsters::Monster, navigation::Pathfinder};

/// Owns the entrance route and recomputes monster routes on map edits.
///
/// The manager never leaves a half-applied result behind: every route is
/// computed before any of them is stored, so a failed recomputation keeps
/// the previous routes intact.
#[derive(Clone, Debug)]
pub struct PathfinderManager {
    entrance: TileCoord,
    exit: TileCoord,
    pathfinder: Pathfinder,
    spawn_path: Vec<TileCoord>,
}

impl PathfinderManager {
    /// Creates a manager for the given endpoints, computing the entrance route.
    pub fn new(map: &TileMap, entrance: TileCoord, exit: TileCoord) -> Result<Self, PathBlocked> {
        let mut pathfinder = Pathfinder::new();
        let spawn_path = pathfinder
            .find_path(map, entrance, exit)
            .ok_or(PathBlocked { origin: entrance })?;

        Ok(Self {
            entrance,
            exit,
            pathfinder,
            spawn_path,
        })
    }

    /// Tile where monsters enter the map.
    #[must_use]
    pub const fn entrance(&self) -> TileCoord {
        self.entrance
    }

    /// Tile monsters try to reach.
    #[must_use]
    pub const fn exit(&self) -> TileCoord {
        self.exit
    }

    /// Cached route from the entrance to the exit.
    #[must_use]
    pub fn spawn_path(&self) -> &[TileCoord] {
        &self.spawn_path
    }

    /// Recomputes the entrance route and the route of every live monster.
    ///
    /// A killed monster whose swarm has not been released yet keeps its tile
    /// in the check, since the swarm walks out from there during cleanup.
    /// Fails with [`PathBlocked`] naming the first tile that lost its route;
    /// in that case nothing is updated.
    pub fn update_paths(
        &mut self,
        map: &TileMap,
        monsters: &mut BTreeMap<MonsterId, Monster>,
    ) -> Result<(), PathBlocked> {
        self.pathfinder.rebuild(map, self.exit);

        let spawn_path = self
            .pathfinder
            .route(self.entrance)
            .ok_or(PathBlocked {
                origin: self.entrance,
            })?;

        let mut routes = Vec::with_capacity(monsters.len());
        for (id, monster) in monsters.iter() {
            if monster.is_dead() && !monster.awaits_resurrection() {
                continue;
            }
            let origin = monster.tile();
            let route = self
                .pathfinder
                .route(origin)
                .ok_or(PathBlocked { origin })?;
            if !monster.is_dead() {
                routes.push((*id, route));
            }
        }

        debug!(
            monsters = routes.len(),
            spawn_length = spawn_path.len(),
            "recomputed monster paths"
        );

        self.spawn_path = spawn_path;
        for (id, route) in routes {
            if let Some(monster) = monsters.get_mut(&id) {
                monster.assign_path(route);
            }
        }
        Ok(())
    }

    /// Writes `cid` into `tile` and keeps it only if every route survives.
    ///
    /// On failure the single tile is restored to the value it held before the
    /// attempt. Tiles outside the map are left untouched.
    pub fn try_set_tile(
        &mut self,
        map: &mut TileMap,
        monsters: &mut BTreeMap<MonsterId, Monster>,
        tile: TileCoord,
        cid: u32,
    ) -> Result<(), PathBlocked> {
        let Some(previous) = map.set_cid(tile, cid) else {
            return Ok(());
        };

        if let Err(blocked) = self.update_paths(map, monsters) {
            let _ = map.set_cid(tile, previous);
            debug!(
                column = tile.column(),
                row = tile.row(),
                "reverted tile edit that would block the exit"
            );
            return Err(blocked);
        }
        Ok(())
    }

    /// Restores the authored value of `tile` and recomputes every route.
    pub fn restore_tile(
        &mut self,
        map: &mut TileMap,
        monsters: &mut BTreeMap<MonsterId, Monster>,
        tile: TileCoord,
    ) -> Result<(), PathBlocked> {
        map.revert_to_original(tile);
        self.update_paths(map, monsters)
    }

    /// Computes a route from an arbitrary tile to the exit.
    pub fn path_from(&mut self, map: &TileMap, tile: TileCoord) -> Option<Vec<TileCoord>> {
        self.pathfinder.find_path(map, tile, self.exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_core::{MonsterSpawnSchema, WaveSpawnSchema, TOWER_CID, WALKABLE_CID};

    fn corridor() -> TileMap {
        let mut map = TileMap::blank(5, 3);
        for column in 0..5 {
            let _ = map.set_cid(TileCoord::new(column, 0), 9);
            let _ = map.set_cid(TileCoord::new(column, 2), 9);
        }
        map
    }

    #[test]
    fn blocking_tile_is_reverted() {
        let mut map = corridor();
        let mut monsters = BTreeMap::new();
        let mut manager =
            PathfinderManager::new(&map, TileCoord::new(0, 1), TileCoord::new(4, 1))
                .expect("route");
        let before = manager.spawn_path().to_vec();

        let result = manager.try_set_tile(&mut map, &mut monsters, TileCoord::new(2, 1), TOWER_CID);

        assert_eq!(
            result,
            Err(PathBlocked {
                origin: TileCoord::new(0, 1)
            })
        );
        assert_eq!(map.cid(TileCoord::new(2, 1)), Some(WALKABLE_CID));
        assert_eq!(manager.spawn_path(), before.as_slice());
    }

    #[test]
    fn monster_routes_follow_edits() {
        let mut map = TileMap::blank(3, 3);
        let mut manager =
            PathfinderManager::new(&map, TileCoord::new(0, 1), TileCoord::new(2, 1))
                .expect("route");
        let mut monsters = BTreeMap::new();
        let _ = monsters.insert(
            MonsterId::new(0),
            Monster::new(
                "goblin",
                TileCoord::new(0, 1).center(),
                5,
                1.0,
                1,
                manager.spawn_path().to_vec(),
            ),
        );

        manager
            .try_set_tile(&mut map, &mut monsters, TileCoord::new(1, 1), TOWER_CID)
            .expect("detour exists");

        let route: Vec<TileCoord> = monsters[&MonsterId::new(0)].path().iter().copied().collect();
        assert_eq!(
            route,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(1, 0),
                TileCoord::new(2, 0),
                TileCoord::new(2, 1),
            ]
        );
        assert_eq!(manager.spawn_path(), route.as_slice());

        manager
            .restore_tile(&mut map, &mut monsters, TileCoord::new(1, 1))
            .expect("open map");
        assert_eq!(monsters[&MonsterId::new(0)].path().len(), 2);
    }

    #[test]
    fn tower_on_monster_tile_is_rejected() {
        let mut map = TileMap::blank(3, 3);
        let mut manager =
            PathfinderManager::new(&map, TileCoord::new(0, 1), TileCoord::new(2, 1))
                .expect("route");
        let mut monsters = BTreeMap::new();
        let _ = monsters.insert(
            MonsterId::new(4),
            Monster::new("goblin", TileCoord::new(1, 2).center(), 5, 1.0, 1, Vec::new()),
        );

        let result = manager.try_set_tile(&mut map, &mut monsters, TileCoord::new(1, 2), TOWER_CID);
        assert_eq!(
            result,
            Err(PathBlocked {
                origin: TileCoord::new(1, 2)
            })
        );
        assert!(map.is_walkable(TileCoord::new(1, 2)));
    }

    #[test]
    fn pending_resurrection_keeps_its_tile_open() {
        let mut map = TileMap::blank(3, 3);
        let mut manager =
            PathfinderManager::new(&map, TileCoord::new(0, 1), TileCoord::new(2, 1))
                .expect("route");
        let swarm = WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("droplet", 2));
        let mut slime =
            Monster::new("slime", TileCoord::new(1, 2).center(), 1, 1.0, 1, Vec::new())
                .with_resurrection(Some(swarm));
        let mut goblin =
            Monster::new("goblin", TileCoord::new(1, 0).center(), 1, 1.0, 1, Vec::new());
        assert!(slime.take_damage(1));
        assert!(goblin.take_damage(1));
        let mut monsters = BTreeMap::new();
        let _ = monsters.insert(MonsterId::new(0), slime);
        let _ = monsters.insert(MonsterId::new(1), goblin);

        let corpse =
            manager.try_set_tile(&mut map, &mut monsters, TileCoord::new(1, 2), TOWER_CID);
        assert_eq!(
            corpse,
            Err(PathBlocked {
                origin: TileCoord::new(1, 2)
            })
        );
        assert!(map.is_walkable(TileCoord::new(1, 2)));

        manager
            .try_set_tile(&mut map, &mut monsters, TileCoord::new(1, 0), TOWER_CID)
            .expect("plain corpse does not hold its tile");
    }
}
