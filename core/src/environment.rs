//! Read-only snapshot of the battlefield handed to tower and item behaviors.

use crate::{MonsterId, Player, TileCoord, TowerId, WorldPoint};

/// Immutable representation of a single live monster used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Unique identifier assigned to the monster.
    pub id: MonsterId,
    /// Current position in tile units.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: u32,
    /// Tiles left on the monster's route to the exit.
    pub remaining_path: usize,
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Tile the tower occupies.
    pub tile: TileCoord,
    /// Schema name of the tower.
    pub name: String,
    /// Action radius in tiles.
    pub range: f32,
}

/// Snapshot of monsters, towers, player and exit captured once per pass.
///
/// Behaviors only ever read this view; the effects they emit are applied to
/// the world after the pass completes, so every behavior in a pass observes
/// the same battlefield.
#[derive(Clone, Debug)]
pub struct EnvironmentKnowledge {
    monsters: Vec<MonsterSnapshot>,
    towers: Vec<TowerSnapshot>,
    player: Player,
    exit: WorldPoint,
}

impl EnvironmentKnowledge {
    /// Creates a snapshot from the provided parts.
    ///
    /// Monsters and towers are sorted by identifier so iteration order never
    /// depends on how the caller gathered them.
    #[must_use]
    pub fn new(
        mut monsters: Vec<MonsterSnapshot>,
        mut towers: Vec<TowerSnapshot>,
        player: Player,
        exit: WorldPoint,
    ) -> Self {
        monsters.sort_by_key(|snapshot| snapshot.id);
        towers.sort_by_key(|snapshot| snapshot.id);
        Self {
            monsters,
            towers,
            player,
            exit,
        }
    }

    /// Live monsters in identifier order.
    #[must_use]
    pub fn monsters(&self) -> &[MonsterSnapshot] {
        &self.monsters
    }

    /// Towers in identifier order.
    #[must_use]
    pub fn towers(&self) -> &[TowerSnapshot] {
        &self.towers
    }

    /// Player state at capture time.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Centre of the exit tile.
    #[must_use]
    pub fn exit(&self) -> WorldPoint {
        self.exit
    }

    /// Looks up a monster by identifier.
    #[must_use]
    pub fn monster(&self, id: MonsterId) -> Option<&MonsterSnapshot> {
        self.monsters
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.monsters[index])
    }

    /// Iterates over the monsters within `range` tiles of `origin`.
    pub fn monsters_within(
        &self,
        origin: WorldPoint,
        range: f32,
    ) -> impl Iterator<Item = &MonsterSnapshot> {
        let limit = range * range;
        self.monsters
            .iter()
            .filter(move |snapshot| snapshot.position.distance_squared(origin) <= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monster(id: u32, x: f32) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(id),
            position: WorldPoint::new(x, 0.5),
            health: 10,
            remaining_path: 0,
        }
    }

    fn tower(id: u32, column: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            tile: TileCoord::new(column, 0),
            name: "arrow".to_owned(),
            range: 2.0,
        }
    }

    #[test]
    fn towers_are_listed_by_id() {
        let env = EnvironmentKnowledge::new(
            Vec::new(),
            vec![tower(4, 0), tower(2, 5)],
            Player::new(12, 3),
            WorldPoint::new(9.5, 0.5),
        );

        let ids: Vec<u32> = env.towers().iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(env.towers()[0].tile, TileCoord::new(5, 0));
        assert_eq!(env.player().money(), 12);
        assert_eq!(env.player().lives(), 3);
    }

    #[test]
    fn snapshot_orders_and_filters_monsters() {
        let env = EnvironmentKnowledge::new(
            vec![monster(3, 4.5), monster(1, 0.5), monster(2, 1.5)],
            Vec::new(),
            Player::new(0, 1),
            WorldPoint::new(9.5, 0.5),
        );

        let ids: Vec<u32> = env.monsters().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let near: Vec<u32> = env
            .monsters_within(WorldPoint::new(0.5, 0.5), 1.0)
            .map(|m| m.id.get())
            .collect();
        assert_eq!(near, vec![1, 2]);
        assert_eq!(env.monster(MonsterId::new(3)).map(|m| m.health), Some(10));
        assert!(env.monster(MonsterId::new(9)).is_none());
    }
}
