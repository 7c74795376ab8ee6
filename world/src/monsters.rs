//! Live monsters walking their cached route to the exit.

use std::collections::VecDeque;

use tower_defense_core::{MonsterId, MonsterSnapshot, TileCoord, WaveSpawnSchema, WorldPoint};

/// Outcome of advancing a monster by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterStep {
    /// The monster stayed in place because it is frozen or dead.
    Held,
    /// The monster moved along its route.
    Walked,
    /// The monster consumed its whole route and stands on the exit.
    ReachedExit,
}

/// Monster state owned by the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    name: String,
    position: WorldPoint,
    health: u32,
    speed: f32,
    reward: u32,
    path: VecDeque<TileCoord>,
    frozen: u32,
    dead: bool,
    escaped: bool,
    resurrect: Option<WaveSpawnSchema>,
}

impl Monster {
    /// Creates a monster standing at `position` with the route it will walk.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        position: WorldPoint,
        health: u32,
        speed: f32,
        reward: u32,
        path: Vec<TileCoord>,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            health,
            speed,
            reward,
            path: path.into(),
            frozen: 0,
            dead: health == 0,
            escaped: false,
            resurrect: None,
        }
    }

    /// Attaches the swarm released where the monster dies.
    #[must_use]
    pub fn with_resurrection(mut self, schema: Option<WaveSpawnSchema>) -> Self {
        self.resurrect = schema;
        self
    }

    /// Schema name of the monster.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position in tile units.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Tile beneath the monster.
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        self.position.tile()
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Distance travelled per tick in tiles.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Money granted when the monster is killed.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        self.reward
    }

    /// Tiles left on the route, the exit included.
    #[must_use]
    pub fn path(&self) -> &VecDeque<TileCoord> {
        &self.path
    }

    /// Ticks the monster remains frozen.
    #[must_use]
    pub const fn frozen_ticks(&self) -> u32 {
        self.frozen
    }

    /// Reports whether the monster is waiting for cleanup.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Reports whether the monster left through the exit.
    #[must_use]
    pub const fn has_escaped(&self) -> bool {
        self.escaped
    }

    /// Swarm released where the monster dies, if any.
    #[must_use]
    pub fn resurrection(&self) -> Option<&WaveSpawnSchema> {
        self.resurrect.as_ref()
    }

    /// Reports whether the monster was killed and still has to release its
    /// swarm from the tile it died on.
    #[must_use]
    pub const fn awaits_resurrection(&self) -> bool {
        self.dead && !self.escaped && self.resurrect.is_some()
    }

    /// Replaces the route with a freshly computed one.
    pub fn assign_path(&mut self, path: Vec<TileCoord>) {
        self.path = path.into();
    }

    /// Applies damage and reports whether this hit killed the monster.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dead {
            return false;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.dead = true;
            return true;
        }
        false
    }

    /// Keeps the monster in place for at least `ticks` more ticks.
    pub fn freeze(&mut self, ticks: u32) {
        self.frozen = self.frozen.max(ticks);
    }

    /// Marks the monster as having left through the exit.
    pub fn mark_escaped(&mut self) {
        self.dead = true;
        self.escaped = true;
    }

    /// Walks the route by at most `speed` tiles.
    pub fn advance(&mut self) -> MonsterStep {
        if self.dead {
            return MonsterStep::Held;
        }
        if self.frozen > 0 {
            self.frozen -= 1;
            return MonsterStep::Held;
        }

        let mut budget = self.speed.max(0.0);
        while let Some(next) = self.path.front().copied() {
            let target = next.center();
            let distance = self.position.distance(target);
            let (position, arrived) = self.position.step_toward(target, budget);
            self.position = position;
            if !arrived {
                return MonsterStep::Walked;
            }

            let _ = self.path.pop_front();
            budget -= distance;
            if budget <= 0.0 {
                break;
            }
        }

        if self.path.is_empty() {
            MonsterStep::ReachedExit
        } else {
            MonsterStep::Walked
        }
    }

    /// Captures the read-only view handed to behaviors.
    #[must_use]
    pub fn snapshot(&self, id: MonsterId) -> MonsterSnapshot {
        MonsterSnapshot {
            id,
            position: self.position,
            health: self.health,
            remaining_path: self.path.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker(speed: f32) -> Monster {
        Monster::new(
            "goblin",
            TileCoord::new(0, 0).center(),
            10,
            speed,
            3,
            vec![TileCoord::new(1, 0), TileCoord::new(2, 0)],
        )
    }

    #[test]
    fn advance_walks_then_reaches_exit() {
        let mut monster = walker(0.5);

        assert_eq!(monster.advance(), MonsterStep::Walked);
        assert_eq!(monster.tile(), TileCoord::new(1, 0));
        assert_eq!(monster.advance(), MonsterStep::Walked);
        assert_eq!(monster.path().len(), 1);
        assert_eq!(monster.advance(), MonsterStep::Walked);
        assert_eq!(monster.advance(), MonsterStep::ReachedExit);
        assert_eq!(monster.position(), TileCoord::new(2, 0).center());
    }

    #[test]
    fn fast_monster_carries_leftover_distance() {
        let mut monster = walker(1.5);
        assert_eq!(monster.advance(), MonsterStep::Walked);
        assert_eq!(monster.path().len(), 1);
        assert!((monster.position().x() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn frozen_monster_holds_position() {
        let mut monster = walker(1.0);
        monster.freeze(2);
        monster.freeze(1);

        assert_eq!(monster.advance(), MonsterStep::Held);
        assert_eq!(monster.advance(), MonsterStep::Held);
        assert_eq!(monster.position(), TileCoord::new(0, 0).center());
        assert_eq!(monster.advance(), MonsterStep::Walked);
    }

    #[test]
    fn damage_kills_only_once() {
        let mut monster = walker(1.0);
        assert!(!monster.take_damage(4));
        assert!(monster.take_damage(9));
        assert!(monster.is_dead());
        assert!(!monster.take_damage(1));
        assert!(!monster.has_escaped());
        assert_eq!(monster.advance(), MonsterStep::Held);
    }
}
