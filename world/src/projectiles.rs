//! Homing projectiles launched by shooting towers.

use tower_defense_core::{MonsterId, WorldPoint};

/// Projectile flying towards a single monster.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    position: WorldPoint,
    target: MonsterId,
    damage: u32,
    speed: f32,
    lifetime: u32,
    spent: bool,
}

impl Projectile {
    /// Launches a projectile from `origin`.
    ///
    /// `lifetime` bounds the number of ticks the projectile may fly before it
    /// is discarded without hitting anything.
    #[must_use]
    pub const fn new(
        origin: WorldPoint,
        target: MonsterId,
        damage: u32,
        speed: f32,
        lifetime: u32,
    ) -> Self {
        Self {
            position: origin,
            target,
            damage,
            speed,
            lifetime,
            spent: false,
        }
    }

    /// Current position in tile units.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Monster the projectile homes in on.
    #[must_use]
    pub const fn target(&self) -> MonsterId {
        self.target
    }

    /// Damage applied on impact.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Reports whether the projectile hit something or expired.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.spent
    }

    /// Marks the projectile for removal.
    pub fn mark_spent(&mut self) {
        self.spent = true;
    }

    /// Moves towards the target's current position.
    ///
    /// A projectile whose target is gone or whose lifetime ran out is spent.
    pub fn advance(&mut self, target_position: Option<WorldPoint>) {
        if self.spent {
            return;
        }

        match target_position {
            Some(destination) if self.lifetime > 0 => {
                self.position = self.position.step_toward(destination, self.speed).0;
                self.lifetime -= 1;
            }
            _ => self.spent = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_homes_until_lifetime_expires() {
        let mut projectile = Projectile::new(
            WorldPoint::new(0.5, 0.5),
            MonsterId::new(1),
            4,
            1.0,
            2,
        );

        projectile.advance(Some(WorldPoint::new(5.5, 0.5)));
        assert_eq!(projectile.position(), WorldPoint::new(1.5, 0.5));
        projectile.advance(Some(WorldPoint::new(5.5, 0.5)));
        assert!(!projectile.is_spent());
        projectile.advance(Some(WorldPoint::new(5.5, 0.5)));
        assert!(projectile.is_spent());
    }

    #[test]
    fn projectile_without_target_is_spent() {
        let mut projectile =
            Projectile::new(WorldPoint::new(0.5, 0.5), MonsterId::new(1), 4, 1.0, 9);
        projectile.advance(None);
        assert!(projectile.is_spent());
    }
}
