#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame resolution of projectiles against the monsters they chase.

use tower_defense_core::Event;
use tower_defense_world::World;

/// Collision system that applies projectile damage once per frame.
#[derive(Clone, Copy, Debug)]
pub struct CollisionManager {
    hit_radius: f32,
}

impl CollisionManager {
    /// Creates a collision manager treating `hit_radius` tiles as contact.
    #[must_use]
    pub const fn new(hit_radius: f32) -> Self {
        Self { hit_radius }
    }

    /// Distance in tiles at which a projectile touches its target.
    #[must_use]
    pub const fn hit_radius(&self) -> f32 {
        self.hit_radius
    }

    /// Scans every projectile against its target once.
    ///
    /// A hit applies damage, spends the projectile and marks the target dead
    /// when its health runs out. Projectiles chasing a monster that died
    /// earlier in the same scan are spent without touching it. Spent
    /// projectiles are removed after the scan completes.
    pub fn check_all_collisions(&self, world: &mut World, out_events: &mut Vec<Event>) {
        let limit = self.hit_radius * self.hit_radius;
        let (projectiles, monsters) = world.projectiles_and_monsters_mut();

        for projectile in projectiles.iter_mut() {
            if projectile.is_spent() {
                continue;
            }

            let target = projectile.target();
            let Some(monster) = monsters.get_mut(&target) else {
                projectile.mark_spent();
                continue;
            };
            if monster.is_dead() {
                projectile.mark_spent();
                continue;
            }
            if monster.position().distance_squared(projectile.position()) > limit {
                continue;
            }

            let _ = monster.take_damage(projectile.damage());
            projectile.mark_spent();
            out_events.push(Event::MonsterDamaged {
                monster: target,
                damage: projectile.damage(),
            });
        }

        projectiles.retain(|projectile| !projectile.is_spent());
    }
}
