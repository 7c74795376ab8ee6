#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composable per-tower behaviors and one-time item actions.
//!
//! A [`Tower`] owns its read-only [`TowerStats`] and an ordered chain of
//! [`TowerBehavior`] components fixed at construction. Behaviors read an
//! [`EnvironmentKnowledge`] snapshot and respond exclusively with [`Effect`]
//! values; the engine applies the effects once the pass completes.

mod detector;
mod item;
mod tower;

pub use detector::detect;
pub use item::Item;
pub use tower::{Tower, TowerStats};

use std::fmt;

use tower_defense_core::{
    BehaviorKind, DetectorKind, EnvironmentKnowledge, MonsterId, WorldPoint,
};

/// World mutation requested by a tower or item action.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Launches a projectile from `origin` towards `target`.
    FireProjectile {
        /// Point the projectile starts from.
        origin: WorldPoint,
        /// Monster the projectile homes in on.
        target: MonsterId,
        /// Damage applied on impact.
        damage: u32,
    },
    /// Applies damage to a monster immediately.
    Damage {
        /// Monster to damage.
        target: MonsterId,
        /// Amount of damage.
        amount: u32,
    },
    /// Stops a monster for a number of ticks.
    Freeze {
        /// Monster to freeze.
        target: MonsterId,
        /// Duration in ticks.
        ticks: u32,
    },
    /// Grants money to the player.
    GrantMoney {
        /// Amount to grant.
        amount: u32,
    },
    /// Restores one life to the player.
    GainLife,
}

/// Tuning values shared by every behavior built from schemas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BehaviorTuning {
    /// Ticks a freeze keeps a monster in place.
    pub freeze_ticks: u32,
    /// Money granted per farming action.
    pub farm_amount: u32,
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            freeze_ticks: 30,
            farm_amount: 5,
        }
    }
}

/// One link of a tower's behavior chain.
///
/// `act` runs only when every earlier link reported `true` on the same
/// call, and returns whether this link performed its action.
pub trait TowerBehavior: fmt::Debug {
    /// Kind of the behavior, used to reject duplicates in a chain.
    fn kind(&self) -> BehaviorKind;

    /// Performs the behavior for one frame.
    fn act(
        &mut self,
        tower: &TowerStats,
        environment: &EnvironmentKnowledge,
        out: &mut Vec<Effect>,
    ) -> bool;
}

/// Fires a projectile at the detected monster.
#[derive(Clone, Copy, Debug)]
pub struct Shoot {
    detector: DetectorKind,
}

impl Shoot {
    /// Creates a shooting behavior using the provided target rule.
    #[must_use]
    pub const fn new(detector: DetectorKind) -> Self {
        Self { detector }
    }
}

impl TowerBehavior for Shoot {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Shoot
    }

    fn act(
        &mut self,
        tower: &TowerStats,
        environment: &EnvironmentKnowledge,
        out: &mut Vec<Effect>,
    ) -> bool {
        let Some(target) = detect(self.detector, tower.center(), tower.range(), environment) else {
            return false;
        };

        out.push(Effect::FireProjectile {
            origin: tower.center(),
            target: target.id,
            damage: tower.damage(),
        });
        true
    }
}

/// Freezes the detected monster.
#[derive(Clone, Copy, Debug)]
pub struct Freeze {
    detector: DetectorKind,
    ticks: u32,
}

impl Freeze {
    /// Creates a freezing behavior lasting `ticks` per application.
    #[must_use]
    pub const fn new(detector: DetectorKind, ticks: u32) -> Self {
        Self { detector, ticks }
    }
}

impl TowerBehavior for Freeze {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Freeze
    }

    fn act(
        &mut self,
        tower: &TowerStats,
        environment: &EnvironmentKnowledge,
        out: &mut Vec<Effect>,
    ) -> bool {
        let Some(target) = detect(self.detector, tower.center(), tower.range(), environment) else {
            return false;
        };

        out.push(Effect::Freeze {
            target: target.id,
            ticks: self.ticks,
        });
        true
    }
}

/// Grants money every time the chain reaches it.
#[derive(Clone, Copy, Debug)]
pub struct FarmMoney {
    amount: u32,
    harvests: u32,
}

impl FarmMoney {
    /// Creates a farming behavior granting `amount` per harvest.
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self {
            amount,
            harvests: 0,
        }
    }

    /// Number of harvests performed so far.
    #[must_use]
    pub const fn harvests(&self) -> u32 {
        self.harvests
    }
}

impl TowerBehavior for FarmMoney {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::FarmMoney
    }

    fn act(
        &mut self,
        _tower: &TowerStats,
        _environment: &EnvironmentKnowledge,
        out: &mut Vec<Effect>,
    ) -> bool {
        self.harvests = self.harvests.saturating_add(1);
        out.push(Effect::GrantMoney {
            amount: self.amount,
        });
        true
    }
}

/// Damages every monster within range.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bomb;

impl TowerBehavior for Bomb {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Bomb
    }

    fn act(
        &mut self,
        tower: &TowerStats,
        environment: &EnvironmentKnowledge,
        out: &mut Vec<Effect>,
    ) -> bool {
        let before = out.len();
        for monster in environment.monsters_within(tower.center(), tower.range()) {
            out.push(Effect::Damage {
                target: monster.id,
                amount: tower.damage(),
            });
        }
        out.len() > before
    }
}

/// Builds the behavior component declared by a schema.
#[must_use]
pub fn behavior_for(
    kind: BehaviorKind,
    detector: DetectorKind,
    tuning: BehaviorTuning,
) -> Box<dyn TowerBehavior> {
    match kind {
        BehaviorKind::Shoot => Box::new(Shoot::new(detector)),
        BehaviorKind::Freeze => Box::new(Freeze::new(detector, tuning.freeze_ticks)),
        BehaviorKind::FarmMoney => Box::new(FarmMoney::new(tuning.farm_amount)),
        BehaviorKind::Bomb => Box::new(Bomb),
    }
}
