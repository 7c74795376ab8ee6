//! One-time items placed by the player.

use tower_defense_core::{EnvironmentKnowledge, ItemKind, ItemSchema, TileCoord};

use crate::{BehaviorTuning, Effect};

/// Item that charges for its buildup time, acts once and then reports dead.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    name: String,
    kind: ItemKind,
    tile: TileCoord,
    cost: u32,
    buildup: u32,
    damage: u32,
    range: f32,
    freeze_ticks: u32,
    elapsed: u32,
    dead: bool,
}

impl Item {
    /// Builds an item at `tile` from its schema.
    #[must_use]
    pub fn from_schema(schema: &ItemSchema, tile: TileCoord, tuning: BehaviorTuning) -> Self {
        Self {
            name: schema.name.clone(),
            kind: schema.kind,
            tile,
            cost: schema.cost,
            buildup: schema.buildup,
            damage: schema.damage,
            range: schema.range,
            freeze_ticks: tuning.freeze_ticks,
            elapsed: 0,
            dead: false,
        }
    }

    /// Schema name of the item.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Action the item performs.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Tile the item was placed on.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Purchase price.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Reports whether the item already performed its action.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Charges the item and performs its action once charged.
    ///
    /// Returns `true` on the frame the action fires. A dead item never acts.
    pub fn do_action(&mut self, environment: &EnvironmentKnowledge, out: &mut Vec<Effect>) -> bool {
        if self.dead {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed < self.buildup {
            return false;
        }

        match self.kind {
            ItemKind::Annihilator => {
                for monster in environment.monsters() {
                    out.push(Effect::Damage {
                        target: monster.id,
                        amount: self.damage,
                    });
                }
            }
            ItemKind::Bomb => {
                for monster in environment.monsters_within(self.tile.center(), self.range) {
                    out.push(Effect::Damage {
                        target: monster.id,
                        amount: self.damage,
                    });
                }
            }
            ItemKind::LifeSaver => out.push(Effect::GainLife),
            ItemKind::InstantFreeze => {
                for monster in environment.monsters() {
                    out.push(Effect::Freeze {
                        target: monster.id,
                        ticks: self.freeze_ticks,
                    });
                }
            }
        }

        self.dead = true;
        true
    }
}
