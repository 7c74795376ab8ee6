#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that releases monster swarms one wave at a time.
//!
//! The manager never decides *when* a wave starts: the engine asks for the
//! next wave only once the live monster list is empty. Monsters are built
//! through a caller-supplied constructor so the scheduler stays independent
//! of how entities are represented.

use tower_defense_core::{CreationFailure, WaveSpawnSchema};
use tracing::{debug, info};

/// Progress of the level as seen between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave has been spawned since the schemas were loaded.
    Idle,
    /// Monsters of the current wave are still alive.
    WaveActive,
    /// The current wave is gone and another one follows on the next spawn step.
    WaveCleared,
    /// Every wave was spawned and cleared. Never reported in survival mode.
    AllWavesDone,
}

/// Deterministic wave scheduler.
#[derive(Clone, Debug, Default)]
pub struct LevelManager {
    waves: Vec<WaveSpawnSchema>,
    current_wave: u32,
    resumed_from: u32,
    survival_mode: bool,
}

impl LevelManager {
    /// Creates a manager with no waves loaded.
    #[must_use]
    pub fn new(survival_mode: bool) -> Self {
        Self {
            survival_mode,
            ..Self::default()
        }
    }

    /// Replaces the wave list and points the scheduler at `start_index`.
    ///
    /// Used for a fresh blueprint (index zero) and to resume a saved game.
    pub fn clean_load_wave_schemas(&mut self, schemas: Vec<WaveSpawnSchema>, start_index: u32) {
        debug!(waves = schemas.len(), start_index, "loaded wave schemas");
        self.waves = schemas;
        self.current_wave = start_index;
        self.resumed_from = start_index;
    }

    /// Enables or disables survival mode.
    pub fn set_survival_mode(&mut self, survival_mode: bool) {
        self.survival_mode = survival_mode;
    }

    /// Reports whether survival mode is enabled.
    #[must_use]
    pub const fn survival_mode(&self) -> bool {
        self.survival_mode
    }

    /// Number of waves spawned so far. Only ever increases between loads.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Every loaded wave in play order.
    #[must_use]
    pub fn all_waves(&self) -> &[WaveSpawnSchema] {
        &self.waves
    }

    /// Schema the next call to [`LevelManager::spawn_next_wave`] would use.
    ///
    /// In survival mode the list is cycled indefinitely.
    #[must_use]
    pub fn next_wave_schema(&self) -> Option<&WaveSpawnSchema> {
        let index = usize::try_from(self.current_wave).ok()?;
        if self.survival_mode {
            if self.waves.is_empty() {
                return None;
            }
            return self.waves.get(index % self.waves.len());
        }
        self.waves.get(index)
    }

    /// Reports whether another wave can be spawned.
    #[must_use]
    pub fn has_more_waves(&self) -> bool {
        self.next_wave_schema().is_some()
    }

    /// Reports whether every wave has been spawned. Always false in survival mode.
    #[must_use]
    pub fn all_waves_done(&self) -> bool {
        !self.survival_mode && !self.has_more_waves()
    }

    /// Builds the next wave's swarms and advances the wave pointer.
    ///
    /// Returns `Ok(None)` when no wave is left. The wave is built completely
    /// before the pointer moves, so a creation failure leaves the scheduler
    /// exactly where it was.
    pub fn spawn_next_wave<T, F>(&mut self, create: F) -> Result<Option<Vec<T>>, CreationFailure>
    where
        F: FnMut(&str) -> Result<T, CreationFailure>,
    {
        let Some(schema) = self.next_wave_schema() else {
            return Ok(None);
        };

        let monsters = spawn_swarm(schema, create)?;
        self.current_wave = self.current_wave.saturating_add(1);
        info!(
            wave = self.current_wave,
            monsters = monsters.len(),
            "spawned wave"
        );
        Ok(Some(monsters))
    }

    /// Builds the swarm a dying monster releases.
    pub fn spawn_resurrection<T, F>(
        schema: &WaveSpawnSchema,
        create: F,
    ) -> Result<Vec<T>, CreationFailure>
    where
        F: FnMut(&str) -> Result<T, CreationFailure>,
    {
        spawn_swarm(schema, create)
    }

    /// Phase of the level given the number of live monsters.
    #[must_use]
    pub fn phase(&self, live_monsters: usize) -> WavePhase {
        if live_monsters > 0 {
            return WavePhase::WaveActive;
        }
        if self.all_waves_done() && self.current_wave > self.resumed_from {
            return WavePhase::AllWavesDone;
        }
        if self.current_wave == self.resumed_from {
            return WavePhase::Idle;
        }
        WavePhase::WaveCleared
    }
}

/// Builds every monster of `schema`, unit by unit and in declaration order.
pub fn spawn_swarm<T, F>(schema: &WaveSpawnSchema, mut create: F) -> Result<Vec<T>, CreationFailure>
where
    F: FnMut(&str) -> Result<T, CreationFailure>,
{
    let capacity = usize::try_from(schema.monster_count()).unwrap_or(0);
    let mut monsters = Vec::with_capacity(capacity);
    for unit in schema.units() {
        for _ in 0..unit.swarm_size {
            monsters.push(create(&unit.monster)?);
        }
    }
    Ok(monsters)
}
