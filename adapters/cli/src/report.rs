use std::fmt;

use tower_defense_core::Event;

/// How a headless run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every wave was cleared.
    Won,
    /// The player ran out of lives.
    Lost,
    /// The tick budget ran out first.
    Undecided,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Undecided => "undecided",
        };
        f.write_str(label)
    }
}

/// Running tally of the events a headless run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunReport {
    ticks: u64,
    waves: usize,
    spawn_failures: usize,
    kills: usize,
    escapes: usize,
    resurrections: usize,
    shots: usize,
    freezes: usize,
    items: usize,
    money_granted: u64,
}

impl RunReport {
    /// Folds one tick worth of events into the tally.
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => self.ticks += 1,
                Event::WaveSpawned { .. } => self.waves += 1,
                Event::SpawnFailed { .. } => self.spawn_failures += 1,
                Event::MonsterKilled { .. } => self.kills += 1,
                Event::MonsterEscaped { .. } => self.escapes += 1,
                Event::MonsterResurrected { spawned, .. } => self.resurrections += spawned,
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::MonsterFrozen { .. } => self.freezes += 1,
                Event::ItemActivated { .. } => self.items += 1,
                Event::MoneyGranted { amount } => self.money_granted += u64::from(*amount),
                Event::MonsterDamaged { .. } => {}
            }
        }
    }

    /// Ticks simulated so far.
    #[must_use]
    pub(crate) const fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks simulated:   {}", self.ticks)?;
        writeln!(f, "waves spawned:     {}", self.waves)?;
        if self.spawn_failures > 0 {
            writeln!(f, "failed spawns:     {}", self.spawn_failures)?;
        }
        writeln!(f, "monsters killed:   {}", self.kills)?;
        writeln!(f, "monsters escaped:  {}", self.escapes)?;
        writeln!(f, "resurrected:       {}", self.resurrections)?;
        writeln!(f, "projectiles fired: {}", self.shots)?;
        writeln!(f, "freezes applied:   {}", self.freezes)?;
        writeln!(f, "items activated:   {}", self.items)?;
        write!(f, "money farmed:      {}", self.money_granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_core::{MonsterId, TowerId};

    #[test]
    fn tallies_each_event_kind() {
        let mut report = RunReport::default();
        report.record(&[
            Event::TimeAdvanced { clock: 1 },
            Event::WaveSpawned {
                wave: 0,
                monsters: 3,
            },
            Event::ProjectileFired {
                tower: TowerId::new(0),
                target: MonsterId::new(1),
            },
        ]);
        report.record(&[
            Event::TimeAdvanced { clock: 2 },
            Event::MonsterKilled {
                monster: MonsterId::new(1),
                reward: 2,
            },
            Event::MonsterResurrected {
                source: MonsterId::new(1),
                spawned: 3,
            },
            Event::MoneyGranted { amount: 5 },
            Event::MoneyGranted { amount: 5 },
        ]);

        assert_eq!(report.ticks(), 2);
        assert_eq!(report.waves, 1);
        assert_eq!(report.kills, 1);
        assert_eq!(report.resurrections, 3);
        assert_eq!(report.shots, 1);
        assert_eq!(report.money_granted, 10);
    }

    #[test]
    fn failed_spawns_only_show_when_present() {
        let mut report = RunReport::default();
        assert!(!report.to_string().contains("failed spawns"));

        report.record(&[Event::SpawnFailed { wave: 2 }]);
        assert!(report.to_string().contains("failed spawns:     1"));
    }
}
