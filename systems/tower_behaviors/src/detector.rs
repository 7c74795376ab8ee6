//! Target selection rules shared by offensive behaviors.

use tower_defense_core::{DetectorKind, EnvironmentKnowledge, MonsterSnapshot, WorldPoint};

/// Picks the monster a behavior should act on, if any is within range.
///
/// Candidates are scanned in identifier order and only replaced by strictly
/// better ones, so ties resolve to the lowest identifier.
#[must_use]
pub fn detect<'env>(
    kind: DetectorKind,
    origin: WorldPoint,
    range: f32,
    environment: &'env EnvironmentKnowledge,
) -> Option<&'env MonsterSnapshot> {
    let anchor = match kind {
        DetectorKind::Nearest => origin,
        DetectorKind::ClosestToExit => environment.exit(),
    };

    let mut best: Option<(f32, &MonsterSnapshot)> = None;
    for candidate in environment.monsters_within(origin, range) {
        let distance = candidate.position.distance_squared(anchor);
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, candidate)),
        }
    }

    best.map(|(_, snapshot)| snapshot)
}
