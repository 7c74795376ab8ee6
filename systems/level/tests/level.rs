use tower_defense_core::{CreationFailure, MonsterSpawnSchema, WaveSpawnSchema};
use tower_defense_system_level::{LevelManager, WavePhase};

fn waves() -> Vec<WaveSpawnSchema> {
    vec![
        WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("goblin", 3)),
        WaveSpawnSchema::default()
            .with_unit(MonsterSpawnSchema::new("orc", 1))
            .with_unit(MonsterSpawnSchema::new("goblin", 2)),
    ]
}

fn build(name: &str) -> Result<String, CreationFailure> {
    Ok(name.to_owned())
}

#[test]
fn goblin_wave_yields_three_monsters() {
    let mut level = LevelManager::new(false);
    level.clean_load_wave_schemas(waves(), 0);

    let spawned = level.spawn_next_wave(build).expect("known monsters");

    assert_eq!(spawned.map(|monsters| monsters.len()), Some(3));
    assert_eq!(level.current_wave(), 1);
}

#[test]
fn survival_mode_cycles_waves_with_monotonic_index() {
    let mut level = LevelManager::new(true);
    level.clean_load_wave_schemas(
        vec![
            WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("goblin", 2)),
            WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("orc", 3)),
        ],
        0,
    );

    let mut sizes = Vec::new();
    let mut leaders = Vec::new();
    for _ in 0..5 {
        let spawned = level
            .spawn_next_wave(build)
            .expect("known monsters")
            .expect("survival never runs dry");
        sizes.push(spawned.len());
        leaders.push(spawned[0].clone());
    }

    assert_eq!(sizes, vec![2, 3, 2, 3, 2]);
    assert_eq!(leaders, vec!["goblin", "orc", "goblin", "orc", "goblin"]);
    assert_eq!(level.current_wave(), 5);
    assert!(!level.all_waves_done());
    assert_ne!(level.phase(0), WavePhase::AllWavesDone);
}

#[test]
fn resuming_a_saved_game_starts_at_the_saved_wave() {
    let mut level = LevelManager::new(false);
    level.clean_load_wave_schemas(waves(), 1);
    assert_eq!(level.phase(0), WavePhase::Idle);

    let spawned = level
        .spawn_next_wave(build)
        .expect("known monsters")
        .expect("one wave left");

    assert_eq!(spawned, vec!["orc", "goblin", "goblin"]);
    assert!(level.all_waves_done());
    assert_eq!(level.phase(0), WavePhase::AllWavesDone);
}

#[test]
fn resurrection_swarm_is_built_from_its_own_schema() {
    let schema = WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("imp", 2));
    let spawned = LevelManager::spawn_resurrection(&schema, build).expect("known");
    assert_eq!(spawned, vec!["imp", "imp"]);
}
