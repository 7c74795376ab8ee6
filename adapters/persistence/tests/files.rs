use std::{
    fs,
    path::{Path, PathBuf},
};

use tower_defense_core::{InvalidSavedGame, TileCoord};
use tower_defense_engine::{EngineConfig, PersistenceService, SimulationEngine};
use tower_defense_persistence::JsonPersistence;

fn demo_blueprint() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../cli/assets/demo.json")
}

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tower-defense-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch directory");
    dir.join(name)
}

fn demo_engine() -> SimulationEngine {
    let blueprint = JsonPersistence::new()
        .load_blueprint(&demo_blueprint())
        .expect("demo blueprint decodes");
    SimulationEngine::with_schema_factory(EngineConfig::default(), blueprint)
        .expect("demo blueprint is playable")
}

#[test]
fn demo_blueprint_describes_a_playable_game() {
    let engine = demo_engine();

    assert_eq!(engine.money(), 120);
    assert_eq!(engine.lives(), 10);
    assert_eq!(engine.possible_tower_names()[0], "arrow");
    assert_eq!(engine.possible_item_names().len(), 4);
    assert!(!engine.world().spawn_path().is_empty());
}

#[test]
fn saved_file_restores_into_a_fresh_engine() {
    let store = JsonPersistence::new().pretty();
    let path = scratch_file("round-trip.json");

    let mut engine = demo_engine();
    assert!(engine.place_tower(TileCoord::new(2, 2), "arrow").is_ok());
    assert!(engine.place_tower(TileCoord::new(9, 5), "frost").is_ok());
    let mut events = Vec::new();
    for _ in 0..30 {
        engine.update_game(&mut events);
        engine.check_collisions(&mut events);
    }
    engine.save_game(&store, &path).expect("saved");

    let mut fresh = demo_engine();
    fresh.load_game(&store, &path).expect("loaded");

    assert_eq!(fresh.game_state(), engine.game_state());
    assert_eq!(fresh.clock(), 30);
    assert_eq!(
        fresh.tower_at(TileCoord::new(9, 5)).map(|tower| tower.name()),
        Some("frost")
    );
    let _ = fs::remove_file(&path);
}

#[test]
fn overwriting_a_save_leaves_no_staging_file() {
    let store = JsonPersistence::new();
    let path = scratch_file("overwrite.json");
    let engine = demo_engine();

    engine.save_game(&store, &path).expect("first save");
    engine.save_game(&store, &path).expect("second save");

    assert!(path.exists());
    assert!(!path.with_file_name("overwrite.json.partial").exists());
    let _ = fs::remove_file(&path);
}

#[test]
fn missing_file_reports_io_error() {
    let path = scratch_file("never-written.json");

    let error = JsonPersistence::new()
        .load_state(&path)
        .expect_err("nothing there");

    assert!(matches!(error, InvalidSavedGame::Io { path: reported, .. } if reported == path));
}

#[test]
fn blueprint_is_not_a_saved_game() {
    let mut engine = demo_engine();

    let result = engine.load_game(&JsonPersistence::new(), &demo_blueprint());

    assert!(result.is_err());
    assert_eq!(engine.clock(), 0);
}
