use std::cell::RefCell;
use std::path::Path;

use tower_defense_core::{
    BehaviorKind, Blueprint, DetectorKind, Event, GameScenario, GameState, InvalidSavedGame,
    MonsterSchema, MonsterSpawnSchema, PlacedTower, TileCoord, TowerSchema, WaveSpawnSchema,
};
use tower_defense_engine::{EngineConfig, EngineError, PersistenceService, SimulationEngine};

#[derive(Debug, Default)]
struct MemoryStore {
    saved: RefCell<Option<GameState>>,
}

impl PersistenceService for MemoryStore {
    fn load_blueprint(&self, path: &Path) -> Result<Blueprint, InvalidSavedGame> {
        Err(InvalidSavedGame::Rejected {
            reason: format!("no blueprint stored at {}", path.display()),
        })
    }

    fn save_state(&self, state: &GameState, _path: &Path) -> Result<(), InvalidSavedGame> {
        *self.saved.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn load_state(&self, _path: &Path) -> Result<GameState, InvalidSavedGame> {
        self.saved
            .borrow()
            .clone()
            .ok_or_else(|| InvalidSavedGame::Rejected {
                reason: "nothing saved".to_owned(),
            })
    }
}

fn blueprint() -> Blueprint {
    let wave = |size| WaveSpawnSchema::default().with_unit(MonsterSpawnSchema::new("snail", size));
    Blueprint {
        game_scenario: GameScenario {
            money: 100,
            lives: 5,
            survival_mode: false,
            columns: 7,
            rows: 3,
            entrance: TileCoord::new(0, 1),
            exit: TileCoord::new(6, 1),
        },
        tower_schemas: vec![TowerSchema {
            name: "arrow".to_owned(),
            cost: 10,
            range: 2.0,
            damage: 1,
            buildup: 3,
            behaviors: vec![BehaviorKind::Shoot],
            detector: DetectorKind::Nearest,
            upgrade: None,
        }],
        monster_schemas: vec![MonsterSchema {
            name: "snail".to_owned(),
            health: 500,
            speed: 0.05,
            reward: 1,
            resurrect: None,
        }],
        item_schemas: Vec::new(),
        wave_schemas: vec![wave(2), wave(3)],
        map_schemas: Vec::new(),
    }
}

fn engine() -> SimulationEngine {
    SimulationEngine::with_schema_factory(EngineConfig::default(), blueprint())
        .expect("playable blueprint")
}

fn run(engine: &mut SimulationEngine, ticks: usize) {
    let mut events: Vec<Event> = Vec::new();
    for _ in 0..ticks {
        engine.update_game(&mut events);
        engine.check_collisions(&mut events);
    }
}

#[test]
fn saved_game_round_trips_through_persistence() {
    let store = MemoryStore::default();
    let path = Path::new("slot-1");
    let mut engine = engine();
    assert!(engine.place_tower(TileCoord::new(2, 0), "arrow").is_ok());
    assert!(engine.place_tower(TileCoord::new(4, 2), "arrow").is_ok());
    run(&mut engine, 4);

    engine.save_game(&store, path).expect("saved");
    let saved = engine.game_state();

    assert!(engine.check_and_remove_tower(TileCoord::new(2, 0)));
    run(&mut engine, 7);
    assert_ne!(engine.game_state(), saved);

    engine.load_game(&store, path).expect("restored");

    assert_eq!(engine.game_state(), saved);
    assert_eq!(engine.money(), 80);
    assert_eq!(engine.clock(), 4);
    assert!(engine.tower_at(TileCoord::new(2, 0)).is_some());
    assert!(engine.monster_view().is_empty());
}

#[test]
fn restored_game_replays_the_wave_still_on_the_map() {
    let mut engine = engine();
    run(&mut engine, 1);
    assert_eq!(engine.monster_view().len(), 2);
    let saved = engine.game_state();
    assert_eq!(saved.current_wave, 0);

    let mut fresh = self::engine();
    fresh.restore(saved).expect("restored");
    let mut events = Vec::new();
    fresh.update_game(&mut events);

    assert!(events.contains(&Event::WaveSpawned {
        wave: 0,
        monsters: 2
    }));
    assert_eq!(fresh.monster_view().len(), 2);
}

#[test]
fn unknown_saved_tower_leaves_the_game_untouched() {
    let mut engine = engine();
    assert!(engine.place_tower(TileCoord::new(3, 0), "arrow").is_ok());
    run(&mut engine, 2);
    let before = engine.game_state();

    let mut corrupt = before.clone();
    corrupt.clock = 99;
    corrupt.towers.push(PlacedTower {
        tile: TileCoord::new(5, 2),
        name: "trebuchet".to_owned(),
    });

    assert!(matches!(
        engine.restore(corrupt),
        Err(EngineError::SavedGame(InvalidSavedGame::Rejected { .. }))
    ));
    assert_eq!(engine.game_state(), before);
    assert_eq!(engine.monster_view().len(), 2);
}

#[test]
fn saved_tower_that_seals_the_exit_is_rejected() {
    let mut engine = engine();
    let before = engine.game_state();

    let mut sealed = before.clone();
    sealed.towers = (0..3)
        .map(|row| PlacedTower {
            tile: TileCoord::new(3, row),
            name: "arrow".to_owned(),
        })
        .collect();

    assert!(engine.restore(sealed).is_err());
    assert_eq!(engine.game_state(), before);
    assert!(engine.tower_at(TileCoord::new(3, 0)).is_none());
}

#[test]
fn mismatched_grid_is_rejected() {
    let mut engine = engine();
    let mut state = engine.game_state();
    state.columns = 12;

    assert!(engine.restore(state).is_err());
    assert_eq!(engine.game_state().columns, 7);
}

#[test]
fn missing_save_surfaces_the_persistence_error() {
    let store = MemoryStore::default();
    let mut engine = engine();

    let result = engine.load_game(&store, Path::new("empty"));

    assert!(matches!(
        result,
        Err(EngineError::SavedGame(InvalidSavedGame::Rejected { .. }))
    ));
    assert_eq!(engine.clock(), 0);
}
