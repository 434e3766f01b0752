use triage_core::{config::Difficulty, engine::SimEngine, SimError, TriageConfig};

const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/triage_config.json");

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn shipped_config_matches_defaults() {
    init_logging();
    let loaded = TriageConfig::load(CONFIG_PATH).expect("load shipped config");
    assert_eq!(loaded, TriageConfig::default());
    assert_eq!(loaded.profile(Difficulty::Stochastic).patients_per_round, (4, 7));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let err = TriageConfig::load("/nonexistent/triage.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/triage.json"), "got {err}");
}

#[test]
fn swapped_profiles_fail_before_the_game_starts() {
    init_logging();
    let mut config = TriageConfig::default();
    std::mem::swap(&mut config.basic, &mut config.stochastic);

    let err = triage_core::GameState::new(Difficulty::Basic, config).unwrap_err();
    assert!(matches!(err, SimError::DifficultyMismatch { .. }), "got {err}");
}

#[test]
fn custom_round_count_shortens_the_game() {
    init_logging();
    let config = TriageConfig { total_rounds: 2, ..TriageConfig::default() };
    let state = triage_core::GameState::new(Difficulty::Basic, config).unwrap();
    let store = triage_core::store::SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    let mut engine = SimEngine::start(
        "config-short".to_string(),
        triage_core::rng::SimRng::new(1),
        state,
        store,
    )
    .unwrap();

    engine
        .run_to_completion(|_, arrivals| {
            arrivals
                .iter()
                .map(|p| (p.id, triage_core::Decision::Monitor))
                .collect()
        })
        .unwrap();
    assert_eq!(engine.state.history.len(), 2);
}
