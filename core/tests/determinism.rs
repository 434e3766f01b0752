//! Two engines, same seed, same decisions.
//! They must produce byte-identical event logs and round summaries.
//! Any divergence means a draw moved; fix it before merging.

use triage_core::{
    engine::SimEngine,
    Decision, Decisions, Difficulty, GameState, Patient,
};

/// Deterministic but varied: cycles through every decision by id.
fn rotating(_state: &GameState, arrivals: &[Patient]) -> Decisions {
    arrivals
        .iter()
        .map(|p| (p.id, Decision::ALL[(p.id % 4) as usize]))
        .collect()
}

fn play(seed: u64, difficulty: Difficulty) -> SimEngine {
    let run_id = format!("det-test-{seed}");
    let mut engine = SimEngine::build_test(&run_id, seed, difficulty).expect("build engine");
    engine.run_to_completion(rotating).expect("run game");
    engine
}

#[test]
fn same_seed_produces_identical_event_logs() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    for difficulty in [Difficulty::Basic, Difficulty::Stochastic] {
        let engine_a = play(SEED, difficulty);
        let engine_b = play(SEED, difficulty);

        let log_a = engine_a.store_event_payloads().expect("read a");
        let log_b = engine_b.store_event_payloads().expect("read b");

        assert_eq!(
            log_a.len(), log_b.len(),
            "Event log lengths differ: {} vs {}",
            log_a.len(), log_b.len()
        );
        for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
            assert_eq!(a, b, "Event log diverged at entry {i}:\n  A: {a}\n  B: {b}");
        }

        assert_eq!(engine_a.state.history, engine_b.state.history);
        assert_eq!(
            engine_a.state.hospital.reputation.to_bits(),
            engine_b.state.hospital.reputation.to_bits()
        );
    }
}

#[test]
fn different_seeds_produce_different_logs() {
    let engine_a = play(42, Difficulty::Stochastic);
    let engine_b = play(99, Difficulty::Stochastic);

    let log_a = engine_a.store_event_payloads().expect("read a");
    let log_b = engine_b.store_event_payloads().expect("read b");

    // Entry 0 is RunInitialized, which carries the seed itself; compare
    // the simulated rounds only.
    let any_different = log_a.iter().skip(1).zip(log_b.iter().skip(1)).any(|(a, b)| a != b);
    assert!(any_different, "Different seeds produced identical logs — seed is not being used");
}
