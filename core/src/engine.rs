//! The session engine: drives a game round by round.
//!
//! ROUND CYCLE (fixed, documented, never reordered):
//!   1. begin_round    — arrivals, exactly once per round
//!   2. (caller collects one decision per visible patient)
//!   3. resolve_round  — apply decisions, append history,
//!                       advance the round, restore staff
//!
//! RULES:
//!   - All randomness flows through the engine's single SimRng.
//!   - Every state change of note is recorded in the event log.
//!   - The round functions in round.rs never touch the store.

use crate::{
    config::{Difficulty, TriageConfig},
    decision::Decisions,
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    patient::Patient,
    rng::SimRng,
    round::{apply_player_decisions, generate_patients_for_round},
    state::GameState,
    store::{RoundMetricsRow, SimStore},
    summary::RoundSummary,
    types::{Round, RunId},
};

pub struct SimEngine {
    pub run_id:     RunId,
    pub state:      GameState,
    rng:            SimRng,
    store:          SimStore,
    arrivals_round: Option<Round>,
}

impl SimEngine {
    /// Register the run in the store and log its initialization.
    /// The store must already be migrated.
    pub fn start(run_id: RunId, rng: SimRng, state: GameState, store: SimStore) -> SimResult<Self> {
        store.insert_run(
            &run_id,
            rng.seed(),
            state.difficulty.name(),
            env!("CARGO_PKG_VERSION"),
            chrono::Utc::now(),
        )?;
        let engine = Self {
            run_id,
            state,
            rng,
            store,
            arrivals_round: None,
        };
        engine.log_event(&SimEvent::RunInitialized {
            run_id:     engine.run_id.clone(),
            seed:       engine.rng.seed(),
            difficulty: engine.state.difficulty,
        })?;
        log::info!(
            "run={} started: difficulty={} seed={}",
            engine.run_id,
            engine.state.difficulty,
            engine.rng.seed()
        );
        Ok(engine)
    }

    /// Fully wired engine on an in-memory store with the default config.
    pub fn build_test(run_id: &str, seed: u64, difficulty: Difficulty) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        let state = GameState::new(difficulty, TriageConfig::default())?;
        Self::start(run_id.to_string(), SimRng::new(seed), state, store)
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn store(&self) -> &SimStore {
        &self.store
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Whether arrivals for the current round have been generated.
    pub fn round_open(&self) -> bool {
        self.arrivals_round == Some(self.state.current_round)
    }

    /// Generate this round's arrivals. A second call in the same round
    /// is rejected rather than creating duplicate arrivals.
    pub fn begin_round(&mut self) -> SimResult<Vec<Patient>> {
        self.ensure_running()?;
        let round = self.state.current_round;
        if self.round_open() {
            return Err(SimError::ArrivalsAlreadyGenerated { round });
        }

        let arrivals = generate_patients_for_round(&mut self.state, &mut self.rng);
        self.arrivals_round = Some(round);

        self.log_event(&SimEvent::PatientsArrived {
            round,
            patients: arrivals.clone(),
        })?;
        Ok(arrivals)
    }

    /// Resolve the current round, then advance to the next one.
    /// Arrivals must have been generated for this round first.
    pub fn resolve_round(&mut self, decisions: &Decisions) -> SimResult<RoundSummary> {
        self.ensure_running()?;
        let round = self.state.current_round;
        if !self.round_open() {
            return Err(SimError::ArrivalsNotGenerated { round });
        }

        let summary = apply_player_decisions(&mut self.state, decisions, &mut self.rng)?;

        self.store
            .record_round_metrics(&self.run_id, &summary, &self.state.hospital)?;
        self.log_event(&SimEvent::RoundResolved {
            round,
            summary:  summary.clone(),
            hospital: self.state.hospital.clone(),
        })?;

        self.state.add_round_summary(summary.clone());
        self.state.increment_round();

        if let Some(won) = self.state.has_player_won() {
            log::info!("run={} game over after round {round}: won={won}", self.run_id);
            self.log_event(&SimEvent::GameEnded { round, won })?;
        }
        Ok(summary)
    }

    /// One full round: arrivals, decisions from `decide`, resolution.
    /// `decide` sees the state and this round's arrivals.
    pub fn play_round<F>(&mut self, decide: F) -> SimResult<RoundSummary>
    where
        F: FnOnce(&GameState, &[Patient]) -> Decisions,
    {
        let arrivals = self.begin_round()?;
        let decisions = decide(&self.state, &arrivals);
        self.resolve_round(&decisions)
    }

    /// Play rounds until the game ends. Returns whether the player won.
    pub fn run_to_completion<F>(&mut self, mut decide: F) -> SimResult<bool>
    where
        F: FnMut(&GameState, &[Patient]) -> Decisions,
    {
        while !self.state.is_game_over() {
            self.play_round(&mut decide)?;
        }
        Ok(self.state.has_player_won().unwrap_or(false))
    }

    /// Query events for a specific round from the store.
    /// Used by the determinism test and replay tooling.
    pub fn store_events_for_round(&self, round: Round) -> SimResult<Vec<EventLogEntry>> {
        self.store.events_for_round(&self.run_id, round)
    }

    pub fn store_event_payloads(&self) -> SimResult<Vec<String>> {
        self.store.event_payloads(&self.run_id)
    }

    pub fn store_round_metrics(&self) -> SimResult<Vec<RoundMetricsRow>> {
        self.store.round_metrics(&self.run_id)
    }

    fn ensure_running(&self) -> SimResult<()> {
        if self.state.is_game_over() {
            return Err(SimError::GameOver { round: self.state.current_round });
        }
        Ok(())
    }

    fn log_event(&self, event: &SimEvent) -> SimResult<()> {
        let entry = EventLogEntry {
            id:         None,
            run_id:     self.run_id.clone(),
            round:      event.round(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        self.store.append_event(&entry)
    }
}
