//! GameState — the aggregate root of a single game.
//!
//! Owns the hospital, the full patient roster and the round history.
//! Patients are never removed from the roster; departed and deceased
//! patients stay on record and are filtered by status.

use serde::{Deserialize, Serialize};

use crate::{
    config::{Difficulty, DifficultyProfile, TriageConfig},
    error::SimResult,
    hospital::{HospitalState, METRIC_CEILING, METRIC_FLOOR},
    patient::Patient,
    summary::RoundSummary,
    types::{PatientId, Round},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub difficulty:      Difficulty,
    pub current_round:   Round,
    pub patients:        Vec<Patient>,
    pub history:         Vec<RoundSummary>,
    pub hospital:        HospitalState,
    pub next_patient_id: PatientId,
    config:              TriageConfig,
}

impl GameState {
    /// Start a new game. The configuration is validated here so that an
    /// inconsistent setup is rejected before any round is played.
    pub fn new(difficulty: Difficulty, config: TriageConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            difficulty,
            current_round:   1,
            patients:        Vec::new(),
            history:         Vec::new(),
            hospital:        HospitalState::from_config(&config),
            next_patient_id: 1,
            config,
        })
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    pub fn profile(&self) -> &DifficultyProfile {
        self.config.profile(self.difficulty)
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn patient_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.id == id)
    }

    /// Alive, untreated, still present.
    pub fn waiting_patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter().filter(|p| p.is_waiting())
    }

    /// Patients who arrived in the given round and can still be decided on.
    pub fn arrivals_for_round(&self, round: Round) -> impl Iterator<Item = &Patient> {
        self.patients
            .iter()
            .filter(move |p| p.arrival_round == round && p.is_present())
    }

    /// Alive, treated and not departed.
    pub fn occupied_beds(&self) -> u32 {
        self.patients.iter().filter(|p| p.occupies_bed()).count() as u32
    }

    pub fn add_round_summary(&mut self, summary: RoundSummary) {
        self.history.push(summary);
    }

    /// Advance the round counter and restore full staffing.
    pub fn increment_round(&mut self) {
        self.current_round += 1;
        self.hospital.staff_capacity_this_round = self.config.max_staff_capacity;
    }

    pub fn is_game_over(&self) -> bool {
        self.current_round > self.config.total_rounds
            || self.hospital.survival_score <= METRIC_FLOOR
            || self.hospital.staff_stress >= METRIC_CEILING
            || self.hospital.reputation <= METRIC_FLOOR
    }

    /// None while the game is running. A game that collapses before the
    /// last round is always lost.
    pub fn has_player_won(&self) -> Option<bool> {
        if !self.is_game_over() {
            return None;
        }
        if self.current_round <= self.config.total_rounds {
            return Some(false);
        }
        let win = &self.config.win;
        Some(
            self.hospital.survival_score >= win.min_survival
                && self.hospital.staff_stress <= win.max_staff_stress
                && self.hospital.reputation >= win.min_reputation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn basic() -> GameState {
        GameState::new(Difficulty::Basic, TriageConfig::default()).unwrap()
    }

    #[test]
    fn new_game_starts_at_round_one_with_full_resources() {
        let state = basic();
        assert_eq!(state.current_round, 1);
        assert_eq!(state.next_patient_id, 1);
        assert_eq!(state.hospital.available_beds, 5);
        assert_eq!(state.hospital.staff_capacity_this_round, 4);
        assert_eq!(state.has_player_won(), None);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut config = TriageConfig::default();
        config.basic.tier = Difficulty::Stochastic;
        let err = GameState::new(Difficulty::Basic, config).unwrap_err();
        assert!(matches!(err, SimError::DifficultyMismatch { .. }));
    }

    #[test]
    fn increment_round_restores_staff() {
        let mut state = basic();
        state.hospital.staff_capacity_this_round = 1;
        state.increment_round();
        assert_eq!(state.current_round, 2);
        assert_eq!(state.hospital.staff_capacity_this_round, 4);
    }

    #[test]
    fn metric_collapse_ends_the_game_as_a_loss() {
        let mut state = basic();
        state.hospital.staff_stress = 100.0;
        assert!(state.is_game_over());
        assert_eq!(state.has_player_won(), Some(false));
    }

    #[test]
    fn finishing_all_rounds_within_thresholds_wins() {
        let mut state = basic();
        for _ in 0..5 {
            state.increment_round();
        }
        assert!(state.is_game_over());
        assert_eq!(state.has_player_won(), Some(true));

        state.hospital.reputation = 49.0;
        assert_eq!(state.has_player_won(), Some(false));
    }
}
