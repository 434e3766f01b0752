//! Events recorded by the session engine.
//!
//! RULE: the event log is append-only and its payloads are the unit of
//! comparison for determinism. Never put wall-clock data in a payload.

use crate::{
    config::Difficulty,
    hospital::HospitalState,
    patient::Patient,
    summary::RoundSummary,
    types::{Round, RunId},
};
use serde::{Deserialize, Serialize};

/// Variants are append-only; never remove or reorder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    RunInitialized {
        run_id:     RunId,
        seed:       u64,
        difficulty: Difficulty,
    },
    PatientsArrived {
        round:    Round,
        patients: Vec<Patient>,
    },
    RoundResolved {
        round:    Round,
        summary:  RoundSummary,
        hospital: HospitalState,
    },
    GameEnded {
        round: Round,
        won:   bool,
    },
}

impl SimEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }  => "run_initialized",
            Self::PatientsArrived { .. } => "patients_arrived",
            Self::RoundResolved { .. }   => "round_resolved",
            Self::GameEnded { .. }       => "game_ended",
        }
    }

    /// The round an event belongs to. Run initialization is round 0.
    pub fn round(&self) -> Round {
        match self {
            Self::RunInitialized { .. } => 0,
            Self::PatientsArrived { round, .. }
            | Self::RoundResolved { round, .. }
            | Self::GameEnded { round, .. } => *round,
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub round:      Round,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
