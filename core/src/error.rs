use thiserror::Error;

use crate::types::{PatientId, Round};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Difficulty mismatch: expected a {expected} profile, found {found}")]
    DifficultyMismatch { expected: String, found: String },

    #[error("Patient {patient_id} cannot {action} while {from}")]
    InvalidTransition {
        patient_id: PatientId,
        from:       &'static str,
        action:     &'static str,
    },

    #[error("Game is over (round {round})")]
    GameOver { round: Round },

    #[error("Arrivals already generated for round {round}")]
    ArrivalsAlreadyGenerated { round: Round },

    #[error("No arrivals generated yet for round {round}")]
    ArrivalsNotGenerated { round: Round },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
