//! Triage round-resolution core.
//!
//! Patients arrive with a hidden true severity and a noisy visible one;
//! the caller decides per patient; the engine resolves outcomes, resources
//! and metrics. See round.rs for the step order of a round.

pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod event;
pub mod hospital;
pub mod narrative;
pub mod patient;
pub mod rng;
pub mod round;
pub mod severity;
pub mod shock;
pub mod state;
pub mod store;
pub mod summary;
pub mod types;

pub use config::{Difficulty, TriageConfig};
pub use decision::{Decision, Decisions};
pub use error::{SimError, SimResult};
pub use patient::Patient;
pub use round::{apply_player_decisions, generate_patients_for_round};
pub use severity::Severity;
pub use state::GameState;
pub use summary::RoundSummary;
