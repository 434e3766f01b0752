//! Shared primitive types used across the entire simulation.

/// A round number. Rounds are 1-based.
pub type Round = u32;

/// A patient identifier. Assigned monotonically, never reused.
pub type PatientId = u64;

/// The canonical run identifier.
pub type RunId = String;
