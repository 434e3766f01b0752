//! Round summaries — the per-round record handed back to the caller.
//!
//! A RoundSummary is only built by the engine through RoundRecorder
//! and is read-only once returned.

use serde::{Deserialize, Serialize};

use crate::{
    decision::Decisions,
    types::{PatientId, Round},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    round_number:          Round,
    /// Decisions exactly as submitted, before any coercion.
    decisions:             Decisions,
    patients_treated:      Vec<PatientId>,
    patients_died:         Vec<PatientId>,
    patients_deteriorated: Vec<PatientId>,
    /// Narrative notes in emission order.
    notes:                 Vec<String>,
}

impl RoundSummary {
    pub fn round_number(&self) -> Round { self.round_number }
    pub fn decisions(&self) -> &Decisions { &self.decisions }
    pub fn patients_treated(&self) -> &[PatientId] { &self.patients_treated }
    pub fn patients_died(&self) -> &[PatientId] { &self.patients_died }
    pub fn patients_deteriorated(&self) -> &[PatientId] { &self.patients_deteriorated }
    pub fn notes(&self) -> &[String] { &self.notes }

    /// Nothing happened worth reporting.
    pub fn is_quiet(&self) -> bool {
        self.patients_treated.is_empty()
            && self.patients_died.is_empty()
            && self.patients_deteriorated.is_empty()
            && self.notes.is_empty()
    }
}

/// Mutable accumulator used while a round is being resolved.
pub(crate) struct RoundRecorder {
    summary: RoundSummary,
}

impl RoundRecorder {
    pub(crate) fn new(round_number: Round, decisions: &Decisions) -> Self {
        Self {
            summary: RoundSummary {
                round_number,
                decisions:             decisions.clone(),
                patients_treated:      Vec::new(),
                patients_died:         Vec::new(),
                patients_deteriorated: Vec::new(),
                notes:                 Vec::new(),
            },
        }
    }

    pub(crate) fn treated(&mut self, id: PatientId) {
        self.summary.patients_treated.push(id);
    }

    pub(crate) fn died(&mut self, id: PatientId) {
        self.summary.patients_died.push(id);
    }

    pub(crate) fn deteriorated(&mut self, id: PatientId) {
        self.summary.patients_deteriorated.push(id);
    }

    pub(crate) fn note(&mut self, note: impl Into<String>) {
        self.summary.notes.push(note.into());
    }

    pub(crate) fn finish(self) -> RoundSummary {
        self.summary
    }
}
