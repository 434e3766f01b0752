use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PatientId;

/// A triage decision for one patient for one round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    TreatNow,
    Monitor,
    Defer,
    Transfer,
}

impl Decision {
    pub const ALL: [Decision; 4] = [
        Decision::TreatNow,
        Decision::Monitor,
        Decision::Defer,
        Decision::Transfer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TreatNow => "treat now",
            Self::Monitor  => "monitor",
            Self::Defer    => "defer",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decisions submitted for a round, keyed by patient id.
///
/// Iteration follows insertion order; the engine resolves patients in
/// exactly this order, so it decides who sees scarce beds first.
/// Re-inserting an id replaces its decision without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decisions {
    entries: Vec<(PatientId, Decision)>,
}

impl Decisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous decision for this id, if any.
    pub fn insert(&mut self, patient_id: PatientId, decision: Decision) -> Option<Decision> {
        match self.entries.iter_mut().find(|(id, _)| *id == patient_id) {
            Some((_, slot)) => Some(std::mem::replace(slot, decision)),
            None => {
                self.entries.push((patient_id, decision));
                None
            }
        }
    }

    pub fn get(&self, patient_id: PatientId) -> Option<Decision> {
        self.entries
            .iter()
            .find(|(id, _)| *id == patient_id)
            .map(|(_, d)| *d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatientId, Decision)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PatientId, Decision)> for Decisions {
    fn from_iter<I: IntoIterator<Item = (PatientId, Decision)>>(iter: I) -> Self {
        let mut decisions = Decisions::new();
        for (id, decision) in iter {
            decisions.insert(id, decision);
        }
        decisions
    }
}
