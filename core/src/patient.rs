//! Patient entity and its lifecycle.
//!
//! Lifecycle (guarded; anything else is an InvalidTransition):
//!   Waiting ──admit──▶ InBed
//!   Waiting | InBed ──transfer──▶ Departed { alive: true }
//!   Waiting | InBed ──die──▶ Deceased
//!   Departed { alive: true } ──die──▶ Departed { alive: false }
//!
//! Departed and Deceased patients are never processed again.

use serde::{Deserialize, Serialize};

use crate::{
    error::{SimError, SimResult},
    severity::Severity,
    types::{PatientId, Round},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatientStatus {
    /// Present, alive, not occupying a bed.
    Waiting,
    /// Present, alive, occupying a bed.
    InBed,
    /// Left the hospital by transfer. A transferred survivor stays alive.
    Departed { alive: bool },
    /// Died on site.
    Deceased { was_in_bed: bool },
}

impl PatientStatus {
    fn name(&self) -> &'static str {
        match self {
            Self::Waiting         => "waiting",
            Self::InBed           => "in bed",
            Self::Departed { .. } => "departed",
            Self::Deceased { .. } => "deceased",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id:               PatientId,
    pub name:             String,
    pub visible_severity: Severity,
    /// Hidden from the decision-maker; drives real outcomes.
    pub true_severity:    Severity,
    pub arrival_round:    Round,
    status:               PatientStatus,
}

impl Patient {
    pub fn new(
        id:               PatientId,
        visible_severity: Severity,
        true_severity:    Severity,
        arrival_round:    Round,
    ) -> Self {
        Self {
            id,
            name: format!("Patient {id}"),
            visible_severity,
            true_severity,
            arrival_round,
            status: PatientStatus::Waiting,
        }
    }

    pub fn status(&self) -> PatientStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        !matches!(
            self.status,
            PatientStatus::Deceased { .. } | PatientStatus::Departed { alive: false }
        )
    }

    pub fn is_treated(&self) -> bool {
        matches!(self.status, PatientStatus::InBed | PatientStatus::Deceased { was_in_bed: true })
    }

    pub fn has_left(&self) -> bool {
        matches!(self.status, PatientStatus::Departed { .. })
    }

    /// Alive and still in the hospital: eligible for decisions.
    pub fn is_present(&self) -> bool {
        matches!(self.status, PatientStatus::Waiting | PatientStatus::InBed)
    }

    /// Alive, present and not in a bed: eligible for deterioration.
    pub fn is_waiting(&self) -> bool {
        self.status == PatientStatus::Waiting
    }

    /// Occupies a bed right now.
    pub fn occupies_bed(&self) -> bool {
        self.status == PatientStatus::InBed
    }

    pub fn display_label(&self) -> String {
        format!("{} (appears {})", self.name, self.visible_severity)
    }

    /// Move into a bed. Re-admitting a patient already in a bed is allowed.
    pub fn admit(&mut self) -> SimResult<()> {
        match self.status {
            PatientStatus::Waiting | PatientStatus::InBed => {
                self.status = PatientStatus::InBed;
                Ok(())
            }
            other => Err(self.invalid(other, "be admitted")),
        }
    }

    pub fn transfer(&mut self) -> SimResult<()> {
        match self.status {
            PatientStatus::Waiting | PatientStatus::InBed => {
                self.status = PatientStatus::Departed { alive: true };
                Ok(())
            }
            other => Err(self.invalid(other, "be transferred")),
        }
    }

    pub fn die(&mut self) -> SimResult<()> {
        self.status = match self.status {
            PatientStatus::Waiting => PatientStatus::Deceased { was_in_bed: false },
            PatientStatus::InBed => PatientStatus::Deceased { was_in_bed: true },
            PatientStatus::Departed { alive: true } => PatientStatus::Departed { alive: false },
            other => return Err(self.invalid(other, "die")),
        };
        Ok(())
    }

    fn invalid(&self, from: PatientStatus, action: &'static str) -> SimError {
        SimError::InvalidTransition {
            patient_id: self.id,
            from:       from.name(),
            action,
        }
    }
}
