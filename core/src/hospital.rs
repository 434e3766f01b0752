//! Hospital resources and the three continuous metrics.
//!
//! RULE: every metric is clamped to [0.0, 100.0] after each mutation.

use serde::{Deserialize, Serialize};

use crate::{config::TriageConfig, decision::Decision};

pub const METRIC_FLOOR: f64 = 0.0;
pub const METRIC_CEILING: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalState {
    pub available_beds:            u32,
    pub staff_capacity_this_round: u32,
    pub survival_score:            f64,
    pub staff_stress:              f64,
    pub reputation:                f64,
}

impl HospitalState {
    pub fn from_config(config: &TriageConfig) -> Self {
        Self {
            available_beds:            config.max_beds,
            staff_capacity_this_round: config.max_staff_capacity,
            survival_score:            config.metrics.initial_survival_score,
            staff_stress:              config.metrics.initial_staff_stress,
            reputation:                config.metrics.initial_reputation,
        }
    }

    /// A bed and a staff member are both free.
    pub fn can_treat(&self) -> bool {
        self.staff_capacity_this_round > 0 && self.available_beds > 0
    }

    /// Beds or staff are exhausted.
    pub fn is_scarce(&self) -> bool {
        self.available_beds == 0 || self.staff_capacity_this_round == 0
    }

    /// Reserve one bed and one staff member. Caller checks `can_treat`.
    pub(crate) fn reserve_treatment(&mut self) {
        self.available_beds = self.available_beds.saturating_sub(1);
        self.staff_capacity_this_round = self.staff_capacity_this_round.saturating_sub(1);
    }

    /// Apply the metric deltas for one resolved patient, then clamp.
    ///
    /// `decision` is the effective (post-coercion) decision. For transfers,
    /// scarcity is read from the current resource state, so earlier patients
    /// in the same round change what later transfers see.
    pub fn record_outcome(&mut self, died: bool, decision: Decision) {
        if died {
            self.survival_score -= 4.0;
            self.reputation -= 2.0;
            self.staff_stress += 3.0;
        } else {
            self.survival_score += 0.5;
            self.reputation += 0.5;
        }

        // Decision load and optics
        match decision {
            Decision::TreatNow => {
                self.staff_stress += 1.0;
                self.reputation += 0.5;
            }
            Decision::Monitor => self.staff_stress += 0.5,
            Decision::Defer => self.reputation -= 1.0,
            Decision::Transfer => {
                // Transferring is defensible only when capacity is gone.
                if self.is_scarce() {
                    self.reputation += 0.5;
                } else {
                    self.reputation -= 1.0;
                }
            }
        }

        self.clamp_metrics();
    }

    pub fn clamp_metrics(&mut self) {
        self.survival_score = self.survival_score.clamp(METRIC_FLOOR, METRIC_CEILING);
        self.staff_stress = self.staff_stress.clamp(METRIC_FLOOR, METRIC_CEILING);
        self.reputation = self.reputation.clamp(METRIC_FLOOR, METRIC_CEILING);
    }
}
