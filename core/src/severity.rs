//! Severity & probability model.
//!
//! Pure functions of (difficulty, severity, decision, random source).
//! The only mutable state touched here is the caller's random source
//! and, for deterioration, the single patient passed in.
//!
//! DRAW ORDER (part of the replay contract):
//!   - sample_true_severity:    2 draws (band, then level within band)
//!   - noisy_visible_severity:  1 draw, plus 1 sign draw when offset != 0
//!   - maybe_deteriorate:       1 draw for an eligible patient, 0 otherwise

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{config::Difficulty, decision::Decision, patient::Patient, rng::RandomSource};

/// Medical severity, totally ordered by risk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub const MAX_RANK: i32 = 3;

    pub fn rank(&self) -> i32 {
        match self {
            Self::Mild     => 0,
            Self::Moderate => 1,
            Self::Severe   => 2,
            Self::Critical => 3,
        }
    }

    /// Map any integer onto a level, clamping to [Mild, Critical].
    pub fn from_rank(rank: i32) -> Self {
        match clamp_rank(rank) {
            0 => Self::Mild,
            1 => Self::Moderate,
            2 => Self::Severe,
            _ => Self::Critical,
        }
    }

    /// One step worse, saturating at Critical.
    pub fn stepped_up(&self) -> Self {
        Self::from_rank(self.rank() + 1)
    }

    pub fn is_high_risk(&self) -> bool {
        matches!(self, Self::Severe | Self::Critical)
    }

    /// Per-round death rate before any decision multiplier.
    pub fn base_death_rate(&self) -> f64 {
        match self {
            Self::Mild     => 0.01,
            Self::Moderate => 0.05,
            Self::Severe   => 0.15,
            Self::Critical => 0.30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mild     => "mild",
            Self::Moderate => "moderate",
            Self::Severe   => "severe",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            Self::Mild     => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe   => "Severe",
            Self::Critical => "Critical",
        };
        f.write_str(title)
    }
}

pub fn clamp_rank(rank: i32) -> i32 {
    rank.clamp(0, Severity::MAX_RANK)
}

/// Two-bucket model: with `severe_prob` the patient is Severe (60%) or
/// Critical (40%); otherwise Mild or Moderate with equal odds.
pub fn sample_true_severity<R: RandomSource + ?Sized>(severe_prob: f64, rng: &mut R) -> Severity {
    if rng.next_f64() < severe_prob {
        if rng.next_f64() < 0.6 { Severity::Severe } else { Severity::Critical }
    } else if rng.next_f64() < 0.5 {
        Severity::Mild
    } else {
        Severity::Moderate
    }
}

/// What the decision-maker sees: the true level shifted by a
/// difficulty-dependent offset, clamped to the scale.
pub fn noisy_visible_severity<R: RandomSource + ?Sized>(
    true_severity: Severity,
    difficulty:    Difficulty,
    rng:           &mut R,
) -> Severity {
    let r = rng.next_f64();
    let magnitude = match difficulty {
        // ~80% correct, else off by one
        Difficulty::Basic => if r < 0.8 { 0 } else { 1 },
        // ~60% correct, 30% off by one, 10% off by two
        Difficulty::Stochastic => {
            if r < 0.6 { 0 } else if r < 0.9 { 1 } else { 2 }
        }
    };
    let offset = if magnitude == 0 {
        0
    } else if rng.below(2) == 0 {
        -magnitude
    } else {
        magnitude
    };
    Severity::from_rank(true_severity.rank() + offset)
}

/// Per-round death probability for a patient given this round's handling.
///
/// Transfers must always be evaluated with `treated_this_round = false`.
/// The result is clamped to [0, 1].
pub fn death_probability(true_severity: Severity, treated_this_round: bool, decision: Decision) -> f64 {
    let base = true_severity.base_death_rate();
    let multiplier = if treated_this_round {
        // Treatment is protective, never risk-free.
        if true_severity.is_high_risk() { 0.25 } else { 0.10 }
    } else {
        match decision {
            Decision::TreatNow => 1.0,
            Decision::Monitor  => 1.2,
            Decision::Defer    => 2.0,
            Decision::Transfer => 1.5, // transport surcharge
        }
    };
    (base * multiplier).clamp(0.0, 1.0)
}

/// One deterioration draw for a waiting patient.
///
/// Only alive, untreated, still-present patients are eligible; ineligible
/// patients consume no draw. Returns true when the true severity worsened.
/// A Critical patient still consumes the draw but cannot worsen further.
pub fn maybe_deteriorate<R: RandomSource + ?Sized>(patient: &mut Patient, probability: f64, rng: &mut R) -> bool {
    if !patient.is_waiting() {
        return false;
    }
    if !rng.chance(probability) {
        return false;
    }
    let before = patient.true_severity;
    patient.true_severity = before.stepped_up();
    patient.true_severity != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    #[test]
    fn clamp_rank_always_lands_on_scale() {
        for r in -10..=10 {
            assert!((0..=3).contains(&clamp_rank(r)), "rank {r}");
        }
        assert_eq!(Severity::from_rank(-4), Severity::Mild);
        assert_eq!(Severity::from_rank(9), Severity::Critical);
    }

    #[test]
    fn stepping_saturates_at_critical() {
        assert_eq!(Severity::Mild.stepped_up(), Severity::Moderate);
        assert_eq!(Severity::Critical.stepped_up(), Severity::Critical);
    }

    #[test]
    fn severe_band_splits_sixty_forty() {
        let mut rng = ScriptedRng::new([0.1, 0.59, 0.1, 0.6]);
        assert_eq!(sample_true_severity(0.25, &mut rng), Severity::Severe);
        assert_eq!(sample_true_severity(0.25, &mut rng), Severity::Critical);
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    fn mild_band_splits_evenly() {
        let mut rng = ScriptedRng::new([0.9, 0.49, 0.9, 0.5]);
        assert_eq!(sample_true_severity(0.25, &mut rng), Severity::Mild);
        assert_eq!(sample_true_severity(0.25, &mut rng), Severity::Moderate);
    }

    #[test]
    fn exact_observation_consumes_one_draw() {
        let mut rng = ScriptedRng::new([0.79]);
        let seen = noisy_visible_severity(Severity::Severe, Difficulty::Basic, &mut rng);
        assert_eq!(seen, Severity::Severe);
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn noisy_observation_consumes_one_extra_sign_draw() {
        let mut rng = ScriptedRng::new([0.85, 0.7]);
        let seen = noisy_visible_severity(Severity::Moderate, Difficulty::Basic, &mut rng);
        assert_eq!(seen, Severity::Severe);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn stochastic_two_step_offset_clamps_at_floor() {
        let mut rng = ScriptedRng::new([0.95, 0.1]);
        let seen = noisy_visible_severity(Severity::Moderate, Difficulty::Stochastic, &mut rng);
        assert_eq!(seen, Severity::Mild);
    }

    #[test]
    fn treated_critical_risk_is_quartered() {
        let p = death_probability(Severity::Critical, true, Decision::TreatNow);
        assert!((p - 0.075).abs() < 1e-12);
    }

    #[test]
    fn treated_low_risk_is_cut_to_a_tenth() {
        let p = death_probability(Severity::Moderate, true, Decision::TreatNow);
        assert!((p - 0.005).abs() < 1e-12);
    }

    #[test]
    fn untreated_multipliers_follow_decision() {
        let base = Severity::Severe.base_death_rate();
        assert!((death_probability(Severity::Severe, false, Decision::TreatNow) - base).abs() < 1e-12);
        assert!((death_probability(Severity::Severe, false, Decision::Monitor) - base * 1.2).abs() < 1e-12);
        assert!((death_probability(Severity::Severe, false, Decision::Defer) - base * 2.0).abs() < 1e-12);
        assert!((death_probability(Severity::Severe, false, Decision::Transfer) - base * 1.5).abs() < 1e-12);
    }
}
