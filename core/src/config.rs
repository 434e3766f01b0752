use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};

/// The two difficulty tiers. Fixed for the lifetime of a game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Predictable arrivals, mild observation noise, no environment shocks.
    Basic,
    /// Heavier arrivals, noisier observations, one environment shock per round.
    Stochastic,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic      => "basic",
            Self::Stochastic => "stochastic",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "basic"      => Ok(Self::Basic),
            "stochastic" => Ok(Self::Stochastic),
            other => Err(SimError::InvalidConfig {
                field:  "difficulty".into(),
                reason: format!("unknown tier '{other}'"),
            }),
        }
    }
}

/// Per-tier arrival and risk parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DifficultyProfile {
    pub tier: Difficulty,
    /// Inclusive (min, max) number of arrivals per round.
    pub patients_per_round: (u32, u32),
    /// Probability a new arrival is Severe or Critical.
    pub severe_prob: f64,
    /// Base per-round deterioration probability for waiting patients.
    pub deterioration_prob: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub initial_survival_score: f64,
    pub initial_staff_stress:   f64,
    pub initial_reputation:     f64,
}

/// Thresholds checked once all rounds have been played.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WinConditions {
    pub min_survival:     f64,
    pub max_staff_stress: f64,
    pub min_reputation:   f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageConfig {
    pub total_rounds:       u32,
    pub max_beds:           u32,
    pub max_staff_capacity: u32,
    pub metrics:            MetricsConfig,
    pub win:                WinConditions,
    pub basic:              DifficultyProfile,
    pub stochastic:         DifficultyProfile,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            total_rounds:       5,
            max_beds:           5,
            max_staff_capacity: 4,
            metrics: MetricsConfig {
                initial_survival_score: 100.0,
                initial_staff_stress:   10.0,
                initial_reputation:     60.0,
            },
            win: WinConditions {
                min_survival:     70.0,
                max_staff_stress: 40.0,
                min_reputation:   50.0,
            },
            basic: DifficultyProfile {
                tier:               Difficulty::Basic,
                patients_per_round: (3, 4),
                severe_prob:        0.25,
                deterioration_prob: 0.15,
            },
            stochastic: DifficultyProfile {
                tier:               Difficulty::Stochastic,
                patients_per_round: (4, 7),
                severe_prob:        0.45,
                deterioration_prob: 0.35,
            },
        }
    }
}

impl TriageConfig {
    /// Load from a JSON file.
    /// In tests, use TriageConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: TriageConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Basic      => &self.basic,
            Difficulty::Stochastic => &self.stochastic,
        }
    }

    /// Reject any configuration the engine could not resolve a round with.
    pub fn validate(&self) -> SimResult<()> {
        positive("total_rounds", self.total_rounds)?;
        positive("max_beds", self.max_beds)?;
        positive("max_staff_capacity", self.max_staff_capacity)?;

        metric("metrics.initial_survival_score", self.metrics.initial_survival_score)?;
        metric("metrics.initial_staff_stress", self.metrics.initial_staff_stress)?;
        metric("metrics.initial_reputation", self.metrics.initial_reputation)?;
        metric("win.min_survival", self.win.min_survival)?;
        metric("win.max_staff_stress", self.win.max_staff_stress)?;
        metric("win.min_reputation", self.win.min_reputation)?;

        for (slot, profile) in [
            (Difficulty::Basic, &self.basic),
            (Difficulty::Stochastic, &self.stochastic),
        ] {
            if profile.tier != slot {
                return Err(SimError::DifficultyMismatch {
                    expected: slot.to_string(),
                    found:    profile.tier.to_string(),
                });
            }
            let (min, max) = profile.patients_per_round;
            if min > max {
                return Err(SimError::InvalidConfig {
                    field:  format!("{slot}.patients_per_round"),
                    reason: format!("min {min} exceeds max {max}"),
                });
            }
            probability(&format!("{slot}.severe_prob"), profile.severe_prob)?;
            probability(&format!("{slot}.deterioration_prob"), profile.deterioration_prob)?;
        }
        Ok(())
    }
}

fn positive(field: &str, value: u32) -> SimResult<()> {
    if value == 0 {
        return Err(SimError::InvalidConfig {
            field:  field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(())
}

fn metric(field: &str, value: f64) -> SimResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(SimError::InvalidConfig {
            field:  field.into(),
            reason: format!("{value} is outside [0, 100]"),
        });
    }
    Ok(())
}

fn probability(field: &str, value: f64) -> SimResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::InvalidConfig {
            field:  field.into(),
            reason: format!("{value} is not a probability"),
        });
    }
    Ok(())
}
