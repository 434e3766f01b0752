//! Environment shock model (Stochastic tier only).
//!
//! One uniform draw per round picks a band:
//!   [0.00, 0.20)  staff shortage  — staff = max(1, round(0.6 × staff))
//!   [0.20, 0.40)  bed outage      — beds -= max(1, beds / 2), floor 0
//!   [0.40, 0.60)  casualty surge  — deterioration × 1.7, capped at 0.9
//!   [0.60, 1.00)  quiet round     — one extra coin flip picks the flavour
//!
//! Basic tier never calls into this module.

use serde::{Deserialize, Serialize};

use crate::{hospital::HospitalState, rng::RandomSource};

pub const STAFF_SHORTAGE_FACTOR: f64 = 0.6;
pub const SURGE_MULTIPLIER: f64 = 1.7;
pub const SURGE_CAP: f64 = 0.9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentShock {
    StaffShortage { from: u32, to: u32 },
    /// `from == 0` means the ward was already full and nothing closed.
    BedOutage { from: u32, to: u32 },
    CasualtySurge { from: f64, to: f64 },
    Quiet { routine: bool },
}

impl EnvironmentShock {
    /// Whether the shock changed resources or risk this round.
    pub fn is_mechanical(&self) -> bool {
        match self {
            Self::StaffShortage { from, to } | Self::BedOutage { from, to } => from != to,
            Self::CasualtySurge { .. } => true,
            Self::Quiet { .. } => false,
        }
    }
}

/// Roll this round's shock, apply it to the hospital, and return it
/// together with the round's (possibly raised) deterioration probability.
pub fn roll_environment_shock<R: RandomSource + ?Sized>(
    hospital:           &mut HospitalState,
    deterioration_prob: f64,
    rng:                &mut R,
) -> (EnvironmentShock, f64) {
    let roll = rng.next_f64();

    if roll < 0.20 {
        let from = hospital.staff_capacity_this_round;
        let to = ((f64::from(from) * STAFF_SHORTAGE_FACTOR).round() as u32).max(1);
        hospital.staff_capacity_this_round = to;
        (EnvironmentShock::StaffShortage { from, to }, deterioration_prob)
    } else if roll < 0.40 {
        let from = hospital.available_beds;
        let to = if from > 0 {
            from.saturating_sub((from / 2).max(1))
        } else {
            0
        };
        hospital.available_beds = to;
        (EnvironmentShock::BedOutage { from, to }, deterioration_prob)
    } else if roll < 0.60 {
        let to = (deterioration_prob * SURGE_MULTIPLIER).min(SURGE_CAP);
        (EnvironmentShock::CasualtySurge { from: deterioration_prob, to }, to)
    } else {
        let routine = rng.chance(0.5);
        (EnvironmentShock::Quiet { routine }, deterioration_prob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TriageConfig, rng::ScriptedRng};

    fn hospital() -> HospitalState {
        HospitalState::from_config(&TriageConfig::default())
    }

    #[test]
    fn staff_shortage_scales_and_floors_at_one() {
        let mut h = hospital();
        let (shock, p) = roll_environment_shock(&mut h, 0.35, &mut ScriptedRng::new([0.05]));
        assert_eq!(shock, EnvironmentShock::StaffShortage { from: 4, to: 2 });
        assert_eq!(p, 0.35);

        h.staff_capacity_this_round = 1;
        let (shock, _) = roll_environment_shock(&mut h, 0.35, &mut ScriptedRng::new([0.19]));
        assert_eq!(shock, EnvironmentShock::StaffShortage { from: 1, to: 1 });
        assert!(!shock.is_mechanical());
    }

    #[test]
    fn bed_outage_halves_beds() {
        let mut h = hospital();
        let (shock, _) = roll_environment_shock(&mut h, 0.35, &mut ScriptedRng::new([0.25]));
        assert_eq!(shock, EnvironmentShock::BedOutage { from: 5, to: 3 });
        assert_eq!(h.available_beds, 3);
    }

    #[test]
    fn bed_outage_removes_last_bed() {
        let mut h = hospital();
        h.available_beds = 1;
        roll_environment_shock(&mut h, 0.35, &mut ScriptedRng::new([0.3]));
        assert_eq!(h.available_beds, 0);
    }

    #[test]
    fn bed_outage_on_full_ward_changes_nothing() {
        let mut h = hospital();
        h.available_beds = 0;
        let (shock, _) = roll_environment_shock(&mut h, 0.35, &mut ScriptedRng::new([0.3]));
        assert_eq!(shock, EnvironmentShock::BedOutage { from: 0, to: 0 });
        assert_eq!(h.available_beds, 0);
    }

    #[test]
    fn surge_raises_deterioration_with_cap() {
        let mut h = hospital();
        let (_, p) = roll_environment_shock(&mut h, 0.35, &mut ScriptedRng::new([0.5]));
        assert!((p - 0.595).abs() < 1e-12);
        let (_, p) = roll_environment_shock(&mut h, 0.8, &mut ScriptedRng::new([0.5]));
        assert_eq!(p, SURGE_CAP);
    }

    #[test]
    fn quiet_round_spends_a_flavour_draw() {
        let mut h = hospital();
        let before = h.clone();
        let mut rng = ScriptedRng::new([0.7, 0.2]);
        let (shock, p) = roll_environment_shock(&mut h, 0.35, &mut rng);
        assert_eq!(shock, EnvironmentShock::Quiet { routine: true });
        assert_eq!(p, 0.35);
        assert_eq!(h, before);
        assert_eq!(rng.consumed(), 2);
    }
}
