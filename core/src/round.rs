//! Round resolution — the only code allowed to mutate a GameState
//! during a round.
//!
//! EXECUTION ORDER of apply_player_decisions (fixed, never reordered;
//! resource contention and seeded replays both depend on it):
//!   1. Record the submitted decisions verbatim.
//!   2. Environment shock (Stochastic only).
//!   3. Resolve each decision in submission order.
//!   4. Metric update per resolved patient (inside 3).
//!   5. Deterioration pass over the whole live roster.
//!   6. Recompute available beds from occupancy.
//!   7. Final metric clamp.
//!   8. Return the summary.

use crate::{
    config::Difficulty,
    decision::{Decision, Decisions},
    error::SimResult,
    narrative::{self, OutcomeRecord},
    patient::Patient,
    rng::RandomSource,
    severity::{death_probability, maybe_deteriorate, noisy_visible_severity, sample_true_severity},
    shock::roll_environment_shock,
    state::GameState,
    summary::{RoundRecorder, RoundSummary},
    types::PatientId,
};

/// Create this round's arrivals and append them to the roster.
///
/// Arrival is unconditional; scarcity is handled at decision time.
/// Not idempotent: the caller must invoke it exactly once per round.
pub fn generate_patients_for_round<R: RandomSource + ?Sized>(
    state: &mut GameState,
    rng:   &mut R,
) -> Vec<Patient> {
    let difficulty = state.difficulty;
    let (min, max) = state.profile().patients_per_round;
    let severe_prob = state.profile().severe_prob;

    let count = rng.range_inclusive(min, max);
    let mut arrivals = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let true_severity = sample_true_severity(severe_prob, rng);
        let visible_severity = noisy_visible_severity(true_severity, difficulty, rng);

        let id = state.next_patient_id;
        state.next_patient_id += 1;

        let patient = Patient::new(id, visible_severity, true_severity, state.current_round);
        log::debug!(
            "round={} arrival: patient={id} visible={visible_severity:?} true={true_severity:?}",
            state.current_round
        );
        state.patients.push(patient.clone());
        arrivals.push(patient);
    }

    arrivals
}

/// Resolve one round of decisions. See the module docs for step order.
///
/// Decisions for unknown, dead or departed patients are skipped silently.
/// An empty decision set still runs shocks, deterioration and bed
/// recomputation.
pub fn apply_player_decisions<R: RandomSource + ?Sized>(
    state:     &mut GameState,
    decisions: &Decisions,
    rng:       &mut R,
) -> SimResult<RoundSummary> {
    let round = state.current_round;

    // 1. Record what was submitted.
    let mut recorder = RoundRecorder::new(round, decisions);

    // 2. Environment shock.
    let mut deterioration_prob = state.profile().deterioration_prob;
    if state.difficulty == Difficulty::Stochastic {
        let (shock, prob) = roll_environment_shock(&mut state.hospital, deterioration_prob, rng);
        deterioration_prob = prob;
        if shock.is_mechanical() {
            log::warn!("round={round} environment shock: {shock:?}");
        } else {
            log::debug!("round={round} environment: {shock:?}");
        }
        for note in narrative::shock_notes(&shock) {
            recorder.note(note);
        }
    }

    // 3 + 4. Decisions in submission order.
    for (patient_id, submitted) in decisions.iter() {
        resolve_decision(state, &mut recorder, patient_id, submitted, rng)?;
    }

    // 5. Deterioration over the whole live roster.
    for patient in state.patients.iter_mut() {
        if maybe_deteriorate(patient, deterioration_prob, rng) {
            log::debug!(
                "round={round} patient={} deteriorated to {:?}",
                patient.id,
                patient.true_severity
            );
            recorder.deteriorated(patient.id);
            recorder.note(narrative::deterioration_note(patient.id));
        }
    }

    // 6. Beds are derived from occupancy, never carried over.
    let max_beds = state.config().max_beds;
    state.hospital.available_beds = max_beds.saturating_sub(state.occupied_beds());

    // 7. Final clamp.
    state.hospital.clamp_metrics();

    let summary = recorder.finish();
    log::info!(
        "round={round} resolved: treated={} died={} deteriorated={} beds={} survival={:.1} stress={:.1} reputation={:.1}",
        summary.patients_treated().len(),
        summary.patients_died().len(),
        summary.patients_deteriorated().len(),
        state.hospital.available_beds,
        state.hospital.survival_score,
        state.hospital.staff_stress,
        state.hospital.reputation,
    );
    Ok(summary)
}

fn resolve_decision<R: RandomSource + ?Sized>(
    state:      &mut GameState,
    recorder:   &mut RoundRecorder,
    patient_id: PatientId,
    submitted:  Decision,
    rng:        &mut R,
) -> SimResult<()> {
    let hospital = &mut state.hospital;
    let Some(patient) = state.patients.iter_mut().find(|p| p.id == patient_id) else {
        log::debug!("patient={patient_id} not on roster, decision skipped");
        return Ok(());
    };
    if !patient.is_present() {
        return Ok(());
    }

    let visible_severity = patient.visible_severity;
    let true_severity = patient.true_severity;

    let mut decision = submitted;
    let mut treated_this_round = false;

    match submitted {
        Decision::TreatNow => {
            if hospital.can_treat() {
                patient.admit()?;
                hospital.reserve_treatment();
                recorder.treated(patient_id);
                treated_this_round = true;
            } else {
                log::warn!("patient={patient_id} treat-now coerced to defer: no bed or staff");
                recorder.note(narrative::coercion_note(patient_id));
                decision = Decision::Defer;
            }
        }
        Decision::Transfer => {
            // Leaves immediately, whatever happens in transit.
            patient.transfer()?;
        }
        Decision::Monitor | Decision::Defer => {}
    }

    let p_death = death_probability(true_severity, treated_this_round, decision);
    let died = rng.chance(p_death);
    if died {
        patient.die()?;
        recorder.died(patient_id);
    }

    hospital.record_outcome(died, decision);

    log::debug!(
        "patient={patient_id} decision={decision:?} treated={treated_this_round} p_death={p_death:.3} died={died}"
    );

    recorder.note(narrative::explain_outcome(&OutcomeRecord {
        patient_id,
        visible_severity,
        true_severity,
        decision,
        treated_this_round,
        died,
    }));
    Ok(())
}
