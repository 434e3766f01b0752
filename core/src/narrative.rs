//! Narrative explanation generator.
//!
//! Pure formatting over facts the engine has already computed. Nothing in
//! here touches the random source, so swapping or localising the text can
//! never change a seeded run.

use serde::{Deserialize, Serialize};

use crate::{
    decision::Decision,
    severity::Severity,
    shock::EnvironmentShock,
    types::PatientId,
};

/// Everything needed to explain one resolved patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub patient_id:         PatientId,
    pub visible_severity:   Severity,
    /// True severity at decision time, before this round's deterioration.
    pub true_severity:      Severity,
    /// The effective decision, after any coercion.
    pub decision:           Decision,
    pub treated_this_round: bool,
    pub died:               bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecisionQuality {
    AlignedWithHighRisk,
    ConservativeResourceUse,
    RiskyGivenSeverity,
    PendingExternalCapacity,
    ReasonableForEstimatedRisk,
}

impl DecisionQuality {
    pub fn classify(decision: Decision, true_severity: Severity) -> Self {
        match (decision, true_severity.is_high_risk()) {
            (Decision::TreatNow, true)  => Self::AlignedWithHighRisk,
            (Decision::TreatNow, false) => Self::ConservativeResourceUse,
            (Decision::Monitor | Decision::Defer, true) => Self::RiskyGivenSeverity,
            (Decision::Transfer, true)  => Self::PendingExternalCapacity,
            _ => Self::ReasonableForEstimatedRisk,
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Self::AlignedWithHighRisk        => "aligned with the high true risk",
            Self::ConservativeResourceUse    => "conservative, spending resources on a lower-risk patient",
            Self::RiskyGivenSeverity         => "risky given the underlying severity",
            Self::PendingExternalCapacity    => "high-risk, pending external capacity",
            Self::ReasonableForEstimatedRisk => "reasonable for the estimated risk",
        }
    }
}

pub fn explain_outcome(record: &OutcomeRecord) -> String {
    let visible = record.visible_severity.label();
    let actual = record.true_severity.label();
    let quality = DecisionQuality::classify(record.decision, record.true_severity);

    let outcome = if record.died { "died this round" } else { "survived this round" };

    let treatment = if record.treated_this_round {
        "A bed and a staff member were committed to this patient."
    } else {
        "No bed or staff member was committed to this patient this round."
    };

    let uncertainty = if record.visible_severity != record.true_severity {
        format!(
            "The patient looked {visible} but was actually {actual}: \
             diagnostic uncertainty shaped this call."
        )
    } else {
        format!(
            "The visible severity ({visible}) matched the true severity, \
             so uncertainty played a small role."
        )
    };

    format!(
        "Patient {id}: appeared {visible}, true severity {actual}. \
         You chose to {decision}, which was {quality}. \
         The patient {outcome}. {treatment} {uncertainty}",
        id = record.patient_id,
        decision = record.decision.label(),
        quality = quality.phrase(),
    )
}

pub fn coercion_note(patient_id: PatientId) -> String {
    format!(
        "Patient {patient_id}: treatment was requested, but no bed or staff \
         member was free, so the decision fell back to 'defer'."
    )
}

pub fn deterioration_note(patient_id: PatientId) -> String {
    format!(
        "Patient {patient_id}: condition deteriorated while waiting. \
         Untreated patients can worsen even without a new decision."
    )
}

/// Scenario framing followed by the mechanical effect, if any.
pub fn shock_notes(shock: &EnvironmentShock) -> Vec<String> {
    match *shock {
        EnvironmentShock::StaffShortage { from, to } => vec![
            "Scenario: a respiratory virus is moving through the staff. Several \
             nurses and residents called in sick just before the shift."
                .to_string(),
            format!(
                "Environment event: staff shortage cut staff capacity from {from} \
                 to {to} this round, making 'treat now' decisions scarcer."
            ),
        ],
        // A ward that is already full has nothing left to close.
        EnvironmentShock::BedOutage { from: 0, .. } => Vec::new(),
        EnvironmentShock::BedOutage { from, to } => vec![
            "Scenario: a burst pipe flooded a surgical ward. Facilities closed \
             several rooms for emergency repairs."
                .to_string(),
            format!(
                "Environment event: a ward outage took beds offline \
                 ({from} -> {to} beds) this round."
            ),
        ],
        EnvironmentShock::CasualtySurge { from, to } => vec![
            "Scenario: a highway pile-up and a local outbreak hit the region at \
             once. Waiting patients are more likely to decline suddenly."
                .to_string(),
            format!(
                "Environment event: deterioration risk for untreated patients rose \
                 from {:.0}% to {:.0}% this round.",
                from * 100.0,
                to * 100.0
            ),
        ],
        EnvironmentShock::Quiet { routine: true } => vec![
            "Scenario: a routine shift. Patient-level uncertainty remains, but \
             nothing outside the hospital is disrupting operations."
                .to_string(),
        ],
        EnvironmentShock::Quiet { routine: false } => vec![
            "Scenario: community conditions are stable. The challenge this round \
             is triaging with incomplete information, not reacting to a crisis."
                .to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(decision: Decision, visible: Severity, actual: Severity) -> OutcomeRecord {
        OutcomeRecord {
            patient_id:         7,
            visible_severity:   visible,
            true_severity:      actual,
            decision,
            treated_this_round: decision == Decision::TreatNow,
            died:               false,
        }
    }

    #[test]
    fn quality_is_a_function_of_decision_and_true_severity() {
        use DecisionQuality::*;
        assert_eq!(DecisionQuality::classify(Decision::TreatNow, Severity::Critical), AlignedWithHighRisk);
        assert_eq!(DecisionQuality::classify(Decision::TreatNow, Severity::Mild), ConservativeResourceUse);
        assert_eq!(DecisionQuality::classify(Decision::Defer, Severity::Severe), RiskyGivenSeverity);
        assert_eq!(DecisionQuality::classify(Decision::Monitor, Severity::Critical), RiskyGivenSeverity);
        assert_eq!(DecisionQuality::classify(Decision::Transfer, Severity::Severe), PendingExternalCapacity);
        assert_eq!(DecisionQuality::classify(Decision::Transfer, Severity::Mild), ReasonableForEstimatedRisk);
        assert_eq!(DecisionQuality::classify(Decision::Monitor, Severity::Moderate), ReasonableForEstimatedRisk);
    }

    #[test]
    fn divergent_severity_mentions_uncertainty() {
        let text = explain_outcome(&record(Decision::Monitor, Severity::Mild, Severity::Severe));
        assert!(text.starts_with("Patient 7: appeared mild, true severity severe."));
        assert!(text.contains("risky given the underlying severity"));
        assert!(text.contains("diagnostic uncertainty"));
    }

    #[test]
    fn matching_severity_says_so() {
        let text = explain_outcome(&record(Decision::TreatNow, Severity::Critical, Severity::Critical));
        assert!(text.contains("matched the true severity"));
        assert!(text.contains("A bed and a staff member were committed"));
    }

    #[test]
    fn full_ward_outage_is_silent() {
        assert!(shock_notes(&EnvironmentShock::BedOutage { from: 0, to: 0 }).is_empty());
        assert_eq!(shock_notes(&EnvironmentShock::BedOutage { from: 5, to: 3 }).len(), 2);
        assert_eq!(shock_notes(&EnvironmentShock::Quiet { routine: false }).len(), 1);
    }
}
