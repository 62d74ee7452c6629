use super::snapshot::RequestSnapshot;
use super::stages::{StageId, StageRegistry, WorkflowStep};
use serde::Serialize;

/// Result of asking whether `current -> proposed` is legal. Produced fresh per
/// call and never persisted; the caller decides what to write back.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub can_proceed: bool,
    pub message: String,
    pub warnings: Vec<String>,
}

impl TransitionOutcome {
    fn rejected(message: String) -> Self {
        Self {
            can_proceed: false,
            message,
            warnings: Vec::new(),
        }
    }

    fn allowed(message: String, warnings: Vec<String>) -> Self {
        Self {
            can_proceed: true,
            message,
            warnings,
        }
    }
}

/// The single authority on whether a requested stage change is legal, and why.
///
/// Pure over the snapshot: no mutation, no persistence, no panics for any
/// input. Unknown stage tags and unmet preconditions come back as ordinary
/// `can_proceed = false` outcomes.
#[derive(Debug, Clone)]
pub struct TransitionValidator {
    registry: StageRegistry,
}

impl TransitionValidator {
    pub fn new(registry: StageRegistry) -> Self {
        Self { registry }
    }

    pub fn standard() -> Self {
        Self::new(StageRegistry::standard())
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    pub fn validate(
        &self,
        current: &str,
        proposed: &str,
        snapshot: &RequestSnapshot,
    ) -> TransitionOutcome {
        let Some(current_step) = self.registry.find(current) else {
            return TransitionOutcome::rejected(format!(
                "workflow stage '{current}' could not be found"
            ));
        };
        let Some(proposed_step) = self.registry.find(proposed) else {
            return TransitionOutcome::rejected(format!(
                "workflow stage '{proposed}' could not be found"
            ));
        };

        if proposed_step.order < current_step.order {
            return TransitionOutcome::allowed(
                format!(
                    "reverting from {} back to {}",
                    current_step.label, proposed_step.label
                ),
                vec![
                    "reverting a requisition should only be done for justified reasons"
                        .to_string(),
                ],
            );
        }

        if proposed_step.order > current_step.order + 1 {
            // The required next step always exists here: proposed is further
            // along than current + 1, so current + 1 is in range.
            let required = match self.registry.step_at(current_step.order + 1) {
                Some(step) => step.label,
                None => proposed_step.label,
            };
            return TransitionOutcome::rejected(format!(
                "stages cannot be skipped; the next step after {} is {}. Follow the sequence",
                current_step.label, required
            ));
        }

        self.validate_adjacent(current_step, proposed_step, snapshot)
    }

    /// Precondition table for single-step forward moves. Backward moves never
    /// reach this point.
    fn validate_adjacent(
        &self,
        current: &WorkflowStep,
        proposed: &WorkflowStep,
        snapshot: &RequestSnapshot,
    ) -> TransitionOutcome {
        let mut warnings = Vec::new();

        match (current.id, proposed.id) {
            // Advisory-only on purpose: recruiting may start in parallel with
            // the VP paperwork, so an unrecorded approval warns but never
            // blocks. Do not align this with the blocking gates below.
            (StageId::VpHr, StageId::Recruiting) => {
                if !snapshot.approved_by_vp {
                    warnings.push(
                        "VP of HR approval has not been recorded; double check it before recruiting starts"
                            .to_string(),
                    );
                }
            }
            (StageId::Sourcing, StageId::Screening) => {
                if !snapshot.has_applications {
                    return TransitionOutcome::rejected(
                        "no applications have been received yet; source candidates before screening"
                            .to_string(),
                    );
                }
                warnings
                    .push("verify candidate sourcing is complete before screening begins".to_string());
            }
            (StageId::Screening, StageId::ApplicationReview) => {
                if snapshot.selected_applications.is_empty() {
                    return TransitionOutcome::rejected(
                        "select applications before forwarding them to the home faculty".to_string(),
                    );
                }
                warnings.push(
                    "verify the selected applications are appropriate for the home faculty"
                        .to_string(),
                );
            }
            (StageId::ApplicationReview, StageId::InterviewScheduled) => {
                if !snapshot.approved_by_faculty {
                    return TransitionOutcome::rejected(
                        "wait for the faculty to approve the selected applications".to_string(),
                    );
                }
                warnings.push(
                    "verify the faculty approval was recorded against the forwarded applications"
                        .to_string(),
                );
            }
            (StageId::InterviewResult, StageId::President) => {
                if snapshot.interview_result.is_none() {
                    return TransitionOutcome::rejected(
                        "record the interview result before proposing to the president".to_string(),
                    );
                }
                warnings
                    .push("verify the interview result is accurate and complete".to_string());
            }
            (StageId::President, StageId::Notified) => {
                if !snapshot.approved_by_president {
                    return TransitionOutcome::rejected(
                        "wait for presidential approval before notifying the candidate".to_string(),
                    );
                }
                warnings.push(
                    "prepare the offer documentation before notifying the candidate".to_string(),
                );
            }
            _ => {}
        }

        TransitionOutcome::allowed(
            format!(
                "confirm transition from {} to {}",
                current.label, proposed.label
            ),
            warnings,
        )
    }
}

impl Default for TransitionValidator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::requisition::snapshot::{ApplicationId, InterviewResult};

    fn validator() -> TransitionValidator {
        TransitionValidator::standard()
    }

    #[test]
    fn unknown_stage_is_rejected_on_either_side() {
        let snapshot = RequestSnapshot::default();

        let outcome = validator().validate("bogus", "submitted", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("could not be found"));
        assert!(outcome.warnings.is_empty());

        let outcome = validator().validate("submitted", "bogus", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("could not be found"));
    }

    #[test]
    fn terminal_stages_are_not_reachable_through_validation() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("notified", "confirmed", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("could not be found"));
    }

    #[test]
    fn backward_moves_are_always_allowed_with_one_advisory() {
        let registry = StageRegistry::standard();
        let snapshot = RequestSnapshot::default();

        for current in registry.steps() {
            for proposed in registry.steps() {
                if proposed.order >= current.order {
                    continue;
                }
                let outcome = validator().validate(
                    current.id.as_str(),
                    proposed.id.as_str(),
                    &snapshot,
                );
                assert!(outcome.can_proceed, "{} -> {}", current.label, proposed.label);
                assert!(outcome.message.contains("reverting"));
                assert_eq!(outcome.warnings.len(), 1);
            }
        }
    }

    #[test]
    fn backward_move_bypasses_blocking_preconditions() {
        // Nothing about the snapshot matters when moving back.
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("president", "sourcing", &snapshot);
        assert!(outcome.can_proceed);
    }

    #[test]
    fn skipping_a_stage_names_the_required_next_step() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("submitted", "vp_hr", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("HR Review"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn even_a_single_skip_is_rejected() {
        // The check is strict: anything beyond current + 1 is refused.
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("recruiting", "screening", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains(StageId::Sourcing.label()));
    }

    #[test]
    fn vp_hr_to_recruiting_warns_but_never_blocks() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("vp_hr", "recruiting", &snapshot);
        assert!(outcome.can_proceed);
        assert!(!outcome.warnings.is_empty());

        let approved = RequestSnapshot {
            approved_by_vp: true,
            ..RequestSnapshot::default()
        };
        let outcome = validator().validate("vp_hr", "recruiting", &approved);
        assert!(outcome.can_proceed);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn sourcing_to_screening_requires_applications() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("sourcing", "screening", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("no applications"));
        assert!(outcome.warnings.is_empty());

        let ready = RequestSnapshot {
            has_applications: true,
            ..RequestSnapshot::default()
        };
        let outcome = validator().validate("sourcing", "screening", &ready);
        assert!(outcome.can_proceed);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn screening_to_application_review_requires_a_selection() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("screening", "application_review", &snapshot);
        assert!(!outcome.can_proceed);

        let ready = RequestSnapshot {
            selected_applications: vec![ApplicationId("a1".to_string())],
            ..RequestSnapshot::default()
        };
        let outcome = validator().validate("screening", "application_review", &ready);
        assert!(outcome.can_proceed);
    }

    #[test]
    fn application_review_to_interview_requires_faculty_approval() {
        let snapshot = RequestSnapshot::default();
        let outcome =
            validator().validate("application_review", "interview_scheduled", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("faculty"));

        let ready = RequestSnapshot {
            approved_by_faculty: true,
            ..RequestSnapshot::default()
        };
        let outcome = validator().validate("application_review", "interview_scheduled", &ready);
        assert!(outcome.can_proceed);
    }

    #[test]
    fn interview_result_must_be_recorded_before_president() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("interview_result", "president", &snapshot);
        assert!(!outcome.can_proceed);

        let ready = RequestSnapshot {
            interview_result: Some(InterviewResult {
                passed: true,
                score: Some(87),
                comments: None,
            }),
            ..RequestSnapshot::default()
        };
        let outcome = validator().validate("interview_result", "president", &ready);
        assert!(outcome.can_proceed);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn president_to_notified_requires_presidential_approval() {
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("president", "notified", &snapshot);
        assert!(!outcome.can_proceed);
        assert!(outcome.message.contains("presidential"));

        let ready = RequestSnapshot {
            approved_by_president: true,
            ..RequestSnapshot::default()
        };
        let outcome = validator().validate("president", "notified", &ready);
        assert!(outcome.can_proceed);
    }

    #[test]
    fn ungated_adjacent_pairs_pass_with_a_generic_message() {
        let snapshot = RequestSnapshot::default();
        for (current, proposed) in [
            ("submitted", "hr_review"),
            ("hr_review", "vp_hr"),
            ("recruiting", "sourcing"),
            ("interview_scheduled", "interview"),
            ("interview", "interview_result"),
        ] {
            let outcome = validator().validate(current, proposed, &snapshot);
            assert!(outcome.can_proceed, "{current} -> {proposed}");
            assert!(outcome.message.starts_with("confirm transition"));
            assert!(outcome.warnings.is_empty());
        }
    }

    #[test]
    fn staying_on_the_same_stage_is_an_ordinary_confirmation() {
        // order(proposed) == order(current): not backward, not a skip, and no
        // pair-specific precondition exists for (X, X).
        let snapshot = RequestSnapshot::default();
        let outcome = validator().validate("screening", "screening", &snapshot);
        assert!(outcome.can_proceed);
        assert!(outcome.warnings.is_empty());
    }
}
