//! Property tests for the step state machine.
//!
//! Drive a model step through arbitrary action sequences and check the two
//! hard invariants on every reachable state:
//!   - `completed_at` is non-null exactly when the status is COMPLETED;
//!   - a proof-requiring step only ever enters COMPLETED from
//!     PENDING_VALIDATION.

use proptest::prelude::*;
use visad::case::state::{apply, CompletedAtEffect, StepAction, StepStatus, StepView};

/// In-memory model of a step row, mirroring what the orchestrator persists.
#[derive(Debug, Clone)]
struct ModelStep {
    status: StepStatus,
    requires_proof: bool,
    completed_at: Option<&'static str>,
}

impl ModelStep {
    fn new(requires_proof: bool) -> Self {
        Self {
            status: StepStatus::NotStarted,
            requires_proof,
            completed_at: None,
        }
    }

    /// Apply an action the way the orchestrator does; invalid transitions
    /// leave the model untouched.
    fn step(&mut self, action: &StepAction) -> bool {
        let view = StepView {
            status: self.status,
            requires_proof: self.requires_proof,
        };
        match apply(&view, action) {
            Ok(change) => {
                self.status = change.status;
                match change.completed_at {
                    CompletedAtEffect::Set => self.completed_at = Some("now"),
                    CompletedAtEffect::Clear => self.completed_at = None,
                    CompletedAtEffect::Keep => {}
                }
                true
            }
            Err(_) => false,
        }
    }
}

fn arb_action() -> impl Strategy<Value = StepAction> {
    prop_oneof![
        Just(StepAction::Begin),
        Just(StepAction::Complete),
        Just(StepAction::AttachProof {
            url: "/uploads/preuve.pdf".to_string(),
            notes: None,
        }),
        Just(StepAction::Validate),
        Just(StepAction::Reopen),
        Just(StepAction::Block),
    ]
}

proptest! {
    #[test]
    fn completed_at_iff_completed(
        requires_proof in any::<bool>(),
        actions in prop::collection::vec(arb_action(), 0..40),
    ) {
        let mut step = ModelStep::new(requires_proof);
        for action in &actions {
            step.step(action);
            prop_assert_eq!(
                step.completed_at.is_some(),
                step.status == StepStatus::Completed,
                "completed_at must track COMPLETED (status: {:?})",
                step.status
            );
        }
    }

    #[test]
    fn proof_requiring_step_completes_only_via_validation(
        actions in prop::collection::vec(arb_action(), 0..40),
    ) {
        let mut step = ModelStep::new(true);
        let mut previous = step.status;
        for action in &actions {
            if step.step(action) && step.status == StepStatus::Completed {
                prop_assert_eq!(
                    previous,
                    StepStatus::PendingValidation,
                    "proof-requiring step entered COMPLETED from {:?}",
                    previous
                );
            }
            previous = step.status;
        }
    }

    #[test]
    fn rejected_transition_changes_nothing(
        requires_proof in any::<bool>(),
        actions in prop::collection::vec(arb_action(), 0..40),
    ) {
        let mut step = ModelStep::new(requires_proof);
        for action in &actions {
            let before = (step.status, step.completed_at);
            if !step.step(action) {
                prop_assert_eq!(before, (step.status, step.completed_at));
            }
        }
    }
}
