use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The finite set of states a case step can be in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    NotStarted,
    InProgress,
    PendingValidation,
    Completed,
    Blocked,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::NotStarted => "NOT_STARTED",
            StepStatus::InProgress => "IN_PROGRESS",
            StepStatus::PendingValidation => "PENDING_VALIDATION",
            StepStatus::Completed => "COMPLETED",
            StepStatus::Blocked => "BLOCKED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOT_STARTED" => Some(StepStatus::NotStarted),
            "IN_PROGRESS" => Some(StepStatus::InProgress),
            "PENDING_VALIDATION" => Some(StepStatus::PendingValidation),
            "COMPLETED" => Some(StepStatus::Completed),
            "BLOCKED" => Some(StepStatus::Blocked),
            _ => None,
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User or administrative action driving a step transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Begin working on the step.
    Begin,
    /// Mark the step done. Only valid for steps that don't require proof.
    Complete,
    /// Attach uploaded evidence; the step goes to validation.
    AttachProof { url: String, notes: Option<String> },
    /// Staff validation of attached proof.
    Validate,
    /// Reopen a completed step.
    Reopen,
    /// Administrative block.
    Block,
}

impl StepAction {
    fn name(&self) -> &'static str {
        match self {
            StepAction::Begin => "Begin",
            StepAction::Complete => "Complete",
            StepAction::AttachProof { .. } => "AttachProof",
            StepAction::Validate => "Validate",
            StepAction::Reopen => "Reopen",
            StepAction::Block => "Block",
        }
    }
}

/// What the machine needs to know about the current step row.
#[derive(Debug, Clone, Copy)]
pub struct StepView {
    pub status: StepStatus,
    pub requires_proof: bool,
}

/// Effect of a transition on the `completed_at` column. The machine never
/// reads a clock — the orchestrator stamps `Set` at write time, which keeps
/// `apply` deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletedAtEffect {
    Keep,
    Set,
    Clear,
}

/// Proof recorded by an `AttachProof` transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofAttachment {
    pub url: String,
    pub notes: Option<String>,
}

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq)]
pub struct StepChange {
    pub status: StepStatus,
    pub proof: Option<ProofAttachment>,
    pub completed_at: CompletedAtEffect,
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("transition invalide : {action} depuis l'état {from}")]
    Invalid {
        from: StepStatus,
        action: &'static str,
    },
    #[error("cette étape exige une preuve : elle doit passer par la validation")]
    ProofRequired,
}

/// Pure transition function: apply one action to the current step view and
/// return the resulting change, or reject it. Deterministic — given the same
/// view and action it always produces the same result — so every guard can
/// be checked before anything is persisted.
///
/// Invariant maintained: `completed_at` is set on every transition into
/// COMPLETED and cleared on every transition out of it.
pub fn apply(step: &StepView, action: &StepAction) -> Result<StepChange, TransitionError> {
    let invalid = || TransitionError::Invalid {
        from: step.status,
        action: action.name(),
    };

    match action {
        // ── Begin ────────────────────────────────────────────────────────────
        StepAction::Begin => match step.status {
            StepStatus::NotStarted => Ok(StepChange {
                status: StepStatus::InProgress,
                proof: None,
                completed_at: CompletedAtEffect::Keep,
            }),
            _ => Err(invalid()),
        },

        // ── Complete ─────────────────────────────────────────────────────────
        // A proof-requiring step can never reach COMPLETED directly: it must
        // go through PENDING_VALIDATION. Hard guard, not a UI convention.
        StepAction::Complete => match step.status {
            StepStatus::InProgress if step.requires_proof => Err(TransitionError::ProofRequired),
            StepStatus::InProgress => Ok(StepChange {
                status: StepStatus::Completed,
                proof: None,
                completed_at: CompletedAtEffect::Set,
            }),
            _ => Err(invalid()),
        },

        // ── AttachProof ──────────────────────────────────────────────────────
        StepAction::AttachProof { url, notes } => match step.status {
            StepStatus::InProgress => Ok(StepChange {
                status: StepStatus::PendingValidation,
                proof: Some(ProofAttachment {
                    url: url.clone(),
                    notes: notes.clone(),
                }),
                completed_at: CompletedAtEffect::Keep,
            }),
            _ => Err(invalid()),
        },

        // ── Validate ─────────────────────────────────────────────────────────
        StepAction::Validate => match step.status {
            StepStatus::PendingValidation => Ok(StepChange {
                status: StepStatus::Completed,
                proof: None,
                completed_at: CompletedAtEffect::Set,
            }),
            _ => Err(invalid()),
        },

        // ── Reopen ───────────────────────────────────────────────────────────
        StepAction::Reopen => match step.status {
            StepStatus::Completed => Ok(StepChange {
                status: StepStatus::InProgress,
                proof: None,
                completed_at: CompletedAtEffect::Clear,
            }),
            _ => Err(invalid()),
        },

        // ── Block — reachable administratively from any state ─────────────────
        StepAction::Block => Ok(StepChange {
            status: StepStatus::Blocked,
            proof: None,
            completed_at: if step.status == StepStatus::Completed {
                CompletedAtEffect::Clear
            } else {
                CompletedAtEffect::Keep
            },
        }),
    }
}

/// Case progress: `round(100 * completed / total)`, recomputed on read.
pub fn progress_percentage(completed: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(status: StepStatus, requires_proof: bool) -> StepView {
        StepView {
            status,
            requires_proof,
        }
    }

    #[test]
    fn test_begin() {
        let change = apply(&step(StepStatus::NotStarted, false), &StepAction::Begin).unwrap();
        assert_eq!(change.status, StepStatus::InProgress);
        assert_eq!(change.completed_at, CompletedAtEffect::Keep);
    }

    #[test]
    fn test_complete_without_proof() {
        let change = apply(&step(StepStatus::InProgress, false), &StepAction::Complete).unwrap();
        assert_eq!(change.status, StepStatus::Completed);
        assert_eq!(change.completed_at, CompletedAtEffect::Set);
    }

    #[test]
    fn test_complete_with_proof_is_rejected() {
        let err = apply(&step(StepStatus::InProgress, true), &StepAction::Complete).unwrap_err();
        assert_eq!(err, TransitionError::ProofRequired);
    }

    #[test]
    fn test_attach_proof_goes_to_validation() {
        let action = StepAction::AttachProof {
            url: "/uploads/certificat.pdf".into(),
            notes: Some("TCF B2".into()),
        };
        let change = apply(&step(StepStatus::InProgress, true), &action).unwrap();
        assert_eq!(change.status, StepStatus::PendingValidation);
        // Proof upload never completes the step by itself.
        assert_eq!(change.completed_at, CompletedAtEffect::Keep);
        assert_eq!(change.proof.unwrap().url, "/uploads/certificat.pdf");
    }

    #[test]
    fn test_validate_completes() {
        let change = apply(
            &step(StepStatus::PendingValidation, true),
            &StepAction::Validate,
        )
        .unwrap();
        assert_eq!(change.status, StepStatus::Completed);
        assert_eq!(change.completed_at, CompletedAtEffect::Set);
    }

    #[test]
    fn test_reopen_clears_completed_at() {
        let change = apply(&step(StepStatus::Completed, false), &StepAction::Reopen).unwrap();
        assert_eq!(change.status, StepStatus::InProgress);
        assert_eq!(change.completed_at, CompletedAtEffect::Clear);
    }

    #[test]
    fn test_block_from_any_state() {
        for status in [
            StepStatus::NotStarted,
            StepStatus::InProgress,
            StepStatus::PendingValidation,
            StepStatus::Completed,
            StepStatus::Blocked,
        ] {
            let change = apply(&step(status, true), &StepAction::Block).unwrap();
            assert_eq!(change.status, StepStatus::Blocked);
        }
    }

    #[test]
    fn test_block_out_of_completed_clears_timestamp() {
        let change = apply(&step(StepStatus::Completed, false), &StepAction::Block).unwrap();
        assert_eq!(change.completed_at, CompletedAtEffect::Clear);
        let change = apply(&step(StepStatus::InProgress, false), &StepAction::Block).unwrap();
        assert_eq!(change.completed_at, CompletedAtEffect::Keep);
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot complete before beginning.
        assert!(apply(&step(StepStatus::NotStarted, false), &StepAction::Complete).is_err());
        // Cannot validate without pending proof.
        assert!(apply(&step(StepStatus::InProgress, true), &StepAction::Validate).is_err());
        // Cannot reopen a step that isn't completed.
        assert!(apply(&step(StepStatus::InProgress, false), &StepAction::Reopen).is_err());
        // Cannot begin twice.
        assert!(apply(&step(StepStatus::InProgress, false), &StepAction::Begin).is_err());
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress_percentage(3, 10), 30);
        assert_eq!(progress_percentage(0, 10), 0);
        assert_eq!(progress_percentage(10, 10), 100);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(0, 0), 0);
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            StepStatus::NotStarted,
            StepStatus::InProgress,
            StepStatus::PendingValidation,
            StepStatus::Completed,
            StepStatus::Blocked,
        ] {
            assert_eq!(StepStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(StepStatus::parse("DONE"), None);
    }
}
