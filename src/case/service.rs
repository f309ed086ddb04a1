//! Case orchestration: creation (template → personalized plan → default
//! catalog) and ownership-checked step transitions.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::state::{self, CompletedAtEffect, StepAction, StepStatus, StepView};
use crate::error::ApiError;
use crate::procedure::{defaults, generator, resolver, StepBlueprint};
use crate::profile;
use crate::storage::{CaseRow, CaseStepRow, CaseStepUpdate, Storage};

/// Create a case and populate its checklist.
///
/// Step source priority: an active administrator template wins; otherwise
/// the personalized generator expands the phase catalog against the user's
/// profile; the flat default catalog covers the defensive path where no
/// snapshot can be built. Steps are inserted strictly in blueprint order so
/// `step_number` assignment survives any batching.
pub async fn create_case(
    storage: &Storage,
    user_id: &str,
    country: &str,
    visa_type: &str,
    description: Option<&str>,
) -> Result<(CaseRow, Vec<CaseStepRow>), ApiError> {
    let case = storage
        .create_case(user_id, country, visa_type, description)
        .await?;

    let blueprints = build_steps(storage, user_id, country, visa_type).await?;

    for blueprint in &blueprints {
        storage
            .insert_case_step(
                &case.id,
                blueprint.step_number,
                &blueprint.title,
                Some(&blueprint.description),
                blueprint.requires_proof,
                blueprint.proof_type.map(|p| p.as_str()),
            )
            .await?;
    }

    let steps = storage.list_case_steps(&case.id).await?;
    info!(
        "created case {} for {country}/{visa_type} with {} steps",
        case.id,
        steps.len()
    );
    Ok((case, steps))
}

async fn build_steps(
    storage: &Storage,
    user_id: &str,
    country: &str,
    visa_type: &str,
) -> Result<Vec<StepBlueprint>, ApiError> {
    if let Some(steps) = resolver::resolve(storage, country, visa_type).await? {
        return Ok(steps);
    }

    match profile::load_snapshot(storage, user_id).await? {
        Some(snapshot) => {
            let phases = generator::generate(country, visa_type, &snapshot);
            Ok(generator::flatten(&phases))
        }
        None => {
            // Authenticated callers always have a user row; this only fires
            // if the row vanished mid-request.
            warn!("no snapshot for user {user_id}, using default catalog");
            Ok(defaults::to_blueprints(defaults::resolve_default(
                country, visa_type,
            )))
        }
    }
}

/// A case with its ordered steps and computed progress.
pub struct CaseDetail {
    pub case: CaseRow,
    pub steps: Vec<CaseStepRow>,
    pub progress: i64,
}

pub async fn get_case_detail(
    storage: &Storage,
    user_id: &str,
    case_id: &str,
) -> Result<CaseDetail, ApiError> {
    let case = storage
        .get_case(case_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dossier introuvable".into()))?;
    let steps = storage.list_case_steps(case_id).await?;
    let progress = case_progress(&steps);
    Ok(CaseDetail {
        case,
        steps,
        progress,
    })
}

/// Progress percentage over a step list, recomputed on read.
pub fn case_progress(steps: &[CaseStepRow]) -> i64 {
    let completed = steps
        .iter()
        .filter(|s| s.status == StepStatus::Completed.as_str())
        .count();
    state::progress_percentage(completed, steps.len())
}

/// Apply one state-machine action to a step.
///
/// Ownership is checked before anything else: a step on a case the caller
/// doesn't own surfaces as not-found, and no mutation happens on a rejected
/// transition.
pub async fn transition_step(
    storage: &Storage,
    user_id: &str,
    case_id: &str,
    step_id: &str,
    action: StepAction,
) -> Result<CaseStepRow, ApiError> {
    let case = storage
        .get_case(case_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dossier introuvable".into()))?;

    let row = storage
        .get_case_step(step_id, case_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Étape introuvable".into()))?;

    let status = StepStatus::parse(&row.status)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("unknown step status {}", row.status)))?;
    let view = StepView {
        status,
        requires_proof: row.requires_proof,
    };

    let change = state::apply(&view, &action)
        .map_err(|e| ApiError::StateViolation(e.to_string()))?;

    let mut update = CaseStepUpdate {
        status: Some(change.status.as_str().to_string()),
        ..Default::default()
    };
    if let Some(proof) = &change.proof {
        update.proof_url = Some(Some(proof.url.clone()));
        update.proof_notes = Some(proof.notes.clone());
    }
    match change.completed_at {
        CompletedAtEffect::Set => update.completed_at = Some(Some(Utc::now().to_rfc3339())),
        CompletedAtEffect::Clear => update.completed_at = Some(None),
        CompletedAtEffect::Keep => {}
    }

    storage.update_case_step(step_id, &update).await?;

    refresh_case_status(storage, &case).await?;

    storage
        .get_case_step(step_id, case_id)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("step vanished after update")))
}

/// Keep the case status column in line with its checklist: IN_PROGRESS once
/// any step has moved, COMPLETED when every step is done.
async fn refresh_case_status(storage: &Storage, case: &CaseRow) -> Result<(), ApiError> {
    let steps = storage.list_case_steps(&case.id).await?;
    if steps.is_empty() {
        return Ok(());
    }

    let all_completed = steps
        .iter()
        .all(|s| s.status == StepStatus::Completed.as_str());
    let any_touched = steps
        .iter()
        .any(|s| s.status != StepStatus::NotStarted.as_str());

    let next = if all_completed {
        "COMPLETED"
    } else if any_touched {
        "IN_PROGRESS"
    } else {
        "PENDING"
    };

    if next != case.status {
        storage.update_case_status(&case.id, next).await?;
    }
    Ok(())
}
