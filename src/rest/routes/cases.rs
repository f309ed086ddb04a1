// rest/routes/cases.rs — Case and step routes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::case::service::{self, case_progress};
use crate::case::state::StepAction;
use crate::{auth::Identity, error::ApiError, AppContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    pub country: String,
    pub visa_type: String,
    pub description: Option<String>,
}

pub async fn create_case(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Json(body): Json<CreateCaseRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.country.trim().is_empty() || body.visa_type.trim().is_empty() {
        return Err(ApiError::Validation(
            "Pays et type de visa sont requis".into(),
        ));
    }

    let (case, steps) = service::create_case(
        &ctx.storage,
        &identity.user_id,
        body.country.trim(),
        body.visa_type.trim(),
        body.description.as_deref(),
    )
    .await?;

    Ok(Json(json!({
        "message": "Dossier créé avec succès",
        "case": case_json(&case, &steps),
    })))
}

pub async fn list_cases(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let mut out = Vec::new();
    for case in ctx.storage.list_cases(&identity.user_id).await? {
        let steps = ctx.storage.list_case_steps(&case.id).await?;
        out.push(case_json(&case, &steps));
    }
    Ok(Json(json!({ "cases": out })))
}

pub async fn get_case(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let detail = service::get_case_detail(&ctx.storage, &identity.user_id, &id).await?;
    Ok(Json(json!({ "case": case_json(&detail.case, &detail.steps) })))
}

/// Step transition request. `action` selects the state-machine action;
/// `proofUrl`/`proofNotes` accompany `ATTACH_PROOF`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStepRequest {
    pub action: String,
    pub proof_url: Option<String>,
    pub proof_notes: Option<String>,
}

pub async fn update_step(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Path((case_id, step_id)): Path<(String, String)>,
    Json(body): Json<UpdateStepRequest>,
) -> Result<Json<Value>, ApiError> {
    let action = match body.action.as_str() {
        "BEGIN" => StepAction::Begin,
        "COMPLETE" => StepAction::Complete,
        "ATTACH_PROOF" => {
            let url = body.proof_url.clone().ok_or_else(|| {
                ApiError::Validation("proofUrl est requis pour joindre une preuve".into())
            })?;
            StepAction::AttachProof {
                url,
                notes: body.proof_notes.clone(),
            }
        }
        "VALIDATE" => StepAction::Validate,
        "REOPEN" => StepAction::Reopen,
        "BLOCK" => StepAction::Block,
        other => {
            return Err(ApiError::Validation(format!("Action inconnue : {other}")));
        }
    };

    let step =
        service::transition_step(&ctx.storage, &identity.user_id, &case_id, &step_id, action)
            .await?;

    Ok(Json(json!({
        "message": "Étape mise à jour avec succès",
        "step": step,
    })))
}

fn case_json(case: &crate::storage::CaseRow, steps: &[crate::storage::CaseStepRow]) -> Value {
    json!({
        "id": case.id,
        "country": case.country,
        "visaType": case.visa_type,
        "description": case.description,
        "status": case.status,
        "createdAt": case.created_at,
        "progress": case_progress(steps),
        "steps": steps,
    })
}
