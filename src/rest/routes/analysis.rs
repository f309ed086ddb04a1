// rest/routes/analysis.rs — Feasibility analysis routes.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{analysis, auth::Identity, error::ApiError, AppContext};

pub async fn create_analysis(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let (row, recommendations) =
        analysis::run_analysis(&ctx.storage, &ctx.engine, &identity.user_id).await?;
    Ok(Json(json!({
        "message": "Analyse créée avec succès",
        "analysis": analysis::analysis_json(&row, &recommendations),
    })))
}

pub async fn list_analyses(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let analyses = analysis::list_with_recommendations(&ctx.storage, &identity.user_id).await?;
    Ok(Json(json!({ "analyses": analyses })))
}
