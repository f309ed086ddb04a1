//! Feasibility-analysis orchestration.
//!
//! Request boundary for the recommendation engine: precondition check,
//! IN_PROGRESS record, engine invocation, recommendation persistence, then
//! one terminal COMPLETED write. The analysis row never sits in a state the
//! flow can't recover from — it stays IN_PROGRESS until the terminal write
//! lands.

use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::profile;
use crate::recommend::{clamp_score, RecommendationEngine};
use crate::storage::{AnalysisRow, RecommendationRow, Storage};

/// Run a feasibility analysis for a user and persist the result.
///
/// Precondition: the profile carries at least one education entry. The
/// engine itself never fails; any AI-path problem degrades to the rule
/// fallback inside it.
pub async fn run_analysis(
    storage: &Storage,
    engine: &RecommendationEngine,
    user_id: &str,
) -> Result<(AnalysisRow, Vec<RecommendationRow>), ApiError> {
    let snapshot = profile::load_snapshot(storage, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Utilisateur introuvable".into()))?;

    if snapshot.education.is_empty() {
        return Err(ApiError::Validation(
            "Veuillez compléter votre profil avant de demander une analyse".into(),
        ));
    }

    let analysis = storage.create_analysis(user_id).await?;

    let set = engine.recommend(&snapshot).await;
    for draft in &set.recommendations {
        let requirements = serde_json::to_string(&draft.requirements)
            .map_err(|e| ApiError::Internal(e.into()))?;
        storage
            .insert_recommendation(
                &analysis.id,
                &draft.country,
                &draft.visa_type,
                clamp_score(draft.score),
                Some(&draft.reasoning),
                &requirements,
                Some(&draft.estimated_duration),
                Some(&draft.estimated_cost),
            )
            .await?;
    }

    storage.complete_analysis(&analysis.id, &set.summary).await?;
    info!(
        "analysis {} completed with {} recommendations",
        analysis.id,
        set.recommendations.len()
    );

    let analysis = storage
        .get_analysis(&analysis.id)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("analysis vanished after update")))?;
    let recommendations = storage.list_recommendations(&analysis.id).await?;
    Ok((analysis, recommendations))
}

/// All analyses for a user, newest first, each with its recommendations
/// sorted by score descending.
pub async fn list_with_recommendations(
    storage: &Storage,
    user_id: &str,
) -> Result<Vec<Value>, ApiError> {
    let mut out = Vec::new();
    for analysis in storage.list_analyses(user_id).await? {
        let recommendations = storage.list_recommendations(&analysis.id).await?;
        out.push(analysis_json(&analysis, &recommendations));
    }
    Ok(out)
}

pub fn analysis_json(analysis: &AnalysisRow, recommendations: &[RecommendationRow]) -> Value {
    let recs: Vec<Value> = recommendations
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "country": r.country,
                "visaType": r.visa_type,
                "score": r.score,
                "reasoning": r.reasoning,
                "requirements": serde_json::from_str::<Value>(&r.requirements)
                    .unwrap_or_else(|_| json!([])),
                "estimatedDuration": r.estimated_duration,
                "estimatedCost": r.estimated_cost,
            })
        })
        .collect();
    json!({
        "id": analysis.id,
        "status": analysis.status,
        "aiAnalysis": analysis.ai_analysis,
        "createdAt": analysis.created_at,
        "completedAt": analysis.completed_at,
        "recommendations": recs,
    })
}
