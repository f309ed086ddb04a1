//! Feasibility-analysis integration tests.
//!
//! Exercise the full pipeline against a real temp-dir SQLite storage:
//!   profile rows → ProfileSnapshot → RecommendationEngine → persisted
//!   analysis + recommendations.
//!
//! The AI seam is stubbed per test; every AI failure mode must degrade to
//! the deterministic rule fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use visad::ai::{CompletionError, CompletionProvider};
use visad::analysis;
use visad::error::ApiError;
use visad::recommend::RecommendationEngine;
use visad::storage::Storage;

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Completion stub: `None` behaves like a disabled backend, `Some(text)`
/// returns the canned reply.
struct StubAi(Option<String>);

#[async_trait]
impl CompletionProvider for StubAi {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        match &self.0 {
            Some(text) => Ok(text.clone()),
            None => Err(CompletionError::Disabled),
        }
    }
}

async fn make_storage(dir: &TempDir) -> Storage {
    Storage::new(dir.path()).await.unwrap()
}

async fn make_user(storage: &Storage) -> String {
    let user = storage
        .create_user("ada@example.com", "hash", "salt", Some("Ada"), Some("Diallo"))
        .await
        .unwrap();
    user.id
}

/// Licence degree + certified French B2, no work experience.
async fn seed_full_profile(storage: &Storage, user_id: &str) {
    let profile = storage.get_or_create_profile(user_id).await.unwrap();
    storage
        .add_education(
            &profile.id,
            "Licence en informatique",
            Some("Informatique"),
            Some("Université de Dakar"),
            Some("Sénégal"),
            Some("2019-10-01"),
            Some("2022-07-31"),
        )
        .await
        .unwrap();
    storage
        .add_language(&profile.id, "FRENCH", "B2", true, Some("TCF"), None)
        .await
        .unwrap();
}

fn engine(ai: StubAi) -> RecommendationEngine {
    RecommendationEngine::new(Arc::new(ai))
}

// ─── Fallback path ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_analysis_with_disabled_ai_uses_fallback() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage).await;
    seed_full_profile(&storage, &user_id).await;

    let (row, recommendations) = analysis::run_analysis(&storage, &engine(StubAi(None)), &user_id)
        .await
        .unwrap();

    assert_eq!(row.status, "COMPLETED");
    assert!(row.completed_at.is_some());
    assert!(row.ai_analysis.as_deref().unwrap().contains("1 formation(s)"));

    // Read order is score-descending, independent of rule order.
    let scores: Vec<i64> = recommendations.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![85, 82, 80, 78, 75]);
    let countries: Vec<&str> = recommendations.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(
        countries,
        vec!["Canada", "Allemagne", "France", "Belgique", "États-Unis"]
    );
}

#[tokio::test]
async fn test_analysis_rejected_without_education() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage).await;
    // Profile exists but carries no education entry.
    storage.get_or_create_profile(&user_id).await.unwrap();

    let err = analysis::run_analysis(&storage, &engine(StubAi(None)), &user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // The rejected precondition created no analysis row.
    assert!(storage.list_analyses(&user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_ai_reply_falls_back() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage).await;
    seed_full_profile(&storage, &user_id).await;

    let stub = StubAi(Some("Je recommande chaleureusement le Canada !".into()));
    let (_, recommendations) = analysis::run_analysis(&storage, &engine(stub), &user_id)
        .await
        .unwrap();

    // Fallback produced the full rule set.
    assert_eq!(recommendations.len(), 5);
    assert!(recommendations.iter().any(|r| r.country == "États-Unis"));
}

// ─── AI path ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ai_reply_is_parsed_and_clamped() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage).await;
    seed_full_profile(&storage, &user_id).await;

    let reply = r#"{
        "summary": "Deux pistes solides",
        "recommendations": [
            {"country": "Canada", "visaType": "STUDENT", "score": 92,
             "reasoning": "Profil adapté", "requirements": ["Lettre d'acceptation"],
             "estimatedDuration": "3-6 mois", "estimatedCost": "150 CAD"},
            {"country": "Portugal", "visaType": "STUDENT", "score": 140,
             "reasoning": "Score hors plage", "requirements": [],
             "estimatedDuration": "2 mois", "estimatedCost": "90 EUR"}
        ]
    }"#;
    let (row, recommendations) =
        analysis::run_analysis(&storage, &engine(StubAi(Some(reply.into()))), &user_id)
            .await
            .unwrap();

    assert_eq!(row.ai_analysis.as_deref(), Some("Deux pistes solides"));
    assert_eq!(recommendations.len(), 2);
    // Sorted by score desc; out-of-range score clamped to 100 before insert.
    assert_eq!(recommendations[0].country, "Portugal");
    assert_eq!(recommendations[0].score, 100);
    assert_eq!(recommendations[1].score, 92);
}

#[tokio::test]
async fn test_analyses_listed_newest_first() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let user_id = make_user(&storage).await;
    seed_full_profile(&storage, &user_id).await;

    let engine = engine(StubAi(None));
    analysis::run_analysis(&storage, &engine, &user_id)
        .await
        .unwrap();
    analysis::run_analysis(&storage, &engine, &user_id)
        .await
        .unwrap();

    // Re-runs create new analyses; completed ones are never revisited.
    let listed = analysis::list_with_recommendations(&storage, &user_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    for entry in &listed {
        assert_eq!(entry["status"], "COMPLETED");
        assert_eq!(entry["recommendations"].as_array().unwrap().len(), 5);
    }
}
