//! Recommendation engine: turns a [`ProfileSnapshot`] into a ranked list of
//! country/visa recommendations.
//!
//! Two interchangeable strategies: the AI completion backend with a
//! strict-JSON prompt, and a deterministic rule fallback. Every AI-path
//! failure — disabled backend, transport error, malformed body — is absorbed
//! by falling back, so `recommend` never fails.

pub mod fallback;
pub mod prompt;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::ai::CompletionProvider;
use crate::profile::snapshot::ProfileSnapshot;

/// One candidate recommendation, not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationDraft {
    pub country: String,
    pub visa_type: String,
    /// Integer score in [0, 100]; clamped before the draft is built.
    pub score: i64,
    pub reasoning: String,
    pub requirements: Vec<String>,
    pub estimated_duration: String,
    pub estimated_cost: String,
}

/// Engine output: a summary line plus 0–5 drafts in strategy order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub summary: String,
    pub recommendations: Vec<RecommendationDraft>,
}

/// Maximum number of recommendations either strategy may emit.
pub const MAX_RECOMMENDATIONS: usize = 5;

pub fn clamp_score(raw: i64) -> i64 {
    raw.clamp(0, 100)
}

pub struct RecommendationEngine {
    ai: Arc<dyn CompletionProvider>,
}

impl RecommendationEngine {
    pub fn new(ai: Arc<dyn CompletionProvider>) -> Self {
        Self { ai }
    }

    /// Produce recommendations for a profile. Infallible: the rule fallback
    /// covers every AI-path failure and always yields at least the
    /// unconditional destinations.
    pub async fn recommend(&self, profile: &ProfileSnapshot) -> RecommendationSet {
        match self.recommend_via_ai(profile).await {
            Ok(set) => set,
            Err(reason) => {
                warn!("AI recommendation path unavailable ({reason}), using rule fallback");
                fallback::generate(profile)
            }
        }
    }

    async fn recommend_via_ai(&self, profile: &ProfileSnapshot) -> Result<RecommendationSet, String> {
        let user_prompt = prompt::user_prompt(profile).map_err(|e| e.to_string())?;
        let raw = self
            .ai
            .complete(prompt::SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| e.to_string())?;
        prompt::parse_response(&raw)
    }
}
