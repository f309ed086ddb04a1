//! Administrator template resolution.
//!
//! Exact `(country, visa_type)` equality against active templates. A hit
//! returns the template's ordered steps verbatim; a miss (no template, or a
//! template with no steps) is signalled as `None` so the orchestrator can
//! fall through to the personalized generator or the default catalog.

use anyhow::Result;

use super::{ProofType, StepBlueprint};
use crate::storage::Storage;

pub async fn resolve(
    storage: &Storage,
    country: &str,
    visa_type: &str,
) -> Result<Option<Vec<StepBlueprint>>> {
    let Some(template) = storage.find_active_template(country, visa_type).await? else {
        return Ok(None);
    };

    let steps = storage.list_template_steps(&template.id).await?;
    if steps.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        steps
            .into_iter()
            .map(|s| StepBlueprint {
                step_number: s.step_number,
                title: s.title,
                description: s.description.unwrap_or_default(),
                requires_proof: s.requires_proof,
                proof_type: s.proof_type.as_deref().and_then(ProofType::parse),
            })
            .collect(),
    ))
}
