//! Chat assistant backed by the AI completion capability.
//!
//! Builds a per-user context block (profile, open cases with progress, the
//! latest analysis) so the assistant answers about the user's actual
//! procedures. AI unavailability degrades to a fixed apology — the request
//! itself never fails for it.

use std::fmt::Write as _;

use serde::Deserialize;
use tracing::warn;

use crate::ai::{CompletionError, CompletionProvider};
use crate::case::service::case_progress;
use crate::case::state::StepStatus;
use crate::error::ApiError;
use crate::storage::Storage;

const UNAVAILABLE_REPLY: &str = "Je suis désolé, le service de chat n'est pas disponible \
actuellement. Veuillez réessayer plus tard.";

const ERROR_REPLY: &str = "Je suis désolé, une erreur s'est produite. Veuillez réessayer dans \
quelques instants.";

/// One prior exchange, replayed into the prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Answer a user message. Always returns a reply string.
pub async fn answer(
    storage: &Storage,
    ai: &dyn CompletionProvider,
    user_id: &str,
    message: &str,
    history: &[ChatTurn],
) -> Result<String, ApiError> {
    let context = build_user_context(storage, user_id).await?;

    let system = format!(
        "Tu es un assistant expert en immigration internationale. Tu aides les utilisateurs \
         avec leurs projets d'immigration.\n\n\
         CONTEXTE DE L'UTILISATEUR:\n{context}\n\
         INSTRUCTIONS:\n\
         - Utilise les informations du contexte pour personnaliser tes réponses\n\
         - Si l'utilisateur a des dossiers en cours, aide-le spécifiquement sur ces procédures\n\
         - Sois précis, professionnel et encourageant\n\
         - Fournis des conseils pratiques et actionnables\n\
         - Si une information manque, demande poliment à l'utilisateur de compléter son profil\n\
         - Réponds en français de manière claire et concise"
    );

    let mut user_prompt = String::new();
    for turn in history {
        let speaker = if turn.role == "assistant" {
            "Assistant"
        } else {
            "Utilisateur"
        };
        let _ = writeln!(user_prompt, "{speaker} : {}", turn.content);
    }
    let _ = write!(user_prompt, "Utilisateur : {message}");

    match ai.complete(&system, &user_prompt).await {
        Ok(reply) => Ok(reply),
        Err(CompletionError::Disabled) => Ok(UNAVAILABLE_REPLY.to_string()),
        Err(e) => {
            warn!("chat completion failed: {e}");
            Ok(ERROR_REPLY.to_string())
        }
    }
}

/// Assemble the context block the system prompt embeds.
async fn build_user_context(storage: &Storage, user_id: &str) -> Result<String, ApiError> {
    let user = storage
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Utilisateur introuvable".into()))?;

    let mut context = String::new();
    let _ = writeln!(
        context,
        "Nom: {} {}",
        user.first_name.as_deref().unwrap_or("Non renseigné"),
        user.last_name.as_deref().unwrap_or("")
    );
    let _ = writeln!(context, "Email: {}", user.email);
    let _ = writeln!(
        context,
        "Nationalité: {}",
        user.nationality.as_deref().unwrap_or("Non renseignée")
    );
    let _ = writeln!(
        context,
        "Pays actuel: {}\n",
        user.current_country.as_deref().unwrap_or("Non renseigné")
    );

    if let Some(profile) = storage.get_profile_by_user(user_id).await? {
        let education = storage.list_education(&profile.id).await?;
        if !education.is_empty() {
            let _ = writeln!(context, "PARCOURS ACADÉMIQUE:");
            for edu in &education {
                let _ = writeln!(
                    context,
                    "- {} en {} à {} ({})",
                    edu.degree,
                    edu.field_of_study.as_deref().unwrap_or("-"),
                    edu.institution.as_deref().unwrap_or("-"),
                    edu.country.as_deref().unwrap_or("-")
                );
            }
            context.push('\n');
        }

        let work = storage.list_work(&profile.id).await?;
        if !work.is_empty() {
            let _ = writeln!(context, "EXPÉRIENCE PROFESSIONNELLE:");
            for w in &work {
                let _ = writeln!(
                    context,
                    "- {} chez {} ({})",
                    w.job_title,
                    w.company.as_deref().unwrap_or("-"),
                    w.country.as_deref().unwrap_or("-")
                );
            }
            context.push('\n');
        }

        let languages = storage.list_languages(&profile.id).await?;
        if !languages.is_empty() {
            let _ = writeln!(context, "COMPÉTENCES LINGUISTIQUES:");
            for lang in &languages {
                let certified = if lang.has_certificate {
                    format!(
                        " (Certifié: {})",
                        lang.certificate_name.as_deref().unwrap_or("oui")
                    )
                } else {
                    String::new()
                };
                let _ = writeln!(context, "- {}: {}{}", lang.language, lang.level, certified);
            }
            context.push('\n');
        }
    }

    let cases = storage.list_cases(user_id).await?;
    if !cases.is_empty() {
        let _ = writeln!(context, "DOSSIERS EN COURS:");
        for case in &cases {
            let steps = storage.list_case_steps(&case.id).await?;
            let completed = steps
                .iter()
                .filter(|s| s.status == StepStatus::Completed.as_str())
                .count();
            let _ = writeln!(
                context,
                "- {} ({}): {}/{} étapes complétées ({}%)",
                case.country,
                case.visa_type,
                completed,
                steps.len(),
                case_progress(&steps)
            );
            let current = steps.iter().find(|s| {
                s.status == StepStatus::InProgress.as_str()
                    || s.status == StepStatus::NotStarted.as_str()
            });
            if let Some(step) = current {
                let _ = writeln!(context, "  Étape actuelle: {}", step.title);
            }
        }
        context.push('\n');
    }

    let analyses = storage.list_analyses(user_id).await?;
    if let Some(latest) = analyses.first() {
        let recommendations = storage.list_recommendations(&latest.id).await?;
        if !recommendations.is_empty() {
            let _ = writeln!(context, "DERNIÈRE ANALYSE DE FAISABILITÉ:");
            let top: Vec<String> = recommendations
                .iter()
                .take(3)
                .map(|r| format!("{} ({}%)", r.country, r.score))
                .collect();
            let _ = writeln!(context, "Pays recommandés: {}\n", top.join(", "));
        }
    }

    Ok(context)
}
