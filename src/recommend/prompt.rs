//! Prompt construction and strict-JSON response parsing for the AI
//! recommendation path.

use serde_json::Value;

use super::{clamp_score, RecommendationDraft, RecommendationSet, MAX_RECOMMENDATIONS};
use crate::profile::snapshot::ProfileSnapshot;

pub const SYSTEM_PROMPT: &str = "Tu es un expert en immigration internationale. \
Analyse le profil de l'utilisateur et recommande les 5 meilleurs pays et types de visa \
adaptés à son profil. Pour chaque recommandation, fournis un score sur 100, une \
justification détaillée, les exigences principales, la durée estimée et le coût \
approximatif. Réponds UNIQUEMENT en format JSON de la forme \
{\"summary\": \"...\", \"recommendations\": [{\"country\": \"...\", \"visaType\": \"...\", \
\"score\": 0, \"reasoning\": \"...\", \"requirements\": [\"...\"], \
\"estimatedDuration\": \"...\", \"estimatedCost\": \"...\"}]}.";

/// Serialize the full profile into the user message.
pub fn user_prompt(profile: &ProfileSnapshot) -> Result<String, serde_json::Error> {
    Ok(format!(
        "Voici le profil de l'utilisateur : {}",
        serde_json::to_string(profile)?
    ))
}

/// Parse the model's reply. Any shape problem is an `Err` so the caller can
/// fall back — including an empty recommendation list, which would otherwise
/// leave the user with nothing.
pub fn parse_response(raw: &str) -> Result<RecommendationSet, String> {
    let body = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("response is not JSON: {e}"))?;

    let entries = value["recommendations"]
        .as_array()
        .ok_or("response has no recommendations array")?;
    if entries.is_empty() {
        return Err("response has an empty recommendations array".into());
    }

    let recommendations: Vec<RecommendationDraft> = entries
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(draft_from_value)
        .collect();

    let summary = value["summary"]
        .as_str()
        .unwrap_or("Analyse complétée avec succès")
        .to_string();

    Ok(RecommendationSet {
        summary,
        recommendations,
    })
}

fn draft_from_value(entry: &Value) -> RecommendationDraft {
    let score = entry["score"]
        .as_i64()
        .or_else(|| entry["score"].as_f64().map(|f| f.round() as i64))
        .unwrap_or(0);

    RecommendationDraft {
        country: field(entry, "country"),
        visa_type: entry["visaType"]
            .as_str()
            .or_else(|| entry["visa_type"].as_str())
            .unwrap_or("STUDENT")
            .to_string(),
        score: clamp_score(score),
        reasoning: field(entry, "reasoning"),
        requirements: entry["requirements"]
            .as_array()
            .map(|reqs| {
                reqs.iter()
                    .filter_map(|r| r.as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        estimated_duration: entry["estimatedDuration"]
            .as_str()
            .or_else(|| entry["estimated_duration"].as_str())
            .unwrap_or_default()
            .to_string(),
        estimated_cost: entry["estimatedCost"]
            .as_str()
            .or_else(|| entry["estimated_cost"].as_str())
            .unwrap_or_default()
            .to_string(),
    }
}

fn field(entry: &Value, key: &str) -> String {
    entry[key].as_str().unwrap_or_default().to_string()
}

/// Models routinely wrap JSON in a markdown code fence despite instructions.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "summary": "Trois destinations possibles",
        "recommendations": [
            {"country": "Canada", "visaType": "STUDENT", "score": 91,
             "reasoning": "Bon profil", "requirements": ["Lettre d'acceptation"],
             "estimatedDuration": "3-6 mois", "estimatedCost": "150 CAD"},
            {"country": "France", "visaType": "STUDENT", "score": 130,
             "reasoning": "", "requirements": [],
             "estimatedDuration": "", "estimatedCost": ""}
        ]
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let set = parse_response(VALID).unwrap();
        assert_eq!(set.summary, "Trois destinations possibles");
        assert_eq!(set.recommendations.len(), 2);
        assert_eq!(set.recommendations[0].country, "Canada");
        assert_eq!(set.recommendations[0].score, 91);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let set = parse_response(VALID).unwrap();
        assert_eq!(set.recommendations[1].score, 100);
    }

    #[test]
    fn test_parse_fenced_response() {
        let fenced = format!("```json\n{VALID}\n```");
        let set = parse_response(&fenced).unwrap();
        assert_eq!(set.recommendations.len(), 2);
    }

    #[test]
    fn test_malformed_body_is_err() {
        assert!(parse_response("Je recommande le Canada.").is_err());
        assert!(parse_response("{}").is_err());
        assert!(parse_response(r#"{"recommendations": []}"#).is_err());
    }

    #[test]
    fn test_truncates_to_five() {
        let entries: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"country": "Pays {i}", "score": {}}}"#, 90 - i))
            .collect();
        let raw = format!(r#"{{"recommendations": [{}]}}"#, entries.join(","));
        let set = parse_response(&raw).unwrap();
        assert_eq!(set.recommendations.len(), 5);
    }
}
