//! Deterministic rule fallback for the recommendation engine.
//!
//! A fixed ordered rule set evaluated against the profile. Each rule is
//! gated by a profile predicate and carries a fixed score. The list is
//! truncated from the tail of rule order at five entries — NOT re-sorted by
//! score first; score ordering is applied downstream at read time.

use super::{RecommendationDraft, RecommendationSet, MAX_RECOMMENDATIONS};
use crate::profile::snapshot::{CefrLevel, ProfileSnapshot};

/// Degrees counting as bachelor level or above, matched as substrings of the
/// most recent degree name.
const ADVANCED_DEGREES: [&str; 3] = ["Licence", "Master", "Doctorat"];

/// Evaluate the rule set. Exactly reproducible for a given profile; always
/// returns at least the two unconditional destinations.
pub fn generate(profile: &ProfileSnapshot) -> RecommendationSet {
    let mut recommendations: Vec<RecommendationDraft> = Vec::new();

    // Rule 1 — Canada: advanced-degree education destination.
    let advanced_degree = profile
        .highest_degree()
        .map(|degree| ADVANCED_DEGREES.iter().any(|d| degree.contains(d)))
        .unwrap_or(false);
    if advanced_degree {
        recommendations.push(RecommendationDraft {
            country: "Canada".into(),
            visa_type: "STUDENT".into(),
            score: 85,
            reasoning: "Excellent choix pour les études supérieures. Le Canada offre des \
                        programmes de qualité et des opportunités de résidence permanente \
                        après les études."
                .into(),
            requirements: vec![
                "Lettre d'acceptation d'une université canadienne".into(),
                "Preuve de fonds suffisants".into(),
                "Test de langue (IELTS ou TEF)".into(),
                "Examen médical".into(),
            ],
            estimated_duration: "3-6 mois".into(),
            estimated_cost: "150-200 CAD (frais de visa)".into(),
        });
    }

    // Rule 2 — France: francophone destination, B1 or better.
    if profile.has_language_at("FRENCH", CefrLevel::B1) {
        recommendations.push(RecommendationDraft {
            country: "France".into(),
            visa_type: "STUDENT".into(),
            score: 80,
            reasoning: "Votre niveau de français est adapté pour des études en France. \
                        Système éducatif reconnu internationalement."
                .into(),
            requirements: vec![
                "Inscription via Campus France".into(),
                "Attestation d'acceptation universitaire".into(),
                "Justificatif de ressources (615€/mois minimum)".into(),
                "Assurance santé".into(),
            ],
            estimated_duration: "2-4 mois".into(),
            estimated_cost: "99 EUR (frais Campus France + visa)".into(),
        });
    }

    // Rule 3 — États-Unis: always included.
    recommendations.push(RecommendationDraft {
        country: "États-Unis".into(),
        visa_type: "STUDENT".into(),
        score: 75,
        reasoning: "Les États-Unis offrent de nombreuses opportunités académiques, mais le \
                    processus est plus complexe et coûteux."
            .into(),
        requirements: vec![
            "Formulaire I-20 d'une université américaine".into(),
            "Preuve de fonds importants".into(),
            "Test TOEFL ou IELTS".into(),
            "Entretien à l'ambassade".into(),
        ],
        estimated_duration: "3-8 mois".into(),
        estimated_cost: "160-510 USD (frais SEVIS + visa)".into(),
    });

    // Rule 4 — Belgique: always included.
    recommendations.push(RecommendationDraft {
        country: "Belgique".into(),
        visa_type: "STUDENT".into(),
        score: 78,
        reasoning: "Processus relativement simple pour les étudiants étrangers. Frais de \
                    scolarité abordables."
            .into(),
        requirements: vec![
            "Préinscription universitaire".into(),
            "Équivalence de diplômes".into(),
            "Preuve de moyens de subsistance (700€/mois)".into(),
            "Assurance maladie".into(),
        ],
        estimated_duration: "2-5 mois".into(),
        estimated_cost: "200-350 EUR".into(),
    });

    // Rule 5 — Allemagne: at least one recorded language.
    if !profile.languages.is_empty() {
        recommendations.push(RecommendationDraft {
            country: "Allemagne".into(),
            visa_type: "STUDENT".into(),
            score: 82,
            reasoning: "Éducation de qualité avec de nombreux programmes gratuits ou à faible \
                        coût. Bonnes perspectives d'emploi après les études."
                .into(),
            requirements: vec![
                "Admission dans une université allemande".into(),
                "Compte bloqué (11,208 EUR minimum)".into(),
                "Assurance santé".into(),
                "Preuve de compétences linguistiques (allemand ou anglais)".into(),
            ],
            estimated_duration: "6-12 semaines".into(),
            estimated_cost: "75-100 EUR".into(),
        });
    }

    // Truncate from the tail of rule order.
    recommendations.truncate(MAX_RECOMMENDATIONS);

    let summary = format!(
        "Basé sur votre profil avec {} formation(s) et {} langue(s), nous vous recommandons {} destinations adaptées.",
        profile.education.len(),
        profile.languages.len(),
        recommendations.len()
    );

    RecommendationSet {
        summary,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::snapshot::{EducationSummary, LanguageSkill};

    fn empty_profile() -> ProfileSnapshot {
        ProfileSnapshot {
            name: String::new(),
            nationality: None,
            current_country: None,
            age: None,
            education: vec![],
            work_experience: vec![],
            languages: vec![],
        }
    }

    fn full_profile() -> ProfileSnapshot {
        let mut profile = empty_profile();
        profile.education.push(EducationSummary {
            degree: "Licence en informatique".into(),
            field: Some("Informatique".into()),
            institution: None,
            country: None,
        });
        profile.languages.push(LanguageSkill {
            language: "FRENCH".into(),
            level: "B2".into(),
            has_certificate: true,
            certificate_name: Some("TCF".into()),
        });
        profile
    }

    #[test]
    fn test_empty_profile_gets_unconditional_entries() {
        let set = generate(&empty_profile());
        let countries: Vec<&str> = set
            .recommendations
            .iter()
            .map(|r| r.country.as_str())
            .collect();
        assert_eq!(countries, vec!["États-Unis", "Belgique"]);
        assert_eq!(set.recommendations[0].score, 75);
        assert_eq!(set.recommendations[1].score, 78);
    }

    #[test]
    fn test_full_profile_gets_all_five() {
        let set = generate(&full_profile());
        let countries: Vec<&str> = set
            .recommendations
            .iter()
            .map(|r| r.country.as_str())
            .collect();
        // Rule evaluation order, not score order.
        assert_eq!(
            countries,
            vec!["Canada", "France", "États-Unis", "Belgique", "Allemagne"]
        );
        let scores: Vec<i64> = set.recommendations.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![85, 80, 75, 78, 82]);
    }

    #[test]
    fn test_france_gated_on_french_level() {
        let mut profile = empty_profile();
        profile.languages.push(LanguageSkill {
            language: "FRENCH".into(),
            level: "A2".into(),
            has_certificate: false,
            certificate_name: None,
        });
        let set = generate(&profile);
        assert!(!set.recommendations.iter().any(|r| r.country == "France"));
        // A recorded language still unlocks Allemagne.
        assert!(set.recommendations.iter().any(|r| r.country == "Allemagne"));
    }

    #[test]
    fn test_degree_gate_requires_known_degree() {
        let mut profile = empty_profile();
        profile.education.push(EducationSummary {
            degree: "Baccalauréat".into(),
            field: None,
            institution: None,
            country: None,
        });
        let set = generate(&profile);
        assert!(!set.recommendations.iter().any(|r| r.country == "Canada"));
    }

    #[test]
    fn test_deterministic() {
        let profile = full_profile();
        let a = generate(&profile);
        let b = generate(&profile);
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_summary_counts() {
        let set = generate(&full_profile());
        assert_eq!(
            set.summary,
            "Basé sur votre profil avec 1 formation(s) et 1 langue(s), nous vous recommandons 5 destinations adaptées."
        );
    }

    #[test]
    fn test_scores_in_range() {
        for profile in [empty_profile(), full_profile()] {
            for rec in generate(&profile).recommendations {
                assert!((0..=100).contains(&rec.score));
            }
        }
    }
}
