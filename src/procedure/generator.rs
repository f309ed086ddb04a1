//! Personalized step generation.
//!
//! Expands the phase catalog for a `(country, visa_type)` pair against the
//! user's profile, then flattens phases and sub-steps into one contiguous,
//! numbered step list. Pure: identical arguments always yield identical
//! output, including numbering.

use serde::Serialize;

use super::catalog::{self, PhaseSpec};
use super::{ProofType, StepBlueprint};
use crate::profile::snapshot::ProfileSnapshot;

/// Suffix appended to a phase title when the profile already satisfies it.
pub const VALIDATED_SUFFIX: &str = " (validé)";

/// Prefix marking a flattened sub-step title. Presentational only — the row
/// is an ordinary step.
pub const SUB_STEP_PREFIX: &str = "— ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubStep {
    pub title: String,
    pub description: String,
    pub requires_proof: bool,
    pub proof_type: Option<ProofType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    pub title: String,
    pub description: String,
    pub requires_proof: bool,
    pub proof_type: Option<ProofType>,
    pub sub_steps: Vec<SubStep>,
}

/// Expand the catalog entry for a pair, personalized by the profile.
///
/// A language-certification phase whose target language already has a
/// certificate on file is marked validated: retitled, its proof requirement
/// cleared, its sub-steps emptied. Everything else is copied as-is. Unknown
/// pairs resolve to the generic plan — this function never fails.
pub fn generate(country: &str, visa_type: &str, profile: &ProfileSnapshot) -> Vec<Phase> {
    catalog::phases_for(country, visa_type)
        .iter()
        .map(|spec| personalize(spec, profile))
        .collect()
}

fn personalize(spec: &PhaseSpec, profile: &ProfileSnapshot) -> Phase {
    let satisfied = spec
        .language_requirement
        .map(|language| profile.has_certificate(language))
        .unwrap_or(false);

    if satisfied {
        return Phase {
            title: format!("{}{}", spec.title, VALIDATED_SUFFIX),
            description: spec.description.to_string(),
            requires_proof: false,
            proof_type: None,
            sub_steps: Vec::new(),
        };
    }

    Phase {
        title: spec.title.to_string(),
        description: spec.description.to_string(),
        requires_proof: spec.requires_proof,
        proof_type: spec.proof_type,
        sub_steps: spec
            .sub_steps
            .iter()
            .map(|s| SubStep {
                title: s.title.to_string(),
                description: s.description.to_string(),
                requires_proof: s.requires_proof,
                proof_type: s.proof_type,
            })
            .collect(),
    }
}

/// Flatten phases into insertable steps: each phase is immediately followed
/// by its sub-steps, numbering is contiguous from 1 across the whole case.
pub fn flatten(phases: &[Phase]) -> Vec<StepBlueprint> {
    let mut steps = Vec::new();
    let mut number: i64 = 1;

    for phase in phases {
        steps.push(StepBlueprint {
            step_number: number,
            title: phase.title.clone(),
            description: phase.description.clone(),
            requires_proof: phase.requires_proof,
            proof_type: phase.proof_type,
        });
        number += 1;

        for sub in &phase.sub_steps {
            steps.push(StepBlueprint {
                step_number: number,
                title: format!("{SUB_STEP_PREFIX}{}", sub.title),
                description: sub.description.clone(),
                requires_proof: sub.requires_proof,
                proof_type: sub.proof_type,
            });
            number += 1;
        }
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::snapshot::LanguageSkill;
    use std::collections::HashSet;

    fn profile_without_certificate() -> ProfileSnapshot {
        ProfileSnapshot {
            name: "Test".into(),
            nationality: None,
            current_country: None,
            age: None,
            education: vec![],
            work_experience: vec![],
            languages: vec![],
        }
    }

    fn profile_with_french_certificate() -> ProfileSnapshot {
        let mut profile = profile_without_certificate();
        profile.languages.push(LanguageSkill {
            language: "FRENCH".into(),
            level: "B2".into(),
            has_certificate: true,
            certificate_name: Some("TCF".into()),
        });
        profile
    }

    #[test]
    fn test_france_phase3_without_certificate() {
        let phases = generate("France", "STUDENT", &profile_without_certificate());
        let phase = &phases[2];
        assert_eq!(phase.title, "Phase 3 : Certification de français");
        assert!(phase.requires_proof);
        assert_eq!(phase.proof_type, Some(ProofType::Certificate));
        assert_eq!(phase.sub_steps.len(), 3);
    }

    #[test]
    fn test_france_phase3_with_certificate_is_validated() {
        let phases = generate("France", "STUDENT", &profile_with_french_certificate());
        let phase = &phases[2];
        assert_eq!(phase.title, "Phase 3 : Certification de français (validé)");
        assert!(!phase.requires_proof);
        assert_eq!(phase.proof_type, None);
        assert!(phase.sub_steps.is_empty());
    }

    #[test]
    fn test_certificate_without_flag_does_not_validate() {
        let mut profile = profile_without_certificate();
        profile.languages.push(LanguageSkill {
            language: "FRENCH".into(),
            level: "C1".into(),
            has_certificate: false,
            certificate_name: None,
        });
        let phases = generate("France", "STUDENT", &profile);
        assert!(!phases[2].title.ends_with(VALIDATED_SUFFIX));
        assert_eq!(phases[2].sub_steps.len(), 3);
    }

    #[test]
    fn test_french_certificate_does_not_validate_german_phase() {
        let phases = generate("Allemagne", "STUDENT", &profile_with_french_certificate());
        let language_phase = phases
            .iter()
            .find(|p| p.title.contains("allemand"))
            .unwrap();
        assert!(!language_phase.title.ends_with(VALIDATED_SUFFIX));
        assert_eq!(language_phase.sub_steps.len(), 3);
    }

    #[test]
    fn test_unmatched_pair_is_generic_five_phases() {
        let a = generate("Atlantis", "TOURIST", &profile_without_certificate());
        assert_eq!(a.len(), 5);
        let b = generate("Atlantis", "TOURIST", &profile_without_certificate());
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let profile = profile_with_french_certificate();
        let a = generate("France", "STUDENT", &profile);
        let b = generate("France", "STUDENT", &profile);
        assert_eq!(a, b);
        assert_eq!(flatten(&a), flatten(&b));
    }

    #[test]
    fn test_flatten_numbering_contiguous_no_duplicates() {
        let phases = generate("Canada", "STUDENT", &profile_without_certificate());
        let steps = flatten(&phases);
        let numbers: Vec<i64> = steps.iter().map(|s| s.step_number).collect();
        let expected: Vec<i64> = (1..=steps.len() as i64).collect();
        assert_eq!(numbers, expected);
        let unique: HashSet<i64> = numbers.iter().copied().collect();
        assert_eq!(unique.len(), steps.len());
    }

    #[test]
    fn test_flatten_orders_sub_steps_after_their_phase() {
        let phases = generate("France", "STUDENT", &profile_without_certificate());
        let steps = flatten(&phases);
        assert!(steps[0].title.starts_with("Phase 1"));
        assert!(steps[1].title.starts_with(SUB_STEP_PREFIX));
        // The phase row itself never carries the sub-step marker.
        for (phase_count, step) in steps.iter().enumerate() {
            if step.title.starts_with("Phase") {
                assert!(!step.title.starts_with(SUB_STEP_PREFIX), "at {phase_count}");
            }
        }
    }

    #[test]
    fn test_validated_phase_shrinks_flattened_plan() {
        let without = flatten(&generate("France", "STUDENT", &profile_without_certificate()));
        let with = flatten(&generate(
            "France",
            "STUDENT",
            &profile_with_french_certificate(),
        ));
        // The three language sub-steps disappear.
        assert_eq!(without.len(), with.len() + 3);
    }
}
