//! Flat, rule/AI-consumable projection of a user's stored profile.
//!
//! Rebuilt fresh on every recommendation or step-generation call, never
//! persisted. Building never fails: absent data degrades to empty lists and
//! `None` scalars.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::storage::{EducationRow, LanguageRow, UserRow, WorkRow};

/// CEFR language proficiency, ordered A1 < A2 < B1 < B2 < C1 < C2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationSummary {
    pub degree: String,
    pub field: Option<String>,
    pub institution: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkSummary {
    pub title: String,
    pub company: Option<String>,
    pub country: Option<String>,
    /// Duration in years, `(end - start) / 365 days`. None when the position
    /// is ongoing (no end date) or the dates don't parse.
    pub years: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageSkill {
    /// Language code, e.g. `FRENCH`.
    pub language: String,
    /// Raw CEFR level string as stored (`A1`..`C2`).
    pub level: String,
    pub has_certificate: bool,
    pub certificate_name: Option<String>,
}

/// Read-only projection of a user profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSnapshot {
    pub name: String,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    pub age: Option<i32>,
    pub education: Vec<EducationSummary>,
    pub work_experience: Vec<WorkSummary>,
    pub languages: Vec<LanguageSkill>,
}

impl ProfileSnapshot {
    /// Project storage rows into a snapshot. Row ordering is preserved
    /// (education and work arrive most-recent-first from the store).
    pub fn build(
        user: &UserRow,
        education: &[EducationRow],
        work: &[WorkRow],
        languages: &[LanguageRow],
    ) -> Self {
        let name = match (&user.first_name, &user.last_name) {
            (Some(f), Some(l)) => format!("{f} {l}"),
            (Some(f), None) => f.clone(),
            (None, Some(l)) => l.clone(),
            (None, None) => String::new(),
        };

        ProfileSnapshot {
            name,
            nationality: user.nationality.clone(),
            current_country: user.current_country.clone(),
            age: user.birth_date.as_deref().and_then(age_from_birth_date),
            education: education
                .iter()
                .map(|e| EducationSummary {
                    degree: e.degree.clone(),
                    field: e.field_of_study.clone(),
                    institution: e.institution.clone(),
                    country: e.country.clone(),
                })
                .collect(),
            work_experience: work
                .iter()
                .map(|w| WorkSummary {
                    title: w.job_title.clone(),
                    company: w.company.clone(),
                    country: w.country.clone(),
                    years: duration_years(w.start_date.as_deref(), w.end_date.as_deref()),
                })
                .collect(),
            languages: languages
                .iter()
                .map(|l| LanguageSkill {
                    language: l.language.clone(),
                    level: l.level.clone(),
                    has_certificate: l.has_certificate,
                    certificate_name: l.certificate_name.clone(),
                })
                .collect(),
        }
    }

    /// The degree of the most recent education entry, if any.
    pub fn highest_degree(&self) -> Option<&str> {
        self.education.first().map(|e| e.degree.as_str())
    }

    /// Whether the profile carries a certificate for the given language code.
    /// Exact match on the code + the has-certificate flag.
    pub fn has_certificate(&self, language: &str) -> bool {
        self.languages
            .iter()
            .any(|l| l.language == language && l.has_certificate)
    }

    /// Whether any entry for `language` is at `min` level or above.
    pub fn has_language_at(&self, language: &str, min: CefrLevel) -> bool {
        self.languages
            .iter()
            .filter(|l| l.language == language)
            .filter_map(|l| CefrLevel::parse(&l.level))
            .any(|level| level >= min)
    }
}

/// Age in whole years from an ISO `YYYY-MM-DD` birth date (year difference,
/// matching how the profile form captures it).
fn age_from_birth_date(birth_date: &str) -> Option<i32> {
    let date = parse_date(birth_date)?;
    Some(Utc::now().year() - date.year())
}

fn duration_years(start: Option<&str>, end: Option<&str>) -> Option<f64> {
    let start = parse_date(start?)?;
    let end = parse_date(end?)?;
    Some((end - start).num_days() as f64 / 365.0)
}

/// Accepts `YYYY-MM-DD`, optionally with a trailing time component.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let head = if s.len() >= 10 { &s[..10] } else { s };
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> UserRow {
        UserRow {
            id: "u1".into(),
            email: "a@b.c".into(),
            password_hash: String::new(),
            salt: String::new(),
            first_name: Some("Ada".into()),
            last_name: Some("Diallo".into()),
            nationality: Some("Sénégalaise".into()),
            current_country: Some("Sénégal".into()),
            birth_date: Some("2000-06-15".into()),
            email_verified: true,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_empty_profile_never_fails() {
        let mut user = make_user();
        user.first_name = None;
        user.last_name = None;
        user.birth_date = None;
        let snapshot = ProfileSnapshot::build(&user, &[], &[], &[]);
        assert_eq!(snapshot.name, "");
        assert!(snapshot.age.is_none());
        assert!(snapshot.education.is_empty());
        assert!(snapshot.languages.is_empty());
    }

    #[test]
    fn test_age_from_birth_date() {
        let snapshot = ProfileSnapshot::build(&make_user(), &[], &[], &[]);
        let expected = Utc::now().year() - 2000;
        assert_eq!(snapshot.age, Some(expected));
    }

    #[test]
    fn test_work_duration_years() {
        let work = vec![
            WorkRow {
                id: "w1".into(),
                profile_id: "p1".into(),
                job_title: "Analyste".into(),
                company: None,
                country: None,
                start_date: Some("2020-01-01".into()),
                end_date: Some("2022-01-01".into()),
            },
            WorkRow {
                id: "w2".into(),
                profile_id: "p1".into(),
                job_title: "Consultante".into(),
                company: None,
                country: None,
                start_date: Some("2022-02-01".into()),
                end_date: None,
            },
        ];
        let snapshot = ProfileSnapshot::build(&make_user(), &[], &work, &[]);
        let years = snapshot.work_experience[0].years.unwrap();
        assert!((years - 2.0).abs() < 0.01);
        // Ongoing position stays unset.
        assert!(snapshot.work_experience[1].years.is_none());
    }

    #[test]
    fn test_has_certificate_exact_match() {
        let languages = vec![
            LanguageRow {
                id: "l1".into(),
                profile_id: "p1".into(),
                language: "FRENCH".into(),
                level: "B2".into(),
                has_certificate: true,
                certificate_name: Some("TCF".into()),
                certificate_score: None,
            },
            LanguageRow {
                id: "l2".into(),
                profile_id: "p1".into(),
                language: "ENGLISH".into(),
                level: "C1".into(),
                has_certificate: false,
                certificate_name: None,
                certificate_score: None,
            },
        ];
        let snapshot = ProfileSnapshot::build(&make_user(), &[], &[], &languages);
        assert!(snapshot.has_certificate("FRENCH"));
        assert!(!snapshot.has_certificate("ENGLISH"));
        assert!(!snapshot.has_certificate("GERMAN"));
    }

    #[test]
    fn test_language_level_comparison() {
        let languages = vec![LanguageRow {
            id: "l1".into(),
            profile_id: "p1".into(),
            language: "FRENCH".into(),
            level: "B2".into(),
            has_certificate: false,
            certificate_name: None,
            certificate_score: None,
        }];
        let snapshot = ProfileSnapshot::build(&make_user(), &[], &[], &languages);
        assert!(snapshot.has_language_at("FRENCH", CefrLevel::B1));
        assert!(snapshot.has_language_at("FRENCH", CefrLevel::B2));
        assert!(!snapshot.has_language_at("FRENCH", CefrLevel::C1));
        assert!(!snapshot.has_language_at("GERMAN", CefrLevel::A1));
    }

    #[test]
    fn test_cefr_parse_unknown() {
        assert_eq!(CefrLevel::parse("b1"), Some(CefrLevel::B1));
        assert_eq!(CefrLevel::parse("fluent"), None);
    }
}
