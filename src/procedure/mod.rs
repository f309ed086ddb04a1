//! Procedure generation: administrator templates, the built-in default step
//! catalog, and the profile-personalized phase generator.
//!
//! Selection order at case creation: an active administrator template wins;
//! otherwise the personalized generator expands its phase catalog for the
//! user's profile; the flat default catalog backs the rare path where no
//! snapshot can be built.

pub mod catalog;
pub mod defaults;
pub mod generator;
pub mod resolver;

use serde::{Deserialize, Serialize};

/// Kind of evidence a step asks the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofType {
    Screenshot,
    Document,
    Certificate,
}

impl ProofType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofType::Screenshot => "SCREENSHOT",
            ProofType::Document => "DOCUMENT",
            ProofType::Certificate => "CERTIFICATE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SCREENSHOT" => Some(ProofType::Screenshot),
            "DOCUMENT" => Some(ProofType::Document),
            "CERTIFICATE" => Some(ProofType::Certificate),
            _ => None,
        }
    }
}

/// One flat, ordered step ready for bulk insertion into a case.
///
/// `step_number` values are contiguous ascending from 1 in generation order
/// and are never renumbered afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepBlueprint {
    pub step_number: i64,
    pub title: String,
    pub description: String,
    pub requires_proof: bool,
    pub proof_type: Option<ProofType>,
}
