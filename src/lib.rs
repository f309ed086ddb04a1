pub mod account;
pub mod ai;
pub mod analysis;
pub mod auth;
pub mod case;
pub mod chat;
pub mod config;
pub mod email;
pub mod error;
pub mod procedure;
pub mod profile;
pub mod recommend;
pub mod rest;
pub mod storage;
pub mod upload;

use std::sync::Arc;

use ai::CompletionProvider;
use config::ServiceConfig;
use email::MailerSender;
use recommend::RecommendationEngine;
use storage::Storage;

/// Shared application state passed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServiceConfig>,
    pub storage: Arc<Storage>,
    /// AI completion capability — shared by the recommendation engine and
    /// the chat assistant.
    pub ai: Arc<dyn CompletionProvider>,
    /// Recommendation engine (AI-first with deterministic rule fallback).
    pub engine: Arc<RecommendationEngine>,
    /// Fire-and-forget transactional email sender.
    pub mailer: MailerSender,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(
        config: Arc<ServiceConfig>,
        storage: Arc<Storage>,
        ai: Arc<dyn CompletionProvider>,
        mailer: MailerSender,
    ) -> Self {
        let engine = Arc::new(RecommendationEngine::new(Arc::clone(&ai)));
        Self {
            config,
            storage,
            ai,
            engine,
            mailer,
            started_at: std::time::Instant::now(),
        }
    }
}
