// rest/mod.rs — Public REST API server.
//
// Axum HTTP server bridging the REST surface to the domain services.
//
// Endpoints:
//   POST /api/auth/register
//   POST /api/auth/login
//   GET  /api/auth/verify
//   POST /api/auth/forgot-password
//   POST /api/auth/reset-password
//   GET  /api/profile
//   PUT  /api/profile
//   POST /api/profile/education     DELETE /api/profile/education/{id}
//   POST /api/profile/work          DELETE /api/profile/work/{id}
//   POST /api/profile/languages     DELETE /api/profile/languages/{id}
//   POST /api/analysis              GET /api/analysis
//   POST /api/cases                 GET /api/cases
//   GET  /api/cases/{id}
//   PUT  /api/cases/{id}/steps/{step_id}
//   POST /api/upload                GET /api/documents
//   POST /api/ai
//   GET  /api/health
//   GET  /uploads/* (static)

pub mod routes;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!(
        "{}:{}",
        ctx.config.server.bind_address, ctx.config.server.port
    );
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    // Leave headroom above the configured file cap for multipart framing.
    let body_limit = (ctx.config.uploads.max_bytes as usize) + 64 * 1024;

    Router::new()
        // Health (no auth)
        .route("/api/health", get(routes::health::health))
        // Accounts
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/verify", get(routes::auth::verify))
        .route(
            "/api/auth/forgot-password",
            post(routes::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(routes::auth::reset_password),
        )
        // Profile
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route(
            "/api/profile/education",
            post(routes::profile::add_education),
        )
        .route(
            "/api/profile/education/{id}",
            axum::routing::delete(routes::profile::delete_education),
        )
        .route("/api/profile/work", post(routes::profile::add_work))
        .route(
            "/api/profile/work/{id}",
            axum::routing::delete(routes::profile::delete_work),
        )
        .route(
            "/api/profile/languages",
            post(routes::profile::add_language),
        )
        .route(
            "/api/profile/languages/{id}",
            axum::routing::delete(routes::profile::delete_language),
        )
        // Feasibility analyses
        .route(
            "/api/analysis",
            get(routes::analysis::list_analyses).post(routes::analysis::create_analysis),
        )
        // Cases and steps
        .route(
            "/api/cases",
            get(routes::cases::list_cases).post(routes::cases::create_case),
        )
        .route("/api/cases/{id}", get(routes::cases::get_case))
        .route(
            "/api/cases/{id}/steps/{step_id}",
            put(routes::cases::update_step),
        )
        // Documents
        .route("/api/upload", post(routes::upload::upload))
        .route("/api/documents", get(routes::upload::list_documents))
        // Chat assistant
        .route("/api/ai", post(routes::chat::chat))
        // Uploaded files
        .nest_service("/uploads", ServeDir::new(ctx.config.uploads_dir()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
