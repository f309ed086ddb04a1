// rest/routes/auth.rs — Account REST routes.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{account, error::ApiError, AppContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<Value>), ApiError> {
    let user = account::register(
        &ctx.storage,
        &ctx.mailer,
        &body.email,
        &body.password,
        body.first_name.as_deref(),
        body.last_name.as_deref(),
    )
    .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "message": "Compte créé avec succès. Vérifiez votre boîte mail.",
            "user": { "id": user.id, "email": user.email },
        })),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (user, token) = account::login(&ctx.storage, &body.email, &body.password).await?;
    Ok(Json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
            "emailVerified": user.email_verified,
        },
    })))
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

pub async fn verify(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<Value>, ApiError> {
    account::verify_email(&ctx.storage, &ctx.mailer, &query.token).await?;
    Ok(Json(json!({ "message": "Email vérifié avec succès" })))
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    account::request_password_reset(&ctx.storage, &ctx.mailer, &body.email).await?;
    // Constant response whether or not the account exists.
    Ok(Json(json!({
        "message": "Si un compte existe avec cet email, un lien de réinitialisation a été envoyé."
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    account::reset_password(&ctx.storage, &body.token, &body.new_password).await?;
    Ok(Json(json!({ "message": "Mot de passe réinitialisé avec succès" })))
}
