// rest/routes/profile.rs — Profile CRUD routes.
//
// All rows are scoped to the caller's profile; deletes on foreign rows
// surface as not-found.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{auth::Identity, error::ApiError, AppContext};

pub async fn get_profile(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let user = ctx
        .storage
        .get_user(&identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Utilisateur introuvable".into()))?;

    let (profile, education, work, languages) =
        match ctx.storage.get_profile_by_user(&identity.user_id).await? {
            Some(profile) => {
                let education = ctx.storage.list_education(&profile.id).await?;
                let work = ctx.storage.list_work(&profile.id).await?;
                let languages = ctx.storage.list_languages(&profile.id).await?;
                (Some(profile), education, work, languages)
            }
            None => (None, vec![], vec![], vec![]),
        };

    Ok(Json(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
            "nationality": user.nationality,
            "currentCountry": user.current_country,
            "birthDate": user.birth_date,
            "emailVerified": user.email_verified,
        },
        "profile": profile.map(|p| json!({
            "id": p.id,
            "phone": p.phone,
            "address": p.address,
            "bio": p.bio,
        })),
        "education": education,
        "workExperience": work,
        "languages": languages,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

pub async fn update_profile(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    ctx.storage
        .update_user_identity(
            &identity.user_id,
            body.first_name.as_deref(),
            body.last_name.as_deref(),
            body.nationality.as_deref(),
            body.current_country.as_deref(),
            body.birth_date.as_deref(),
        )
        .await?;

    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    ctx.storage
        .update_profile(
            &profile.id,
            body.phone.as_deref(),
            body.address.as_deref(),
            body.bio.as_deref(),
        )
        .await?;

    Ok(Json(json!({ "message": "Profil mis à jour avec succès" })))
}

// ─── Education ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRequest {
    pub degree: String,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn add_education(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Json(body): Json<EducationRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.degree.trim().is_empty() {
        return Err(ApiError::Validation("Le diplôme est requis".into()));
    }
    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    let row = ctx
        .storage
        .add_education(
            &profile.id,
            body.degree.trim(),
            body.field_of_study.as_deref(),
            body.institution.as_deref(),
            body.country.as_deref(),
            body.start_date.as_deref(),
            body.end_date.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "education": row })))
}

pub async fn delete_education(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    if !ctx.storage.delete_education(&id, &profile.id).await? {
        return Err(ApiError::NotFound("Formation introuvable".into()));
    }
    Ok(Json(json!({ "message": "Formation supprimée" })))
}

// ─── Work experience ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub job_title: String,
    pub company: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn add_work(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Json(body): Json<WorkRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.job_title.trim().is_empty() {
        return Err(ApiError::Validation("L'intitulé du poste est requis".into()));
    }
    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    let row = ctx
        .storage
        .add_work(
            &profile.id,
            body.job_title.trim(),
            body.company.as_deref(),
            body.country.as_deref(),
            body.start_date.as_deref(),
            body.end_date.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "workExperience": row })))
}

pub async fn delete_work(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    if !ctx.storage.delete_work(&id, &profile.id).await? {
        return Err(ApiError::NotFound("Expérience introuvable".into()));
    }
    Ok(Json(json!({ "message": "Expérience supprimée" })))
}

// ─── Languages ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageRequest {
    pub language: String,
    pub level: String,
    #[serde(default)]
    pub has_certificate: bool,
    pub certificate_name: Option<String>,
    pub certificate_score: Option<String>,
}

pub async fn add_language(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Json(body): Json<LanguageRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.language.trim().is_empty() || body.level.trim().is_empty() {
        return Err(ApiError::Validation("Langue et niveau sont requis".into()));
    }
    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    let row = ctx
        .storage
        .add_language(
            &profile.id,
            body.language.trim(),
            body.level.trim(),
            body.has_certificate,
            body.certificate_name.as_deref(),
            body.certificate_score.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "language": row })))
}

pub async fn delete_language(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile = ctx.storage.get_or_create_profile(&identity.user_id).await?;
    if !ctx.storage.delete_language(&id, &profile.id).await? {
        return Err(ApiError::NotFound("Langue introuvable".into()));
    }
    Ok(Json(json!({ "message": "Langue supprimée" })))
}
