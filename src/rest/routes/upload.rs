// rest/routes/upload.rs — Document upload routes (multipart).

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{auth::Identity, error::ApiError, upload, AppContext};

pub async fn upload(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut doc_type: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Corps multipart invalide : {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or("fichier").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Lecture du fichier : {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            "type" => {
                doc_type = field.text().await.ok();
            }
            "description" => {
                description = field.text().await.ok();
            }
            _ => {}
        }
    }

    let (name, bytes) = file.ok_or_else(|| ApiError::Validation("Aucun fichier fourni".into()))?;
    let stored = upload::store(
        &ctx.config.uploads_dir(),
        &name,
        &bytes,
        ctx.config.uploads.max_bytes,
    )
    .await?;

    let document = ctx
        .storage
        .insert_document(
            &identity.user_id,
            &stored.file_name,
            doc_type.as_deref(),
            description.as_deref(),
            &stored.url,
        )
        .await?;

    Ok(Json(json!({
        "message": "Fichier téléversé avec succès",
        "document": document,
    })))
}

pub async fn list_documents(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let documents = ctx.storage.list_documents(&identity.user_id).await?;
    Ok(Json(json!({ "documents": documents })))
}
