// rest/routes/chat.rs — Chat assistant route.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::chat::{self, ChatTurn};
use crate::{auth::Identity, error::ApiError, AppContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

pub async fn chat(
    State(ctx): State<Arc<AppContext>>,
    identity: Identity,
    Json(body): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::Validation("Le message est vide".into()));
    }

    let reply = chat::answer(
        &ctx.storage,
        ctx.ai.as_ref(),
        &identity.user_id,
        &body.message,
        &body.conversation_history,
    )
    .await?;

    Ok(Json(json!({ "response": reply })))
}
