use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chat_client::{candidate_models, ChatCompletion, ChatError, Message};
use devshelf_common::DevShelfError;
use serde_json::Value;
use tracing::{info, warn};

use super::{devshelf_error_response, error_response};
use crate::AppState;

/// Validated `/api/chat` body.
#[derive(Debug)]
pub struct ChatBody {
    pub messages: Vec<Message>,
    pub model: Option<String>,
}

/// Checked by hand so every malformed body gets the same `{ error }` shape.
pub fn parse_body(body: Value) -> Result<ChatBody, DevShelfError> {
    let messages = match body.get("messages") {
        Some(Value::Array(items)) if items.is_empty() => {
            return Err(DevShelfError::Validation(
                "messages must not be empty".to_string(),
            ))
        }
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            return Err(DevShelfError::Validation(
                "messages must be an array".to_string(),
            ))
        }
        None => return Err(DevShelfError::Validation("messages is required".to_string())),
    };

    let messages: Vec<Message> = serde_json::from_value(Value::Array(messages)).map_err(|e| {
        DevShelfError::Validation(format!("each message needs a role and content: {e}"))
    })?;

    let model = body
        .get("model")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    Ok(ChatBody { messages, model })
}

/// Upstream chat failures keep their status; transport trouble is a 502.
pub fn chat_error_status(err: &ChatError) -> StatusCode {
    match err {
        ChatError::Api { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ChatError::NoModels => StatusCode::INTERNAL_SERVER_ERROR,
        ChatError::Network(_) | ChatError::Parse(_) | ChatError::Empty(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let ChatBody { messages, model } = match parse_body(body) {
        Ok(parsed) => parsed,
        Err(e) => return devshelf_error_response(e),
    };

    let Some(client) = &state.chat else {
        if state.chat_mock_fallback {
            info!("No chat credential, sending canned reply");
            return Json(ChatCompletion::mock(&messages)).into_response();
        }
        return devshelf_error_response(DevShelfError::Config(
            "CHAT_API_KEY is not set".to_string(),
        ));
    };

    let models = candidate_models(model.as_deref(), &state.chat_models);
    match client.complete_with_fallback(&models, &messages).await {
        Ok(completion) => {
            info!(model = %completion.model, "Chat reply");
            Json(completion).into_response()
        }
        Err(e) if state.chat_mock_fallback => {
            warn!(error = %e, "Chat failed, sending canned reply");
            Json(ChatCompletion::mock(&messages)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Chat failed");
            let status = chat_error_status(&e);
            let message = match e {
                ChatError::Api { message, .. } if !message.is_empty() => message,
                other => other.to_string(),
            };
            error_response(status, message)
        }
    }
}
