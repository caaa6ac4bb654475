//! Stored result handlers
//!
//! Shared by the `/email_verify` and `/domain_search` route families; both
//! operate on the same store, keyed by the submitted email or domain.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::AppState;
use crate::error::{AppError, Result};

pub const NOT_FOUND_MESSAGE: &str = "Result not found";
pub const UPDATED_MESSAGE: &str = "Result updated successfully";
pub const DELETED_MESSAGE: &str = "Result deleted successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateResultRequest {
    pub new_value: Value,
}

pub async fn read_result(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Response {
    match state.store.read(&key) {
        Some(result) => Json(result).into_response(),
        None => not_found(),
    }
}

/// Replace a stored result. A `null` replacement is refused and leaves the entry as it was.
pub async fn update_result(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    payload: std::result::Result<Json<UpdateResultRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    if request.new_value.is_null() {
        return Err(AppError::InvalidInput(
            "new_value must not be null".to_string(),
        ));
    }

    if state.store.update(&key, request.new_value) {
        info!("Updated stored result for '{}'", key);
        Ok(Json(MessageResponse::new(UPDATED_MESSAGE)).into_response())
    } else {
        Ok(not_found())
    }
}

pub async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Response {
    if state.store.delete(&key) {
        info!("Deleted stored result for '{}'", key);
        Json(MessageResponse::new(DELETED_MESSAGE)).into_response()
    } else {
        not_found()
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new(NOT_FOUND_MESSAGE)),
    )
        .into_response()
}
