use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::clients::HunterError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Hunter(#[from] HunterError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            // reqwest and axum depend on different `http` versions.
            AppError::Hunter(HunterError::Http { status, .. }) if status.is_client_error() => {
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Hunter(HunterError::Http { .. })
            | AppError::Hunter(HunterError::UpstreamPayload { .. })
            | AppError::Hunter(HunterError::MalformedResponse { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Hunter(HunterError::Transport(e)) if e.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            AppError::Hunter(HunterError::Transport(_)) => StatusCode::BAD_GATEWAY,
            AppError::Hunter(HunterError::UnsupportedMethod(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AppError::Hunter(HunterError::Http { .. }) => "Hunter API error",
            AppError::Hunter(HunterError::UpstreamPayload { .. }) => "Unexpected Hunter API payload",
            AppError::Hunter(HunterError::MalformedResponse { .. }) => "Malformed Hunter API response",
            AppError::Hunter(HunterError::Transport(_)) => "Hunter API unreachable",
            AppError::Hunter(HunterError::UnsupportedMethod(_)) | AppError::Internal(_) => {
                "Internal error"
            }
            AppError::InvalidInput(_) => "Invalid input",
        }
    }

    /// Upstream error bodies are forwarded as JSON when they parse, as text otherwise.
    fn details(&self) -> Value {
        match self {
            AppError::Hunter(HunterError::Http { body, .. }) => {
                serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.clone()))
            }
            AppError::Hunter(HunterError::UpstreamPayload { body }) => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.label(), self);
        } else {
            tracing::warn!("{}: {}", self.label(), self);
        }

        let body = Json(json!({
            "error": self.label(),
            "details": self.details(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
