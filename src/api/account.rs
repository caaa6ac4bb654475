use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use super::AppState;
use crate::error::Result;

/// Account information for the configured credential. Not cached.
pub async fn account_info(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let account = state.account.execute().await?;
    Ok(Json(account))
}

pub async fn health_check() -> &'static str {
    "Hunter proxy is running!"
}
