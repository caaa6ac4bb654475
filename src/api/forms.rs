//! Lookup submission handlers
//!
//! - email_verify_form / email_verify
//! - domain_search_form / domain_search
//!
//! `GET` renders an HTML input form. `POST` accepts either a urlencoded form or
//! a JSON body, validates the field, calls the matching handler and caches the
//! result under the submitted value.

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::AppState;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct DomainForm {
    #[serde(default)]
    pub domain: String,
}

/// The two lookups a caller can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Email,
    Domain,
}

impl Lookup {
    pub fn field(&self) -> &'static str {
        match self {
            Lookup::Email => "email",
            Lookup::Domain => "domain",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Lookup::Email => "Email",
            Lookup::Domain => "Domain",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Lookup::Email => "Email verification",
            Lookup::Domain => "Domain search",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Lookup::Email => "/email_verify",
            Lookup::Domain => "/domain_search",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Form,
    Json,
}

/// A request body that may arrive either urlencoded or as JSON.
#[derive(Debug)]
pub struct Submission<T> {
    pub payload: T,
    pub kind: SubmissionKind,
}

#[async_trait]
impl<S, T> FromRequest<S> for Submission<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(payload) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidInput(e.body_text()))?;
            Ok(Self {
                payload,
                kind: SubmissionKind::Json,
            })
        } else {
            let Form(payload) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidInput(e.body_text()))?;
            Ok(Self {
                payload,
                kind: SubmissionKind::Form,
            })
        }
    }
}

/// Trim `raw` and check it is present and at most `max_length` characters long.
pub fn validate_field(raw: &str, max_length: usize) -> std::result::Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("This field is required.".to_string());
    }
    if value.chars().count() > max_length {
        return Err(format!(
            "Field cannot be longer than {} characters.",
            max_length
        ));
    }
    Ok(value.to_string())
}

pub async fn email_verify_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_form(Lookup::Email, "", None, state.config.max_input_length))
}

pub async fn domain_search_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_form(Lookup::Domain, "", None, state.config.max_input_length))
}

pub async fn email_verify(
    State(state): State<Arc<AppState>>,
    submission: Submission<EmailForm>,
) -> Result<Response> {
    let Submission { payload, kind } = submission;
    let email = match validate_field(&payload.email, state.config.max_input_length) {
        Ok(email) => email,
        Err(message) => return Ok(reject(&state, Lookup::Email, &payload.email, &message, kind)),
    };

    let result = state.email_verifier.execute(&email).await?;
    Ok(store_and_respond(&state, &email, result))
}

pub async fn domain_search(
    State(state): State<Arc<AppState>>,
    submission: Submission<DomainForm>,
) -> Result<Response> {
    let Submission { payload, kind } = submission;
    let domain = match validate_field(&payload.domain, state.config.max_input_length) {
        Ok(domain) => domain,
        Err(message) => {
            return Ok(reject(&state, Lookup::Domain, &payload.domain, &message, kind))
        }
    };

    let result = state.domain_search.execute(&domain).await?;
    Ok(store_and_respond(&state, &domain, result))
}

fn store_and_respond(state: &AppState, key: &str, result: Value) -> Response {
    state.store.create(key, result.clone());
    info!("Stored result for '{}'", key);
    (StatusCode::CREATED, Json(result)).into_response()
}

/// Form posts get the form back with the message; JSON callers get a JSON error.
fn reject(
    state: &AppState,
    lookup: Lookup,
    submitted: &str,
    message: &str,
    kind: SubmissionKind,
) -> Response {
    warn!("Rejected {} submission: {}", lookup.field(), message);
    match kind {
        SubmissionKind::Form => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render_form(
                lookup,
                submitted,
                Some(message),
                state.config.max_input_length,
            )),
        )
            .into_response(),
        SubmissionKind::Json => {
            AppError::InvalidInput(format!("{}: {}", lookup.field(), message)).into_response()
        }
    }
}

pub fn render_form(lookup: Lookup, value: &str, error: Option<&str>, max_length: usize) -> String {
    let error_html = error
        .map(|message| format!("\n      <p class=\"error\">{}</p>", escape_html(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
  </head>
  <body>
    <h1>{title}</h1>
    <form method="post" action="{action}">
      <label for="{field}">{label}</label>
      <input type="text" id="{field}" name="{field}" value="{value}" maxlength="{max_length}" required>{error_html}
      <input type="submit" value="Submit">
    </form>
  </body>
</html>
"#,
        title = lookup.title(),
        action = lookup.action(),
        field = lookup.field(),
        label = lookup.label(),
        value = escape_html(value),
        max_length = max_length,
        error_html = error_html,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
