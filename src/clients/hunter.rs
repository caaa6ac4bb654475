//! HTTP client wrapper for the Hunter.io REST API
//!
//! Every outbound request carries the configured credential as the `api_key`
//! query parameter. Responses are returned raw; callers decide how to parse them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiKey;

/// Query-string or form parameters of an outbound request.
pub type Params = BTreeMap<String, String>;

const API_KEY_PARAM: &str = "api_key";

#[derive(Error, Debug)]
pub enum HunterError {
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Hunter API returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Hunter API response is missing its data envelope")]
    UpstreamPayload { body: Value },

    #[error("Hunter API response is not valid JSON: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Hunter API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP verbs the client is able to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = HunterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            _ => Err(HunterError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// REST client for the Hunter API.
#[derive(Clone)]
pub struct HunterClient {
    base_url: String,
    api_key: ApiKey,
    http: Client,
}

impl HunterClient {
    /// Create a client with an explicit timeout on every outbound call.
    pub fn new(
        base_url: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, HunterError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(base_url, api_key, http))
    }

    pub fn with_http_client(base_url: impl Into<String>, api_key: ApiKey, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request to `endpoint` and return the raw response.
    ///
    /// Any non-2xx status is turned into [`HunterError::Http`]. There is no retry.
    pub async fn make_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        params: Option<Params>,
        body: Option<&Params>,
    ) -> Result<Response, HunterError> {
        let url = self.url(endpoint);
        let params = self.outbound_params(params);

        debug!("Calling Hunter API: {} {}", method, endpoint);

        let request = match method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
            HttpMethod::Put => self.http.put(&url),
            HttpMethod::Patch => self.http.patch(&url),
            HttpMethod::Delete => self.http.delete(&url),
        }
        .query(&params);

        let request = match body {
            Some(form) => request.form(form),
            None => request,
        };

        // The URL carries the credential, keep it out of errors and logs.
        let resp = request.send().await.map_err(|e| e.without_url())?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            debug!(
                "Hunter API error on {} {} (status {}): {}",
                method, endpoint, status, body
            );
            return Err(HunterError::Http { status, body });
        }

        Ok(resp)
    }

    /// Caller params merged with the credential. A caller-supplied `api_key` is replaced.
    pub(crate) fn outbound_params(&self, params: Option<Params>) -> Params {
        let mut params = params.unwrap_or_default();
        params.insert(API_KEY_PARAM.to_string(), self.api_key.expose().to_string());
        params
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}
