//! Request handlers, one per Hunter endpoint
//!
//! Each handler owns a [`HunterClient`] handed to it at construction, maps its
//! operation to a fixed endpoint and parameter set, and returns the parsed JSON.

use serde_json::Value;
use tracing::{debug, info};

use crate::clients::{HttpMethod, HunterClient, HunterError, Params};

/// How much of the upstream body a handler hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Require a top-level `data` key and return only its value.
    Data,
    /// Return the whole body.
    Raw,
}

/// One external operation: the endpoint path and how its body is unwrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub envelope: Envelope,
}

pub const EMAIL_VERIFIER: Endpoint = Endpoint {
    path: "email-verifier",
    envelope: Envelope::Data,
};

pub const DOMAIN_SEARCH: Endpoint = Endpoint {
    path: "domain-search",
    envelope: Envelope::Data,
};

pub const ACCOUNT: Endpoint = Endpoint {
    path: "account",
    envelope: Envelope::Raw,
};

/// Verifies the deliverability of an email address.
#[derive(Clone)]
pub struct EmailVerifierHandler {
    client: HunterClient,
}

impl EmailVerifierHandler {
    pub fn new(client: HunterClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self, email: &str) -> Result<Value, HunterError> {
        info!("Verifying email {}", email);
        fetch(&self.client, EMAIL_VERIFIER, single_param("email", email)).await
    }
}

/// Lists the addresses Hunter knows for a domain.
#[derive(Clone)]
pub struct DomainSearchHandler {
    client: HunterClient,
}

impl DomainSearchHandler {
    pub fn new(client: HunterClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self, domain: &str) -> Result<Value, HunterError> {
        info!("Searching domain {}", domain);
        fetch(&self.client, DOMAIN_SEARCH, single_param("domain", domain)).await
    }
}

/// Fetches information about the account owning the credential.
#[derive(Clone)]
pub struct AccountInformationHandler {
    client: HunterClient,
}

impl AccountInformationHandler {
    pub fn new(client: HunterClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self) -> Result<Value, HunterError> {
        info!("Fetching account information");
        // The account endpoint is addressed by the credential alone, which the client injects.
        fetch(&self.client, ACCOUNT, Params::new()).await
    }
}

fn single_param(name: &str, value: &str) -> Params {
    let mut params = Params::new();
    params.insert(name.to_string(), value.to_string());
    params
}

async fn fetch(
    client: &HunterClient,
    endpoint: Endpoint,
    params: Params,
) -> Result<Value, HunterError> {
    let resp = client
        .make_request(endpoint.path, HttpMethod::Get, Some(params), None)
        .await?;

    let text = resp.text().await.map_err(|e| e.without_url())?;
    let body = parse_body(&text)?;

    match endpoint.envelope {
        Envelope::Raw => Ok(body),
        Envelope::Data => unwrap_data(body).map_err(|body| {
            debug!("Hunter {} response has no data envelope: {}", endpoint.path, body);
            HunterError::UpstreamPayload { body }
        }),
    }
}

fn parse_body(text: &str) -> Result<Value, HunterError> {
    serde_json::from_str(text).map_err(|source| HunterError::MalformedResponse {
        source,
        body: text.to_string(),
    })
}

/// Take the `data` value out of `body`, or give the body back if there is none.
fn unwrap_data(mut body: Value) -> Result<Value, Value> {
    match body.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(body),
    }
}
