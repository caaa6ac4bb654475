//! API module - HTTP routes split by concern
//!
//! Structure:
//! - forms: lookup forms and submissions (email verification, domain search)
//! - results: read / update / delete of stored results
//! - account: account information and health check

mod account;
mod forms;
mod results;

pub use account::*;
pub use forms::*;
pub use results::*;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::clients::{HunterClient, HunterError};
use crate::config::Config;
use crate::handlers::{AccountInformationHandler, DomainSearchHandler, EmailVerifierHandler};
use crate::store::ResultStore;

pub struct AppState {
    pub config: Config,
    pub store: ResultStore,
    pub email_verifier: EmailVerifierHandler,
    pub domain_search: DomainSearchHandler,
    pub account: AccountInformationHandler,
}

impl AppState {
    /// Wire one Hunter client into every handler and start with an empty store.
    pub fn new(config: Config) -> Result<Self, HunterError> {
        let client = HunterClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )?;

        Ok(Self {
            store: ResultStore::new(),
            email_verifier: EmailVerifierHandler::new(client.clone()),
            domain_search: DomainSearchHandler::new(client.clone()),
            account: AccountInformationHandler::new(client),
            config,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .route("/account", get(account_info))
        // Email verification
        .route("/email_verify", get(email_verify_form).post(email_verify))
        .route("/email_verify/results/:key", get(read_result))
        .route("/email_verify/update_results/:key", put(update_result))
        .route("/email_verify/delete_results/:key", delete(delete_result))
        // Domain search
        .route("/domain_search", get(domain_search_form).post(domain_search))
        .route("/domain_search/results/:key", get(read_result))
        .route("/domain_search/update_results/:key", put(update_result))
        .route("/domain_search/delete_results/:key", delete(delete_result))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    info!("CORS allowed origins: {:?}", config.cors_origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
