//! Web-facing proxy for the Hunter.io email verification and domain search API.
//!
//! Submissions are forwarded to Hunter through [`clients::HunterClient`], the
//! parsed results are cached in a [`store::ResultStore`], and callers can read,
//! replace or delete the cached results afterwards.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

pub use api::{router, AppState};
pub use config::Config;
