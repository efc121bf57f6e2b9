//! HTTP application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request bodies
//! - `errors.rs`: JSON and redirect error answers
//! - `cookies.rs`, `pages.rs`: session/flash cookies and page bodies
//! - `forms.rs`, `passwords.rs`: multipart reading and off-runtime hashing

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use vendorclub_auth::{AdminCredentials, Hs256SessionCodec, SessionCodec};
use vendorclub_infra::{Config, Database, LocalUploadStore, UploadStore};

use crate::middleware;

pub mod cookies;
pub mod dto;
pub mod errors;
pub mod forms;
pub mod pages;
pub mod passwords;
pub mod routes;

/// Everything handlers need; cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub codec: Arc<dyn SessionCodec>,
    pub admin: Arc<AdminCredentials>,
    pub uploads: Arc<dyn UploadStore>,
    pub session_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config, db: Database) -> Self {
        Self {
            db,
            codec: Arc::new(Hs256SessionCodec::new(config.session_secret.as_bytes())),
            admin: Arc::new(AdminCredentials::new(
                config.admin_username.clone(),
                config.admin_password.clone(),
            )),
            uploads: Arc::new(LocalUploadStore::new(config.upload_dir.clone())),
            session_ttl: config.session_ttl(),
            bcrypt_cost: config.bcrypt_cost,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let routed = routes::router()
        .layer(Extension(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routed)
        .layer(ServiceBuilder::new().layer(body_limit))
}
