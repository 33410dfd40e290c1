//! MCN Creator CRM
//!
//! A record store for creators, platform accounts and deals with SQLite persistence,
//! plus the client-side data layer the dashboard runs on top of it.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod transfer;
pub mod validation;
pub mod workspace;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::{AuthGate, SessionStore};
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Repository, config: Config) -> Self {
        Self {
            repo: Arc::new(repo),
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let gate = AuthGate {
        psk: state.config.api_psk.clone(),
        sessions: state
            .config
            .access_password
            .as_ref()
            .map(|_| state.sessions.clone()),
    };

    // API routes
    let api_routes = Router::new()
        // Creators
        .route(
            "/creators",
            get(api::list_creators)
                .post(api::create_creator)
                .put(api::update_creator)
                .delete(api::delete_creator),
        )
        // Accounts
        .route(
            "/accounts",
            get(api::list_accounts)
                .post(api::create_account)
                .put(api::update_account)
                .delete(api::delete_account),
        )
        // Deals
        .route(
            "/deals",
            get(api::list_deals)
                .post(api::create_deal)
                .put(api::update_deal)
                .delete(api::delete_deal),
        )
        // Import / export
        .route("/import/preview", post(api::preview_import))
        .route("/import/creators", post(api::import_creators))
        .route("/export", post(api::export_records))
        .route("/auth/logout", post(api::logout))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(middleware::from_fn(move |req, next| {
            auth::auth_layer(gate.clone(), req, next)
        }))
        // Added after the auth layer so login stays reachable
        .route("/auth/login", post(api::login));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
