//! # Khata Backend
//!
//! A personal debt ledger: users track money given to and received back
//! from their contacts ("members"), with balances derived from the
//! append-only transaction history on every read.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (balance derivation, services)
//!     ↓
//! Storage Layer (CSV/YAML filesystem repositories)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{AuthService, DashboardService, MemberService, TransactionService};
use crate::storage::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService<CsvConnection>,
    pub member_service: MemberService<CsvConnection>,
    pub transaction_service: TransactionService<CsvConnection>,
    pub dashboard_service: DashboardService<CsvConnection>,
}

/// Initialize the backend with all required services
pub fn initialize_backend() -> Result<AppState> {
    info!("Setting up storage");
    let connection = Arc::new(CsvConnection::new_default()?);

    info!("Setting up domain services");
    let app_state = AppState {
        auth_service: AuthService::new(connection.clone()),
        member_service: MemberService::new(connection.clone()),
        transaction_service: TransactionService::new(connection.clone()),
        dashboard_service: DashboardService::new(connection),
    };

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow a local frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/signup", post(io::rest::auth_apis::signup))
        .route("/auth/login", post(io::rest::auth_apis::login))
        .route(
            "/users/:user_id/members",
            post(io::rest::member_apis::create_member).get(io::rest::member_apis::list_members),
        )
        .route(
            "/users/:user_id/members/:member_id",
            get(io::rest::member_apis::get_member_detail),
        )
        .route(
            "/users/:user_id/transactions",
            post(io::rest::transaction_apis::create_transaction)
                .get(io::rest::transaction_apis::list_transactions),
        )
        .route(
            "/users/:user_id/dashboard",
            get(io::rest::dashboard_apis::get_dashboard),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
