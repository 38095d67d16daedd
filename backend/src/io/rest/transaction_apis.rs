//! # REST API for Transactions
//!
//! Endpoints for recording and listing transactions. There are no update
//! or delete endpoints: the ledger is append-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use shared::CreateTransactionRequest;

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    /// Restrict the listing to one member
    pub member_id: Option<String>,
}

/// Record a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/transactions - request: {:?}", user_id, request);

    match state.transaction_service.create_transaction(&user_id, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// List a user's transactions, optionally filtered by member
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<TransactionListQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/users/{}/transactions - member_id: {:?}",
        user_id, query.member_id
    );

    match state
        .transaction_service
        .list_transactions(&user_id, query.member_id.as_deref())
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing transactions").into_response()
        }
    }
}
