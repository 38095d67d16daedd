//! # REST API for Member Management
//!
//! Endpoints for creating and retrieving a user's members.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::AppState;
use shared::CreateMemberRequest;

/// Create a new member for a user
pub async fn create_member(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateMemberRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/members - request: {:?}", user_id, request);

    match state.member_service.create_member(&user_id, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create member: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// List all of a user's members
pub async fn list_members(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/members", user_id);

    match state.member_service.list_members(&user_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list members: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing members").into_response()
        }
    }
}

/// Get a member's detail view: derived balance plus transaction history
pub async fn get_member_detail(
    State(state): State<AppState>,
    Path((user_id, member_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/members/{}", user_id, member_id);

    match state.transaction_service.member_detail(&user_id, &member_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to load member detail: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
