//! # REST API for the Dashboard
//!
//! Single endpoint returning the derived dashboard view.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Search query matched against member names and phone numbers
    pub q: Option<String>,
}

/// Get the dashboard for a user
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let search_query = query.q.unwrap_or_default();
    info!("GET /api/users/{}/dashboard - q: {:?}", user_id, search_query);

    match state.dashboard_service.dashboard(&user_id, &search_query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build dashboard: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building dashboard").into_response()
        }
    }
}
