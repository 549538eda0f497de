//! Health check endpoint

use api_types::health::Health;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::server::ServerState;

pub async fn get(State(state): State<ServerState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
                message: "Kakeibo API is running".to_string(),
            }),
        ),
        Err(err) => {
            tracing::error!("health check failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Health {
                    status: "error".to_string(),
                    message: "database unreachable".to_string(),
                }),
            )
        }
    }
}
