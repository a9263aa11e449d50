//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    domain::Coordinates,
    infrastructure::dto::http::{LocationQuery, NearbyUserDto, RecentMessageDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn to_coordinates(query: LocationQuery) -> Result<Coordinates, StatusCode> {
    Coordinates::new(query.latitude, query.longitude).map_err(|e| {
        tracing::warn!("Rejected location query: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// Users currently within the radius of a point
pub async fn get_nearby_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<NearbyUserDto>>, StatusCode> {
    let origin = to_coordinates(query)?;
    let neighbors = state.query_nearby_usecase.around(&origin).await;

    // Domain Model から DTO への変換
    Ok(Json(neighbors.into_iter().map(Into::into).collect()))
}

/// Messages recently sent within the radius of a point
pub async fn get_recent_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<RecentMessageDto>>, StatusCode> {
    let origin = to_coordinates(query)?;
    match state.get_recent_messages_usecase.execute(&origin).await {
        Ok(messages) => Ok(Json(messages.into_iter().map(Into::into).collect())),
        Err(e) => {
            tracing::error!("Failed to query recent messages: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
