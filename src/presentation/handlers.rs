// HTTP request handlers
use crate::application::coordinator::{CoordinatorError, CoordinatorStatus};
use crate::domain::metric::Metric;
use crate::domain::sensor::SensorState;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

fn parse_metric(key: &str) -> Result<Metric, StatusCode> {
    key.parse::<Metric>().map_err(|e| {
        tracing::debug!("{}", e);
        StatusCode::NOT_FOUND
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Coordinator status (last poll outcome, enabled sensors)
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<CoordinatorStatus> {
    Json(state.sensor_service.coordinator().status().await)
}

/// All sensors with their current state and attributes
pub async fn list_sensors(State(state): State<Arc<AppState>>) -> Json<Vec<SensorState>> {
    Json(state.sensor_service.list_sensors().await)
}

pub async fn get_sensor(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SensorState>, StatusCode> {
    let metric = parse_metric(&key)?;
    Ok(Json(state.sensor_service.get_sensor(metric).await))
}

/// Enable or disable a sensor; applies from the next poll
pub async fn set_sensor_enabled(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnabledRequest>,
) -> Result<Json<SensorState>, StatusCode> {
    let metric = parse_metric(&key)?;
    tracing::info!("Setting sensor {} enabled={}", metric, request.enabled);
    state
        .sensor_service
        .coordinator()
        .set_enabled(metric, request.enabled)
        .await;
    Ok(Json(state.sensor_service.get_sensor(metric).await))
}

/// Poll now instead of waiting for the next interval
pub async fn refresh(State(state): State<Arc<AppState>>) -> (StatusCode, Json<CoordinatorStatus>) {
    let coordinator = state.sensor_service.coordinator();
    let status = match coordinator.refresh().await {
        Ok(()) => StatusCode::OK,
        Err(CoordinatorError::AuthFailed(_)) => StatusCode::UNAUTHORIZED,
        Err(CoordinatorError::UpdateFailed(_)) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(coordinator.status().await))
}
