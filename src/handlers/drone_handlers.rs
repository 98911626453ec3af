//! HTTP handlers for drone records.
//!
//! Request bodies are validated into a `NewDrone` here, before the service
//! is called; the service never sees an invalid drone.

use crate::{
    errors::AppError,
    models::{
        drone::{Drone, DroneId, NewDrone},
        dto::DroneDto,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn validated(payload: Result<Json<DroneDto>, JsonRejection>) -> Result<NewDrone, AppError> {
    let Json(dto) = payload?;
    dto.validate().map_err(AppError::invalid_fields)
}

/// POST `/drone/new`
pub async fn add_drone(
    State(state): State<AppState>,
    payload: Result<Json<DroneDto>, JsonRejection>,
) -> Result<Json<Drone>, AppError> {
    let drone = validated(payload)?;
    Ok(Json(state.drones.add_drone(drone).await?))
}

/// GET `/drone/all`
pub async fn get_all_drones(State(state): State<AppState>) -> Result<Json<Vec<Drone>>, AppError> {
    Ok(Json(state.drones.get_all_drones().await?))
}

/// GET `/drone/{id}`
pub async fn get_drone_by_id(
    State(state): State<AppState>,
    path: Result<Path<DroneId>, PathRejection>,
) -> Result<Json<Drone>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.drones.get_drone_by_id(id).await?))
}

/// GET `/drone/name/{name}`
pub async fn get_drone_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Drone>, AppError> {
    Ok(Json(state.drones.get_drone_by_name(&name).await?))
}

/// DELETE `/drone/delete/{id}`
pub async fn remove_drone(
    State(state): State<AppState>,
    path: Result<Path<DroneId>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let removed = state.drones.remove_drone(id).await?;
    Ok(Json(MessageResponse {
        message: format!("Id {} has been removed.", removed),
    }))
}

/// PUT `/drone/update/{id}`
pub async fn update_drone(
    State(state): State<AppState>,
    path: Result<Path<DroneId>, PathRejection>,
    payload: Result<Json<DroneDto>, JsonRejection>,
) -> Result<Json<Drone>, AppError> {
    let Path(id) = path?;
    let drone = validated(payload)?;
    Ok(Json(state.drones.update_drone(id, drone).await?))
}
