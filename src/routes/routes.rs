//! Defines routes for drone records and video uploads.
//!
//! ## Structure
//! - **Drone endpoints**
//!   - `POST   /drone/new` - register a drone
//!   - `GET    /drone/all` - list drones
//!   - `GET    /drone/{id}` - fetch by id
//!   - `GET    /drone/name/{name}` - fetch by exact name
//!   - `PUT    /drone/update/{id}` - overwrite name, model and capacity
//!   - `DELETE /drone/delete/{id}` - remove a drone
//!
//! - **Video endpoints**
//!   - `POST   /drone/uploadVideo` - multipart upload, field `file`
//!   - `GET    /drone/downloadVideo/{filename}` - stream a stored video

use crate::{
    handlers::{
        drone_handlers::{
            add_drone, get_all_drones, get_drone_by_id, get_drone_by_name, remove_drone,
            update_drone,
        },
        health_handlers::{healthz, readyz},
        video_handlers::{download_video, upload_video},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

/// Build and return the router for every endpoint.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Drone records
        .route("/drone/new", post(add_drone))
        .route("/drone/all", get(get_all_drones))
        .route("/drone/name/{name}", get(get_drone_by_name))
        .route("/drone/update/{id}", put(update_drone))
        .route("/drone/delete/{id}", delete(remove_drone))
        .route("/drone/{id}", get(get_drone_by_id))
        // Videos; uploads have no size cap
        .route(
            "/drone/uploadVideo",
            post(upload_video).layer(DefaultBodyLimit::disable()),
        )
        .route("/drone/downloadVideo/{filename}", get(download_video))
}
