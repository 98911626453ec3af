use crate::services::{drone_service::DroneService, upload_service::UploadService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub drones: DroneService,
    pub uploads: UploadService,
}
