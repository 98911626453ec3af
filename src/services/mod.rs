pub mod drone_service;
pub mod upload_service;
