pub mod drone_handlers;
pub mod health_handlers;
pub mod video_handlers;
