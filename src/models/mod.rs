//! Core data models for the drone registry.
//!
//! `Drone` is the persisted entity; `DroneDto` is the unvalidated request
//! payload that must pass through `DroneDto::validate` before a `NewDrone`
//! can be handed to the service layer.

pub mod drone;
pub mod dto;
