//! Persistence for drone records.
//!
//! `DroneStore` is the capability the service layer depends on. The SQLite
//! implementation backs the running server; tests also use an in-memory one.

use crate::models::drone::{Drone, DroneId, NewDrone};
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
pub mod memory;
pub mod sqlite;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored drone {id} is invalid: {reason}")]
    CorruptRecord { id: DroneId, reason: String },
    #[error("drone {0} no longer exists")]
    Missing(DroneId),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DroneStore: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, drone: &NewDrone) -> StoreResult<Drone>;

    /// Overwrite an existing record.
    async fn save(&self, drone: &Drone) -> StoreResult<Drone>;

    async fn find_by_id(&self, id: DroneId) -> StoreResult<Option<Drone>>;

    /// All records, in whatever order the store returns them.
    async fn find_all(&self) -> StoreResult<Vec<Drone>>;

    async fn delete(&self, drone: &Drone) -> StoreResult<()>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> StoreResult<()>;
}
