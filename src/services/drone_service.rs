//! DroneService: create/read/update/delete for drone records.
//!
//! Input has already been validated into a `NewDrone` by the time it reaches
//! this layer; the service only orchestrates calls against a `DroneStore`.

use crate::{
    models::drone::{Drone, DroneId, NewDrone},
    repository::{DroneStore, StoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DroneError {
    #[error("drone {0} not found")]
    NotFound(DroneId),
    #[error("drone named `{0}` not found")]
    NameNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DroneResult<T> = Result<T, DroneError>;

#[derive(Clone)]
pub struct DroneService {
    store: Arc<dyn DroneStore>,
}

impl DroneService {
    pub fn new(store: Arc<dyn DroneStore>) -> Self {
        Self { store }
    }

    /// Persist a new drone and return it with its assigned id.
    pub async fn add_drone(&self, drone: NewDrone) -> DroneResult<Drone> {
        let created = self.store.insert(&drone).await?;
        info!("registered drone {} ({})", created.id(), created.name);
        Ok(created)
    }

    /// First drone whose name matches exactly (case-sensitive).
    ///
    /// Scans every record; there is no name index at the service level.
    pub async fn get_drone_by_name(&self, name: &str) -> DroneResult<Drone> {
        self.store
            .find_all()
            .await?
            .into_iter()
            .find(|drone| drone.name == *name)
            .ok_or_else(|| {
                debug!("no drone named {}", name);
                DroneError::NameNotFound(name.to_string())
            })
    }

    pub async fn get_all_drones(&self) -> DroneResult<Vec<Drone>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_drone_by_id(&self, id: DroneId) -> DroneResult<Drone> {
        self.store.find_by_id(id).await?.ok_or_else(|| {
            debug!("drone {} not found", id);
            DroneError::NotFound(id)
        })
    }

    /// Delete a drone, returning the id that was removed.
    pub async fn remove_drone(&self, id: DroneId) -> DroneResult<DroneId> {
        let drone = self.get_drone_by_id(id).await?;
        self.store.delete(&drone).await?;
        info!("removed drone {}", id);
        Ok(id)
    }

    /// Overwrite name, model and capacity of an existing drone. The id is kept.
    pub async fn update_drone(&self, id: DroneId, fields: NewDrone) -> DroneResult<Drone> {
        let mut drone = self.get_drone_by_id(id).await?;
        drone.apply(fields);
        let updated = self.store.save(&drone).await.map_err(|err| match err {
            StoreError::Missing(id) => DroneError::NotFound(id),
            other => DroneError::Store(other),
        })?;
        info!("updated drone {}", id);
        Ok(updated)
    }

    /// Connectivity check against the underlying store.
    pub async fn ping(&self) -> DroneResult<()> {
        Ok(self.store.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::drone::{DroneModel, DroneName};
    use crate::repository::memory::InMemoryDroneStore;
    use assert_matches::assert_matches;

    fn service() -> DroneService {
        DroneService::new(Arc::new(InMemoryDroneStore::default()))
    }

    fn new_drone(name: &str, model: &str, capacity: f64) -> NewDrone {
        NewDrone {
            name: DroneName::parse(name).unwrap(),
            model: DroneModel::parse(model).unwrap(),
            capacity_weight_in_kg: capacity,
        }
    }

    #[tokio::test]
    async fn added_drone_can_be_read_back_by_id_and_name() {
        let service = service();
        let created = service
            .add_drone(new_drone("BR01", "Embraer XYZ 777", 10.5))
            .await
            .unwrap();

        assert_eq!(created.name.as_str(), "BR01");
        assert_eq!(created.model.as_str(), "Embraer XYZ 777");
        assert_eq!(created.capacity_weight_in_kg, 10.5);

        let by_id = service.get_drone_by_id(created.id()).await.unwrap();
        assert_eq!(by_id, created);
        let by_name = service.get_drone_by_name("BR01").await.unwrap();
        assert_eq!(by_name, created);
    }

    #[tokio::test]
    async fn name_lookup_is_case_sensitive() {
        let service = service();
        service
            .add_drone(new_drone("BR01", "Embraer XYZ 777", 10.5))
            .await
            .unwrap();
        assert_matches!(
            service.get_drone_by_name("br01").await,
            Err(DroneError::NameNotFound(name)) if name == "br01"
        );
    }

    #[tokio::test]
    async fn get_all_returns_every_inserted_drone() {
        let service = service();
        let mut inserted = Vec::new();
        for (i, name) in ["BR01", "BR02", "BR03"].iter().enumerate() {
            inserted.push(
                service
                    .add_drone(new_drone(name, "Embraer XYZ 787", i as f64 + 1.0))
                    .await
                    .unwrap(),
            );
        }
        let all = service.get_all_drones().await.unwrap();
        assert_eq!(all.len(), inserted.len());
        for drone in &inserted {
            assert!(all.contains(drone));
        }
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let service = service();
        assert_matches!(service.get_drone_by_id(999).await, Err(DroneError::NotFound(999)));
        assert_matches!(service.remove_drone(999).await, Err(DroneError::NotFound(999)));
        assert_matches!(
            service
                .update_drone(999, new_drone("BR02", "Embraer XYZ 787", 11.6))
                .await,
            Err(DroneError::NotFound(999))
        );
    }

    #[tokio::test]
    async fn removed_drone_is_gone() {
        let service = service();
        let created = service
            .add_drone(new_drone("BR01", "Embraer XYZ 777", 10.5))
            .await
            .unwrap();
        assert_eq!(service.remove_drone(created.id()).await.unwrap(), created.id());
        assert_matches!(
            service.get_drone_by_id(created.id()).await,
            Err(DroneError::NotFound(_))
        );
        assert_matches!(
            service.remove_drone(created.id()).await,
            Err(DroneError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_id() {
        let service = service();
        let created = service
            .add_drone(new_drone("BR01", "Embraer XYZ 777", 10.5))
            .await
            .unwrap();
        assert_eq!(created.id(), 1);

        let updated = service
            .update_drone(1, new_drone("BR02", "Embraer XYZ 787", 11.6))
            .await
            .unwrap();
        assert_eq!(updated.id(), 1);
        assert_eq!(updated.name.as_str(), "BR02");
        assert_eq!(updated.model.as_str(), "Embraer XYZ 787");
        assert_eq!(updated.capacity_weight_in_kg, 11.6);
        assert_eq!(service.get_drone_by_id(1).await.unwrap(), updated);
    }
}
