use super::{DroneStore, StoreError, StoreResult};
use crate::models::drone::{Drone, DroneId, NewDrone};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// In-process store with the same id semantics as the SQLite table:
/// ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryDroneStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: DroneId,
    rows: BTreeMap<DroneId, Drone>,
}

#[async_trait]
impl DroneStore for InMemoryDroneStore {
    async fn insert(&self, drone: &NewDrone) -> StoreResult<Drone> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let stored = Drone::from_parts(inner.last_id, drone.clone());
        inner.rows.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn save(&self, drone: &Drone) -> StoreResult<Drone> {
        let mut inner = self.inner.lock().await;
        let slot = inner
            .rows
            .get_mut(&drone.id())
            .ok_or(StoreError::Missing(drone.id()))?;
        *slot = drone.clone();
        Ok(drone.clone())
    }

    async fn find_by_id(&self, id: DroneId) -> StoreResult<Option<Drone>> {
        Ok(self.inner.lock().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Drone>> {
        Ok(self.inner.lock().await.rows.values().cloned().collect())
    }

    async fn delete(&self, drone: &Drone) -> StoreResult<()> {
        self.inner.lock().await.rows.remove(&drone.id());
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
