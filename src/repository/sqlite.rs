//! SQLite-backed drone store.

use super::{DroneStore, StoreError, StoreResult};
use crate::models::drone::{Drone, DroneFieldError, DroneId, DroneModel, DroneName, NewDrone};
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use tracing::debug;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Debug, FromRow)]
struct DroneRow {
    id: i64,
    name: String,
    model: String,
    capacity_weight_in_kg: f64,
}

impl TryFrom<DroneRow> for Drone {
    type Error = StoreError;

    fn try_from(row: DroneRow) -> Result<Self, Self::Error> {
        let DroneRow {
            id,
            name,
            model,
            capacity_weight_in_kg,
        } = row;
        let corrupt = move |err: DroneFieldError| StoreError::CorruptRecord {
            id,
            reason: err.to_string(),
        };
        let fields = NewDrone {
            name: DroneName::parse(name).map_err(corrupt)?,
            model: DroneModel::parse(model).map_err(corrupt)?,
            capacity_weight_in_kg,
        };
        Ok(Drone::from_parts(id, fields))
    }
}

#[derive(Clone)]
pub struct SqliteDroneStore {
    db: Arc<SqlitePool>,
}

impl SqliteDroneStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Apply the bundled schema. Every statement is idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        let statements = SCHEMA
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        tracing::info!("Running {} migration statements...", statements.len());

        for stmt in statements {
            debug!("Executing migration SQL: {}", stmt);
            sqlx::query(stmt).execute(&*self.db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DroneStore for SqliteDroneStore {
    async fn insert(&self, drone: &NewDrone) -> StoreResult<Drone> {
        let row = sqlx::query_as::<_, DroneRow>(
            "INSERT INTO drones (name, model, capacity_weight_in_kg)
             VALUES (?, ?, ?)
             RETURNING id, name, model, capacity_weight_in_kg",
        )
        .bind(drone.name.as_str())
        .bind(drone.model.as_str())
        .bind(drone.capacity_weight_in_kg)
        .fetch_one(&*self.db)
        .await?;
        row.try_into()
    }

    async fn save(&self, drone: &Drone) -> StoreResult<Drone> {
        sqlx::query_as::<_, DroneRow>(
            "UPDATE drones SET name = ?, model = ?, capacity_weight_in_kg = ?
             WHERE id = ?
             RETURNING id, name, model, capacity_weight_in_kg",
        )
        .bind(drone.name.as_str())
        .bind(drone.model.as_str())
        .bind(drone.capacity_weight_in_kg)
        .bind(drone.id())
        .fetch_optional(&*self.db)
        .await?
        .ok_or(StoreError::Missing(drone.id()))?
        .try_into()
    }

    async fn find_by_id(&self, id: DroneId) -> StoreResult<Option<Drone>> {
        sqlx::query_as::<_, DroneRow>(
            "SELECT id, name, model, capacity_weight_in_kg FROM drones WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?
        .map(Drone::try_from)
        .transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Drone>> {
        sqlx::query_as::<_, DroneRow>(
            "SELECT id, name, model, capacity_weight_in_kg FROM drones ORDER BY id",
        )
        .fetch_all(&*self.db)
        .await?
        .into_iter()
        .map(Drone::try_from)
        .collect()
    }

    async fn delete(&self, drone: &Drone) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM drones WHERE id = ?")
            .bind(drone.id())
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            debug!("drone {} was already gone at delete time", drone.id());
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?;
        Ok(())
    }
}
