//! Represents a registered drone and the validated pieces it is built from.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Exact number of characters in a drone name.
pub const DRONE_NAME_LEN: usize = 4;

/// Maximum number of characters in a drone model.
pub const DRONE_MODEL_MAX_LEN: usize = 32;

pub type DroneId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DroneFieldError {
    #[error("Drone name must be 4 characters.")]
    NameLength,
    #[error("Drone name must have uppercase characters and numbers.")]
    NameCharset,
    #[error("Drone must have a model.")]
    ModelMissing,
    #[error("Drone name has more than 32 characters.")]
    ModelTooLong,
    #[error("Drone must have weight capacity in kg.")]
    CapacityMissing,
}

/// A drone name: exactly four characters, each `A-Z` or `0-9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DroneName(String);

impl DroneName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DroneFieldError> {
        let raw = raw.into();
        if raw.chars().count() != DRONE_NAME_LEN {
            return Err(DroneFieldError::NameLength);
        }
        if !raw.chars().all(|c| matches!(c, 'A'..='Z' | '0'..='9')) {
            return Err(DroneFieldError::NameCharset);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-form model designation of at most 32 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroneModel(String);

impl DroneModel {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DroneFieldError> {
        let raw = raw.into();
        if raw.chars().count() > DRONE_MODEL_MAX_LEN {
            return Err(DroneFieldError::ModelTooLong);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_newtype_impls!(DroneName);
string_newtype_impls!(DroneModel);

/// Capacity in kilograms. Always a finite number.
pub fn parse_capacity(raw: Option<f64>) -> Result<f64, DroneFieldError> {
    match raw {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(DroneFieldError::CapacityMissing),
    }
}

/// The validated fields of a drone that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDrone {
    pub name: DroneName,
    pub model: DroneModel,
    pub capacity_weight_in_kg: f64,
}

/// A persisted drone. The `id` is assigned by the record store on insert
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    id: DroneId,
    pub name: DroneName,
    pub model: DroneModel,
    pub capacity_weight_in_kg: f64,
}

impl Drone {
    /// Attach a store-assigned id to validated fields.
    pub fn from_parts(id: DroneId, fields: NewDrone) -> Self {
        Self {
            id,
            name: fields.name,
            model: fields.model,
            capacity_weight_in_kg: fields.capacity_weight_in_kg,
        }
    }

    pub fn id(&self) -> DroneId {
        self.id
    }

    /// Overwrite every mutable field, keeping the id.
    pub fn apply(&mut self, fields: NewDrone) {
        self.name = fields.name;
        self.model = fields.model;
        self.capacity_weight_in_kg = fields.capacity_weight_in_kg;
    }
}
