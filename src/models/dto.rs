//! Request payload for creating and updating drones.

use super::drone::{DroneFieldError, DroneModel, DroneName, NewDrone, parse_capacity};
use serde::{Deserialize, Serialize};

/// Incoming drone fields as sent by a client. Nothing is checked at
/// deserialization time; call [`DroneDto::validate`] to obtain a [`NewDrone`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneDto {
    pub name: Option<String>,
    pub model: Option<String>,
    pub capacity_weight_in_kg: Option<f64>,
}

/// A single rejected field and the message reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, err: DroneFieldError) -> Self {
        Self {
            field,
            message: err.to_string(),
        }
    }
}

impl DroneDto {
    /// Check every field and collect all violations, in field order.
    pub fn validate(self) -> Result<NewDrone, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let name = match self.name {
            Some(raw) => DroneName::parse(raw),
            None => Err(DroneFieldError::NameLength),
        }
        .map_err(|err| violations.push(FieldViolation::new("name", err)))
        .ok();

        let model = match self.model {
            Some(raw) => DroneModel::parse(raw),
            None => Err(DroneFieldError::ModelMissing),
        }
        .map_err(|err| violations.push(FieldViolation::new("model", err)))
        .ok();

        let capacity = parse_capacity(self.capacity_weight_in_kg)
            .map_err(|err| violations.push(FieldViolation::new("capacityWeightInKg", err)))
            .ok();

        match (name, model, capacity) {
            (Some(name), Some(model), Some(capacity_weight_in_kg)) => Ok(NewDrone {
                name,
                model,
                capacity_weight_in_kg,
            }),
            _ => Err(violations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: Option<&str>, model: Option<&str>, capacity: Option<f64>) -> DroneDto {
        DroneDto {
            name: name.map(str::to_string),
            model: model.map(str::to_string),
            capacity_weight_in_kg: capacity,
        }
    }

    fn messages(result: Result<NewDrone, Vec<FieldViolation>>) -> Vec<String> {
        result
            .unwrap_err()
            .into_iter()
            .map(|violation| violation.message)
            .collect()
    }

    #[test]
    fn valid_dto_becomes_new_drone() {
        let drone = dto(Some("BR01"), Some("Embraer XYZ 777"), Some(10.5))
            .validate()
            .unwrap();
        assert_eq!(drone.name.as_str(), "BR01");
        assert_eq!(drone.model.as_str(), "Embraer XYZ 777");
        assert_eq!(drone.capacity_weight_in_kg, 10.5);
    }

    #[test]
    fn name_violations_use_client_messages() {
        assert_eq!(
            messages(dto(Some("BR001"), Some("Embraer XYZ 777"), Some(10.5)).validate()),
            vec!["Drone name must be 4 characters."]
        );
        assert_eq!(
            messages(dto(Some("br01"), Some("Embraer XYZ 777"), Some(10.5)).validate()),
            vec!["Drone name must have uppercase characters and numbers."]
        );
    }

    #[test]
    fn long_model_reports_original_client_message() {
        let violations = dto(
            Some("BR01"),
            Some("Embraer XYZ 777-00000000000000000"),
            Some(10.5),
        )
        .validate()
        .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "model");
        assert_eq!(violations[0].message, "Drone name has more than 32 characters.");
    }

    #[test]
    fn missing_capacity_is_rejected() {
        assert_eq!(
            messages(dto(Some("BR01"), Some("Embraer XYZ 777"), None).validate()),
            vec!["Drone must have weight capacity in kg."]
        );
    }

    #[test]
    fn all_violations_are_reported_in_field_order() {
        let violations = DroneDto::default().validate().unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "model", "capacityWeightInKg"]);
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let dto: DroneDto = serde_json::from_str(
            r#"{"name":"BR02","model":"Embraer XYZ 787","capacityWeightInKg":11.6}"#,
        )
        .unwrap();
        assert_eq!(dto.name.as_deref(), Some("BR02"));
        assert_eq!(dto.capacity_weight_in_kg, Some(11.6));
    }
}
