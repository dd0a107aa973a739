use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub registration: String,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        registration: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            registration: registration.into(),
        }
    }

    /// Label shown wherever a vehicle is presented as a choice.
    pub fn display_label(&self) -> String {
        format!("{} {} · {}", self.brand, self.model, self.registration)
    }
}

impl std::fmt::Display for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        let vehicle = Vehicle::new("v1", "Renault", "Clio", "AB-123-CD");
        assert_eq!(vehicle.display_label(), "Renault Clio · AB-123-CD");
        assert_eq!(vehicle.to_string(), vehicle.display_label());
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"id":"v1","brand":"Renault","model":"Clio","registration":"AB-123-CD"}"#;
        let vehicle: Vehicle = serde_json::from_str(json).unwrap();
        assert_eq!(vehicle.id, "v1");
        assert_eq!(vehicle.registration, "AB-123-CD");
    }
}
