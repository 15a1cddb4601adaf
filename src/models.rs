//! Data models for the field record store and the API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

// ---

/// Crop grown on a field. Stored as lowercase text in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Rice,
    Wheat,
    Maize,
    Sugarcane,
    Cotton,
    Vegetables,
    Fruits,
    #[default]
    Other,
}

impl CropType {
    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            CropType::Rice => "rice",
            CropType::Wheat => "wheat",
            CropType::Maize => "maize",
            CropType::Sugarcane => "sugarcane",
            CropType::Cotton => "cotton",
            CropType::Vegetables => "vegetables",
            CropType::Fruits => "fruits",
            CropType::Other => "other",
        }
    }

    /// Human-readable name, e.g. for log lines.
    pub fn display_name(&self) -> &'static str {
        // ---
        match self {
            CropType::Rice => "Rice",
            CropType::Wheat => "Wheat",
            CropType::Maize => "Maize",
            CropType::Sugarcane => "Sugarcane",
            CropType::Cotton => "Cotton",
            CropType::Vegetables => "Vegetables",
            CropType::Fruits => "Fruits",
            CropType::Other => "Other",
        }
    }
}

#[derive(Error, Debug)]
#[error("unknown crop type: {0}")]
pub struct UnknownCropType(String);

impl TryFrom<String> for CropType {
    type Error = UnknownCropType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        // ---
        match value.as_str() {
            "rice" => Ok(CropType::Rice),
            "wheat" => Ok(CropType::Wheat),
            "maize" => Ok(CropType::Maize),
            "sugarcane" => Ok(CropType::Sugarcane),
            "cotton" => Ok(CropType::Cotton),
            "vegetables" => Ok(CropType::Vegetables),
            "fruits" => Ok(CropType::Fruits),
            "other" => Ok(CropType::Other),
            _ => Err(UnknownCropType(value)),
        }
    }
}

/// A field and its latest sensor snapshot, as persisted in the local store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Field {
    // ---
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Area in hectares.
    pub area: f64,
    #[sqlx(try_from = "String")]
    pub crop_type: CropType,
    pub moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_ph: f64,
    pub n_level: f64,
    pub p_level: f64,
    pub k_level: f64,
    /// Refreshed on every write.
    pub last_updated: DateTime<Utc>,
    /// Set on insert, immutable thereafter.
    pub created_at: DateTime<Utc>,
}

impl Field {
    /// The sensor snapshot embedded in the sensor-data response: all seven
    /// readings plus `last_updated` as an ISO-8601 string.
    pub fn sensor_data(&self) -> serde_json::Value {
        // ---
        json!({
            "moisture": self.moisture,
            "temperature": self.temperature,
            "humidity": self.humidity,
            "soil_ph": self.soil_ph,
            "n_level": self.n_level,
            "p_level": self.p_level,
            "k_level": self.k_level,
            "last_updated": self.last_updated.to_rfc3339(),
        })
    }
}

/// Attributes for creating a field via the provisioning path.
#[derive(Debug, Clone, Deserialize)]
pub struct NewField {
    // ---
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_area")]
    pub area: f64,
    #[serde(default)]
    pub crop_type: CropType,
    #[serde(flatten)]
    pub readings: SensorReadings,
}

fn default_area() -> f64 {
    1.0
}

/// One full set of the seven sensor measurements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorReadings {
    // ---
    pub moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_ph: f64,
    pub n_level: f64,
    pub p_level: f64,
    pub k_level: f64,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn create_test_field() -> Field {
        // ---
        Field {
            id: 7,
            name: "North paddock".to_string(),
            location: "Pune".to_string(),
            area: 2.5,
            crop_type: CropType::Rice,
            moisture: 31.2,
            temperature: 24.8,
            humidity: 61.0,
            soil_ph: 6.4,
            n_level: 42.0,
            p_level: 19.5,
            k_level: 16.0,
            last_updated: Utc.with_ymd_and_hms(2026, 3, 26, 18, 45, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_crop_type_round_trip() {
        // ---
        for crop in [
            CropType::Rice,
            CropType::Wheat,
            CropType::Maize,
            CropType::Sugarcane,
            CropType::Cotton,
            CropType::Vegetables,
            CropType::Fruits,
            CropType::Other,
        ] {
            let parsed = CropType::try_from(crop.as_str().to_string()).unwrap();
            assert_eq!(parsed, crop);
        }

        assert!(CropType::try_from("bamboo".to_string()).is_err());
    }

    #[test]
    fn test_crop_type_defaults_to_other() {
        // ---
        assert_eq!(CropType::default(), CropType::Other);
        assert_eq!(CropType::default().display_name(), "Other");
    }

    #[test]
    fn test_sensor_data_contains_all_readings() {
        // ---
        let field = create_test_field();
        let data = field.sensor_data();

        assert_eq!(data["moisture"], 31.2);
        assert_eq!(data["temperature"], 24.8);
        assert_eq!(data["humidity"], 61.0);
        assert_eq!(data["soil_ph"], 6.4);
        assert_eq!(data["n_level"], 42.0);
        assert_eq!(data["p_level"], 19.5);
        assert_eq!(data["k_level"], 16.0);
        assert_eq!(data["last_updated"], "2026-03-26T18:45:00+00:00");
    }

    #[test]
    fn test_new_field_defaults() {
        // ---
        let new: NewField = serde_json::from_value(json!({
            "name": "South strip",
            "moisture": 30.0,
            "temperature": 25.0,
            "humidity": 60.0,
            "soil_ph": 6.5,
            "n_level": 40.0,
            "p_level": 20.0,
            "k_level": 15.0,
        }))
        .unwrap();

        assert_eq!(new.area, 1.0);
        assert_eq!(new.crop_type, CropType::Other);
        assert!(new.location.is_empty());
        assert_eq!(new.readings.soil_ph, 6.5);
    }
}
