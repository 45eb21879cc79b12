//! Feature shaping: sensor map → fixed-order model input.
//!
//! The model was trained on 13 of the 21 C-MAPSS sensor channels, in a fixed
//! column order. Incoming requests carry an arbitrary map of sensor readings;
//! this module reorders it, fills absent channels with zero and drops the rest.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 13;

/// Sensor ids in the column order the model was trained with.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "s2", "s3", "s4", "s7", "s8", "s9", "s11", "s12", "s13", "s15", "s17", "s20", "s21",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("sensor '{sensor}' must be a number, got {found}")]
    NonNumeric { sensor: String, found: &'static str },
}

/// A model input row in `FEATURE_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Shape a raw sensor map into a model row.
    ///
    /// Absent sensors become 0.0 and unknown sensor ids are ignored. A consumed
    /// sensor holding anything but a number, `null` included, is rejected.
    pub fn from_sensor_map(sensors: &HashMap<String, Value>) -> Result<Self, FeatureError> {
        let mut values = [0.0f64; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_ORDER) {
            *slot = match sensors.get(name) {
                None => 0.0,
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(other) => {
                    return Err(FeatureError::NonNumeric {
                        sensor: name.to_string(),
                        found: json_type_name(other),
                    })
                }
            };
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sensors(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reorders_into_training_order() {
        let map = sensors(json!({
            "s21": 23.35, "s2": 642.58, "s11": 47.23, "s3": 1581.22
        }));
        let row = FeatureVector::from_sensor_map(&map).unwrap();
        let values = row.values();
        assert_eq!(values[0], 642.58);
        assert_eq!(values[1], 1581.22);
        assert_eq!(values[6], 47.23);
        assert_eq!(values[12], 23.35);
    }

    #[test]
    fn test_missing_sensors_default_to_zero() {
        let row = FeatureVector::from_sensor_map(&sensors(json!({ "s2": 1 }))).unwrap();
        assert_eq!(row.values()[0], 1.0);
        assert!(row.values()[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unknown_sensors_ignored() {
        let row = FeatureVector::from_sensor_map(&sensors(json!({
            "s1": "not used", "s5": 14.62, "op_setting_1": true
        })))
        .unwrap();
        assert_eq!(row, FeatureVector::new([0.0; FEATURE_COUNT]));
    }

    #[test]
    fn test_null_rejected() {
        let err = FeatureVector::from_sensor_map(&sensors(json!({ "s2": 641.9, "s11": null })))
            .unwrap_err();
        assert_eq!(
            err,
            FeatureError::NonNumeric {
                sensor: "s11".to_string(),
                found: "null"
            }
        );
        assert_eq!(err.to_string(), "sensor 's11' must be a number, got null");
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = FeatureVector::from_sensor_map(&sensors(json!({ "s9": "9056.4" }))).unwrap_err();
        assert_eq!(
            err,
            FeatureError::NonNumeric {
                sensor: "s9".to_string(),
                found: "string"
            }
        );
        assert_eq!(err.to_string(), "sensor 's9' must be a number, got string");
    }
}
