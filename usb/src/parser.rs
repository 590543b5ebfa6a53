use crate::error::{CalibrationError, Result};
use holo_calibration_types::{Calibration, CalibrationKey};
use serde_json::Value;
use strum::IntoEnumIterator;

/// Reads a calibration document, every key must be present as `{"<key>": {"value": <number>}}`.
pub fn parse_calibration(document: &[u8]) -> Result<Calibration> {
    let document: Value = serde_json::from_slice(document)?;

    let mut calibration = Calibration::default();
    for key in CalibrationKey::iter() {
        calibration.set(key, read_value(&document, key)?);
    }
    Ok(calibration)
}

fn read_value(document: &Value, key: CalibrationKey) -> Result<f32> {
    document
        .get(key.json_key())
        .and_then(|field| field.get("value"))
        .and_then(Value::as_f64)
        .map(|value| value as f32)
        .ok_or(CalibrationError::MissingField(key.json_key()))
}
