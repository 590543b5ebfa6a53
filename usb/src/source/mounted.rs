use crate::error::{CalibrationError, Result};
use crate::settings::Settings;
use crate::source::{CalibrationSource, RawCalibrationBlob};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Portrait displays expose their calibration on a small mass storage volume.
#[derive(Debug, Clone)]
pub struct MountedVolumeSource {
    mount_table: PathBuf,
    marker: String,
    calibration_file: PathBuf,
}

impl MountedVolumeSource {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mount_table: settings.mount_table.clone(),
            marker: settings.volume_marker.clone(),
            calibration_file: settings.calibration_file.clone(),
        }
    }
}

impl CalibrationSource for MountedVolumeSource {
    fn read_blob(&mut self) -> Result<RawCalibrationBlob> {
        let table = fs::read_to_string(&self.mount_table).map_err(|e| {
            CalibrationError::CalibrationFileUnavailable(format!(
                "cannot read mount table {}: {}",
                self.mount_table.display(),
                e
            ))
        })?;

        let mount_point = find_mount_point(&table, &self.marker).ok_or_else(|| {
            CalibrationError::CalibrationFileUnavailable(format!(
                "no volume matching '{}' is mounted",
                self.marker
            ))
        })?;
        info!("Found calibration volume at {}", mount_point.display());

        let path = mount_point.join(&self.calibration_file);
        let bytes = fs::read(&path).map_err(|e| {
            CalibrationError::CalibrationFileUnavailable(format!("{}: {}", path.display(), e))
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        Ok(RawCalibrationBlob::clean(bytes))
    }
}

/// Finds the mount point of the last mount table line containing `marker`.
pub fn find_mount_point(table: &str, marker: &str) -> Option<PathBuf> {
    table
        .lines()
        .filter(|line| line.contains(marker))
        .filter_map(|line| line.split_whitespace().nth(1))
        .last()
        .map(|field| PathBuf::from(decode_octal_escapes(field)))
}

// The mount table writes spaces, tabs and the like in a path as '\040' style escapes.
fn decode_octal_escapes(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(digits) = bytes.get(i + 1..i + 4) {
                if digits.iter().all(|digit| (b'0'..=b'7').contains(digit)) {
                    let value = digits
                        .iter()
                        .fold(0u32, |value, digit| value * 8 + u32::from(digit - b'0'));
                    if let Ok(byte) = u8::try_from(value) {
                        decoded.push(byte);
                        i += 4;
                        continue;
                    }
                }
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}
