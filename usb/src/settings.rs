use crate::error::{CalibrationError, Result};
use holo_calibration_types::DeviceVariant;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const VID_LKG_FIRSTGEN: u16 = 0x04d8;
pub const VID_LKG_PORTRAIT: u16 = 0x2e8a;
pub const INTERFACE_LKG_FIRSTGEN: u8 = 2;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        const DEFAULT_MOUNT_TABLE: &str = "/proc/mounts";
    } else {
        const DEFAULT_MOUNT_TABLE: &str = "/etc/mtab";
    }
}

/// Everything that tunes how calibration is located and read.
///
/// All fields fall back to their defaults when missing from a settings file, so an empty JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vendor_id_first_gen: u16,
    pub vendor_id_portrait: u16,

    /// The HID interface carrying calibration on first generation displays.
    pub first_gen_interface: u8,
    pub interrupt_endpoint: u8,

    /// How many pages are requested from a first generation display.
    pub packet_count: usize,
    pub buffer_size: usize,
    pub interrupt_size: usize,

    /// Per transfer timeout, 0 waits forever.
    pub timeout_millis: u64,

    pub mount_table: PathBuf,
    pub volume_marker: String,
    pub calibration_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vendor_id_first_gen: VID_LKG_FIRSTGEN,
            vendor_id_portrait: VID_LKG_PORTRAIT,
            first_gen_interface: INTERFACE_LKG_FIRSTGEN,
            interrupt_endpoint: 0x84,
            packet_count: 20,
            buffer_size: 68,
            interrupt_size: 67,
            timeout_millis: 1000,
            mount_table: PathBuf::from(DEFAULT_MOUNT_TABLE),
            volume_marker: String::from("LKG-"),
            calibration_file: PathBuf::from("LKG_calibration/visual.json"),
        }
    }
}

impl Settings {
    pub fn read(path: &Path) -> anyhow::Result<Settings> {
        use anyhow::Context;

        match File::open(path) {
            Ok(reader) => serde_json::from_reader(reader).context(format!(
                "Could not parse calibration settings file at {}",
                path.to_string_lossy()
            )),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(error) => Err(error).context(format!(
                "Could not open calibration settings file for reading at {}",
                path.to_string_lossy()
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.packet_count == 0 {
            return Err(CalibrationError::InvalidSettings(
                "packet_count must be at least 1".to_string(),
            ));
        }

        // The page index is written into a single byte of the request.
        if self.packet_count > usize::from(u8::MAX) + 1 {
            return Err(CalibrationError::InvalidSettings(format!(
                "packet_count of {} cannot be addressed by a single byte",
                self.packet_count
            )));
        }

        if self.buffer_size < 3 {
            return Err(CalibrationError::InvalidSettings(format!(
                "buffer_size of {} cannot hold a page index",
                self.buffer_size
            )));
        }

        if self.interrupt_size + 1 > self.buffer_size {
            return Err(CalibrationError::InvalidSettings(format!(
                "interrupt_size of {} does not fit a {} byte buffer",
                self.interrupt_size, self.buffer_size
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    pub fn variant_for(&self, vendor_id: u16) -> DeviceVariant {
        if vendor_id == self.vendor_id_first_gen {
            DeviceVariant::FirstGen
        } else if vendor_id == self.vendor_id_portrait {
            DeviceVariant::Portrait
        } else {
            DeviceVariant::None
        }
    }
}
