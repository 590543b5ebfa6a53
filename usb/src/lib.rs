pub use holo_calibration_types::{Calibration, CalibrationKey, DeviceVariant};
pub use rusb;

pub mod acquisition;
pub mod classifier;
pub mod device;
pub mod error;
pub mod parser;
pub mod sanitizer;
pub mod settings;
pub mod source;

pub use acquisition::{
    acquire_calibration, acquire_with, calibration_or_default, get_calibration,
    get_calibration_with,
};
pub use error::CalibrationError;
pub use settings::Settings;
