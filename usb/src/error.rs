use strum::Display;

/// The two transfers made for each calibration packet.
#[derive(Debug, Copy, Clone, Display, PartialEq, Eq)]
pub enum TransferStage {
    #[strum(to_string = "page request")]
    Control,
    #[strum(to_string = "page read")]
    Interrupt,
}

#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error("Cannot initialise libusb: {0}")]
    ContextUnavailable(rusb::Error),

    #[error("No USB devices listed: {0}")]
    NoDevicesListed(rusb::Error),

    #[error("No Looking Glass display found")]
    NoDeviceFound,

    #[error("Calibration file unavailable: {0}")]
    CalibrationFileUnavailable(String),

    #[error("Cannot connect to device {vendor_id:04x}:{product_id:04x}")]
    DeviceOpenFailed { vendor_id: u16, product_id: u16 },

    #[error("Cannot claim interface {interface}: {source}")]
    InterfaceClaimFailed { interface: u8, source: rusb::Error },

    #[error("Cannot send control for packet {packet}: {source}")]
    ControlTransferFailed { packet: usize, source: rusb::Error },

    #[error("Cannot interrupt for packet {packet}: {source}")]
    InterruptTransferFailed { packet: usize, source: rusb::Error },

    #[error("Timed out during {stage} of packet {packet}")]
    Timeout { packet: usize, stage: TransferStage },

    #[error("Malformed calibration blob, {0}")]
    MalformedBlob(&'static str),

    #[error("Calibration is not valid JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Calibration is missing a numeric '{0}' value")]
    MissingField(&'static str),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl CalibrationError {
    // Maps a failed packet transfer, keeping timeouts apart from other USB errors.
    pub(crate) fn from_transfer(error: rusb::Error, packet: usize, stage: TransferStage) -> Self {
        match (error, stage) {
            (rusb::Error::Timeout, stage) => CalibrationError::Timeout { packet, stage },
            (source, TransferStage::Control) => {
                CalibrationError::ControlTransferFailed { packet, source }
            }
            (source, TransferStage::Interrupt) => {
                CalibrationError::InterruptTransferFailed { packet, source }
            }
        }
    }
}

pub type Result<T, E = CalibrationError> = std::result::Result<T, E>;
