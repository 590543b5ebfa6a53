use crate::error::Result;
use crate::sanitizer::sanitize;
use log::debug;

pub mod mounted;
pub mod packets;

pub use mounted::MountedVolumeSource;
pub use packets::PacketReassemblySource;

/// Whether a blob is already a bare document, or still carries transport framing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlobFraming {
    Clean,
    Padded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCalibrationBlob {
    bytes: Vec<u8>,
    framing: BlobFraming,
}

impl RawCalibrationBlob {
    pub fn clean(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            framing: BlobFraming::Clean,
        }
    }

    pub fn padded(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            framing: BlobFraming::Padded,
        }
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn framing(&self) -> BlobFraming {
        self.framing
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Produces the JSON document held in this blob, sanitizing it first if needed.
    pub fn into_document(self) -> Result<Vec<u8>> {
        match self.framing {
            BlobFraming::Clean => Ok(self.bytes),
            BlobFraming::Padded => {
                debug!("Sanitizing {} byte calibration blob", self.bytes.len());
                sanitize(&self.bytes)
            }
        }
    }
}

/// Somewhere a display's calibration can be read from.
pub trait CalibrationSource {
    fn read_blob(&mut self) -> Result<RawCalibrationBlob>;
}
