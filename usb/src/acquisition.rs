use crate::classifier::{classify, DeviceIdentity};
use crate::device::base::UsbBus;
use crate::device::LibUsbBus;
use crate::error::{CalibrationError, Result};
use crate::parser::parse_calibration;
use crate::settings::Settings;
use crate::source::{CalibrationSource, MountedVolumeSource, PacketReassemblySource};
use holo_calibration_types::{Calibration, DeviceVariant};
use log::{debug, error, warn};

/// Reads the calibration of the first attached display, using the default settings.
///
/// This never fails, if anything goes wrong the problem is logged and the all-zero calibration
/// is returned instead.
pub fn get_calibration() -> Calibration {
    get_calibration_with(&Settings::default())
}

pub fn get_calibration_with(settings: &Settings) -> Calibration {
    calibration_or_default(acquire_calibration(settings))
}

/// Opens a libusb context for the length of one acquisition.
pub fn acquire_calibration(settings: &Settings) -> Result<Calibration> {
    settings.validate()?;

    let bus = LibUsbBus::new()?;
    acquire_with(&bus, settings)
}

pub fn acquire_with<B: UsbBus>(bus: &B, settings: &Settings) -> Result<Calibration> {
    settings.validate()?;

    let identity = classify(bus.descriptors()?, settings)?;

    // The source holds the device open, it's closed again before the blob is parsed.
    let blob = {
        let mut source = open_source(bus, &identity, settings)?;
        source.read_blob()?
    };

    let document = blob.into_document()?;
    debug!("Parsing {} byte calibration document", document.len());
    parse_calibration(&document)
}

/// Falls back to the default calibration, logging why.
pub fn calibration_or_default(result: Result<Calibration>) -> Calibration {
    match result {
        Ok(calibration) => calibration,
        Err(error) => {
            error!("{}", error);
            warn!("Returning default calibration for small LKG");
            Calibration::default()
        }
    }
}

fn open_source<B: UsbBus>(
    bus: &B,
    identity: &DeviceIdentity,
    settings: &Settings,
) -> Result<Box<dyn CalibrationSource>> {
    match identity.variant {
        DeviceVariant::FirstGen => {
            let transport = bus.open(identity.vendor_id, identity.product_id).ok_or(
                CalibrationError::DeviceOpenFailed {
                    vendor_id: identity.vendor_id,
                    product_id: identity.product_id,
                },
            )?;
            let interface = identity.interface.unwrap_or(settings.first_gen_interface);
            Ok(Box::new(PacketReassemblySource::new(
                transport, interface, settings,
            )?))
        }
        DeviceVariant::Portrait => Ok(Box::new(MountedVolumeSource::new(settings))),
        DeviceVariant::None => Err(CalibrationError::NoDeviceFound),
    }
}
