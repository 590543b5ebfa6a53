use crate::device::base::UsbDescriptor;
use crate::error::{CalibrationError, Result};
use crate::settings::Settings;
use holo_calibration_types::DeviceVariant;
use log::{debug, info};

/// The display picked for this acquisition, and how to reach it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Only first generation displays are read over a USB interface.
    pub interface: Option<u8>,
    pub variant: DeviceVariant,
}

/// Picks the first display out of the attached devices, in the order they were listed.
pub fn classify<I>(descriptors: I, settings: &Settings) -> Result<DeviceIdentity>
where
    I: IntoIterator<Item = Result<UsbDescriptor, rusb::Error>>,
{
    for descriptor in descriptors {
        let descriptor = match descriptor {
            Ok(descriptor) => descriptor,
            Err(error) => {
                debug!("Skipping device, unable to read descriptor: {}", error);
                continue;
            }
        };

        let variant = settings.variant_for(descriptor.vendor_id);
        let interface = match variant {
            DeviceVariant::None => continue,
            DeviceVariant::FirstGen => Some(settings.first_gen_interface),
            DeviceVariant::Portrait => None,
        };

        let identity = DeviceIdentity {
            vendor_id: descriptor.vendor_id,
            product_id: descriptor.product_id,
            interface,
            variant,
        };
        info!(
            "Found {} display {:04x}:{:04x}",
            identity.variant, identity.vendor_id, identity.product_id
        );
        return Ok(identity);
    }

    Err(CalibrationError::NoDeviceFound)
}
