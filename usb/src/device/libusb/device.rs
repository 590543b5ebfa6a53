use crate::device::base::{HidTransport, UsbBus, UsbDescriptor};
use crate::error::{CalibrationError, Result};
use log::debug;
use rusb::{Context, DeviceHandle, UsbContext};
use std::time::Duration;

/// A libusb context, opened for one acquisition and closed again when dropped.
pub struct LibUsbBus {
    context: Context,
}

impl LibUsbBus {
    pub fn new() -> Result<Self> {
        let context = Context::new().map_err(CalibrationError::ContextUnavailable)?;
        Ok(Self { context })
    }
}

impl UsbBus for LibUsbBus {
    type Transport = DeviceHandle<Context>;

    fn descriptors(&self) -> Result<Vec<Result<UsbDescriptor, rusb::Error>>> {
        let devices = self
            .context
            .devices()
            .map_err(CalibrationError::NoDevicesListed)?;
        debug!("libusb listed {} devices", devices.len());

        let descriptors = devices
            .iter()
            .map(|device| {
                device.device_descriptor().map(|descriptor| UsbDescriptor {
                    vendor_id: descriptor.vendor_id(),
                    product_id: descriptor.product_id(),
                })
            })
            .collect();
        Ok(descriptors)
    }

    fn open(&self, vendor_id: u16, product_id: u16) -> Option<Self::Transport> {
        self.context.open_device_with_vid_pid(vendor_id, product_id)
    }
}

impl<T: UsbContext> HidTransport for DeviceHandle<T> {
    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        DeviceHandle::detach_kernel_driver(self, interface)
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        DeviceHandle::claim_interface(self, interface)
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        DeviceHandle::release_interface(self, interface)
    }

    fn read_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        DeviceHandle::read_control(self, request_type, request, value, index, buf, timeout)
    }

    fn write_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        DeviceHandle::write_control(self, request_type, request, value, index, buf, timeout)
    }

    fn read_interrupt(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        DeviceHandle::read_interrupt(self, endpoint, buf, timeout)
    }
}
