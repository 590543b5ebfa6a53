use log::{debug, warn};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::error::Result;

// The descriptor fields the classifier cares about, everything else is left with libusb.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UsbDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
}

/// Access to the attached USB devices for the length of one acquisition.
pub trait UsbBus {
    type Transport: HidTransport + 'static;

    /// Lists every attached device in enumeration order, a device whose descriptor couldn't be
    /// read is listed as an error rather than dropped.
    fn descriptors(&self) -> Result<Vec<Result<UsbDescriptor, rusb::Error>>>;

    fn open(&self, vendor_id: u16, product_id: u16) -> Option<Self::Transport>;
}

/// The raw transfers needed to pull pages out of a HID device, closing happens on drop.
pub trait HidTransport {
    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error>;
    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error>;
    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error>;

    fn read_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error>;

    fn write_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error>;

    fn read_interrupt(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error>;
}

/// An interface claimed on a transport, released again when this goes out of scope.
pub struct ClaimedInterface<'a, H: HidTransport> {
    transport: &'a mut H,
    interface: u8,
}

impl<'a, H: HidTransport> ClaimedInterface<'a, H> {
    pub fn claim(transport: &'a mut H, interface: u8) -> Result<Self, rusb::Error> {
        transport.claim_interface(interface)?;
        debug!("Claimed interface {}", interface);
        Ok(Self {
            transport,
            interface,
        })
    }
}

impl<H: HidTransport> Deref for ClaimedInterface<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.transport
    }
}

impl<H: HidTransport> DerefMut for ClaimedInterface<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.transport
    }
}

impl<H: HidTransport> Drop for ClaimedInterface<'_, H> {
    fn drop(&mut self) {
        match self.transport.release_interface(self.interface) {
            Ok(()) => debug!("Released interface {}", self.interface),
            Err(error) => warn!("Unable to release interface {}: {}", self.interface, error),
        }
    }
}
