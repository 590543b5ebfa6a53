pub mod base;

// Linux / MacOS / Windows are all reached through libusb.
mod libusb;
pub use crate::device::libusb::device::LibUsbBus;

#[cfg(test)]
pub(crate) mod mock;
