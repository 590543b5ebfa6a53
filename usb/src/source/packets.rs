use crate::device::base::{ClaimedInterface, HidTransport};
use crate::error::{CalibrationError, Result, TransferStage};
use crate::settings::Settings;
use crate::source::{CalibrationSource, RawCalibrationBlob};
use log::{debug, trace};
use rusb::{Direction, Recipient, RequestType};
use std::time::Duration;

const GET_DESCRIPTOR: u8 = 0x06;
const SET_REPORT: u8 = 0x09;

// Output report 0, sent to the calibration interface.
const SET_REPORT_VALUE: u16 = 0x0300;
const SET_REPORT_INDEX: u16 = 0x0002;

const LANGUAGE_EN_US: u16 = 0x0409;

// String descriptors read before paging, the display won't answer page requests otherwise.
const PRIMING_READS: [(u16, usize); 3] = [(0x0303, 1026), (0x0301, 1026), (0x0302, 255)];

// Offset of the page index within a page request.
const PAGE_INDEX_OFFSET: usize = 2;

/// Pages the calibration out of a first generation display over HID.
///
/// Each page is requested with a set report carrying the page index, then read back from the
/// interrupt endpoint. The pages are joined untouched, so the result still needs sanitizing.
pub struct PacketReassemblySource<H: HidTransport> {
    transport: H,
    interface: u8,
    endpoint: u8,
    packet_count: usize,
    buffer_size: usize,
    interrupt_size: usize,
    timeout: Duration,
}

impl<H: HidTransport> PacketReassemblySource<H> {
    /// Fails if the settings can't frame a page, rather than panicking mid transfer.
    pub fn new(transport: H, interface: u8, settings: &Settings) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            transport,
            interface,
            endpoint: settings.interrupt_endpoint,
            packet_count: settings.packet_count,
            buffer_size: settings.buffer_size,
            interrupt_size: settings.interrupt_size,
            timeout: settings.timeout(),
        })
    }

    fn prime(device: &mut H, timeout: Duration) {
        let request_type =
            rusb::request_type(Direction::In, RequestType::Standard, Recipient::Device);

        for (value, length) in PRIMING_READS {
            let mut data = vec![0; length];
            let result = device.read_control(
                request_type,
                GET_DESCRIPTOR,
                value,
                LANGUAGE_EN_US,
                &mut data,
                timeout,
            );
            debug!("Descriptor {:#06x} read: {:?}", value, result);
        }
    }
}

impl<H: HidTransport> CalibrationSource for PacketReassemblySource<H> {
    fn read_blob(&mut self) -> Result<RawCalibrationBlob> {
        if let Err(error) = self.transport.detach_kernel_driver(self.interface) {
            debug!("Kernel driver not detached from {}: {}", self.interface, error);
        }

        let interface = self.interface;
        let mut device = ClaimedInterface::claim(&mut self.transport, interface)
            .map_err(|source| CalibrationError::InterfaceClaimFailed { interface, source })?;

        Self::prime(&mut device, self.timeout);

        let request_type =
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
        let page_length = self.interrupt_size + 1;

        let mut blob =
            RawCalibrationBlob::padded(Vec::with_capacity(page_length * self.packet_count));
        let mut buffer = vec![0u8; self.buffer_size];

        for packet in 0..self.packet_count {
            buffer.fill(0);
            buffer[PAGE_INDEX_OFFSET] = packet as u8;
            device
                .write_control(
                    request_type,
                    SET_REPORT,
                    SET_REPORT_VALUE,
                    SET_REPORT_INDEX,
                    &buffer[..self.interrupt_size],
                    self.timeout,
                )
                .map_err(|e| CalibrationError::from_transfer(e, packet, TransferStage::Control))?;

            buffer.fill(0);
            let received = device
                .read_interrupt(self.endpoint, &mut buffer, self.timeout)
                .map_err(|e| CalibrationError::from_transfer(e, packet, TransferStage::Interrupt))?;

            // Always a full page, regardless of what the device reported.
            trace!("Packet {} reported {} bytes", packet, received);
            blob.extend_from_slice(&buffer[..page_length]);
        }

        debug!(
            "Read {} calibration packets from interface {}",
            self.packet_count, interface
        );
        Ok(blob)
    }
}
