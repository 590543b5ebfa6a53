use crate::device::base::{HidTransport, UsbBus, UsbDescriptor};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Detach(u8),
    Claim(u8),
    Release(u8),
    ReadControl {
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        length: usize,
    },
    WriteControl {
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: Vec<u8>,
    },
    ReadInterrupt {
        endpoint: u8,
        length: usize,
        timeout: Duration,
    },
    Closed,
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// A scripted first generation display, each interrupt read hands back the next queued page.
pub struct MockTransport {
    pub log: EventLog,
    pub pages: VecDeque<Vec<u8>>,
    pub reported_length: usize,
    pub claim_error: Option<rusb::Error>,
    pub detach_error: Option<rusb::Error>,
    pub priming_error: Option<rusb::Error>,
    pub control_error_at: Option<(usize, rusb::Error)>,
    pub interrupt_error_at: Option<(usize, rusb::Error)>,
    requests: usize,
    reads: usize,
}

impl MockTransport {
    pub fn new(pages: Vec<Vec<u8>>) -> Self {
        Self {
            log: EventLog::default(),
            pages: pages.into(),
            reported_length: 0,
            claim_error: None,
            detach_error: None,
            priming_error: None,
            control_error_at: None,
            interrupt_error_at: None,
            requests: 0,
            reads: 0,
        }
    }

    pub fn events(&self) -> EventLog {
        self.log.clone()
    }
}

impl HidTransport for MockTransport {
    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.log.borrow_mut().push(Event::Detach(interface));
        self.detach_error.map_or(Ok(()), Err)
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        if let Some(error) = self.claim_error {
            return Err(error);
        }
        self.log.borrow_mut().push(Event::Claim(interface));
        Ok(())
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.log.borrow_mut().push(Event::Release(interface));
        Ok(())
    }

    fn read_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.log.borrow_mut().push(Event::ReadControl {
            request_type,
            request,
            value,
            index,
            length: buf.len(),
        });
        if let Some(error) = self.priming_error {
            return Err(error);
        }
        buf.fill(0xff);
        Ok(buf.len())
    }

    fn write_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        _timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.log.borrow_mut().push(Event::WriteControl {
            request_type,
            request,
            value,
            index,
            data: buf.to_vec(),
        });

        let request = self.requests;
        self.requests += 1;
        match self.control_error_at {
            Some((at, error)) if at == request => Err(error),
            _ => Ok(buf.len()),
        }
    }

    fn read_interrupt(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.log.borrow_mut().push(Event::ReadInterrupt {
            endpoint,
            length: buf.len(),
            timeout,
        });

        let read = self.reads;
        self.reads += 1;
        if let Some((at, error)) = self.interrupt_error_at {
            if at == read {
                return Err(error);
            }
        }

        if let Some(page) = self.pages.pop_front() {
            let length = page.len().min(buf.len());
            buf[..length].copy_from_slice(&page[..length]);
        }
        Ok(self.reported_length)
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::Closed);
    }
}

pub struct MockBus {
    pub descriptors: Vec<Result<UsbDescriptor, rusb::Error>>,
    pub list_error: Option<rusb::Error>,
    pub transport: RefCell<Option<MockTransport>>,
    pub opened: RefCell<Vec<(u16, u16)>>,
}

impl MockBus {
    pub fn new(descriptors: Vec<Result<UsbDescriptor, rusb::Error>>) -> Self {
        Self {
            descriptors,
            list_error: None,
            transport: RefCell::new(None),
            opened: RefCell::new(Vec::new()),
        }
    }

    pub fn with_transport(mut self, transport: MockTransport) -> Self {
        self.transport = RefCell::new(Some(transport));
        self
    }
}

impl UsbBus for MockBus {
    type Transport = MockTransport;

    fn descriptors(&self) -> Result<Vec<Result<UsbDescriptor, rusb::Error>>> {
        if let Some(error) = self.list_error {
            return Err(crate::error::CalibrationError::NoDevicesListed(error));
        }
        Ok(self.descriptors.clone())
    }

    fn open(&self, vendor_id: u16, product_id: u16) -> Option<MockTransport> {
        self.opened.borrow_mut().push((vendor_id, product_id));
        self.transport.borrow_mut().take()
    }
}

pub fn descriptor(vendor_id: u16, product_id: u16) -> Result<UsbDescriptor, rusb::Error> {
    Ok(UsbDescriptor {
        vendor_id,
        product_id,
    })
}

/// Splits a blob into pages of `page_size`, zero padding the final page.
pub fn paginate(blob: &[u8], page_size: usize) -> Vec<Vec<u8>> {
    blob.chunks(page_size)
        .map(|chunk| {
            let mut page = chunk.to_vec();
            page.resize(page_size, 0);
            page
        })
        .collect()
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

// Records log lines on the thread that wrote them, so parallel tests don't see each other.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL_LOGGER: Once = Once::new();

/// Runs `f`, returning its result along with everything it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(log::Level, String)>) {
    INSTALL_LOGGER.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });

    CAPTURED.with(|captured| captured.borrow_mut().clear());
    let result = f();
    let lines = CAPTURED.with(|captured| captured.borrow_mut().drain(..).collect());
    (result, lines)
}
