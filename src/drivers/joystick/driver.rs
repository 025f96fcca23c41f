use std::{
    fs::{File, OpenOptions},
    io::{self, Read},
    os::fd::AsRawFd,
};

use evdev::{Device, EventType};
use nix::fcntl::{FcntlArg, OFlag};
use packed_struct::{PackedStruct, PackingError};
use thiserror::Error;

use super::{
    event::SwitchReport,
    js_report::{
        JsEventReport, JS_EVENT_AXIS, JS_EVENT_BATCH, JS_EVENT_BUTTON, JS_EVENT_INIT, JS_EVENT_SIZE,
    },
};

/// Maximum length of a device name
const NAME_SIZE: usize = 64;

// JSIOCGNAME(len)
nix::ioctl_read_buf!(jsiocgname, b'j', 0x13, u8);

/// Possible errors opening or reading a switch device
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Unable to open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("Unable to read device name: {0}")]
    Name(#[from] nix::Error),
    #[error("Failed to read from device: {0}")]
    Read(io::Error),
    #[error("Invalid joystick report: {0}")]
    Report(#[from] PackingError),
}

/// Returns true if the read error only means that no data is available yet
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Joystick device driver (/dev/input/jsN)
#[derive(Debug)]
pub struct Driver {
    path: String,
    file: File,
}

impl Driver {
    /// Open the given joystick device for non-blocking reads
    pub fn open(path: &str) -> Result<Self, DriverError> {
        log::debug!("Opening joystick device at: {path}");
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|source| DriverError::Open {
                path: path.to_string(),
                source,
            })?;
        nix::fcntl::fcntl(file.as_raw_fd(), FcntlArg::F_SETFL(OFlag::O_NONBLOCK)).map_err(
            |e| DriverError::Open {
                path: path.to_string(),
                source: e.into(),
            },
        )?;

        Ok(Self {
            path: path.to_string(),
            file,
        })
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the name the kernel reports for this joystick
    pub fn name(&self) -> Result<String, DriverError> {
        let mut buf = [0u8; NAME_SIZE];
        // SAFETY: the buffer is valid for writes of its full length
        unsafe { jsiocgname(self.file.as_raw_fd(), &mut buf) }?;
        let len = buf.iter().position(|b| *b == 0).unwrap_or(NAME_SIZE);
        Ok(String::from_utf8_lossy(&buf[..len]).to_string())
    }

    /// Poll the device and read all pending switch reports. Reads continue
    /// in batches until the device has no more data.
    pub fn poll(&mut self) -> Result<Vec<SwitchReport>, DriverError> {
        let mut pending: Vec<u8> = Vec::new();
        let mut buf = [0u8; JS_EVENT_SIZE * JS_EVENT_BATCH];
        loop {
            let bytes_read = match self.file.read(&mut buf[..]) {
                Ok(n) => n,
                Err(e) if is_transient(&e) => break,
                Err(e) => return Err(DriverError::Read(e)),
            };
            pending.extend_from_slice(&buf[..bytes_read]);
            if bytes_read < buf.len() {
                break;
            }
        }

        decode_reports(&pending)
    }
}

/// Decode a buffer of joystick event records. A trailing partial record is
/// ignored.
pub fn decode_reports(buf: &[u8]) -> Result<Vec<SwitchReport>, DriverError> {
    let mut reports = Vec::with_capacity(buf.len() / JS_EVENT_SIZE);
    for chunk in buf.chunks_exact(JS_EVENT_SIZE) {
        let Ok(bytes) = <[u8; JS_EVENT_SIZE]>::try_from(chunk) else {
            continue;
        };
        let report = JsEventReport::unpack(&bytes)?;
        let kind = match report.event_type & !JS_EVENT_INIT {
            JS_EVENT_AXIS => "axis",
            JS_EVENT_BUTTON => "button",
            _ => "unknown",
        };
        if report.is_init() {
            log::trace!("Initial state of {kind} {}: {report:?}", report.number);
        } else {
            log::trace!("Joystick {kind} {}: {report:?}", report.number);
        }
        reports.push(report.into());
    }

    Ok(reports)
}

/// Evdev device used in place of a joystick for testing switch configs
/// without the real hardware
#[derive(Debug)]
pub struct PseudoDriver {
    path: String,
    device: Device,
}

impl PseudoDriver {
    pub fn open(path: &str) -> Result<Self, DriverError> {
        log::debug!("Opening pseudo switch device at: {path}");
        let open_err = |source: io::Error| DriverError::Open {
            path: path.to_string(),
            source,
        };
        let device = Device::open(path).map_err(open_err)?;

        // Set the device to do non-blocking reads
        let raw_fd = device.as_raw_fd();
        nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))
            .map_err(|e| open_err(e.into()))?;

        Ok(Self {
            path: path.to_string(),
            device,
        })
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn name(&self) -> String {
        self.device.name().unwrap_or_default().to_string()
    }

    /// Poll the device and read all pending switch reports
    pub fn poll(&mut self) -> Result<Vec<SwitchReport>, DriverError> {
        let events = match self.device.fetch_events() {
            Ok(events) => events,
            Err(e) if is_transient(&e) => return Ok(vec![]),
            Err(e) => return Err(DriverError::Read(e)),
        };

        // Sync events carry no switch state
        let reports = events
            .filter(|e| e.event_type() != EventType::SYNCHRONIZATION)
            .map(|e| SwitchReport::from(&e))
            .collect();

        Ok(reports)
    }
}

/// Source of raw switch reports
#[derive(Debug)]
pub enum SwitchDevice {
    Joystick(Driver),
    Pseudo(PseudoDriver),
}

impl SwitchDevice {
    pub fn path(&self) -> &str {
        match self {
            SwitchDevice::Joystick(driver) => driver.path(),
            SwitchDevice::Pseudo(driver) => driver.path(),
        }
    }

    pub fn poll(&mut self) -> Result<Vec<SwitchReport>, DriverError> {
        match self {
            SwitchDevice::Joystick(driver) => driver.poll(),
            SwitchDevice::Pseudo(driver) => driver.poll(),
        }
    }
}
