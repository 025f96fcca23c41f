use std::{
    io,
    os::fd::AsRawFd,
    time::{Duration, Instant},
};

use evdev::{AbsoluteAxisCode, Device, EventSummary, InputEvent};
use nix::fcntl::{FcntlArg, OFlag};
use tokio::time::interval;

use super::calibration::{Calibration, CalibrationError, Corner, Point};

/// Number of touches sampled at each corner
pub const SAMPLES_PER_CORNER: usize = 5;
/// Distance corner positions are moved towards the screen edge
pub const EDGE_DELTA: i32 = 50;
/// Raw values above this are moved outward, values below towards zero
const EDGE_THRESHOLD: i32 = 256;
/// Number of X and Y updates that make up one touch (touch on and off)
const UPDATES_PER_TOUCH: u32 = 2;
/// How long the panel must be idle before the next touch is sampled
const QUIET_PERIOD: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Returns the median of the given values. The slice is reordered.
pub fn median(values: &mut [i32]) -> i32 {
    if values.is_empty() {
        return 0;
    }
    let mid = values.len() / 2;
    let (_, value, _) = values.select_nth_unstable(mid);
    *value
}

/// Move a sampled corner coordinate towards the nearest screen edge so the
/// calibrated range covers the full display
pub fn edge_snap(value: i32) -> i32 {
    if value > EDGE_THRESHOLD {
        value + EDGE_DELTA
    } else if value > EDGE_DELTA {
        value - EDGE_DELTA
    } else {
        0
    }
}

/// Reduce the touches sampled at one corner to a single position by taking
/// the median of each axis independently
pub fn corner_position(samples: &[Point]) -> Point {
    let mut xs: Vec<i32> = samples.iter().map(|p| p.x).collect();
    let mut ys: Vec<i32> = samples.iter().map(|p| p.y).collect();
    Point::new(edge_snap(median(&mut xs)), edge_snap(median(&mut ys)))
}

/// Tracks coordinate updates until a full touch has been seen
#[derive(Debug, Default, Clone)]
pub struct TouchCollector {
    x: i32,
    y: i32,
    x_updates: u32,
    y_updates: u32,
}

impl TouchCollector {
    /// Feed a batch of events. Returns the last reported position once both
    /// axes have been updated for touch on and off.
    pub fn feed(&mut self, events: &[InputEvent]) -> Option<Point> {
        for event in events {
            match event.destructure() {
                EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_X, value) => {
                    self.x = value;
                    self.x_updates += 1;
                }
                EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_Y, value) => {
                    self.y = value;
                    self.y_updates += 1;
                }
                _ => (),
            }
        }

        if self.x_updates >= UPDATES_PER_TOUCH && self.y_updates >= UPDATES_PER_TOUCH {
            return Some(Point::new(self.x, self.y));
        }
        None
    }
}

/// Interactive sampler that records the raw touch position at each screen
/// corner
pub struct Sampler {
    path: String,
    device: Device,
}

impl Sampler {
    /// Open the given touch event device for non-blocking reads
    pub fn open(path: &str) -> io::Result<Self> {
        log::debug!("Opening touch device at: {path}");
        let device = Device::open(path)?;
        let raw_fd = device.as_raw_fd();
        nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))?;

        Ok(Self {
            path: path.to_string(),
            device,
        })
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Sample all four corners and return the resulting calibration for a
    /// display of the given size
    pub async fn run(&mut self, width: i32, height: i32) -> Result<Calibration, CalibrationError> {
        let mut calibration = Calibration {
            width,
            height,
            ..Default::default()
        };

        for corner in Corner::ALL {
            println!("+------------------------------------------------+");
            println!("| Touch the {corner} corner of the screen {SAMPLES_PER_CORNER} times");
            let mut samples = Vec::with_capacity(SAMPLES_PER_CORNER);
            for i in 0..SAMPLES_PER_CORNER {
                let point = self.read_touch().await?;
                println!("| # {i}: {point}");
                samples.push(point);
            }

            let position = corner_position(&samples);
            log::debug!("{corner} position: {position}");
            calibration.corners[corner.index()] = position;
        }

        Ok(calibration)
    }

    /// Wait for one complete touch, then for the panel to go quiet
    async fn read_touch(&mut self) -> Result<Point, CalibrationError> {
        let mut collector = TouchCollector::default();
        let mut interval = interval(POLL_INTERVAL);

        let point = loop {
            interval.tick().await;
            let events = self.fetch()?;
            if events.is_empty() {
                continue;
            }
            if let Some(point) = collector.feed(&events) {
                break point;
            }
        };

        // Drain anything left over from this touch
        let mut last_event = Instant::now();
        while last_event.elapsed() < QUIET_PERIOD {
            interval.tick().await;
            if !self.fetch()?.is_empty() {
                last_event = Instant::now();
            }
        }

        Ok(point)
    }

    fn fetch(&mut self) -> Result<Vec<InputEvent>, CalibrationError> {
        match self.device.fetch_events() {
            Ok(events) => Ok(events.collect()),
            Err(e) => match e.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(vec![]),
                _ => Err(CalibrationError::Device(e)),
            },
        }
    }
}
