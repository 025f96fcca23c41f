use std::{fmt::Display, str::FromStr};

use evdev::{AbsoluteAxisCode, EventSummary, EventType, InputEvent, KeyCode};

use super::calibration::{Bounds, Calibration, CalibrationError};

/// Screen rotation applied after calibration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Normal),
            "90" => Ok(Self::Rotate90),
            "180" => Ok(Self::Rotate180),
            "270" => Ok(Self::Rotate270),
            _ => Err(format!("invalid rotation '{s}', expected 0, 90, 180 or 270")),
        }
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let degrees = match self {
            Rotation::Normal => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        };
        write!(f, "{degrees}")
    }
}

/// Touch-down is held back until both coordinates have been updated
const AWAIT_X: u8 = 0b01;
const AWAIT_Y: u8 = 0b10;

/// Converts raw touch panel events into calibrated screen coordinates and
/// replaces touch contact with left button presses.
#[derive(Debug, Clone)]
pub struct TouchTransformer {
    width: i32,
    height: i32,
    bounds: Bounds,
    rotation: Rotation,
    queue: u8,
}

impl TouchTransformer {
    /// Create a new transformer. Fails if the calibration does not describe
    /// a usable coordinate range.
    pub fn new(calibration: &Calibration, rotation: Rotation) -> Result<Self, CalibrationError> {
        let bounds = calibration.bounds()?;
        log::debug!(
            "Calibrated bounds: x={}..{} y={}..{} reverse_x={} reverse_y={}",
            bounds.x_low,
            bounds.x_high,
            bounds.y_low,
            bounds.y_high,
            bounds.reverse_x,
            bounds.reverse_y
        );
        Ok(Self {
            width: calibration.width,
            height: calibration.height,
            bounds,
            rotation,
            queue: 0,
        })
    }

    /// Returns true if a touch-down is waiting for coordinate updates
    pub fn is_pending(&self) -> bool {
        self.queue != 0
    }

    /// Translate a single input event into zero or more output events
    pub fn translate(&mut self, event: &InputEvent) -> Vec<InputEvent> {
        match event.destructure() {
            EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_X, value) => {
                let x = calibrate(
                    value,
                    self.bounds.x_low,
                    self.bounds.x_high,
                    self.width,
                    self.bounds.reverse_x,
                );

                let (code, value) = match self.rotation {
                    Rotation::Normal => (AbsoluteAxisCode::ABS_X, x),
                    Rotation::Rotate90 => (AbsoluteAxisCode::ABS_Y, self.width - x - 1),
                    Rotation::Rotate180 => (AbsoluteAxisCode::ABS_X, self.width - x - 1),
                    Rotation::Rotate270 => (AbsoluteAxisCode::ABS_Y, x),
                };
                log::trace!("ABS_X {} => {code:?} {value}", event.value());
                self.coordinate(AWAIT_X, code, value)
            }
            EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_Y, value) => {
                let y = calibrate(
                    value,
                    self.bounds.y_low,
                    self.bounds.y_high,
                    self.height,
                    self.bounds.reverse_y,
                );

                let (code, value) = match self.rotation {
                    Rotation::Normal => (AbsoluteAxisCode::ABS_Y, y),
                    Rotation::Rotate90 => (AbsoluteAxisCode::ABS_X, y),
                    Rotation::Rotate180 => (AbsoluteAxisCode::ABS_Y, self.height - y - 1),
                    Rotation::Rotate270 => (AbsoluteAxisCode::ABS_X, self.height - y - 1),
                };
                log::trace!("ABS_Y {} => {code:?} {value}", event.value());
                self.coordinate(AWAIT_Y, code, value)
            }
            EventSummary::Key(_, KeyCode::BTN_TOUCH, value) => {
                if value != 0 {
                    log::trace!("BTN_TOUCH down, waiting for coordinates");
                    self.queue = AWAIT_X | AWAIT_Y;
                    return vec![];
                }
                log::trace!("BTN_TOUCH up");
                self.queue = 0;
                vec![left_button(0)]
            }
            _ => vec![*event],
        }
    }

    /// Emit a coordinate event, followed by the held back button press once
    /// both coordinates have been updated
    fn coordinate(&mut self, flag: u8, code: AbsoluteAxisCode, value: i32) -> Vec<InputEvent> {
        let event = InputEvent::new(EventType::ABSOLUTE.0, code.0, value);
        if self.queue & flag == 0 {
            return vec![event];
        }
        self.queue &= !flag;
        if self.queue != 0 {
            return vec![event];
        }
        vec![event, left_button(1)]
    }
}

/// Linearly map a raw value in `low..high` onto `0..dimension`, mirror it if
/// the axis is reversed and clamp it to the screen
fn calibrate(raw: i32, low: i32, high: i32, dimension: i32, reverse: bool) -> i32 {
    let dimension = dimension as i64;
    let scaled = dimension * (raw as i64 - low as i64) / (high as i64 - low as i64);
    let scaled = if reverse { dimension - scaled } else { scaled };
    scaled.clamp(0, dimension - 1) as i32
}

fn left_button(value: i32) -> InputEvent {
    InputEvent::new(EventType::KEY.0, KeyCode::BTN_LEFT.0, value)
}
