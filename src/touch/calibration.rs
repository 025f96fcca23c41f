use std::{fmt::Display, fs, io, path::Path};

use thiserror::Error;

/// Display width used when the calibration file does not define one
pub const DEFAULT_WIDTH: i32 = 1920;
/// Display height used when the calibration file does not define one
pub const DEFAULT_HEIGHT: i32 = 1080;
/// Largest supported display dimension
pub const MAX_DIMENSION: i32 = 8192;

const KEY_WIDTH: &str = "DWIDTH";
const KEY_HEIGHT: &str = "DHEIGHT";

/// Possible errors loading, saving or applying a calibration
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Unable to access calibration file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("Calibrated X range is empty: {low}..{high}")]
    EmptyXRange { low: i32, high: i32 },
    #[error("Calibrated Y range is empty: {low}..{high}")]
    EmptyYRange { low: i32, high: i32 },
    #[error("Failed to read touch device: {0}")]
    Device(io::Error),
}

/// Raw touch panel coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// Screen corners in calibration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Calibration file key of this corner, e.g. "POSITION1"
    pub fn key(&self) -> String {
        format!("POSITION{}", self.index() + 1)
    }
}

impl Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Corner::TopLeft => "Top-Left",
            Corner::TopRight => "Top-Right",
            Corner::BottomLeft => "Bottom-Left",
            Corner::BottomRight => "Bottom-Right",
        };
        write!(f, "{name}")
    }
}

/// Contents of the calibration file: display size and the raw panel
/// coordinates measured at each corner of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calibration {
    pub width: i32,
    pub height: i32,
    /// Indexed by [Corner::index]
    pub corners: [Point; 4],
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            corners: [Point::default(); 4],
        }
    }
}

impl Calibration {
    /// Load a [Calibration] from the given path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CalibrationError> {
        let content = fs::read_to_string(path)?;
        Calibration::parse(content.as_str())
    }

    /// Parse `KEY=VALUE` lines. Corner values are written as `X*Y`. Lines
    /// starting with '#' and unknown keys are ignored.
    pub fn parse(content: &str) -> Result<Self, CalibrationError> {
        let mut calibration = Calibration::default();

        for line in content.lines() {
            if line.starts_with('#') {
                continue;
            }
            let mut fields = line.split(['=', '*']).map(str::trim);
            let Some(key) = fields.next() else {
                continue;
            };

            let mut next_value = || -> Result<i32, CalibrationError> {
                let value = fields.next().unwrap_or_default();
                value.parse().map_err(|_| CalibrationError::InvalidValue {
                    key: key.to_string(),
                    value: line.to_string(),
                })
            };

            match key {
                KEY_WIDTH => calibration.width = next_value()?,
                KEY_HEIGHT => calibration.height = next_value()?,
                _ => {
                    let Some(corner) = Corner::ALL.iter().find(|c| c.key() == key) else {
                        continue;
                    };
                    let x = next_value()?;
                    let y = next_value()?;
                    calibration.corners[corner.index()] = Point::new(x, y);
                }
            }
        }

        for (key, value) in [(KEY_WIDTH, calibration.width), (KEY_HEIGHT, calibration.height)] {
            if value <= 0 || value > MAX_DIMENSION {
                return Err(CalibrationError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(calibration)
    }

    /// Returns the calibration in file format
    pub fn to_config_string(&self) -> String {
        let mut content = format!("{KEY_WIDTH}={}\n{KEY_HEIGHT}={}\n", self.width, self.height);
        for corner in Corner::ALL {
            let point = self.corners[corner.index()];
            content.push_str(&format!("{}={}*{}\n", corner.key(), point.x, point.y));
        }
        content
    }

    /// Write the calibration to the given path, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CalibrationError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_config_string())?;
        Ok(())
    }

    /// Derive the transform bounds. Corner pairs are swapped when the panel
    /// axis runs opposite to the screen axis.
    pub fn bounds(&self) -> Result<Bounds, CalibrationError> {
        let mut pos = self.corners;
        let (tl, tr, bl, br) = (0, 1, 2, 3);

        let reverse_x = pos[tl].x > pos[tr].x;
        if reverse_x {
            let (a, b) = (pos[tl].x, pos[bl].x);
            pos[tl].x = pos[tr].x;
            pos[tr].x = a;
            pos[bl].x = pos[br].x;
            pos[br].x = b;
            log::debug!("Reverse X");
        }

        let reverse_y = pos[tl].y > pos[bl].y;
        if reverse_y {
            let (a, b) = (pos[tl].y, pos[tr].y);
            pos[tl].y = pos[bl].y;
            pos[bl].y = a;
            pos[tr].y = pos[br].y;
            pos[br].y = b;
            log::debug!("Reverse Y");
        }

        let x_low = (pos[tl].x + pos[bl].x) / 2;
        let x_high = (pos[tr].x + pos[br].x) / 2;
        if x_high <= x_low {
            return Err(CalibrationError::EmptyXRange {
                low: x_low,
                high: x_high,
            });
        }

        let y_low = (pos[tl].y + pos[tr].y) / 2;
        let y_high = (pos[bl].y + pos[br].y) / 2;
        if y_high <= y_low {
            return Err(CalibrationError::EmptyYRange {
                low: y_low,
                high: y_high,
            });
        }

        Ok(Bounds {
            x_low,
            x_high,
            y_low,
            y_high,
            reverse_x,
            reverse_y,
        })
    }
}

/// Raw coordinate range covering the screen on each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x_low: i32,
    pub x_high: i32,
    pub y_low: i32,
    pub y_high: i32,
    pub reverse_x: bool,
    pub reverse_y: bool,
}
