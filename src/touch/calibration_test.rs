use std::error::Error;

use crate::touch::calibration::{
    Bounds, Calibration, CalibrationError, Corner, Point, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

const CALIBRATION_CONF: &str = "# Touch panel calibration
DWIDTH=800
DHEIGHT=480
POSITION1=100*100
POSITION2=900*100
POSITION3=100*900
POSITION4=900*900
";

#[test]
fn test_parse_calibration() -> Result<(), Box<dyn Error>> {
    let calibration = Calibration::parse(CALIBRATION_CONF)?;

    assert_eq!(calibration.width, 800);
    assert_eq!(calibration.height, 480);
    assert_eq!(
        calibration.corners[Corner::TopRight.index()],
        Point::new(900, 100)
    );
    assert_eq!(
        calibration.corners[Corner::BottomLeft.index()],
        Point::new(100, 900)
    );

    Ok(())
}

#[test]
fn test_default_dimensions() -> Result<(), Box<dyn Error>> {
    let calibration = Calibration::parse("POSITION1=1*2\n\nUNKNOWN=7\n")?;

    assert_eq!(calibration.width, DEFAULT_WIDTH);
    assert_eq!(calibration.height, DEFAULT_HEIGHT);
    assert_eq!(calibration.corners[0], Point::new(1, 2));
    assert_eq!(calibration.corners[3], Point::default());

    Ok(())
}

#[test]
fn test_invalid_values() {
    let result = Calibration::parse("DWIDTH=wide\n");
    assert!(matches!(result, Err(CalibrationError::InvalidValue { .. })));

    let result = Calibration::parse("POSITION2=100\n");
    assert!(matches!(result, Err(CalibrationError::InvalidValue { .. })));

    let result = Calibration::parse("DHEIGHT=0\n");
    assert!(matches!(result, Err(CalibrationError::InvalidValue { .. })));
}

#[test]
fn test_config_string() -> Result<(), Box<dyn Error>> {
    let calibration = Calibration::parse(CALIBRATION_CONF)?;
    let content = calibration.to_config_string();

    assert_eq!(
        content,
        "DWIDTH=800\nDHEIGHT=480\nPOSITION1=100*100\nPOSITION2=900*100\n\
         POSITION3=100*900\nPOSITION4=900*900\n"
    );

    Ok(())
}

#[test]
fn test_bounds() -> Result<(), Box<dyn Error>> {
    let calibration = Calibration::parse(CALIBRATION_CONF)?;
    let bounds = calibration.bounds()?;

    assert_eq!(
        bounds,
        Bounds {
            x_low: 100,
            x_high: 900,
            y_low: 100,
            y_high: 900,
            reverse_x: false,
            reverse_y: false,
        }
    );

    Ok(())
}

#[test]
fn test_reversed_bounds() -> Result<(), Box<dyn Error>> {
    let calibration = Calibration {
        width: 800,
        height: 480,
        corners: [
            Point::new(910, 890),
            Point::new(90, 900),
            Point::new(890, 110),
            Point::new(110, 100),
        ],
    };
    let bounds = calibration.bounds()?;

    assert!(bounds.reverse_x);
    assert!(bounds.reverse_y);
    assert_eq!((bounds.x_low, bounds.x_high), (100, 900));
    assert_eq!((bounds.y_low, bounds.y_high), (105, 895));

    Ok(())
}

#[test]
fn test_empty_range_rejected() {
    // Left and right edges averaged to the same value
    let calibration = Calibration {
        corners: [
            Point::new(100, 100),
            Point::new(500, 100),
            Point::new(900, 900),
            Point::new(500, 900),
        ],
        ..Default::default()
    };
    assert!(matches!(
        calibration.bounds(),
        Err(CalibrationError::EmptyXRange { .. })
    ));

    let calibration = Calibration {
        corners: [
            Point::new(100, 500),
            Point::new(900, 500),
            Point::new(100, 500),
            Point::new(900, 500),
        ],
        ..Default::default()
    };
    assert!(matches!(
        calibration.bounds(),
        Err(CalibrationError::EmptyYRange { .. })
    ));

    // Missing corners
    let calibration = Calibration::default();
    assert!(calibration.bounds().is_err());
}
