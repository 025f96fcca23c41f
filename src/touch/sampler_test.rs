use evdev::{AbsoluteAxisCode, EventType, InputEvent, KeyCode};

use crate::touch::{
    calibration::Point,
    sampler::{corner_position, edge_snap, median, TouchCollector},
};

fn abs(code: AbsoluteAxisCode, value: i32) -> InputEvent {
    InputEvent::new(EventType::ABSOLUTE.0, code.0, value)
}

#[test]
fn test_median() {
    assert_eq!(median(&mut [5, 1, 4, 2, 3]), 3);
    assert_eq!(median(&mut [7, 7, 7, 7, 7]), 7);
    assert_eq!(median(&mut [9]), 9);
    assert_eq!(median(&mut []), 0);
}

#[test]
fn test_median_ignores_single_outlier() {
    for position in 0..5 {
        for outlier in [0, 4095, -1, 10_000] {
            let mut values = [300; 5];
            values[position] = outlier;
            assert_eq!(median(&mut values), 300, "outlier {outlier} at {position}");
        }
    }
}

#[test]
fn test_edge_snap() {
    assert_eq!(edge_snap(3900), 3950);
    assert_eq!(edge_snap(257), 307);
    assert_eq!(edge_snap(256), 206);
    assert_eq!(edge_snap(51), 1);
    assert_eq!(edge_snap(50), 0);
    assert_eq!(edge_snap(0), 0);
}

#[test]
fn test_corner_position() {
    let samples = [
        Point::new(120, 3900),
        Point::new(118, 3905),
        Point::new(4000, 3898),
        Point::new(121, 3902),
        Point::new(119, 12),
    ];
    // Medians are 120 and 3900
    assert_eq!(corner_position(&samples), Point::new(70, 3950));
}

#[test]
fn test_collector_needs_two_updates_per_axis() {
    let mut collector = TouchCollector::default();
    let touch = InputEvent::new(EventType::KEY.0, KeyCode::BTN_TOUCH.0, 1);

    let first = [touch, abs(AbsoluteAxisCode::ABS_X, 100), abs(AbsoluteAxisCode::ABS_Y, 200)];
    assert_eq!(collector.feed(&first), None);

    // Only X is updated again
    assert_eq!(collector.feed(&[abs(AbsoluteAxisCode::ABS_X, 110)]), None);

    let last = [abs(AbsoluteAxisCode::ABS_Y, 210), abs(AbsoluteAxisCode::ABS_X, 111)];
    assert_eq!(collector.feed(&last), Some(Point::new(111, 210)));
}

#[test]
fn test_collector_ignores_other_axes() {
    let mut collector = TouchCollector::default();
    let events = [
        abs(AbsoluteAxisCode::ABS_PRESSURE, 10),
        abs(AbsoluteAxisCode::ABS_PRESSURE, 11),
        abs(AbsoluteAxisCode::ABS_X, 1),
        abs(AbsoluteAxisCode::ABS_X, 2),
        abs(AbsoluteAxisCode::ABS_Y, 3),
    ];
    assert_eq!(collector.feed(&events), None);
}
