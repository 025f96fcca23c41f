use std::time::Duration;

use evdev::{AbsoluteAxisCode, EventType, InputEvent, KeyCode, MiscCode};

use crate::eventlog::{touch_event_name, EventLog};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_first_entry_has_no_sleep() {
    let mut log = EventLog::default();
    let entry = log.entry(ms(5_000), "X", 512, ms(1_700_000_123_456));
    assert_eq!(entry, "X=512\t# 1700000123.456");
}

#[test]
fn test_sleep_between_entries() {
    let mut log = EventLog::default();
    log.entry(ms(5_000), "Touch", 1, ms(100));

    // 1.25 s later
    let entry = log.entry(ms(6_250), "Touch", 0, ms(1_350));
    assert_eq!(entry, "sleep 1.250\nTouch=0\t# 1.350");

    // Gaps are measured from the last sleep
    let entry = log.entry(ms(6_255), "Y", 7, ms(1_355));
    assert_eq!(entry, "Y=7\t# 1.355");
    let entry = log.entry(ms(6_262), "Y", 8, ms(1_362));
    assert_eq!(entry, "sleep 0.012\nY=8\t# 1.362");
}

#[test]
fn test_short_gap_rounding() {
    let mut log = EventLog::default();
    log.entry(Duration::ZERO, "Gear", -1, ms(10));

    // 9.4 ms stays below the sleep threshold
    let entry = log.entry(Duration::from_micros(9_400), "Gear", 0, ms(19));
    assert_eq!(entry, "Gear=0\t# 0.019");

    // 9.5 ms rounds up to 10 ms
    let entry = log.entry(Duration::from_micros(9_500), "Gear", 1, ms(20));
    assert_eq!(entry, "sleep 0.010\nGear=1\t# 0.020");
}

#[test]
fn test_touch_event_names() {
    let abs = |code: AbsoluteAxisCode| InputEvent::new(EventType::ABSOLUTE.0, code.0, 1);
    let key = |code: KeyCode| InputEvent::new(EventType::KEY.0, code.0, 1);

    assert_eq!(touch_event_name(&abs(AbsoluteAxisCode::ABS_X)), Some("X"));
    assert_eq!(touch_event_name(&abs(AbsoluteAxisCode::ABS_Y)), Some("Y"));
    assert_eq!(touch_event_name(&key(KeyCode::BTN_TOUCH)), Some("Touch"));
    assert_eq!(touch_event_name(&key(KeyCode::BTN_LEFT)), Some("Button"));
    assert_eq!(
        touch_event_name(&abs(AbsoluteAxisCode::ABS_PRESSURE)),
        None
    );
    let scan = InputEvent::new(EventType::MISC.0, MiscCode::MSC_SCAN.0, 4);
    assert_eq!(touch_event_name(&scan), None);
}
