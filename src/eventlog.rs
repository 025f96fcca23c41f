//! Replayable event logs. Each entry is written as `<name>=<value>` followed
//! by the event timestamp, and idle gaps between entries are written as
//! `sleep <seconds>` lines so that a log can be played back with its original
//! timing.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use evdev::{AbsoluteAxisCode, EventSummary, InputEvent, KeyCode};

/// Gaps shorter than this are not written as sleeps
const MIN_SLEEP: Duration = Duration::from_millis(10);
/// Gaps are rounded to the nearest millisecond
const ROUNDING: Duration = Duration::from_micros(500);

/// Which side of the touch translator is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchLog {
    /// Raw events read from the touch panel
    Input,
    /// Calibrated events written to the virtual device
    Output,
}

#[derive(Debug, Default)]
pub struct EventLog {
    /// Wall clock time of the last written sleep
    last: Option<Duration>,
}

impl EventLog {
    /// Format a log entry written at wall clock time `now` for an event with
    /// the given timestamp. The entry is preceded by a sleep line if enough
    /// time has passed since the last sleep.
    pub fn entry(&mut self, now: Duration, name: &str, value: i32, time: Duration) -> String {
        let mut out = String::new();
        match self.last {
            Some(last) => {
                let gap = now.saturating_sub(last) + ROUNDING;
                if gap >= MIN_SLEEP {
                    out.push_str(&format!(
                        "sleep {}.{:03}\n",
                        gap.as_secs(),
                        gap.subsec_millis()
                    ));
                    self.last = Some(now);
                }
            }
            None => self.last = Some(now),
        }
        out.push_str(&format!(
            "{name}={value}\t# {}.{:03}",
            time.as_secs(),
            time.subsec_millis()
        ));

        out
    }

    /// Print a log entry for an event with the given timestamp
    pub fn print(&mut self, name: &str, value: i32, time: Duration) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        println!("{}", self.entry(now, name, value, time));
    }

    /// Print a log entry for a touch event. Events without a log name are
    /// skipped.
    pub fn print_touch(&mut self, event: &InputEvent, time: Duration) {
        if let Some(name) = touch_event_name(event) {
            self.print(name, event.value(), time);
        }
    }
}

/// Returns the log name of a touch event, or `None` if the event is not
/// logged
pub fn touch_event_name(event: &InputEvent) -> Option<&'static str> {
    match event.destructure() {
        EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_X, _) => Some("X"),
        EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_Y, _) => Some("Y"),
        EventSummary::Key(_, KeyCode::BTN_TOUCH, _) => Some("Touch"),
        EventSummary::Key(_, KeyCode::BTN_LEFT, _) => Some("Button"),
        _ => None,
    }
}

/// Returns the timestamp of the given event since the epoch
pub fn event_time(event: &InputEvent) -> Duration {
    event
        .timestamp()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}
