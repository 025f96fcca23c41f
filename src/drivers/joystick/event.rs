use evdev::InputEvent;
use packed_struct::types::SizedInteger;

use super::js_report::JsEventReport;

/// Raw switch report normalized from either a joystick device or an evdev
/// pseudo device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchReport {
    /// Timestamp in milliseconds
    pub time_ms: u32,
    /// Event class (joystick event type or evdev event type)
    pub class: u16,
    /// Event index (joystick axis/button number or evdev code)
    pub index: u16,
    pub value: i32,
}

impl From<JsEventReport> for SwitchReport {
    fn from(report: JsEventReport) -> Self {
        Self {
            time_ms: report.time.to_primitive(),
            class: report.event_type as u16,
            index: report.number as u16,
            value: report.value.to_primitive() as i32,
        }
    }
}

impl From<&InputEvent> for SwitchReport {
    fn from(event: &InputEvent) -> Self {
        let time = event
            .timestamp()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        let time_ms = (time.as_secs() % 1000) as u32 * 1000 + time.subsec_micros() / 1000;

        let class = event.event_type().0;
        let mut index = event.code();
        let mut value = event.value();

        // Pseudo devices use 9 in place of a zero axis value and button 0
        if class == 2 && value == 9 {
            value = 0;
        } else if class == 1 && index == 9 {
            index = 0;
        }

        Self {
            time_ms,
            class,
            index,
            value,
        }
    }
}
