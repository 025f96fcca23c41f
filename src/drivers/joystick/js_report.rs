use packed_struct::prelude::*;

/// Size of a single joystick event record
pub const JS_EVENT_SIZE: usize = 8;
/// Number of records read from the device at once
pub const JS_EVENT_BATCH: usize = 8;

/// Button pressed/released
pub const JS_EVENT_BUTTON: u8 = 0x01;
/// Axis moved
pub const JS_EVENT_AXIS: u8 = 0x02;
/// Initial state of the device, OR'd with the event type
pub const JS_EVENT_INIT: u8 = 0x80;

// Kernel joystick event (struct js_event), little endian on all supported
// targets.
// time: 0x00002a3c, value: -32767, type: axis, number: 5
// 3c 2a 00 00 01 80 02 05
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "8")]
pub struct JsEventReport {
    /// Event timestamp in milliseconds
    #[packed_field(bytes = "0..=3", endian = "lsb")]
    pub time: Integer<u32, packed_bits::Bits<32>>,
    #[packed_field(bytes = "4..=5", endian = "lsb")]
    pub value: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "6")]
    pub event_type: u8,
    /// Axis or button number
    #[packed_field(bytes = "7")]
    pub number: u8,
}

impl Default for JsEventReport {
    fn default() -> Self {
        Self {
            time: Integer::from_primitive(0),
            value: Integer::from_primitive(0),
            event_type: JS_EVENT_BUTTON,
            number: 0,
        }
    }
}

impl JsEventReport {
    /// Returns true if this record reports initial device state rather than
    /// a user action
    pub fn is_init(&self) -> bool {
        self.event_type & JS_EVENT_INIT != 0
    }
}
