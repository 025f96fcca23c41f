use std::io;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AbsInfo, AbsoluteAxisCode, AttributeSet, BusType, InputEvent, InputId,
    KeyCode, MiscCode, UinputAbsSetup,
};

use crate::constants::TOUCH_TARGET_NAME;

/// Virtual absolute pointer that receives calibrated touch events
pub struct TouchTarget {
    device: VirtualDevice,
}

impl TouchTarget {
    /// Create a new uinput device with an absolute range matching the given
    /// screen size
    pub fn new(width: i32, height: i32) -> io::Result<Self> {
        log::debug!("Creating virtual touch device with size {width}x{height}");

        let mut keys = AttributeSet::<KeyCode>::new();
        keys.insert(KeyCode::BTN_LEFT);

        let mut mscs = AttributeSet::<MiscCode>::new();
        mscs.insert(MiscCode::MSC_SCAN);

        let abs_x = UinputAbsSetup::new(
            AbsoluteAxisCode::ABS_X,
            AbsInfo::new(0, 0, width, 0, 0, 0),
        );
        let abs_y = UinputAbsSetup::new(
            AbsoluteAxisCode::ABS_Y,
            AbsInfo::new(0, 0, height, 0, 0, 0),
        );

        let id = InputId::new(BusType(3), 0, 0, 0);
        let device = VirtualDeviceBuilder::new()?
            .name(TOUCH_TARGET_NAME)
            .input_id(id)
            .with_keys(&keys)?
            .with_msc(&mscs)?
            .with_absolute_axis(&abs_x)?
            .with_absolute_axis(&abs_y)?
            .build()?;

        Ok(Self { device })
    }

    /// Write a batch of events to the virtual device. The kernel appends the
    /// trailing SYN_REPORT.
    pub fn emit(&mut self, events: &[InputEvent]) -> io::Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        log::trace!("Emitting events: {events:?}");
        self.device.emit(events)
    }
}
