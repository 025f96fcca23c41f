pub const BUS_NAME: &str = "org.inputbridge.InputBridge";
pub const SWITCH_DEVICE_PATH: &str = "/org/inputbridge/InputBridge/Switch";

/// Name of the virtual pointer device created by the touch translator
pub const TOUCH_TARGET_NAME: &str = "inputbridge touchscreen";
/// Substring identifying supported touch panels in /proc/bus/input/devices
pub const TOUCH_PANEL_MATCH: &str = "eGalax";

/// Overrides the switch controller config file path
pub const ENV_SWITCH_CONF: &str = "INPUTBRIDGE_SWITCH_CONF";
/// Name of an evdev pseudo device to read switch events from instead of a
/// joystick device
pub const ENV_SWITCH_PSEUDO: &str = "INPUTBRIDGE_SWITCH_DEV";
/// Overrides the touch calibration file path
pub const ENV_CALIBRATION_CONF: &str = "INPUTBRIDGE_CALIBRATION_CONF";
/// Name of an evdev pseudo device to calibrate and translate instead of the
/// detected touch panel
pub const ENV_TOUCH_DEV: &str = "INPUTBRIDGE_TOUCH_DEV";
