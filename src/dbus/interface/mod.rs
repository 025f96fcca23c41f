pub mod switch_device;

use crate::constants::SWITCH_DEVICE_PATH;

/// Returns the DBus object path for the switch device with the given
/// normalized controller name.
pub fn get_switch_device_path(normalized_name: &str) -> String {
    let name: String = normalized_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() {
        return format!("{}/unknown", SWITCH_DEVICE_PATH);
    }
    format!("{}/{name}", SWITCH_DEVICE_PATH)
}
