//! Locates the input devices handled by InputBridge: joystick switch
//! controllers (or evdev pseudo devices standing in for them) and touch
//! panels.

use std::{env, io, path::PathBuf};

use thiserror::Error;

use crate::{
    config::path::{find_switch_config, get_switch_config_paths},
    constants::{ENV_SWITCH_PSEUDO, ENV_TOUCH_DEV, TOUCH_PANEL_MATCH},
    drivers::joystick::driver::{Driver, PseudoDriver, SwitchDevice},
    procfs,
};

/// Number of device nodes of each kind that are probed
pub const MAX_DEVICE_NODES: usize = 16;

/// Possible errors locating a device
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("No joystick device named '{0}' was found")]
    JoystickNotFound(String),
    #[error("No joystick device with a switch configuration was found")]
    NoConfiguredJoystick,
    #[error("No pseudo device named '{0}' was found")]
    PseudoNotFound(String),
    #[error("No touch panel was found")]
    TouchPanelNotFound,
    #[error("Unable to list input devices: {0}")]
    Io(#[from] io::Error),
}

/// Normalize a device name for matching and config lookup by removing
/// spaces and lowercasing, e.g. "Driving Force GT" becomes "drivingforcegt".
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// An opened switch device and the configuration that applies to it
#[derive(Debug)]
pub struct SwitchDeviceMatch {
    pub device: SwitchDevice,
    /// Normalized device name
    pub name: String,
    pub config_path: PathBuf,
}

/// Find and open the switch device to translate.
///
/// If the `INPUTBRIDGE_SWITCH_DEV` environment variable is set, evdev
/// devices are searched for one with that name. Otherwise joystick devices
/// are searched for the given device name. Without a device name the first
/// joystick that has a switch configuration (or any joystick, if an explicit
/// configuration is given) is used.
pub fn find_switch_device(
    device_name: Option<&str>,
    config: Option<PathBuf>,
) -> Result<SwitchDeviceMatch, DiscoveryError> {
    let pseudo = env::var(ENV_SWITCH_PSEUDO).ok().filter(|v| !v.is_empty());
    if let Some(pseudo) = pseudo {
        log::debug!("Using pseudo switch device: {pseudo}");
        return find_pseudo_device(&pseudo, config);
    }

    let wanted = device_name.map(normalize_name);
    for i in 0..MAX_DEVICE_NODES {
        let path = format!("/dev/input/js{i}");
        let Ok(driver) = Driver::open(&path) else {
            continue;
        };
        let name = match driver.name() {
            Ok(name) => normalize_name(&name),
            Err(e) => {
                log::debug!("Unable to get name of {path}: {e}");
                continue;
            }
        };
        log::debug!("Found joystick {path}: {name}");

        let config_path = match wanted.as_ref() {
            Some(wanted) => {
                if !wanted.eq_ignore_ascii_case(&name) {
                    continue;
                }
                config.clone().unwrap_or_else(|| switch_config_path(&name))
            }
            None => {
                let found = config.clone().or_else(|| find_switch_config(&name));
                let Some(config_path) = found else {
                    continue;
                };
                config_path
            }
        };

        return Ok(SwitchDeviceMatch {
            device: SwitchDevice::Joystick(driver),
            name,
            config_path,
        });
    }

    match device_name {
        Some(name) => Err(DiscoveryError::JoystickNotFound(name.to_string())),
        None => Err(DiscoveryError::NoConfiguredJoystick),
    }
}

fn find_pseudo_device(
    pseudo: &str,
    config: Option<PathBuf>,
) -> Result<SwitchDeviceMatch, DiscoveryError> {
    let wanted = normalize_name(pseudo);
    for i in 0..MAX_DEVICE_NODES {
        let path = format!("/dev/input/event{i}");
        let Ok(driver) = PseudoDriver::open(&path) else {
            continue;
        };
        let name = normalize_name(&driver.name());
        log::debug!("Found event device {path}: {name}");
        if !wanted.eq_ignore_ascii_case(&name) {
            continue;
        }

        let config_path = config.unwrap_or_else(|| switch_config_path(&name));
        return Ok(SwitchDeviceMatch {
            device: SwitchDevice::Pseudo(driver),
            name,
            config_path,
        });
    }

    Err(DiscoveryError::PseudoNotFound(pseudo.to_string()))
}

/// Returns the existing config for the given device, or the path where it is
/// expected so that load errors name it.
fn switch_config_path(name: &str) -> PathBuf {
    find_switch_config(name).unwrap_or_else(|| {
        let dirs = get_switch_config_paths();
        let dir = dirs.last().cloned().unwrap_or_default();
        dir.join(format!("{name}.conf"))
    })
}

/// Returns the event device path of the touch panel to calibrate or
/// translate. If the `INPUTBRIDGE_TOUCH_DEV` environment variable is set,
/// evdev devices are searched for one with that name. Otherwise the first
/// supported touch panel in /proc/bus/input/devices is used.
pub fn find_touch_device() -> Result<String, DiscoveryError> {
    if let Some(pseudo) = env::var(ENV_TOUCH_DEV).ok().filter(|v| !v.is_empty()) {
        log::debug!("Using pseudo touch device: {pseudo}");
        let wanted = normalize_name(&pseudo);
        for i in 0..MAX_DEVICE_NODES {
            let path = format!("/dev/input/event{i}");
            let Ok(device) = evdev::Device::open(&path) else {
                continue;
            };
            let name = normalize_name(device.name().unwrap_or_default());
            if wanted.eq_ignore_ascii_case(&name) {
                return Ok(path);
            }
        }
        return Err(DiscoveryError::PseudoNotFound(pseudo));
    }

    let devices = procfs::device::get_all()?;
    find_touch_panel(&devices).ok_or(DiscoveryError::TouchPanelNotFound)
}

/// Returns the event device path of the first supported touch panel in the
/// given device list
pub fn find_touch_panel(devices: &[procfs::device::Device]) -> Option<String> {
    devices
        .iter()
        .filter(|d| d.name.contains(TOUCH_PANEL_MATCH))
        .find_map(|d| d.event_handler())
        .map(|handler| format!("/dev/input/{handler}"))
}
