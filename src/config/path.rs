//! Module for searching for InputBridge config files

use std::{env, path::PathBuf};

use crate::constants::{ENV_CALIBRATION_CONF, ENV_SWITCH_CONF};

/// Base system fallback path to use if one cannot be found with XDG
const FALLBACK_BASE_PATH: &str = "/etc/inputbridge";

/// Returns the base path for configuration data
pub fn get_base_path() -> PathBuf {
    let Ok(base_dirs) = xdg::BaseDirectories::new() else {
        log::warn!("Unable to determine config base path. Using fallback path.");
        return PathBuf::from(FALLBACK_BASE_PATH);
    };

    // Get the config directories in preference order
    let mut config_dirs = vec![base_dirs.get_config_home()];
    config_dirs.extend(base_dirs.get_config_dirs());
    for dir in config_dirs {
        let dir = dir.join("inputbridge");
        if dir.exists() {
            return dir;
        }
    }

    log::debug!("Config base path not found. Using fallback path.");
    PathBuf::from(FALLBACK_BASE_PATH)
}

/// Returns a list of directories in load order to find switch controller
/// configurations. E.g. ["./rootfs/etc/inputbridge/switch", "/etc/inputbridge/switch"]
pub fn get_switch_config_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("./rootfs/etc/inputbridge/switch"),
        get_base_path().join("switch"),
        PathBuf::from(FALLBACK_BASE_PATH).join("switch"),
    ]
}

/// Returns the path of the switch configuration for the given normalized
/// controller name, e.g. "/etc/inputbridge/switch/gtforce.conf". The
/// `INPUTBRIDGE_SWITCH_CONF` environment variable overrides the lookup.
/// Returns `None` if no configuration exists for the controller.
pub fn find_switch_config(normalized_name: &str) -> Option<PathBuf> {
    if let Some(path) = env::var_os(ENV_SWITCH_CONF) {
        return Some(PathBuf::from(path));
    }

    let file_name = format!("{normalized_name}.conf");
    for dir in get_switch_config_paths() {
        let path = dir.join(&file_name);
        log::trace!("Checking for switch config: {path:?}");
        if path.is_file() {
            return Some(path);
        }
    }

    None
}

/// Returns the path to the touch calibration file. The
/// `INPUTBRIDGE_CALIBRATION_CONF` environment variable overrides the default.
pub fn get_calibration_path() -> PathBuf {
    if let Some(path) = env::var_os(ENV_CALIBRATION_CONF) {
        return PathBuf::from(path);
    }
    get_base_path().join("touch").join("calibration.conf")
}
