use std::{fs, io};

/// Path to the kernel input device listing
const INPUT_DEVICES_PATH: &str = "/proc/bus/input/devices";

/// Input device identity
/// E.g. I: Bus=0003 Vendor=0eef Product=0001 Version=0100
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ID {
    pub bus_type: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
}

/// A single device entry in /proc/bus/input/devices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    pub id: ID,
    pub name: String,
    pub phys_path: String,
    pub sysfs_path: String,
    /// Handler names, e.g. ["mouse0", "event3"]
    pub handlers: Vec<String>,
}

impl Device {
    /// Returns the first evdev handler of this device (e.g. "event3")
    pub fn event_handler(&self) -> Option<&str> {
        self.handlers
            .iter()
            .map(|h| h.as_str())
            .find(|h| h.starts_with("event"))
    }
}

/// Returns the input devices that are currently detected. This function
/// parses the file at /proc/bus/input/devices
pub fn get_all() -> io::Result<Vec<Device>> {
    let content = fs::read_to_string(INPUT_DEVICES_PATH)?;
    Ok(parse(content.as_str()))
}

/// Parse the contents of /proc/bus/input/devices. Entries are separated by
/// blank lines.
pub fn parse(content: &str) -> Vec<Device> {
    let mut devices = Vec::new();
    let mut device: Option<Device> = None;

    for line in content.lines() {
        if line.trim().is_empty() {
            if let Some(d) = device.take() {
                devices.push(d);
            }
            continue;
        }

        let Some((tag, rest)) = line.split_once(": ") else {
            continue;
        };

        // A new entry always starts with its identity
        if tag == "I" {
            if let Some(d) = device.take() {
                devices.push(d);
            }
            let mut id = ID::default();
            for (key, value) in rest.split_whitespace().filter_map(|p| p.split_once('=')) {
                match key {
                    "Bus" => id.bus_type = value.to_string(),
                    "Vendor" => id.vendor = value.to_string(),
                    "Product" => id.product = value.to_string(),
                    "Version" => id.version = value.to_string(),
                    _ => (),
                }
            }
            device = Some(Device {
                id,
                ..Default::default()
            });
            continue;
        }

        let Some(d) = device.as_mut() else {
            continue;
        };
        let Some((_, value)) = rest.split_once('=') else {
            continue;
        };
        match tag {
            "N" => d.name = value.replace('"', ""),
            "P" => d.phys_path = value.to_string(),
            "S" => d.sysfs_path = value.to_string(),
            "H" => d.handlers = value.split_whitespace().map(String::from).collect(),
            _ => (),
        }
    }
    if let Some(d) = device {
        devices.push(d);
    }

    devices
}
