//! Switch controller translation: a compiled table of logical switches and
//! the router that turns raw controller reports into switch transitions.

pub mod compiler;
#[cfg(test)]
pub mod compiler_test;
pub mod dispatch;
#[cfg(test)]
pub mod dispatch_test;
pub mod router;
pub mod session;

use std::{fmt::Display, path::Path};

use thiserror::Error;

use crate::config::{KeyFile, LoadError};

/// Number of leading characters that make a switch name unique
pub const SWITCH_NAME_SIGNIFICANT_LEN: usize = 16;
/// Maximum number of codes a single switch can produce
pub const MAX_CODES: usize = 2;

/// Possible errors building a [SwitchTable]
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unable to load config: {0}")]
    Load(#[from] LoadError),
    #[error("No switches are defined in the [input] group")]
    NoSwitches,
}

/// Metadata from the `[device]` group of a switch config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name used in emitted switch events
    pub name: String,
    /// Name of the controlling input controller (`dic` or `ictl`)
    pub controller: String,
    pub device_type: i32,
    pub ecu: i32,
}

/// What happens when a code is asserted or released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the command through the shell on press
    Shell(String),
    /// Send a key event to the given application on press and release
    Forward { app_id: String, keycode: i32 },
    /// Emit a generic switch event on press and release
    None,
}

impl Action {
    /// Returns true if the code produces generic switch events
    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shell(cmd) => write!(f, "shell={cmd}"),
            Action::Forward { app_id, keycode } => write!(f, "appid={app_id}:key={keycode}"),
            Action::None => write!(f, "-"),
        }
    }
}

/// A single code value that a switch can produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: u16,
    pub name: String,
    pub action: Action,
}

/// Index of a code within a [SwitchEntry]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSlot {
    First,
    Second,
}

impl CodeSlot {
    pub fn index(&self) -> usize {
        match self {
            CodeSlot::First => 0,
            CodeSlot::Second => 1,
        }
    }
}

/// Which code of a switch is currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwitchState {
    #[default]
    Idle,
    Asserted(CodeSlot),
}

/// A logical switch bound to one raw `(class, index)` report source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchEntry {
    pub name: String,
    /// Numeric input identifier from the config key
    pub input: u32,
    /// Raw event class (joystick button/axis or evdev event type)
    pub class: u16,
    /// Raw event index within the class
    pub index: u16,
    /// One or two codes
    pub codes: Vec<CodeEntry>,
    pub last: SwitchState,
}

impl SwitchEntry {
    /// A switch is bipolar when its second code is non-zero. Negative values
    /// assert the first code and positive values assert the second.
    pub fn is_bipolar(&self) -> bool {
        self.codes.get(1).is_some_and(|c| c.code != 0)
    }

    pub fn code(&self, slot: CodeSlot) -> Option<&CodeEntry> {
        self.codes.get(slot.index())
    }

    /// Returns true if this switch has the given name. Names compare
    /// case-insensitively over their significant characters.
    pub fn has_name(&self, name: &str) -> bool {
        let a = self
            .name
            .chars()
            .take(SWITCH_NAME_SIGNIFICANT_LEN)
            .map(|c| c.to_ascii_lowercase());
        let b = name
            .chars()
            .take(SWITCH_NAME_SIGNIFICANT_LEN)
            .map(|c| c.to_ascii_lowercase());
        a.eq(b)
    }
}

/// Compiled switch configuration for one controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchTable {
    pub device: DeviceInfo,
    pub switches: Vec<SwitchEntry>,
}

impl SwitchTable {
    /// Load and compile the switch configuration at the given path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SwitchTable, CompileError> {
        let file = KeyFile::from_path(path)?;
        compiler::compile(&file)
    }

    /// Find the switch with the given name
    #[cfg(test)]
    pub fn find_by_name(&self, name: &str) -> Option<&SwitchEntry> {
        self.switches.iter().find(|s| s.has_name(name))
    }

    /// Find the first switch bound to the given raw report source
    pub fn find(&self, class: u16, index: u16) -> Option<&SwitchEntry> {
        self.switches
            .iter()
            .find(|s| s.class == class && s.index == index)
    }

    /// Mutable variant of [SwitchTable::find]
    pub fn find_mut(&mut self, class: u16, index: u16) -> Option<&mut SwitchEntry> {
        self.switches
            .iter_mut()
            .find(|s| s.class == class && s.index == index)
    }

    /// Returns the switches that produce generic switch events and must be
    /// announced to the session.
    pub fn announced(&self) -> impl Iterator<Item = &SwitchEntry> {
        self.switches
            .iter()
            .filter(|s| s.codes.first().is_some_and(|c| c.action.is_none()))
    }
}
