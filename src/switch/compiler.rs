use crate::config::{parse_int, KeyFile};

use super::{
    Action, CodeEntry, CompileError, DeviceInfo, SwitchEntry, SwitchState, SwitchTable, MAX_CODES,
};

const DEVICE_GROUP: &str = "device";
const INPUT_GROUP: &str = "input";

/// Compile the given key file into a [SwitchTable]. Individual switches with
/// incomplete definitions are skipped with a log message.
pub fn compile(file: &KeyFile) -> Result<SwitchTable, CompileError> {
    let device = read_device(file);
    log::debug!("Compiling switch table for device: {device:?}");

    let mut switches: Vec<SwitchEntry> = Vec::new();
    for (key, input) in numeric_keys(file, INPUT_GROUP) {
        let Some(name) = file.get_string(INPUT_GROUP, key) else {
            continue;
        };
        if switches.iter().any(|s| s.has_name(&name)) {
            log::error!("Switch name '{name}' is defined more than once. Skipping input {key}.");
            continue;
        }

        // Raw report source
        let event_key = format!("{key}.event");
        let Some(event) = file.get_integer_list(INPUT_GROUP, &event_key) else {
            log::warn!("Switch '{name}' has no valid '{event_key}'. Skipping.");
            continue;
        };
        if event.len() < 2 {
            log::warn!("Switch '{name}' requires event class and index. Skipping.");
            continue;
        }
        let (Ok(class), Ok(index)) = (u16::try_from(event[0]), u16::try_from(event[1])) else {
            log::warn!("Switch '{name}' has an out of range event {event:?}. Skipping.");
            continue;
        };

        let mut codes = read_codes(file, key, &name);
        if let Some(fixed) = file.get_string_list(INPUT_GROUP, &format!("{key}.fixed")) {
            for binding in fixed {
                bind_action(&mut codes, &name, &binding);
            }
        }

        let entry = SwitchEntry {
            name,
            input,
            class,
            index,
            codes,
            last: SwitchState::Idle,
        };
        log_entry(&entry);
        switches.push(entry);
    }

    if switches.is_empty() {
        return Err(CompileError::NoSwitches);
    }

    Ok(SwitchTable { device, switches })
}

fn read_device(file: &KeyFile) -> DeviceInfo {
    let name = file.get_string(DEVICE_GROUP, "name").unwrap_or_default();
    let controller = file
        .get_string(DEVICE_GROUP, "dic")
        .or_else(|| file.get_string(DEVICE_GROUP, "ictl"))
        .unwrap_or_default();
    let device_type = file.get_integer(DEVICE_GROUP, "type").unwrap_or_default();
    let ecu = file.get_integer(DEVICE_GROUP, "ecu").unwrap_or_default();

    DeviceInfo {
        name,
        controller,
        device_type,
        ecu,
    }
}

/// Returns the keys of the given group that are plain non-negative numbers,
/// along with their value, in file order.
fn numeric_keys<'a>(file: &'a KeyFile, group: &str) -> Vec<(&'a str, u32)> {
    file.keys(group)
        .into_iter()
        .filter_map(|key| {
            let value = parse_int(key)?;
            let value = u32::try_from(value).ok()?;
            Some((key, value))
        })
        .collect()
}

/// Read the `<id>.code` list. Every entry has the form `<code>:<name>`; an
/// empty name falls back to the switch name.
fn read_codes(file: &KeyFile, key: &str, switch_name: &str) -> Vec<CodeEntry> {
    let list = file
        .get_string_list(INPUT_GROUP, &format!("{key}.code"))
        .unwrap_or_default();
    if list.is_empty() {
        return vec![CodeEntry {
            code: 0,
            name: switch_name.to_string(),
            action: Action::None,
        }];
    }

    list.iter()
        .take(MAX_CODES)
        .map(|item| {
            let (value, name) = item.split_once(':').unwrap_or((item.as_str(), ""));
            let code = value.trim().parse::<u16>().unwrap_or_else(|_| {
                log::warn!("Switch '{switch_name}' has invalid code '{value}'. Using 0.");
                0
            });
            let name = if name.is_empty() { switch_name } else { name };
            CodeEntry {
                code,
                name: name.to_string(),
                action: Action::None,
            }
        })
        .collect()
}

/// Apply one `<id>.fixed` entry. `<code>:<action>` binds the code with that
/// value, a bare `<action>` binds every code of the switch.
fn bind_action(codes: &mut [CodeEntry], switch_name: &str, binding: &str) {
    let digits = binding.bytes().take_while(u8::is_ascii_digit).count();
    let targeted = (digits > 0)
        .then(|| binding[digits..].strip_prefix(':'))
        .flatten()
        .and_then(|action| Some((binding[..digits].parse::<u16>().ok()?, action)));

    match targeted {
        Some((value, action)) => {
            let Some(entry) = codes.iter_mut().find(|c| c.code == value) else {
                log::warn!("Switch '{switch_name}' has no code {value} for action '{action}'");
                return;
            };
            entry.action = parse_action(action);
        }
        None => {
            let action = parse_action(binding);
            for entry in codes.iter_mut() {
                entry.action = action.clone();
            }
        }
    }
}

/// Parse an action: `shell=<command>`, or `[appid=]<name>[:[key=]<keycode>]`
pub fn parse_action(text: &str) -> Action {
    if let Some(command) = strip_prefix_ignore_case(text, "shell=") {
        return Action::Shell(command.to_string());
    }

    let text = strip_prefix_ignore_case(text, "appid=").unwrap_or(text);
    let (app_id, key) = match text.split_once(':') {
        Some((app_id, key)) => (app_id, Some(key)),
        None => (text, None),
    };

    // Empty and '@' names become the single-space sentinel
    let app_id = if app_id.is_empty() || app_id.starts_with('@') {
        " ".to_string()
    } else {
        app_id.to_string()
    };

    let keycode = match key {
        Some(key) => {
            let key = strip_prefix_ignore_case(key, "key=").unwrap_or(key);
            parse_int(key)
                .and_then(|k| i32::try_from(k).ok())
                .unwrap_or_else(|| {
                    log::warn!("Invalid keycode '{key}' for application '{app_id}'. Using 0.");
                    0
                })
        }
        None => 0,
    };

    Action::Forward { app_id, keycode }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

fn log_entry(entry: &SwitchEntry) {
    let first = &entry.codes[0];
    match entry.codes.get(1).filter(|_| entry.is_bipolar()) {
        None => log::debug!(
            "{} input:{} class={},index={},code={}[{},{}]",
            entry.name,
            entry.input,
            entry.class,
            entry.index,
            first.code,
            first.name,
            first.action
        ),
        Some(second) => log::debug!(
            "{} input:{} class={},index={},code={}[{},{}],code={}[{},{}]",
            entry.name,
            entry.input,
            entry.class,
            entry.index,
            first.code,
            first.name,
            first.action,
            second.code,
            second.name,
            second.action
        ),
    }
}
