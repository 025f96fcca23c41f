use std::{env, path::PathBuf};

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::{
    constants::ENV_SWITCH_CONF,
    daemon::DaemonError,
    discovery,
    switch::{SwitchEntry, SwitchTable},
};

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "Input")]
    input: u32,
    #[tabled(rename = "Switch")]
    switch: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Code")]
    code: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
}

fn code_rows(entry: &SwitchEntry) -> Vec<CodeRow> {
    entry
        .codes
        .iter()
        .map(|code| CodeRow {
            input: entry.input,
            switch: entry.name.clone(),
            event: format!("{}.{}", entry.class, entry.index),
            code: code.code,
            name: code.name.clone(),
            action: code.action.to_string(),
        })
        .collect()
}

/// Compile the given switch configuration and print the resulting table.
/// Without an explicit path the configuration of the first attached
/// controller is used.
pub fn handle_check(config: Option<PathBuf>) -> Result<(), DaemonError> {
    let path = match config.or_else(|| env::var_os(ENV_SWITCH_CONF).map(PathBuf::from)) {
        Some(path) => path,
        None => discovery::find_switch_device(None, None)?.config_path,
    };

    let table = SwitchTable::from_path(&path)?;
    let device = &table.device;
    let rows: Vec<CodeRow> = table.switches.iter().flat_map(code_rows).collect();

    let mut output = Table::new(rows);
    output
        .with(Style::modern_rounded())
        .with(Panel::header(format!(
            "{} ({}, type {}, ecu {})",
            device.name, device.controller, device.device_type, device.ecu
        )));
    println!("{output}");
    println!(
        "Compiled {} switch(es) from {}",
        table.switches.len(),
        path.display()
    );

    Ok(())
}
