use std::sync::Arc;

use zbus::{fdo, object_server::SignalEmitter, Connection};
use zbus_macros::interface;

use crate::switch::{router::RouterCounters, SwitchTable};

/// Row of the announced switch configuration: (switch name, input id, code
/// name, code)
pub type ConfigurationRow = (String, u32, String, u32);

/// The [SwitchDeviceInterface] exposes a switch controller on DBus. Switch
/// transitions and configuration announcements are emitted as signals on
/// this interface.
pub struct SwitchDeviceInterface {
    name: String,
    controller_name: String,
    device_type: i32,
    configuration: Vec<ConfigurationRow>,
    counters: Arc<RouterCounters>,
}

impl SwitchDeviceInterface {
    pub fn new(
        table: &SwitchTable,
        controller_name: String,
        counters: Arc<RouterCounters>,
    ) -> SwitchDeviceInterface {
        Self {
            name: table.device.name.clone(),
            controller_name,
            device_type: table.device.device_type,
            configuration: configuration_rows(table),
            counters,
        }
    }

    /// Start serving the interface at the given path
    pub async fn listen_on_dbus(self, conn: &Connection, path: &str) -> zbus::Result<()> {
        log::debug!("Starting dbus interface: {path}");
        conn.object_server().at(path, self).await?;
        log::debug!("Started dbus interface: {path}");
        Ok(())
    }
}

/// Returns one row per code of every switch that produces generic switch
/// events
pub fn configuration_rows(table: &SwitchTable) -> Vec<ConfigurationRow> {
    table
        .announced()
        .flat_map(|entry| {
            entry
                .codes
                .iter()
                .enumerate()
                .take_while(|(i, c)| *i == 0 || c.code != 0)
                .map(|(_, c)| (entry.name.clone(), entry.input, c.name.clone(), c.code as u32))
        })
        .collect()
}

#[interface(name = "org.inputbridge.InputBridge.SwitchDevice")]
impl SwitchDeviceInterface {
    /// Device name from the switch configuration
    #[zbus(property)]
    async fn name(&self) -> fdo::Result<String> {
        Ok(self.name.clone())
    }

    /// Normalized name of the controller hardware
    #[zbus(property)]
    async fn controller_name(&self) -> fdo::Result<String> {
        Ok(self.controller_name.clone())
    }

    #[zbus(property)]
    async fn device_type(&self) -> fdo::Result<i32> {
        Ok(self.device_type)
    }

    #[zbus(property)]
    async fn unmatched_reports(&self) -> fdo::Result<u64> {
        Ok(self.counters.unmatched())
    }

    #[zbus(property)]
    async fn out_of_range_reports(&self) -> fdo::Result<u64> {
        Ok(self.counters.out_of_range())
    }

    #[zbus(property)]
    async fn spurious_releases(&self) -> fdo::Result<u64> {
        Ok(self.counters.spurious_release())
    }

    /// Returns the switches and codes that produce switch events
    async fn configuration(&self) -> fdo::Result<Vec<ConfigurationRow>> {
        Ok(self.configuration.clone())
    }

    /// Emitted at startup for every switch that produces switch events
    #[zbus(signal)]
    pub async fn configure_input(
        emitter: &SignalEmitter<'_>,
        device: &str,
        device_type: i32,
        switch_name: &str,
        input: u32,
        code_name: &str,
        code: u32,
    ) -> zbus::Result<()>;

    /// Emitted at startup for the second code of a bipolar switch
    #[zbus(signal)]
    pub async fn configure_code(
        emitter: &SignalEmitter<'_>,
        device: &str,
        input: u32,
        code_name: &str,
        code: u32,
    ) -> zbus::Result<()>;

    /// Emitted when a switch code is pressed (state 1) or released (state 0)
    #[zbus(signal)]
    pub async fn switch_event(
        emitter: &SignalEmitter<'_>,
        time: u32,
        device: &str,
        input: u32,
        code: u32,
        state: u32,
    ) -> zbus::Result<()>;

    /// Emitted when a switch forwards a key to an application
    #[zbus(signal)]
    pub async fn key_event(
        emitter: &SignalEmitter<'_>,
        app_id: &str,
        keycode: i32,
        state: u32,
    ) -> zbus::Result<()>;
}
