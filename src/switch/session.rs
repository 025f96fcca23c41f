use tokio::process::Command;
use zbus::{object_server::InterfaceRef, Connection};

use crate::dbus::interface::switch_device::SwitchDeviceInterface;

use super::{
    dispatch::{DispatchError, EventSink},
    router::KeyState,
};

/// [EventSink] that delivers switch events to the session as DBus signals
/// and launches shell actions as detached child processes.
pub struct SessionSink {
    iface_ref: InterfaceRef<SwitchDeviceInterface>,
}

impl SessionSink {
    /// Create a sink that emits signals from the switch device interface
    /// served at the given path
    pub async fn new(conn: &Connection, path: &str) -> Result<Self, DispatchError> {
        let iface_ref = conn
            .object_server()
            .interface::<_, SwitchDeviceInterface>(path)
            .await?;
        Ok(Self { iface_ref })
    }
}

impl EventSink for SessionSink {
    async fn launch(&self, command: &str) -> Result<(), DispatchError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .spawn()
            .map_err(|source| DispatchError::Launch {
                command: command.to_string(),
                source,
            })?;

        // Reap the child in the background
        let command = command.to_string();
        tokio::task::spawn(async move {
            match child.wait().await {
                Ok(status) => log::debug!("Command '{command}' exited: {status}"),
                Err(e) => log::warn!("Unable to wait for command '{command}': {e}"),
            }
        });

        Ok(())
    }

    async fn send_key(
        &self,
        app_id: &str,
        keycode: i32,
        state: KeyState,
    ) -> Result<(), DispatchError> {
        SwitchDeviceInterface::key_event(
            self.iface_ref.signal_emitter(),
            app_id,
            keycode,
            state.value(),
        )
        .await?;
        Ok(())
    }

    async fn switch_event(
        &self,
        time_ms: u32,
        device: &str,
        input: u32,
        code: u16,
        state: KeyState,
    ) -> Result<(), DispatchError> {
        SwitchDeviceInterface::switch_event(
            self.iface_ref.signal_emitter(),
            time_ms,
            device,
            input,
            code as u32,
            state.value(),
        )
        .await?;
        Ok(())
    }

    async fn configure_input(
        &self,
        device: &str,
        device_type: i32,
        switch: &str,
        input: u32,
        code_name: &str,
        code: u16,
    ) -> Result<(), DispatchError> {
        SwitchDeviceInterface::configure_input(
            self.iface_ref.signal_emitter(),
            device,
            device_type,
            switch,
            input,
            code_name,
            code as u32,
        )
        .await?;
        Ok(())
    }

    async fn configure_code(
        &self,
        device: &str,
        input: u32,
        code_name: &str,
        code: u16,
    ) -> Result<(), DispatchError> {
        SwitchDeviceInterface::configure_code(
            self.iface_ref.signal_emitter(),
            device,
            input,
            code_name,
            code as u32,
        )
        .await?;
        Ok(())
    }
}
