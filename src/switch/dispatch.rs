use std::io;

use thiserror::Error;

use super::{
    router::{KeyState, Transition},
    Action, SwitchTable,
};

/// Possible errors delivering a switch transition
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unable to launch '{command}': {source}")]
    Launch { command: String, source: io::Error },
    #[error("Failed to emit signal: {0}")]
    Signal(#[from] zbus::Error),
}

/// Receiver of translated switch events. Implementations deliver events to
/// the session (e.g. over DBus) or record them for inspection.
pub trait EventSink {
    /// Launch the given shell command without waiting for it to finish
    async fn launch(&self, command: &str) -> Result<(), DispatchError>;

    /// Send a key event to the given application
    async fn send_key(
        &self,
        app_id: &str,
        keycode: i32,
        state: KeyState,
    ) -> Result<(), DispatchError>;

    /// Emit a generic switch event for the given device
    async fn switch_event(
        &self,
        time_ms: u32,
        device: &str,
        input: u32,
        code: u16,
        state: KeyState,
    ) -> Result<(), DispatchError>;

    /// Announce a switch and its first code
    async fn configure_input(
        &self,
        device: &str,
        device_type: i32,
        switch: &str,
        input: u32,
        code_name: &str,
        code: u16,
    ) -> Result<(), DispatchError>;

    /// Announce an additional code of a switch
    async fn configure_code(
        &self,
        device: &str,
        input: u32,
        code_name: &str,
        code: u16,
    ) -> Result<(), DispatchError>;
}

/// Deliver the given transition to the sink. Failures are logged and never
/// retried.
pub async fn dispatch<S: EventSink>(sink: &S, device: &str, transition: &Transition) {
    let result = match &transition.action {
        Action::Shell(command) => {
            if transition.state != KeyState::Pressed {
                return;
            }
            log::debug!("Switch '{}' starting: {command}", transition.switch);
            sink.launch(command).await
        }
        Action::Forward { app_id, keycode } => {
            log::debug!(
                "Switch '{}' sending key {keycode}={} to '{app_id}'",
                transition.switch,
                transition.state.value()
            );
            sink.send_key(app_id, *keycode, transition.state).await
        }
        Action::None => {
            log::debug!(
                "Switch '{}' event {device}.{}.{}.{}",
                transition.switch,
                transition.input,
                transition.code,
                transition.state.value()
            );
            sink.switch_event(
                transition.time_ms,
                device,
                transition.input,
                transition.code,
                transition.state,
            )
            .await
        }
    };

    if let Err(e) = result {
        log::error!("Failed to dispatch switch '{}': {e}", transition.switch);
    }
}

/// Announce every switch that produces generic switch events so the
/// session knows its inputs and codes.
pub async fn announce<S: EventSink>(sink: &S, table: &SwitchTable) {
    let device = &table.device;
    for entry in table.announced() {
        let Some(first) = entry.codes.first() else {
            continue;
        };
        let result = sink
            .configure_input(
                &device.name,
                device.device_type,
                &entry.name,
                entry.input,
                &first.name,
                first.code,
            )
            .await;
        if let Err(e) = result {
            log::error!("Failed to announce switch '{}': {e}", entry.name);
            continue;
        }

        for code in entry.codes.iter().skip(1).take_while(|c| c.code != 0) {
            let result = sink
                .configure_code(&device.name, entry.input, &code.name, code.code)
                .await;
            if let Err(e) = result {
                log::error!("Failed to announce code '{}': {e}", code.name);
            }
        }
    }
}
