use std::{error::Error, sync::Mutex};

use crate::{
    config::KeyFile,
    drivers::joystick::event::SwitchReport,
    switch::{
        compiler::compile,
        dispatch::{announce, dispatch, DispatchError, EventSink},
        router::{KeyState, SwitchRouter},
    },
};

const WHEEL_CONF: &str = r#"
[device]
name=GTForce
type=4

[input]
1=Horn
1.event=1;0
1.code=1:Horn
1.fixed=shell=/bin/play-horn.sh
2=Gear
2.event=2;5
2.code=10:Up;11:Down
3=Radio
3.event=1;1
3.code=1:Radio
3.fixed=appid=org.example.radio:key=115
"#;

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Launch(String),
    Key(String, i32, u32),
    Switch(u32, String, u32, u16, u32),
    ConfigureInput(String, i32, String, u32, String, u16),
    ConfigureCode(String, u32, String, u16),
}

#[derive(Debug, Default)]
struct RecordingSink {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingSink {
    fn push(&self, event: Sent) {
        self.sent.lock().unwrap().push(event);
    }

    fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl EventSink for RecordingSink {
    async fn launch(&self, command: &str) -> Result<(), DispatchError> {
        self.push(Sent::Launch(command.to_string()));
        Ok(())
    }

    async fn send_key(
        &self,
        app_id: &str,
        keycode: i32,
        state: KeyState,
    ) -> Result<(), DispatchError> {
        self.push(Sent::Key(app_id.to_string(), keycode, state.value()));
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
        self.push(Sent::Switch(
            time_ms,
            device.to_string(),
            input,
            code,
            state.value(),
        ));
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
        self.push(Sent::ConfigureInput(
            device.to_string(),
            device_type,
            switch.to_string(),
            input,
            code_name.to_string(),
            code,
        ));
        Ok(())
    }

    async fn configure_code(
        &self,
        device: &str,
        input: u32,
        code_name: &str,
        code: u16,
    ) -> Result<(), DispatchError> {
        self.push(Sent::ConfigureCode(
            device.to_string(),
            input,
            code_name.to_string(),
            code,
        ));
        Ok(())
    }
}

/// Route and dispatch the given (class, index, value) reports
async fn run(
    router: &mut SwitchRouter,
    sink: &RecordingSink,
    reports: &[(u16, u16, i32)],
) -> Vec<Sent> {
    let device = router.table().device.name.clone();
    for (time_ms, (class, index, value)) in reports.iter().enumerate() {
        let report = SwitchReport {
            time_ms: time_ms as u32,
            class: *class,
            index: *index,
            value: *value,
        };
        if let Some(transition) = router.route(&report) {
            dispatch(sink, &device, &transition).await;
        }
    }
    sink.take()
}

fn router() -> Result<SwitchRouter, Box<dyn Error>> {
    let file = KeyFile::parse(WHEEL_CONF)?;
    Ok(SwitchRouter::new(compile(&file)?))
}

#[tokio::test]
async fn horn_launches_on_press_only() -> Result<(), Box<dyn Error>> {
    let mut router = router()?;
    let sink = RecordingSink::default();

    let sent = run(&mut router, &sink, &[(1, 0, 1)]).await;
    assert_eq!(sent, vec![Sent::Launch("/bin/play-horn.sh".to_string())]);

    let sent = run(&mut router, &sink, &[(1, 0, 0)]).await;
    assert!(sent.is_empty());

    Ok(())
}

#[tokio::test]
async fn gear_emits_switch_events() -> Result<(), Box<dyn Error>> {
    let mut router = router()?;
    let sink = RecordingSink::default();

    let sent = run(
        &mut router,
        &sink,
        &[(2, 5, -1), (2, 5, 0), (2, 5, 1), (2, 5, 0)],
    )
    .await;
    let device = "GTForce".to_string();
    assert_eq!(
        sent,
        vec![
            Sent::Switch(0, device.clone(), 2, 10, 1),
            Sent::Switch(1, device.clone(), 2, 10, 0),
            Sent::Switch(2, device.clone(), 2, 11, 1),
            Sent::Switch(3, device.clone(), 2, 11, 0),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn forward_sends_key_on_both_transitions() -> Result<(), Box<dyn Error>> {
    let mut router = router()?;
    let sink = RecordingSink::default();

    let sent = run(&mut router, &sink, &[(1, 1, 1), (1, 1, 0)]).await;
    let app_id = "org.example.radio".to_string();
    assert_eq!(
        sent,
        vec![
            Sent::Key(app_id.clone(), 115, 1),
            Sent::Key(app_id.clone(), 115, 0),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn announce_generic_switches() -> Result<(), Box<dyn Error>> {
    let router = router()?;
    let sink = RecordingSink::default();

    announce(&sink, router.table()).await;
    let device = "GTForce".to_string();
    assert_eq!(
        sink.take(),
        vec![
            Sent::ConfigureInput(
                device.clone(),
                4,
                "Gear".to_string(),
                2,
                "Up".to_string(),
                10
            ),
            Sent::ConfigureCode(device.clone(), 2, "Down".to_string(), 11),
        ]
    );

    Ok(())
}
