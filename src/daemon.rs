use std::{
    io,
    os::fd::AsRawFd,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use evdev::{EventType, InputEvent, SynchronizationCode};
use nix::fcntl::{FcntlArg, OFlag};
use thiserror::Error;
use tokio::{
    signal::unix::{signal, SignalKind},
    time::interval,
};
use zbus::Connection;

use crate::{
    config::path::get_calibration_path,
    constants::BUS_NAME,
    dbus::interface::{get_switch_device_path, switch_device::SwitchDeviceInterface},
    discovery::{self, DiscoveryError},
    drivers::joystick::driver::DriverError,
    eventlog::{event_time, EventLog, TouchLog},
    switch::{
        dispatch::{announce, dispatch, DispatchError},
        router::SwitchRouter,
        session::SessionSink,
        CompileError, SwitchTable,
    },
    touch::{
        calibration::{Calibration, CalibrationError},
        sampler::Sampler,
        target::TouchTarget,
        transform::{Rotation, TouchTransformer},
    },
};

/// How often devices are polled for new events
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Fatal errors that stop one of the daemons
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Invalid switch configuration: {0}")]
    Config(#[from] CompileError),
    #[error("Invalid calibration: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("{0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Unable to open touch device {path}: {source}")]
    TouchDevice { path: String, source: io::Error },
    #[error("Failed to read switch device: {0}")]
    SwitchRead(#[from] DriverError),
    #[error("Failed to read touch device: {0}")]
    TouchRead(io::Error),
    #[error("Session bus error: {0}")]
    Session(#[from] zbus::Error),
    #[error("Unable to set up switch dispatch: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("Unable to create virtual touch device: {0}")]
    Uinput(io::Error),
}

impl DaemonError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            DaemonError::Config(_) => 8,
            DaemonError::Calibration(CalibrationError::Device(_)) => 10,
            DaemonError::Calibration(_) => 8,
            DaemonError::Discovery(_) => 9,
            DaemonError::TouchDevice { .. } => 9,
            DaemonError::SwitchRead(DriverError::Open { .. }) => 9,
            DaemonError::SwitchRead(_) => 10,
            DaemonError::TouchRead(_) => 10,
            DaemonError::Session(_) => 11,
            DaemonError::Dispatch(_) => 11,
            DaemonError::Uinput(_) => 11,
        }
    }
}

/// Returns a flag that is cleared once SIGINT or SIGTERM is received
fn shutdown_flag() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    let terminate = signal(SignalKind::terminate());

    tokio::spawn(async move {
        match terminate {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => (),
                    _ = terminate.recv() => (),
                }
            }
            Err(e) => {
                log::warn!("Unable to listen for SIGTERM: {e}");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Unable to listen for CTRL+C: {e}");
                    return;
                }
            }
        }
        log::info!("Shutting down");
        flag.store(false, Ordering::SeqCst);
    });

    running
}

/// Translate switch reports from a joystick (or pseudo) device into session
/// events until interrupted
pub async fn run_switch(
    device_name: Option<String>,
    config: Option<PathBuf>,
    event_log: bool,
) -> Result<(), DaemonError> {
    let found = discovery::find_switch_device(device_name.as_deref(), config)?;
    let mut device = found.device;
    log::info!("Using switch device {} ({})", device.path(), found.name);

    log::debug!("Loading switch config: {}", found.config_path.display());
    let table = SwitchTable::from_path(&found.config_path)?;
    log::info!(
        "Loaded {} switch(es) for '{}' from {}",
        table.switches.len(),
        table.device.name,
        found.config_path.display()
    );
    let device_label = table.device.name.clone();
    let mut router = SwitchRouter::new(table);

    // Serve the switch device on the session bus
    let connection = Connection::session().await?;
    let path = get_switch_device_path(&found.name);
    let iface = SwitchDeviceInterface::new(router.table(), found.name, router.counters());
    iface.listen_on_dbus(&connection, &path).await?;
    connection.request_name(BUS_NAME).await?;

    let sink = SessionSink::new(&connection, &path).await?;
    announce(&sink, router.table()).await;

    let mut event_log = event_log.then(EventLog::default);
    let running = shutdown_flag();
    let mut interval = interval(POLL_INTERVAL);
    log::info!("Switch translator started");
    while running.load(Ordering::SeqCst) {
        interval.tick().await;
        for report in device.poll()? {
            log::trace!("Received report: {report:?}");
            if let Some(event_log) = event_log.as_mut() {
                if let Some(entry) = router.table().find(report.class, report.index) {
                    let time = Duration::from_millis(report.time_ms as u64);
                    event_log.print(&entry.name, report.value, time);
                }
            }
            let Some(transition) = router.route(&report) else {
                continue;
            };
            dispatch(&sink, &device_label, &transition).await;
        }
    }

    let counters = router.counters();
    log::info!(
        "Switch translator stopped: {} unmatched, {} out of range, {} spurious release(s)",
        counters.unmatched(),
        counters.out_of_range(),
        counters.spurious_release()
    );

    Ok(())
}

/// Translate raw touch panel events into calibrated pointer events until
/// interrupted
pub async fn run_touch(
    device_path: Option<String>,
    rotation: Rotation,
    log_mode: Option<TouchLog>,
) -> Result<(), DaemonError> {
    let calibration_path = get_calibration_path();
    log::debug!("Loading calibration: {}", calibration_path.display());
    let calibration = Calibration::from_path(&calibration_path)?;
    let mut transformer = TouchTransformer::new(&calibration, rotation)?;

    let path = match device_path {
        Some(path) => path,
        None => discovery::find_touch_device()?,
    };
    let mut source = open_touch_source(&path).map_err(|source| DaemonError::TouchDevice {
        path: path.clone(),
        source,
    })?;
    log::info!("Using touch device {path} with rotation {rotation}");

    let mut target =
        TouchTarget::new(calibration.width, calibration.height).map_err(DaemonError::Uinput)?;

    let mut event_log = log_mode.map(|_| EventLog::default());
    let running = shutdown_flag();
    let mut interval = interval(POLL_INTERVAL);
    let mut batch: Vec<InputEvent> = Vec::new();
    log::info!("Touch translator started");
    while running.load(Ordering::SeqCst) {
        interval.tick().await;
        let events: Vec<InputEvent> = match source.fetch_events() {
            Ok(events) => events.collect(),
            Err(e) => match e.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => continue,
                _ => return Err(DaemonError::TouchRead(e)),
            },
        };

        for event in events {
            if event.event_type() != EventType::SYNCHRONIZATION {
                let output = transformer.translate(&event);
                if let Some(event_log) = event_log.as_mut() {
                    let time = event_time(&event);
                    match log_mode {
                        Some(TouchLog::Input) => event_log.print_touch(&event, time),
                        Some(TouchLog::Output) => {
                            output.iter().for_each(|e| event_log.print_touch(e, time))
                        }
                        None => (),
                    }
                }
                batch.extend(output);
                continue;
            }
            if event.code() != SynchronizationCode::SYN_REPORT.0 {
                continue;
            }
            if transformer.is_pending() {
                log::trace!("Touch press waiting for coordinates");
            }
            if let Err(e) = target.emit(&batch) {
                log::error!("Failed to write touch events: {e}");
            }
            batch.clear();
        }
    }

    log::info!("Touch translator stopped");
    Ok(())
}

/// Open the touch panel for exclusive, non-blocking reads
fn open_touch_source(path: &str) -> io::Result<evdev::Device> {
    let mut device = evdev::Device::open(path)?;
    let raw_fd = device.as_raw_fd();
    nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))?;
    device.grab()?;
    Ok(device)
}

/// Interactively sample the touch panel corners and save the calibration
pub async fn run_calibrate(
    device_path: Option<String>,
    width: i32,
    height: i32,
) -> Result<(), DaemonError> {
    let path = match device_path {
        Some(path) => path,
        None => discovery::find_touch_device()?,
    };
    let mut sampler = Sampler::open(&path).map_err(|source| DaemonError::TouchDevice {
        path: path.clone(),
        source,
    })?;
    log::info!("Calibrating {} for a {width}x{height} display", sampler.path());

    let calibration = sampler.run(width, height).await?;

    let calibration_path = get_calibration_path();
    calibration.save(&calibration_path)?;

    println!("+------------------------------------------------+");
    println!("| Saved {}", calibration_path.display());
    for line in calibration.to_config_string().lines() {
        println!("| {line}");
    }
    println!("+------------------------------------------------+");

    Ok(())
}
