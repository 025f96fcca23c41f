pub mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    daemon::{self, DaemonError},
    eventlog::TouchLog,
    touch::{
        calibration::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
        transform::Rotation,
    },
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Translate switch controller input into session events
    Switch {
        /// Controller name, e.g. "Driving Force GT". Defaults to the first
        /// controller with a switch configuration.
        device: Option<String>,
        /// Path to the switch configuration to use
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print a replayable log of configured switch reports
        #[arg(short = 'l', long)]
        event_log: bool,
    },
    /// Translate touch panel input into calibrated pointer events
    Touch {
        /// Touch panel event device, e.g. "/dev/input/event3"
        device: Option<String>,
        /// Screen rotation in degrees (0, 90, 180 or 270)
        #[arg(short = 't', long, num_args = 0..=1, default_value = "0", default_missing_value = "90")]
        rotate: Rotation,
        /// Print a replayable log of the raw touch panel events
        #[arg(short = 'l', long, conflicts_with = "output_log")]
        event_log: bool,
        /// Print a replayable log of the calibrated output events
        #[arg(short = 'L', long)]
        output_log: bool,
    },
    /// Sample the touch panel corners and save a new calibration
    Calibrate {
        /// Touch panel event device, e.g. "/dev/input/event3"
        device: Option<String>,
        /// Display width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(i32).range(1..=8192))]
        width: i32,
        /// Display height in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(i32).range(1..=8192))]
        height: i32,
    },
    /// Compile a switch configuration and print the result
    Check {
        /// Path to the switch configuration to check
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub async fn main_cli(args: Args) -> Result<(), DaemonError> {
    match args.cmd {
        Commands::Switch {
            device,
            config,
            event_log,
        } => daemon::run_switch(device, config, event_log).await,
        Commands::Touch {
            device,
            rotate,
            event_log,
            output_log,
        } => {
            let log = match (event_log, output_log) {
                (true, _) => Some(TouchLog::Input),
                (_, true) => Some(TouchLog::Output),
                _ => None,
            };
            daemon::run_touch(device, rotate, log).await
        }
        Commands::Calibrate {
            device,
            width,
            height,
        } => daemon::run_calibrate(device, width, height).await,
        Commands::Check { config } => check::handle_check(config),
    }
}
