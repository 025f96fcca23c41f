use std::env;
use std::process::ExitCode;

use clap::Parser;

use crate::cli::{main_cli, Args};

mod cli;
mod config;
mod constants;
mod daemon;
mod dbus;
mod discovery;
#[cfg(test)]
mod discovery_test;
mod drivers;
mod eventlog;
#[cfg(test)]
mod eventlog_test;
mod procfs;
mod switch;
mod touch;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting InputBridge v{}", VERSION);

    match main_cli(args).await {
        Ok(_) => {
            log::info!("InputBridge stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
