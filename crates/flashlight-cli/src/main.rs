//! `flashctl`: drive a camera flash from the command line.
//!
//! Reads one command per line from stdin (`help` lists them) until `quit`,
//! end of input or Ctrl-C, then detaches the device.
//!
//! ## Environment Variables
//! - `RUST_LOG`: log filter (default: `info`)

mod config;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use flashlight_hardware::AnyLineController;
use flashlight_hardware::mock::MockGpioChip;
use flashlight_hardware::sysfs::{SYSFS_GPIO_ROOT, SysfsGpio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::CliConfig;
use session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// In-memory lines
    Mock,
    /// /sys/class/gpio
    Sysfs,
}

#[derive(Parser)]
#[command(name = "flashctl")]
#[command(version = flashlight_core::VERSION)]
#[command(about = "Control a dual-GPIO camera flash", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Line backend
    #[arg(short, long, value_enum, default_value_t = Backend::Mock)]
    backend: Backend,

    /// Root of the sysfs GPIO tree
    #[arg(long, value_name = "DIR", default_value = SYSFS_GPIO_ROOT)]
    sysfs_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    let lines = match args.backend {
        Backend::Mock => AnyLineController::from(MockGpioChip::default()),
        Backend::Sysfs => AnyLineController::from(SysfsGpio::with_root(args.sysfs_root.clone())),
    };

    let session = Session::new(config, lines);
    info!(
        "flashctl {} ready (device {}, {} backend)",
        flashlight_core::VERSION,
        session.device_name(),
        session.backend()
    );

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match session.execute(&line) {
                    Ok(Some(output)) => println!("{output}"),
                    Ok(None) => break,
                    Err(e) => eprintln!("error: {e:#}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted");
                break;
            }
        }
    }

    session.shutdown();
    Ok(())
}
