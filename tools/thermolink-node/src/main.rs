// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! thermolink-node - host build of the sensor node
//!
//! Reads a DS18B20 through the Linux 1-Wire driver (or a simulated probe)
//! and writes one `23.50` / `ERROR` line per reading to a serial port.
//!
//! # Usage
//!
//! ```bash
//! # Real probe to a USB serial adapter
//! thermolink-node --device 28-0316a2795aff --port /dev/ttyUSB0
//!
//! # Simulated probe piped straight into the gateway
//! thermolink-node --simulate --port - | thermolink-gateway --stdin
//! ```

mod probe;

use anyhow::{bail, Context, Result};
use clap::Parser;
use probe::{SimulatedThermometer, W1Thermometer};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thermolink_micro::node::DEFAULT_READ_INTERVAL_MS;
use thermolink_micro::transport::SerialUart;
use thermolink_micro::{SensorNode, SensorSource, Uart, DEFAULT_BAUD_RATE};
use tracing_subscriber::EnvFilter;

/// Thermolink sensor node
#[derive(Parser, Debug)]
#[command(name = "thermolink-node")]
#[command(version)]
#[command(about = "Sample a DS18B20 and frame readings onto a serial line")]
struct Args {
    /// Serial port ("-" for stdout)
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Serial baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Milliseconds between readings
    #[arg(short, long, default_value_t = DEFAULT_READ_INTERVAL_MS)]
    interval_ms: u32,

    /// 1-Wire device id (e.g. 28-0316a2795aff)
    #[arg(short, long, required_unless_present = "simulate")]
    device: Option<String>,

    /// Use a simulated probe instead of 1-Wire
    #[arg(long, conflicts_with = "device")]
    simulate: bool,

    /// Inject a probe fault every N simulated readings (0 = never)
    #[arg(long, default_value = "0", requires = "simulate")]
    fault_every: u32,

    /// Number of readings to send (0 = unlimited)
    #[arg(short = 'n', long, default_value = "0")]
    count: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Probe selected on the command line
enum Probe {
    W1(W1Thermometer),
    Simulated(SimulatedThermometer),
}

impl SensorSource for Probe {
    fn read_celsius(&mut self) -> f64 {
        match self {
            Probe::W1(p) => p.read_celsius(),
            Probe::Simulated(p) => p.read_celsius(),
        }
    }
}

/// Frames to stdout, for piping into `thermolink-gateway --stdin`
struct StdoutUart;

impl Uart for StdoutUart {
    fn write(&mut self, data: &[u8]) -> thermolink_micro::Result<usize> {
        std::io::stdout()
            .write_all(data)
            .map_err(|_| thermolink_micro::Error::TransportError)?;
        Ok(data.len())
    }

    fn read(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> thermolink_micro::Result<usize> {
        Err(thermolink_micro::Error::Timeout)
    }

    fn try_read(&mut self, _buf: &mut [u8]) -> thermolink_micro::Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> thermolink_micro::Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|_| thermolink_micro::Error::TransportError)
    }

    fn available(&self) -> usize {
        0
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so "--port -" keeps stdout clean
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.baud == 0 {
        bail!("Baud rate must be > 0");
    }

    let probe = match (&args.device, args.simulate) {
        (_, true) => {
            tracing::info!("Using simulated probe");
            Probe::Simulated(SimulatedThermometer::new().with_faults(args.fault_every))
        }
        (Some(id), false) => {
            let probe = W1Thermometer::new(id);
            tracing::info!("Using 1-Wire probe at {}", probe.path().display());
            Probe::W1(probe)
        }
        (None, false) => bail!("Either --device or --simulate is required"),
    };

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, shutting down...");
        flag.store(false, Ordering::SeqCst);
    })
    .context("Cannot install Ctrl+C handler")?;

    if args.port == "-" {
        run(&args, probe, StdoutUart, &running)
    } else {
        let uart = SerialUart::open(&args.port, args.baud)
            .with_context(|| format!("Cannot open serial port {}", args.port))?;
        tracing::info!("Writing frames to {} @ {} baud", args.port, args.baud);
        run(&args, probe, uart, &running)
    }
}

fn run<U: Uart>(args: &Args, probe: Probe, uart: U, running: &AtomicBool) -> Result<()> {
    let mut node = SensorNode::new(probe, uart);
    let interval = Duration::from_millis(u64::from(args.interval_ms));
    let mut sent = 0u64;

    while running.load(Ordering::SeqCst) {
        match node.cycle() {
            Ok(sample) if sample.valid => tracing::info!("Sent {:.2}", sample.value),
            Ok(_) => tracing::warn!("Probe disconnected; sent ERROR"),
            Err(e) => tracing::warn!("Frame not sent: {}", e),
        }

        sent += 1;
        if args.count > 0 && sent >= args.count {
            break;
        }

        std::thread::sleep(interval);
    }

    tracing::info!("{} frames written", node.frames_sent());
    Ok(())
}
