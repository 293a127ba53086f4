// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thermolink Gateway CLI
//!
//! Bridges temperature frames from a serial sensor node to an HTTP endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Serial node, default endpoint
//! thermolink-gateway --port /dev/ttyUSB0
//!
//! # Custom endpoint and metric field
//! thermolink-gateway --url http://10.0.0.2:3000/api/sensor-data --field batteryTemperature
//!
//! # Frames from stdin
//! thermolink-gateway --stdin
//!
//! # Using configuration file
//! thermolink-gateway --config gateway.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thermolink_gateway::adapters::{HostLink, ReqwestTransport, StdinUart};
use thermolink_gateway::{BridgeLoop, ConfigError, GatewayConfig, GatewayError, SystemClock};
use thermolink_micro::transport::SerialUart;
use thermolink_micro::Uart;
use tracing_subscriber::EnvFilter;

/// Thermolink serial-to-HTTP gateway
#[derive(Parser, Debug)]
#[command(name = "thermolink-gateway")]
#[command(about = "Thermolink Gateway - serial temperature frames to HTTP JSON reports")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Endpoint URL
    #[arg(short, long, conflicts_with = "config")]
    url: Option<String>,

    /// Serial port of the sensor node
    #[arg(short, long, conflicts_with_all = ["config", "stdin"])]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long, conflicts_with = "config")]
    baud: Option<u32>,

    /// JSON field carrying the reading
    #[arg(short, long, conflicts_with = "config")]
    field: Option<String>,

    /// Read frames from stdin instead of a serial port
    #[arg(long)]
    stdin: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "gateway.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Handle subcommands
    if let Some(cmd) = args.command {
        return match cmd {
            Commands::GenConfig { output } => cmd_gen_config(output),
            Commands::Validate { config } => cmd_validate(config),
        };
    }

    let config = build_config(&args)?;

    println!("Thermolink Gateway v{}", env!("CARGO_PKG_VERSION"));
    println!("=====================================");
    println!();
    println!("Endpoint: {}", config.endpoint.url);
    println!("Field:    {}", config.endpoint.metric_field);

    if args.stdin {
        println!("Input:    stdin");
        println!();
        run_bridge(&config, StdinUart::new(), StdinUart::is_closed)
    } else {
        println!(
            "Input:    {} @ {} baud",
            config.serial.port, config.serial.baud_rate
        );
        println!();
        let uart = SerialUart::open(&config.serial.port, config.serial.baud_rate).map_err(|e| {
            GatewayError::Serial(format!("{}: {}", config.serial.port, e))
        })?;
        run_bridge(&config, uart, |_| false)
    }
}

fn run_bridge<U, F>(
    config: &GatewayConfig,
    uart: U,
    exhausted: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    U: Uart,
    F: FnMut(&U) -> bool,
{
    let transport = ReqwestTransport::new(config.endpoint.request_timeout())
        .map_err(GatewayError::Transport)?;

    let mut bridge = BridgeLoop::new(
        config,
        uart,
        HostLink::new(),
        transport,
        SystemClock::new(),
    );

    let running = bridge.running_flag();
    ctrlc::set_handler(move || {
        running.store(false, std::sync::atomic::Ordering::SeqCst);
    })?;

    println!("Press Ctrl+C to stop...");
    println!();

    bridge.run_until(exhausted);

    println!("\nFinal Statistics:");
    println!("{}", bridge.stats().format_summary());
    Ok(())
}

fn build_config(args: &Args) -> Result<GatewayConfig, GatewayError> {
    // Load from file if specified
    if let Some(ref config_path) = args.config {
        return GatewayConfig::from_file(config_path).map_err(GatewayError::Config);
    }

    // Build from command line arguments
    let mut config = GatewayConfig::default();

    if let Some(ref url) = args.url {
        config.endpoint.url = url.clone();
    }
    if let Some(ref field) = args.field {
        config.endpoint.metric_field = field.clone();
    }
    if let Some(ref port) = args.port {
        config.serial.port = port.clone();
    }
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }

    config.validate()?;
    Ok(config)
}

fn cmd_gen_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::default();
    config.network.ssid = "SS2".into();
    config.network.passphrase = "00000000".into();

    let toml_str = toml::to_string_pretty(&config)?;

    // Add comments
    let content = format!(
        r#"# Thermolink Gateway Configuration
# Generated by thermolink-gateway gen-config

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match GatewayConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Network:  '{}'", config.network.ssid);
            println!(
                "Endpoint: {} (field '{}')",
                config.endpoint.url, config.endpoint.metric_field
            );
            println!(
                "Serial:   {} @ {} baud",
                config.serial.port, config.serial.baud_rate
            );
            let range = config.bridge.plausible_range();
            println!("Range:    [{}, {}]", range.min, range.max);
            Ok(())
        }
        Err(ConfigError::Io(e)) => {
            eprintln!("Cannot read {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}
