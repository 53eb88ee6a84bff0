//! RustCSC command-line harness
//!
//! Replays recorded CSC notifications through the sensor core, decodes single
//! notifications, and converts raw notification logs into replay files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam::channel::unbounded;
use rustcsc::integrations::{MetricPayload, PayloadPublisher};
use rustcsc::replay::{convert_log_file, load_entries, parse_notification_hex, replay_entries};
use rustcsc::sensors::{parse_csc_measurement, CscEvent, CscEventHandler};
use rustcsc::storage::config::{load_config, load_config_from};
use rustcsc::{CscConfig, SensorCore};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Cycling Speed and Cadence decoder
#[derive(Parser, Debug)]
#[command(name = "rustcsc")]
#[command(about = "Decode CSC sensor notifications into speed and cadence", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay recorded notifications and print derived values
    Replay {
        /// Replay file with wheel notifications
        #[arg(long, value_name = "FILE")]
        wheel: Option<PathBuf>,

        /// Replay file with crank notifications
        #[arg(long, value_name = "FILE")]
        crank: Option<PathBuf>,

        /// Configuration file (defaults to the data directory)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print encoded publisher payloads instead of values
        #[arg(long)]
        payloads: bool,
    },

    /// Decode a single notification given as hex
    Decode {
        /// Notification bytes, e.g. 03-64-00-00-00-00-04-0A-00-00-02
        hex: String,
    },

    /// Convert a raw notification log into a replay file
    ConvertLog {
        /// Log file to read
        input: PathBuf,
        /// Replay JSON file to write
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Starting RustCSC v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Replay {
            wheel,
            crank,
            config,
            payloads,
        } => run_replay(wheel, crank, config, payloads),
        Command::Decode { hex } => run_decode(&hex),
        Command::ConvertLog { input, output } => {
            let count = convert_log_file(&input, &output)
                .with_context(|| format!("converting {}", input.display()))?;
            println!("Parsed {} notifications into {}", count, output.display());
            Ok(())
        }
    }
}

fn run_decode(hex: &str) -> Result<()> {
    let data = parse_notification_hex(hex)?;
    let measurement = parse_csc_measurement(&data)?;

    println!("Flags: 0x{:02X}", measurement.flags);
    if let Some(wheel) = measurement.wheel {
        println!(
            "Wheel Revolutions: {}, Wheel Revolutions Event Time: {}",
            wheel.revolutions, wheel.event_time
        );
    }
    if let Some(crank) = measurement.crank {
        println!(
            "Crank Revolutions: {}, Crank Revolutions Event Time: {}",
            crank.revolutions, crank.event_time
        );
    }
    Ok(())
}

fn run_replay(
    wheel: Option<PathBuf>,
    crank: Option<PathBuf>,
    config_path: Option<PathBuf>,
    payloads: bool,
) -> Result<()> {
    if wheel.is_none() && crank.is_none() {
        anyhow::bail!("nothing to replay: pass --wheel and/or --crank");
    }

    let config = match &config_path {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("loading configuration")?;
    let csc = config.csc;

    if payloads {
        let (tx, rx) = unbounded::<Vec<u8>>();
        std::thread::scope(|scope| -> Result<()> {
            let sessions = spawn_sessions(scope, &csc, [wheel.as_deref(), crank.as_deref()], || {
                PayloadPublisher::new(tx.clone())
            });
            drop(tx);

            for payload in rx {
                let hex: Vec<String> = payload.iter().map(|b| format!("{b:02X}")).collect();
                match MetricPayload::decode(&payload) {
                    Ok(metric) => println!("{} ({:?})", hex.join("-"), metric),
                    Err(_) => println!("{}", hex.join("-")),
                }
            }
            join_sessions(sessions)
        })
    } else {
        let (tx, rx) = unbounded::<CscEvent>();
        std::thread::scope(|scope| -> Result<()> {
            let sessions =
                spawn_sessions(scope, &csc, [wheel.as_deref(), crank.as_deref()], || tx.clone());
            drop(tx);

            for event in rx {
                println!("{event}");
            }
            join_sessions(sessions)
        })
    }
}

type Session<'scope> = std::thread::ScopedJoinHandle<'scope, Result<()>>;

/// Start one isolated sensor session per replay file.
fn spawn_sessions<'scope, 'env, H, F>(
    scope: &'scope std::thread::Scope<'scope, 'env>,
    config: &'env CscConfig,
    files: [Option<&'env Path>; 2],
    mut make_handler: F,
) -> Vec<Session<'scope>>
where
    H: CscEventHandler + Send + 'scope,
    F: FnMut() -> H,
{
    files
        .into_iter()
        .flatten()
        .map(|path| {
            let handler = make_handler();
            scope.spawn(move || -> Result<()> {
                let entries = load_entries(path)
                    .with_context(|| format!("loading replay {}", path.display()))?;
                let mut core = SensorCore::new(config, handler);
                let summary = replay_entries(&mut core, &entries);
                tracing::info!(
                    path = %path.display(),
                    processed = summary.processed,
                    rejected = summary.rejected,
                    "Replay finished"
                );
                Ok(())
            })
        })
        .collect()
}

fn join_sessions(sessions: Vec<Session<'_>>) -> Result<()> {
    for session in sessions {
        session
            .join()
            .map_err(|_| anyhow::anyhow!("replay thread panicked"))??;
    }
    Ok(())
}

