mod output;

use clap::{Parser, Subcommand, ValueEnum};
use hydropanel_core::PanelConfig;
use hydropanel_runtime::{spawn_panel, PanelCommand};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry::{ControllerMode, HttpTelemetry, TelemetrySource};

#[derive(Parser)]
#[command(name = "hydropanel", version, about = "Water-level regulation panel")]
struct Cli {
    /// Controller base URL (overrides the settings file)
    #[arg(long)]
    url: Option<String>,
    /// Panel settings file
    #[arg(long, default_value = "hydropanel.toml")]
    config: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current controller status
    Status {
        /// Print the raw JSON payload instead
        #[arg(long)]
        json: bool,
    },
    /// Print the recorded level history
    History {
        /// Only show the most recent N measurements
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Switch the regulation mode
    Mode { mode: ModeArg },
    /// Set the valve opening (MANUAL mode only)
    Valve {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        opening: u8,
    },
    /// Print the controller configuration
    Config,
    /// Check controller health
    Health,
    /// Run the live panel, printing events as they happen
    Watch {
        /// Stop after this many seconds instead of running until killed
        #[arg(long)]
        duration_seconds: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Automatic,
    Manual,
}

impl From<ModeArg> for ControllerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Automatic => ControllerMode::Automatic,
            ModeArg::Manual => ControllerMode::Manual,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = PanelConfig::load_or_default(&cli.config);
    if let Some(url) = cli.url {
        config.controller_url = url;
    }
    let timeout = Duration::from_millis(config.request_timeout_ms);
    let source = HttpTelemetry::new(config.controller_url.clone(), timeout);

    match cli.command {
        Commands::Status { json } => match source.fetch_status() {
            Ok(status) => {
                if json {
                    match serde_json::to_string_pretty(&status) {
                        Ok(payload) => println!("{payload}"),
                        Err(err) => output::print_error(&err.to_string()),
                    }
                } else {
                    output::print_status(&status);
                }
            }
            Err(err) => output::print_error(&err.to_string()),
        },
        Commands::History { limit } => match source.fetch_history() {
            Ok(batch) => output::print_history(&batch, limit),
            Err(err) => output::print_error(&err.to_string()),
        },
        Commands::Mode { mode } => {
            let mode = ControllerMode::from(mode);
            match source.set_mode(mode) {
                Ok(ack) if ack.success => output::print_info(&format!("Mode set to {mode}")),
                Ok(ack) => output::print_error(
                    ack.message.as_deref().unwrap_or("Failed to switch mode"),
                ),
                Err(err) => output::print_error(&err.to_string()),
            }
        }
        Commands::Valve { opening } => match source.set_valve(opening) {
            Ok(ack) if ack.success => output::print_info(&format!("Valve set to {opening}%")),
            Ok(ack) => {
                output::print_error(ack.message.as_deref().unwrap_or("Failed to set valve"))
            }
            Err(err) => output::print_error(&err.to_string()),
        },
        Commands::Config => match source.fetch_config() {
            Ok(remote) => output::print_config(&remote),
            Err(err) => output::print_error(&err.to_string()),
        },
        Commands::Health => match source.health() {
            Ok(report) => output::print_health(&report),
            Err(err) => output::print_error(&err.to_string()),
        },
        Commands::Watch { duration_seconds } => {
            run_watch(source, config, duration_seconds);
        }
    }
}

fn run_watch(source: HttpTelemetry, config: PanelConfig, duration_seconds: Option<u64>) {
    output::print_info(&format!("Watching controller at {}", config.controller_url));
    let (commands, events) = spawn_panel(Arc::new(source), config);
    let deadline = duration_seconds.map(|secs| Instant::now() + Duration::from_secs(secs));

    loop {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }
        match events.recv_timeout(Duration::from_millis(250)) {
            Ok(event) => output::print_event(&event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let _ = commands.send(PanelCommand::Shutdown);
    output::print_info("Watch stopped");
}
