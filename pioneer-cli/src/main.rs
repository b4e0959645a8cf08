use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pioneer_sdk::{init_logging_with_filter, Command, LoggingMode, Receiver, ReceiverConfig};
use tracing::{debug, info};

/// Pioneer receiver control
///
/// Reads the receiver's address and source names from a JSON config file,
/// then queries or controls it over the network.
#[derive(Parser, Debug)]
#[command(name = "pioneer-cli")]
#[command(about = "Query and control a Pioneer AV receiver")]
#[command(version)]
pub struct Args {
    /// Config file (defaults to <config dir>/pioneer-avr/receiver.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Receiver host, overrides the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Receiver port, overrides the config file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Connect and write timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<f64>,

    /// Logging mode (silent, development, debug)
    #[arg(long, default_value = "development")]
    pub log_mode: LoggingMode,

    /// Log filter, e.g. `debug` or `warn,telnet_client=trace`.
    /// Falls back to PIONEER_LOG_LEVEL, then RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Action,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Print the receiver's current state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Power on
    On,
    /// Power off (standby)
    Off,
    /// Set volume, 0.0 to 1.0
    Volume { level: f64 },
    /// Step volume up
    VolumeUp,
    /// Step volume down
    VolumeDown,
    Mute,
    Unmute,
    /// Select an input by name
    Source { name: String },
    /// Select a listening mode by name
    SoundMode { name: String },
    /// List input names
    Sources,
    /// List configured listening modes
    SoundModes,
}

impl Action {
    /// The command to send for actions that need nothing from the receiver first
    fn direct_command(&self) -> Option<Command> {
        match self {
            Action::On => Some(Command::PowerOn),
            Action::Off => Some(Command::PowerOff),
            Action::Volume { level } => Some(Command::SetVolume(*level)),
            Action::VolumeUp => Some(Command::VolumeUp),
            Action::VolumeDown => Some(Command::VolumeDown),
            Action::Mute => Some(Command::Mute(true)),
            Action::Unmute => Some(Command::Mute(false)),
            _ => None,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pioneer-avr").join("receiver.json"))
}

/// Load `--config`, else `default_path` if it exists, then apply overrides
fn load_config(args: &Args, default_path: Option<&Path>) -> Result<ReceiverConfig> {
    let path = match &args.config {
        Some(path) => Some(path.as_path()),
        None => default_path.filter(|path| path.exists()),
    };

    let mut config = match path {
        Some(path) => {
            debug!("using config {}", path.display());
            ReceiverConfig::from_json_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => ReceiverConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_status(receiver: &Receiver, json: bool) -> Result<()> {
    let state = receiver.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let unknown = || "unknown".to_string();
    println!("{}", receiver.name());
    println!("  power:      {:?}", state.power);
    println!(
        "  volume:     {}",
        state
            .volume_percent()
            .map(|v| format!("{:.0}%", v))
            .unwrap_or_else(unknown)
    );
    println!(
        "  muted:      {}",
        state.muted.map(|m| m.to_string()).unwrap_or_else(unknown)
    );
    println!("  source:     {}", state.source.unwrap_or_else(unknown));
    println!("  sound mode: {}", state.sound_mode.unwrap_or_else(unknown));
    Ok(())
}

/// Refresh only when the source catalog still has to be discovered
fn ensure_sources(receiver: &Receiver, config: &ReceiverConfig) -> Result<()> {
    if receiver.source_list().is_empty() {
        receiver
            .refresh()
            .with_context(|| format!("Could not reach {}:{}", config.host, config.port))?;
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args, default_config_path().as_deref())?;
    let receiver = Receiver::new(&config).context("Invalid configuration")?;
    let unreachable = || format!("Could not reach {}:{}", config.host, config.port);

    if let Some(command) = args.command.direct_command() {
        if let Command::SetVolume(level) = command {
            if !(0.0..=1.0).contains(&level) {
                bail!("Volume must be between 0.0 and 1.0, got {}", level);
            }
        }
        return receiver.execute(&command).with_context(unreachable);
    }

    match args.command {
        Action::Status { json } => {
            receiver.refresh().with_context(unreachable)?;
            print_status(&receiver, json)?
        }
        Action::Source { name } => {
            ensure_sources(&receiver, &config)?;
            let Some(code) = receiver.source_code(&name) else {
                bail!(
                    "Unknown source '{}'. Available: {}",
                    name,
                    receiver.source_list().join(", ")
                );
            };
            receiver
                .execute(&Command::SelectSource(code))
                .with_context(unreachable)?
        }
        Action::SoundMode { name } => {
            let Some(code) = receiver.sound_mode_code(&name) else {
                bail!(
                    "Unknown sound mode '{}'. Configured: {}",
                    name,
                    receiver.sound_mode_list().join(", ")
                );
            };
            receiver
                .execute(&Command::SelectSoundMode(code))
                .with_context(unreachable)?
        }
        Action::Sources => {
            ensure_sources(&receiver, &config)?;
            for name in receiver.source_list() {
                println!("{}", name);
            }
        }
        Action::SoundModes => {
            for name in receiver.sound_mode_list() {
                println!("{}", name);
            }
        }
        _ => {}
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging_with_filter(args.log_mode, args.log_level.as_deref())
        .context("Failed to initialize logging")?;

    info!("pioneer-cli {}", env!("CARGO_PKG_VERSION"));
    run(args)
}
