use clap::{Parser, Subcommand};
use pauseroom_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "pauseroom-cli", version, about = "Pauseroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live work/break timer in the terminal
    Run(commands::timer::RunArgs),
    /// Print the initial timer state for a set of settings as JSON
    Status(commands::timer::SettingsArgs),
    /// Check break duration and work frequency against their allowed ranges
    Validate {
        /// Break duration in minutes
        #[arg(long)]
        duration: u64,
        /// Work frequency in minutes
        #[arg(long)]
        frequency: u64,
    },
    /// Format a number of seconds for display
    Format {
        #[command(subcommand)]
        style: commands::format::FormatStyle,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

const DEFAULT_LOG_LEVEL: &str = "info";

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file for commands that read timer defaults.
///
/// A broken file is an error here, not a silent fall back to defaults.
fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.log.level);
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => load_config().and_then(|config| commands::timer::run(args, &config)),
        Commands::Status(args) => {
            load_config().and_then(|config| commands::timer::status(args, &config))
        }
        Commands::Validate {
            duration,
            frequency,
        } => {
            init_tracing(DEFAULT_LOG_LEVEL);
            commands::validate::run(duration, frequency)
        }
        Commands::Format { style } => {
            init_tracing(DEFAULT_LOG_LEVEL);
            commands::format::run(style)
        }
        Commands::Config { action } => {
            init_tracing(DEFAULT_LOG_LEVEL);
            commands::config::run(action)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
