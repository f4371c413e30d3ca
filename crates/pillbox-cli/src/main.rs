use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pillbox-cli", version, about = "Pillbox medication reminder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Medication management
    Med {
        #[command(subcommand)]
        action: commands::med::MedAction,
    },
    /// Today's medications and their status
    Today {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Medications taken, most recent first
    History {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Keep the Today view current until interrupted
    Watch {
        /// Refresh interval in seconds (default: clock.refresh_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Med { action } => commands::med::run(action),
        Commands::Today { json } => commands::view::today(json),
        Commands::History { json } => commands::view::history(json),
        Commands::Watch { interval } => commands::watch::run(interval),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
