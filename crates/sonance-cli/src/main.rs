use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

use commands::Format;
use config::Config;

#[derive(Debug, Parser)]
#[command(name = "sonance", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/sonance/sonance.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend tracks that sound like the given one
    ///
    /// The name is matched case-insensitively as a substring of track titles.
    /// When several tracks match, the first title/artist pair in catalog
    /// order is used, taking its most energetic version. Recommendations are
    /// the nearest tracks by cosine distance over the eight audio features
    /// (danceability, energy, loudness, speechiness, acousticness,
    /// instrumentalness, liveness, valence), closest first.
    Recommend {
        /// Track name, or part of it
        track: String,
    },
    /// Sample a playlist for a mood: party, chill, sad, or focus
    Mood {
        /// Mood label
        mood: String,

        /// Seed for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show two tracks side by side
    Compare {
        /// First track name, or part of it
        first: String,
        /// Second track name, or part of it
        second: String,
    },
    /// Show the most energetic tracks released in a year
    TimeMachine {
        /// Release year
        year: i32,
    },
    /// List every track by an artist, most energetic first
    Artist {
        /// Artist name; exact matches win over partial ones
        name: String,
    },
    /// Show catalog statistics
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };
    init_logging(&config.log_level);

    let format = if cli.json { Format::Json } else { Format::Text };

    match cli.command {
        Commands::Recommend { track } => {
            let engine = commands::load_engine(&config)?;
            commands::run_recommend(&engine, &track, format)?;
        }
        Commands::Mood { mood, seed } => {
            let engine = commands::load_engine(&config)?;
            commands::run_mood(&engine, &mood, seed, format)?;
        }
        Commands::Compare { first, second } => {
            let engine = commands::load_engine(&config)?;
            commands::run_compare(&engine, &first, &second, format)?;
        }
        Commands::TimeMachine { year } => {
            let engine = commands::load_engine(&config)?;
            commands::run_time_machine(&engine, year, format)?;
        }
        Commands::Artist { name } => {
            let engine = commands::load_engine(&config)?;
            commands::run_artist(&engine, &name, format)?;
        }
        Commands::Status => {
            commands::show_status(&config, format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
