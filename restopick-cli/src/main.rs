//! RestoPick CLI - where is the office going for lunch?

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, filter, groups, logs, restaurants, session, surprise, trending};

/// RestoPick - pick a lunch spot with your colleagues
#[derive(Parser)]
#[command(name = "rp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the restaurant catalog
    Restaurants {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most voted restaurants
    Trending {
        /// Number of restaurants to show (defaults to the trendingCount setting)
        #[arg(short, long)]
        n: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the groups colleagues have formed
    Groups {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter restaurants by cuisine, distance and name
    Filter {
        /// Exact cuisine to keep
        #[arg(long)]
        cuisine: Option<String>,
        /// Maximum distance in km (defaults to the defaultMaxDistance setting)
        #[arg(long)]
        max_distance: Option<f64>,
        /// Case-insensitive text matched against name or cuisine
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw a few restaurants at random
    Surprise {
        /// Number of restaurants to draw (defaults to the serendipityCount setting)
        #[arg(short, long)]
        n: Option<usize>,
        /// Fixed seed for a repeatable draw
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive voting session
    Session {
        /// Log in as the demo user
        #[arg(long, conflicts_with = "email")]
        demo: bool,
        /// Log in with this email address
        #[arg(long)]
        email: Option<String>,
        /// Print one JSON result per command
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Restaurants { .. } => "restaurants",
            Commands::Trending { .. } => "trending",
            Commands::Groups { .. } => "groups",
            Commands::Filter { .. } => "filter",
            Commands::Surprise { .. } => "surprise",
            Commands::Session { .. } => "session",
            Commands::Config { .. } => "config",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_failure(commands::get_logger().as_ref(), name, &e);
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Restaurants { json } => restaurants::run(json),
        Commands::Trending { n, json } => trending::run(n, json),
        Commands::Groups { json } => groups::run(json),
        Commands::Filter { cuisine, max_distance, search, json } => {
            filter::run(cuisine, max_distance, search, json)
        }
        Commands::Surprise { n, seed, json } => surprise::run(n, seed, json),
        Commands::Session { demo, email, json } => session::run(demo, email, json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
