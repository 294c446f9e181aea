//! Config command - inspect and change settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_app_dir, get_logger, log_event};
use crate::output;
use restopick_core::config::{Config, SeedSource};
use restopick_core::LogEvent;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one setting (seedSource, serendipityCount, trendingCount,
    /// defaultMaxDistance, rngSeed, logging)
    Set {
        /// Setting key as written in settings.json
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&app_dir)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }

            let seed_source = match &config.seed_source {
                SeedSource::Demo => "demo".to_string(),
                SeedSource::File(path) => path.display().to_string(),
            };
            let rng_seed = config
                .rng_seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "random".to_string());

            println!("{}", "Settings".bold());
            let mut table = output::create_table();
            table.add_row(vec!["seedSource", seed_source.as_str()]);
            table.add_row(vec!["serendipityCount", &config.serendipity_count.to_string()]);
            table.add_row(vec!["trendingCount", &config.trending_count.to_string()]);
            table.add_row(vec!["defaultMaxDistance", &config.default_max_distance.to_string()]);
            table.add_row(vec!["rngSeed", rng_seed.as_str()]);
            table.add_row(vec!["logging", &config.logging.to_string()]);
            println!("{}", table);
            println!();
            println!("Directory: {}", app_dir.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(&app_dir)?;
            config.set(&key, &value, &app_dir)?;
            config.save(&app_dir)?;

            let logger = get_logger();
            log_event(
                logger.as_ref(),
                LogEvent::new("config_updated").with_command(format!("config set {}", key)),
            );
            output::success(&format!("{} updated", key));
        }
    }

    Ok(())
}
