//! Logs command - inspect the session event log

use anyhow::Result;
use chrono::{Duration, Local, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_app_dir;
use crate::output;
use restopick_core::{EntryPoint, LogEntry, LoggingService};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        /// Number of events to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only events that carry an error
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count events and locate the log database
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Clear {
        /// Keep events from the last N days
        #[arg(long, default_value = "30")]
        older_than_days: u32,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)?;
    let service = LoggingService::new(&app_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List { limit, errors, json } => list(&service, limit, errors, json),
        LogsCommands::Stats { json } => stats(&service, json),
        LogsCommands::Clear { older_than_days, force, json } => clear(&service, older_than_days, force, json),
    }
}

fn local_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

fn list(service: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let entries = if errors {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("The event log is empty.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "From", "Event", "Screen", "Detail"]);
    for entry in &entries {
        table.add_row(vec![
            local_time(entry.timestamp),
            entry.entry_point.clone(),
            event_label(entry),
            entry.screen.clone().unwrap_or_default(),
            detail(entry),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn event_label(entry: &LogEntry) -> String {
    if entry.error_message.is_some() {
        entry.event.red().to_string()
    } else {
        entry.event.clone()
    }
}

/// Command, restaurant and error text joined for one table cell
fn detail(entry: &LogEntry) -> String {
    let mut parts = Vec::new();
    if let Some(command) = &entry.command {
        parts.push(command.clone());
    }
    if let Some(id) = &entry.restaurant_id {
        parts.push(format!("restaurant {}", id));
    }
    if let Some(message) = &entry.error_message {
        parts.push(message.clone());
    }
    parts.join(" | ")
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let total = service.count()?;
    let errors = service.count_errors()?;
    let size_bytes = std::fs::metadata(service.db_path()).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "totalEntries": total,
                "errorCount": errors,
                "databasePath": service.db_path().to_string_lossy(),
                "databaseSizeBytes": size_bytes,
            })
        );
        return Ok(());
    }

    println!("{}", "Event log".bold());
    let mut table = output::create_table();
    table.add_row(vec!["Events".to_string(), total.to_string()]);
    table.add_row(vec!["Errors".to_string(), errors.to_string()]);
    table.add_row(vec!["Database".to_string(), service.db_path().display().to_string()]);
    table.add_row(vec!["Size".to_string(), format!("{} bytes", size_bytes)]);
    println!("{}", table);
    Ok(())
}

fn clear(service: &LoggingService, older_than_days: u32, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete events older than {} days?", older_than_days))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Nothing deleted.");
            return Ok(());
        }
    }

    let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));
    let deleted = service.delete_before(cutoff.timestamp_millis())?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Deleted {} event(s)", deleted));
    }
    Ok(())
}
