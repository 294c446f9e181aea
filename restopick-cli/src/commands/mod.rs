//! CLI command implementations

pub mod config;
pub mod filter;
pub mod groups;
pub mod logs;
pub mod restaurants;
pub mod session;
pub mod surprise;
pub mod trending;

use std::path::PathBuf;

use anyhow::{Context, Result};
use restopick_core::config::Config;
use restopick_core::{EntryPoint, LogEvent, LoggingService, RestoPickContext};

/// Get the logging service for CLI operations
///
/// Returns None when logging is switched off or fails to initialize
/// (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let app_dir = get_app_dir().ok()?;
    let enabled = Config::load(&app_dir).map(|c| c.logging).unwrap_or(true);
    if !enabled {
        return None;
    }
    std::fs::create_dir_all(&app_dir).ok()?;
    LoggingService::new(&app_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: Option<&LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record a one-shot command in the context's event log
pub fn log_command(ctx: &RestoPickContext, command: &str) {
    log_event(
        ctx.logger.as_deref(),
        LogEvent::new("command_executed").with_command(command),
    );
}

/// Record a command that ended in an error
pub fn log_failure(logger: Option<&LoggingService>, command: &str, error: &anyhow::Error) {
    if let Some(l) = logger {
        let _ = l.log_error("command_failed", &format!("{:#}", error), Some(command));
    }
}

/// Get the RestoPick directory from environment or default
pub fn get_app_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RESTOPICK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".restopick"))
}

/// Get or create a RestoPick context
pub fn get_context(entry_point: EntryPoint) -> Result<RestoPickContext> {
    let app_dir = get_app_dir()?;

    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create RestoPick directory: {:?}", app_dir))?;

    RestoPickContext::new(&app_dir, entry_point).context("Failed to initialize RestoPick context")
}

/// Context for a one-shot command, logged in as the demo user
///
/// One-shot commands read the votes seeded at login.
pub fn get_demo_session(command: &str) -> Result<RestoPickContext> {
    let mut ctx = get_context(EntryPoint::Cli)?;
    ctx.picker.login_demo()?;
    log_command(&ctx, command);
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tempfile::tempdir;

    #[test]
    fn test_log_failure_records_error_chain() {
        let dir = tempdir().unwrap();
        let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "0.1.0").unwrap();

        let error = anyhow!("seed file not found").context("Failed to initialize RestoPick context");
        log_failure(Some(&logger), "trending", &error);

        let errors = logger.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "command_failed");
        assert_eq!(
            errors[0].error_message.as_deref(),
            Some("Failed to initialize RestoPick context: seed file not found")
        );
        assert_eq!(errors[0].error_details.as_deref(), Some("trending"));
    }

    #[test]
    fn test_log_failure_without_logger() {
        log_failure(None, "groups", &anyhow!("boom"));
    }
}
