//! Event log backed by DuckDB
//!
//! Records what happened in a session (logins, screen changes, votes,
//! rejected actions) in `logs.duckdb`. Names and emails are never written:
//! rows carry screen names and restaurant ids only.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::log_migrations::LOG_MIGRATIONS;

/// How the engine was driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    /// One-shot CLI command
    Cli,
    /// Interactive session shell
    Shell,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Shell => "shell",
        }
    }
}

/// An event about to be written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    /// Screen the session is on after the event
    pub fn with_screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    /// Command or action that triggered the event
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_restaurant(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = Some(restaurant_id.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A stored event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    /// Unix time in milliseconds
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub screen: Option<String>,
    pub command: Option<String>,
    pub restaurant_id: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            entry_point: row.get(2)?,
            app_version: row.get(3)?,
            platform: row.get(4)?,
            event: row.get(5)?,
            screen: row.get(6)?,
            command: row.get(7)?,
            restaurant_id: row.get(8)?,
            error_message: row.get(9)?,
            error_details: row.get(10)?,
        })
    }
}

const ENTRY_COLUMNS: &str = "id, timestamp, entry_point, app_version, platform, \
     event, screen, command, restaurant_id, error_message, error_details";

/// Apply every migration not yet recorded in `sys_migrations`
///
/// Returns how many ran.
fn migrate(conn: &Connection) -> Result<usize> {
    let (bootstrap_name, bootstrap_sql) = LOG_MIGRATIONS[0];
    conn.execute_batch(bootstrap_sql)?;

    let mut stmt = conn.prepare("SELECT migration_name FROM sys_migrations")?;
    let applied = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<duckdb::Result<Vec<String>>>()?;
    drop(stmt);

    let mut ran = 0;
    for &(name, sql) in LOG_MIGRATIONS {
        if applied.iter().any(|a| a == name) {
            continue;
        }
        if name != bootstrap_name {
            conn.execute_batch(sql)?;
        }
        conn.execute("INSERT INTO sys_migrations (migration_name) VALUES (?)", [name])?;
        ran += 1;
    }
    Ok(ran)
}

/// Writes and reads the event log
///
/// The connection sits behind a mutex so one service can be shared between
/// the context and its picker.
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
}

impl LoggingService {
    /// Open (or create) `logs.duckdb` in `app_dir` and bring its schema up to date
    pub fn new(app_dir: &Path, entry_point: EntryPoint, app_version: impl Into<String>) -> Result<Self> {
        let db_path = app_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;
        migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("event log connection poisoned"))
    }

    /// Write one event, stamped with the current time
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sys_logs (timestamp, entry_point, app_version, platform, event, \
             screen, command, restaurant_id, error_message, error_details) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                Utc::now().timestamp_millis(),
                self.entry_point.as_str(),
                self.app_version,
                std::env::consts::OS,
                event.event,
                event.screen,
                event.command,
                event.restaurant_id,
                event.error_message,
                event.error_details,
            ],
        )?;
        Ok(())
    }

    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Record that a CLI command ran
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    pub fn log_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let entry = LogEvent::new(event).with_error(message);
        match details {
            Some(details) => self.log(entry.with_error_details(details)),
            None => self.log(entry),
        }
    }

    fn select(&self, condition: &str, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM sys_logs WHERE {} ORDER BY id DESC LIMIT ?",
            ENTRY_COLUMNS, condition
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([limit as i64], LogEntry::from_row)?
            .collect::<duckdb::Result<Vec<LogEntry>>>()?;
        Ok(entries)
    }

    /// Latest entries, newest first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.select("TRUE", limit)
    }

    /// Latest entries carrying an error, newest first
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.select("error_message IS NOT NULL", limit)
    }

    fn count_where(&self, condition: &str) -> Result<u64> {
        let conn = self.conn()?;
        let sql = format!("SELECT COUNT(*) FROM sys_logs WHERE {}", condition);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn count(&self) -> Result<u64> {
        self.count_where("TRUE")
    }

    pub fn count_errors(&self) -> Result<u64> {
        self.count_where("error_message IS NOT NULL")
    }

    /// Drop entries older than `timestamp_ms`; returns how many went
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(dir: &Path) -> LoggingService {
        LoggingService::new(dir, EntryPoint::Shell, "0.1.0").unwrap()
    }

    #[test]
    fn test_new_creates_database() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());

        assert_eq!(log.db_path(), dir.path().join("logs.duckdb"));
        assert!(log.db_path().exists());
        assert_eq!(log.count().unwrap(), 0);
    }

    #[test]
    fn test_migrations_run_once() {
        let dir = tempdir().unwrap();
        let conn = Connection::open(dir.path().join("logs.duckdb")).unwrap();
        assert_eq!(migrate(&conn).unwrap(), LOG_MIGRATIONS.len());
        assert_eq!(migrate(&conn).unwrap(), 0);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        service(dir.path()).log_event("login").unwrap();

        let reopened = LoggingService::new(dir.path(), EntryPoint::Cli, "0.2.0").unwrap();
        reopened.log_command("trending").unwrap();

        let entries = reopened.get_recent(10).unwrap();
        let events: Vec<_> = entries.iter().map(|e| (e.event.as_str(), e.entry_point.as_str())).collect();
        assert_eq!(events, vec![("command_executed", "cli"), ("login", "shell")]);
        assert!(entries[0].id > entries[1].id);
    }

    #[test]
    fn test_event_fields_are_stored() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());

        log.log(LogEvent::new("vote").with_screen("confirmation").with_restaurant("3"))
            .unwrap();

        let entry = &log.get_recent(1).unwrap()[0];
        assert_eq!(entry.event, "vote");
        assert_eq!(entry.screen.as_deref(), Some("confirmation"));
        assert_eq!(entry.restaurant_id.as_deref(), Some("3"));
        assert_eq!(entry.app_version, "0.1.0");
        assert_eq!(entry.platform, std::env::consts::OS);
        assert!(entry.command.is_none());
    }

    #[test]
    fn test_errors_are_queryable() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());

        log.log_command("groups").unwrap();
        log.log_error("transition_rejected", "cannot vote from the home screen", Some("vote"))
            .unwrap();

        let errors = log.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "transition_rejected");
        assert_eq!(errors[0].error_details.as_deref(), Some("vote"));
        assert_eq!(log.count_errors().unwrap(), 1);
        assert_eq!(log.count().unwrap(), 2);
    }

    #[test]
    fn test_delete_before() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        for event in ["a", "b", "c"] {
            log.log_event(event).unwrap();
        }

        assert_eq!(log.delete_before(0).unwrap(), 0);
        let tomorrow = Utc::now().timestamp_millis() + 86_400_000;
        assert_eq!(log.delete_before(tomorrow).unwrap(), 3);
        assert_eq!(log.count().unwrap(), 0);
    }
}
