// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration and the SQLite database
//! without modifying either.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use lockbox_config::LockboxConfig;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `lockbox doctor` command and print a report.
///
/// Returns the number of failed checks. With `plain`, disables colored output.
pub async fn run_doctor(config: &LockboxConfig, config_path: Option<&Path>, plain: bool) -> usize {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = collect_checks(config, config_path).await;

    println!();
    println!("  lockbox doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        match result.status {
            CheckStatus::Fail => fail_count += 1,
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Pass => {}
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    fail_count
}

async fn collect_checks(config: &LockboxConfig, config_path: Option<&Path>) -> Vec<CheckResult> {
    let db_path = &config.storage.database_path;
    vec![
        check_config(config_path),
        check_token_secret(config),
        check_database(db_path).await,
        check_schema(db_path).await,
        check_db_integrity(db_path).await,
    ]
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red()),
        };
        format!("    {symbol} {:<16} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<16} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Check configuration loads without errors.
fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => lockbox_config::load_and_validate_path(path),
        None => lockbox_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check a token secret is configured; `serve` refuses to start without one.
fn check_token_secret(config: &LockboxConfig) -> CheckResult {
    let start = Instant::now();
    match &config.auth.jwt_secret {
        Some(_) => CheckResult::new(
            "Token secret",
            CheckStatus::Pass,
            format!("set ({})", config.auth.jwt_algorithm),
            start,
        ),
        None => CheckResult::new(
            "Token secret",
            CheckStatus::Fail,
            "auth.jwt_secret is not set",
            start,
        ),
    }
}

/// Check database file exists and can be opened.
async fn check_database(db_path: &str) -> CheckResult {
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new("Database", CheckStatus::Fail, format!("open failed: {e}"), start);
        }
    };

    let result = conn
        .call(|conn| -> Result<String, rusqlite::Error> {
            conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
        })
        .await;

    match result {
        Ok(mode) => CheckResult::new(
            "Database",
            CheckStatus::Pass,
            format!("connected (journal_mode={mode})"),
            start,
        ),
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, format!("query failed: {e}"), start),
    }
}

/// Check the `users` and `vaults` tables exist and report the vault count.
async fn check_schema(db_path: &str) -> CheckResult {
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new("Schema", CheckStatus::Warn, "database not found (skipped)", start);
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new("Schema", CheckStatus::Fail, format!("open failed: {e}"), start);
        }
    };

    let result = conn
        .call(|conn| -> Result<(i64, Option<i64>), rusqlite::Error> {
            let tables: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('users', 'vaults')",
                [],
                |row| row.get(0),
            )?;
            let vaults = if tables == 2 {
                Some(conn.query_row("SELECT COUNT(*) FROM vaults", [], |row| row.get(0))?)
            } else {
                None
            };
            Ok((tables, vaults))
        })
        .await;

    match result {
        Ok((_, Some(vaults))) => CheckResult::new(
            "Schema",
            CheckStatus::Pass,
            format!("ok ({vaults} vault(s))"),
            start,
        ),
        Ok((_, None)) => CheckResult::new(
            "Schema",
            CheckStatus::Fail,
            "missing tables (run `lockbox serve` once to migrate)",
            start,
        ),
        Err(e) => CheckResult::new("Schema", CheckStatus::Fail, format!("check failed: {e}"), start),
    }
}

/// Run `PRAGMA integrity_check`.
async fn check_db_integrity(db_path: &str) -> CheckResult {
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "DB integrity",
            CheckStatus::Warn,
            "database not found (skipped)",
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new(
                "DB integrity",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                start,
            );
        }
    };

    let result = conn
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare("PRAGMA integrity_check")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
        .await;

    match result {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new("DB integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("{} issue(s) found", rows.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("check failed: {e}"),
            start,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::StorageAdapter;

    fn config_with_db(path: &Path) -> LockboxConfig {
        let mut config = LockboxConfig::default();
        config.storage.database_path = path.to_string_lossy().to_string();
        config.auth.jwt_secret = Some("0123456789abcdef0123".to_string());
        config
    }

    #[tokio::test]
    async fn missing_database_is_a_warning_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        assert_eq!(check_database(path.to_str().unwrap()).await.status, CheckStatus::Warn);
        assert_eq!(check_schema(path.to_str().unwrap()).await.status, CheckStatus::Warn);
        assert!(!path.exists(), "doctor must not create the database");
    }

    #[tokio::test]
    async fn migrated_database_passes_all_storage_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctor.db");
        let config = config_with_db(&path);

        let storage = lockbox_storage::SqliteStorage::new(
            config.storage.clone(),
            lockbox_core::EtagPolicy::default(),
        );
        storage.initialize().await.unwrap();
        storage.close().await.unwrap();

        let db = path.to_str().unwrap();
        assert_eq!(check_database(db).await.status, CheckStatus::Pass);
        let schema = check_schema(db).await;
        assert_eq!(schema.status, CheckStatus::Pass);
        assert!(schema.message.contains("0 vault(s)"));
        assert_eq!(check_db_integrity(db).await.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn unmigrated_database_fails_schema_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (id INTEGER);")
            .unwrap();

        assert_eq!(check_schema(path.to_str().unwrap()).await.status, CheckStatus::Fail);
    }

    #[test]
    fn missing_secret_fails() {
        let mut config = LockboxConfig::default();
        config.auth.jwt_secret = None;
        assert_eq!(check_token_secret(&config).status, CheckStatus::Fail);
    }

    #[test]
    fn plain_lines_are_tagged() {
        let result = CheckResult {
            name: "Database".into(),
            status: CheckStatus::Warn,
            message: "not found".into(),
            duration: Duration::from_millis(3),
        };
        let line = format_line(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("not found"));
        assert!(line.contains("(3ms)"));
    }
}
