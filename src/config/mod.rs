//! Persisted settings, backed by SQLite, and endpoint resolution.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::consts::{DEFAULT_ENDPOINT, ENDPOINT_KEY};

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database, creating
    /// parent directories as needed. Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Where the active endpoint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    /// `--endpoint` or `PETL_ENDPOINT`.
    Explicit,
    Saved,
    Default,
}

impl std::fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EndpointSource::Explicit => "flag/env",
            EndpointSource::Saved => "saved",
            EndpointSource::Default => "default",
        };
        f.write_str(label)
    }
}

/// Pick the endpoint: explicit value, then the saved one, then the default.
pub fn resolve_endpoint(explicit: Option<&str>, config: &Config) -> Result<(String, EndpointSource)> {
    if let Some(endpoint) = explicit.map(str::trim).filter(|e| !e.is_empty()) {
        return Ok((endpoint.to_string(), EndpointSource::Explicit));
    }
    if let Some(saved) = config.get(ENDPOINT_KEY)? {
        return Ok((saved, EndpointSource::Saved));
    }
    Ok((DEFAULT_ENDPOINT.to_string(), EndpointSource::Default))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(ENDPOINT_KEY, "http://old:8000").unwrap();
        config.set(ENDPOINT_KEY, "http://new:8000").unwrap();
        assert_eq!(config.get(ENDPOINT_KEY).unwrap().unwrap(), "http://new:8000");
    }

    #[test]
    fn removing_saved_endpoint_falls_back_to_default() {
        let config = mem_config();
        config.set(ENDPOINT_KEY, "http://host:1").unwrap();
        config.remove(ENDPOINT_KEY).unwrap();
        assert!(config.get(ENDPOINT_KEY).unwrap().is_none());
        let (endpoint, source) = resolve_endpoint(None, &config).unwrap();
        assert_eq!(endpoint, DEFAULT_ENDPOINT);
        assert_eq!(source, EndpointSource::Default);

        // Resetting twice is fine
        config.remove(ENDPOINT_KEY).unwrap();
    }

    #[test]
    fn persists_to_file_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("petl.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set(ENDPOINT_KEY, "http://persisted:80").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(
                config.get(ENDPOINT_KEY).unwrap().unwrap(),
                "http://persisted:80"
            );
        }
    }

    #[test]
    fn resolve_prefers_explicit() {
        let config = mem_config();
        config.set(ENDPOINT_KEY, "http://saved:1").unwrap();
        let (endpoint, source) = resolve_endpoint(Some("http://flag:2"), &config).unwrap();
        assert_eq!(endpoint, "http://flag:2");
        assert_eq!(source, EndpointSource::Explicit);
    }

    #[test]
    fn resolve_falls_back_to_saved_then_default() {
        let config = mem_config();
        let (endpoint, source) = resolve_endpoint(None, &config).unwrap();
        assert_eq!(endpoint, DEFAULT_ENDPOINT);
        assert_eq!(source, EndpointSource::Default);

        config.set(ENDPOINT_KEY, "http://saved:1").unwrap();
        let (endpoint, source) = resolve_endpoint(Some("  "), &config).unwrap();
        assert_eq!(endpoint, "http://saved:1");
        assert_eq!(source, EndpointSource::Saved);
    }
}
