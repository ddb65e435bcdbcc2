use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::db::migrations::MigrationManager;

/// Storage key the task list snapshot lives under
pub const DEFAULT_STORAGE_KEY: &str = "kanbanTasks";

/// Settings read from the rc file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcConfig {
    pub data_location: Option<PathBuf>,
    pub storage_key: Option<String>,
}

impl RcConfig {
    /// Parse `key=value` lines. Blank lines and `#` comments are skipped,
    /// unknown keys are ignored. Relative paths resolve against `base_dir`.
    pub fn parse(content: &str, base_dir: &Path) -> Self {
        let mut config = RcConfig::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed rc line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" if !value.is_empty() => {
                    let path = PathBuf::from(value);
                    config.data_location = Some(if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    });
                }
                "storage.key" if !value.is_empty() => {
                    config.storage_key = Some(value.to_string());
                }
                other => log::debug!("Ignoring rc key '{}'", other),
            }
        }
        config
    }

    /// Load the rc file if it exists; a missing or unreadable file yields defaults
    pub fn load() -> Self {
        let config_path = DbConnection::config_path();
        if !config_path.exists() {
            return RcConfig::default();
        }
        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
                Self::parse(&content, base_dir)
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", config_path.display(), e);
                RcConfig::default()
            }
        }
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }
}

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the default database path
    pub fn default_path() -> PathBuf {
        Self::home_dir().join(".taskboard").join("board.db")
    }

    /// Database path from the rc settings, or the default
    pub fn resolve_path(config: &RcConfig) -> PathBuf {
        config.data_location.clone().unwrap_or_else(Self::default_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::home_dir().join(".taskboard").join("rc")
    }

    /// Connect to a database, creating it and parent directories if needed
    pub fn connect_at(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        log::debug!("Opened board database at {}", db_path.display());
        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }
}
