use std::{env, path::PathBuf};

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the SQLite database file (default: "harsh_engine.db")
    pub database: PathBuf,
    /// Schema file applied by `init` instead of the built-in schema
    pub database_schema: Option<PathBuf>,
    /// Number of dummy users created by `init` (default: 10)
    pub n_dummy_users: usize,
    /// Seed for dummy user generation (default: 42)
    pub seed: u64,
    /// Run `PRAGMA foreign_keys = ON` on attach (default: false)
    pub enable_foreign_keys: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE` - SQLite database path (default: "harsh_engine.db")
    /// - `DATABASE_SCHEMA` - Schema file used by `init` (default: built-in schema)
    /// - `N_DUMMY_USERS` - Dummy users created by `init` (default: 10)
    /// - `SEED` - Dummy user seed (default: 42)
    /// - `ENABLE_FOREIGN_KEYS` - `true`/`1`/`yes`/`on` to enforce foreign keys (default: false)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database: var("DATABASE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("harsh_engine.db")),
            database_schema: var("DATABASE_SCHEMA")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            n_dummy_users: var("N_DUMMY_USERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            seed: var("SEED").and_then(|v| v.parse().ok()).unwrap_or(42),
            enable_foreign_keys: var("ENABLE_FOREIGN_KEYS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
