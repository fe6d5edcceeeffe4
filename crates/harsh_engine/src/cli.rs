//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// harsh-engine - Manage user accounts stored in SQLite
#[derive(Debug, Parser)]
#[command(name = "harsh-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file. Overrides `DATABASE`.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Enforce foreign keys on the connection. Overrides `ENABLE_FOREIGN_KEYS`.
    #[arg(long, global = true)]
    pub foreign_keys: bool,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the tables and seed dummy users.
    Init {
        /// Schema file to apply instead of the built-in schema. Overrides `DATABASE_SCHEMA`.
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Number of dummy users. Overrides `N_DUMMY_USERS`.
        #[arg(long)]
        users: Option<usize>,
        /// Dummy user seed. Overrides `SEED`.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Register a new user.
    Register {
        username: String,
        password: String,
    },
    /// Check a username and password.
    Login {
        username: String,
        password: String,
    },
    /// Show a user by ID.
    Show {
        id: i64,
    },
    /// List users.
    List {
        /// Filter as `property=op:value`, e.g. `id=gt:10` or `username=like:a%`.
        #[arg(long = "filter", short, value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
        /// Sort directives, e.g. `-join_time,+username`.
        #[arg(long, short)]
        sort: Option<String>,
        /// Only return these properties, e.g. `id,username`.
        #[arg(long = "column", short, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Update the users matching every filter.
    Update {
        /// Filter as `property=op:value`. At least one is required.
        #[arg(long = "filter", short, required = true, value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
        /// Assignment as `property=value`. Passwords are hashed before storing.
        #[arg(long = "set", required = true, value_parser = parse_key_value)]
        assignments: Vec<(String, String)>,
    },
    /// Delete the users matching every filter.
    Delete {
        /// Filter as `property=op:value`. At least one is required.
        #[arg(long = "filter", short, required = true, value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },
}

/// Parses `key=value`, splitting on the first `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}
