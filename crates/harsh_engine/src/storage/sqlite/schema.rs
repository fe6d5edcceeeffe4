//! SQLite schema definitions and fixed SQL query constants.
//!
//! Statements that depend on caller supplied query arguments are built in
//! `statements`; the lookups here never change shape.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    join_time INTEGER NOT NULL,
    last_seen_time INTEGER NOT NULL
);
"#;

pub const ENABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON";

pub const SELECT_FOREIGN_KEYS: &str = "PRAGMA foreign_keys";

// User queries
pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, password, join_time, last_seen_time
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_CREDENTIALS: &str = r#"
SELECT id, username, password, join_time, last_seen_time
FROM users
WHERE username = ?1 AND password = ?2
LIMIT 1
"#;
