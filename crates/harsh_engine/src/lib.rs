//! harsh_engine - SQLite persistence and command line for user accounts.
//!
//! The pure model (entities, query arguments, the `DataMapper` contract) lives
//! in `harsh_core`; this crate executes it against SQLite.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod storage;

pub use config::Config;
pub use storage::{Database, SqliteDataMapper, UserMapper};
