//! SQLite storage backend.
//!
//! Uses `rusqlite` for the statements themselves and `tokio-rusqlite` to run
//! them on a dedicated thread without blocking the async runtime.

mod conversions;
mod database;
mod error;
mod mapper;
mod schema;
mod statements;
mod user_mapper;

pub use database::Database;
pub use mapper::{RowMapper, SqliteDataMapper};
pub use schema::CREATE_TABLES;
pub use statements::{build_delete, build_insert, build_select, build_update, Statement};
pub use user_mapper::UserMapper;
