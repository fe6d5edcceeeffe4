//! Storage backends implementing `harsh_core::mapper::DataMapper`.

pub mod sqlite;

pub use sqlite::{Database, SqliteDataMapper, UserMapper};
