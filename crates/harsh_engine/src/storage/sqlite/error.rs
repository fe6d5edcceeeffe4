//! Translation of SQLite failures into store outcomes.
//!
//! Constraint violations keep their meaning (a taken username is
//! `AlreadyExists`); anything unrecognised is reported as `QueryFailed`.

use harsh_core::mapper::RepositoryError;
use rusqlite::ffi;

fn constraint_detail(err: &ffi::Error, message: &Option<String>) -> String {
    message.clone().unwrap_or_else(|| err.to_string())
}

/// Classifies a statement failure for `entity_type`.
pub fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str) -> RepositoryError {
    if let rusqlite::Error::SqliteFailure(sqlite_err, message) = err {
        match sqlite_err.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return RepositoryError::AlreadyExists {
                    entity_type,
                    detail: constraint_detail(sqlite_err, message),
                };
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return RepositoryError::InvalidData(format!(
                    "{entity_type} references a missing row: {}",
                    constraint_detail(sqlite_err, message)
                ));
            }
            _ if sqlite_err.code == rusqlite::ErrorCode::CannotOpen => {
                return RepositoryError::ConnectionFailed(err.to_string());
            }
            _ => {}
        }
    }

    match err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: "unknown".to_string(),
        },
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::InvalidColumnType(..) => RepositoryError::Serialization(err.to_string()),
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Classifies a failure coming back from the connection thread.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> RepositoryError {
    match err {
        tokio_rusqlite::Error::Rusqlite(inner) => map_rusqlite_error(&inner, entity_type),
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed(format!("{entity_type} store connection closed"))
        }
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}
