//! Statement execution shared by every SQLite entity mapper.

use harsh_core::entity::Value;
use harsh_core::mapper::{RepositoryError, Result};
use rusqlite::{params_from_iter, Row};
use tokio_rusqlite::Connection;

use super::conversions::value_to_sql;
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
pub(crate) fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Maps one result row to `T`.
pub type RowMapper<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

/// Executes statements against an attached connection.
///
/// The mapper does not own the database lifetime: the handle is supplied by
/// whoever opened it and clones share the same underlying connection.
#[derive(Clone)]
pub struct SqliteDataMapper {
    conn: Connection,
}

impl SqliteDataMapper {
    /// Attaches to an open connection.
    ///
    /// With `enable_foreign_keys` the connection gets `PRAGMA foreign_keys = ON`
    /// before anything else runs on it.
    pub async fn attach(conn: Connection, enable_foreign_keys: bool) -> Result<Self> {
        if enable_foreign_keys {
            conn.call(|conn| {
                conn.execute_batch(schema::ENABLE_FOREIGN_KEYS)
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
            tracing::debug!("foreign key enforcement enabled");
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Reports whether SQLite is enforcing foreign keys on this connection.
    pub async fn foreign_keys_enabled(&self) -> Result<bool> {
        self.conn
            .call(|conn| {
                let enabled: i64 = conn
                    .query_row(schema::SELECT_FOREIGN_KEYS, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(enabled == 1)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Connection"))
    }

    /// Runs a read-only statement and maps each row with `map_row`.
    ///
    /// With `return_one` at most the first row is mapped.
    pub async fn exec_query<T>(
        &self,
        stmt: String,
        args: Vec<Value>,
        return_one: bool,
        map_row: RowMapper<T>,
        entity_type: &'static str,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
    {
        tracing::debug!(sql = %stmt, args = args.len(), "query");
        let params: Vec<_> = args.into_iter().map(value_to_sql).collect();

        self.conn
            .call(move |conn| {
                let mut prepared = conn.prepare(&stmt).map_err(wrap_err)?;
                let rows = prepared
                    .query_map(params_from_iter(params), map_row)
                    .map_err(wrap_err)?;

                let mut items = Vec::new();
                for row_result in rows {
                    items.push(row_result.map_err(wrap_err)?);
                    if return_one {
                        break;
                    }
                }
                Ok(items)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    /// Runs a data-modifying statement in autocommit mode.
    ///
    /// Returns the last inserted rowid when `is_insert`, otherwise the number
    /// of affected rows.
    pub async fn exec_mutation(
        &self,
        stmt: String,
        args: Vec<Value>,
        is_insert: bool,
        entity_type: &'static str,
    ) -> Result<i64> {
        tracing::debug!(sql = %stmt, args = args.len(), "mutation");
        let params: Vec<_> = args.into_iter().map(value_to_sql).collect();

        self.conn
            .call(move |conn| {
                let affected = conn
                    .execute(&stmt, params_from_iter(params))
                    .map_err(wrap_err)?;
                if is_insert {
                    Ok(conn.last_insert_rowid())
                } else {
                    Ok(affected as i64)
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }
}
