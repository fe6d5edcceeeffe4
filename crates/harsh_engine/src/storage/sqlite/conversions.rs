//! SQLite row and value conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use harsh_core::entity::{Property, PropertyKind, User, Value};
use harsh_core::mapper::Projection;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::Row;

// ============================================================================
// Value conversions
// ============================================================================

/// Convert a domain value into a bindable SQLite value.
///
/// Timestamps are bound as Unix epoch seconds, the storage format of every
/// timestamp column.
pub fn value_to_sql(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(i),
        Value::Text(s) => SqlValue::Text(s),
        Value::Timestamp(ts) => SqlValue::Integer(ts.timestamp()),
    }
}

/// Parse an epoch seconds column into a UTC timestamp.
pub fn parse_epoch(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

/// Convert a stored SQLite value into a domain value.
///
/// Only NULL, INTEGER and TEXT are ever stored by this crate.
pub fn value_from_sql(idx: usize, value: SqlValue) -> rusqlite::Result<Value> {
    match value {
        SqlValue::Null => Ok(Value::Null),
        SqlValue::Integer(i) => Ok(Value::Integer(i)),
        SqlValue::Text(s) => Ok(Value::Text(s)),
        SqlValue::Real(_) => Err(rusqlite::Error::InvalidColumnType(idx, String::new(), Type::Real)),
        SqlValue::Blob(_) => Err(rusqlite::Error::InvalidColumnType(idx, String::new(), Type::Blob)),
    }
}

/// Convert every column of a row, in select order.
pub fn row_to_values(row: &Row) -> rusqlite::Result<Vec<Value>> {
    (0..row.as_ref().column_count())
        .map(|idx| value_from_sql(idx, row.get(idx)?))
        .collect()
}

/// Pair selected values with their properties, restoring timestamps.
pub fn project_row(columns: &[&'static Property], values: Vec<Value>) -> Projection {
    columns
        .iter()
        .zip(values)
        .map(|(property, value)| {
            let value = match (property.kind, value) {
                (PropertyKind::Timestamp, Value::Integer(secs)) => DateTime::from_timestamp(secs, 0)
                    .map_or(Value::Integer(secs), Value::Timestamp),
                (_, value) => value,
            };
            (property.name, value)
        })
        .collect()
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, password, join_time, last_seen_time
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let password: String = row.get(2)?;
    let join_time: i64 = row.get(3)?;
    let last_seen_time: i64 = row.get(4)?;

    let user = User::from_hashed(username, password)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(user
        .with_id(id)
        .with_join_time(parse_epoch(3, join_time)?)
        .with_last_seen_time(parse_epoch(4, last_seen_time)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use harsh_core::entity::{hash_password, Entity};
    use rusqlite::Connection;

    fn query_user(sql: &str) -> rusqlite::Result<User> {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row(sql, [], row_to_user)
    }

    #[test]
    fn test_value_to_sql() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(value_to_sql(Value::Null), SqlValue::Null);
        assert_eq!(value_to_sql(Value::Integer(5)), SqlValue::Integer(5));
        assert_eq!(
            value_to_sql(Value::Text("a".into())),
            SqlValue::Text("a".into())
        );
        assert_eq!(
            value_to_sql(Value::Timestamp(ts)),
            SqlValue::Integer(1_704_067_200)
        );
    }

    #[test]
    fn test_parse_epoch() {
        assert_eq!(
            parse_epoch(0, 1_704_067_200).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_epoch(0, i64::MAX).is_err());
    }

    #[test]
    fn test_row_to_user() {
        let hash = hash_password("password1");
        let user = query_user(&format!(
            "SELECT 3, 'noahg', '{hash}', 1704067200, 1704153600"
        ))
        .unwrap();

        assert_eq!(user.id(), Some(3));
        assert_eq!(user.username(), "noahg");
        assert_eq!(user.password(), hash);
        assert_eq!(
            user.join_time(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            user.last_seen_time(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_row_to_values_and_projection() {
        let conn = Connection::open_in_memory().unwrap();
        let values = conn
            .query_row("SELECT 'noahg', 1704067200, NULL", [], row_to_values)
            .unwrap();
        let columns: Vec<&'static Property> = ["username", "join_time", "id"]
            .into_iter()
            .map(|name| User::property(name).unwrap())
            .collect();

        assert_eq!(
            project_row(&columns, values),
            vec![
                ("username", Value::Text("noahg".to_string())),
                (
                    "join_time",
                    Value::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
                ),
                ("id", Value::Null),
            ]
        );
    }

    #[test]
    fn test_real_columns_are_rejected() {
        assert!(value_from_sql(0, SqlValue::Real(1.5)).is_err());
    }

    #[test]
    fn test_row_with_plaintext_password_fails() {
        let result = query_user("SELECT 1, 'noahg', 'password1', 0, 0");

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(2, Type::Text, _))
        ));
    }
}
