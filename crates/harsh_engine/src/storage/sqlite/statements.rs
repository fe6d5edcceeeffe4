//! SQL statement builders.
//!
//! Pure functions that turn an entity schema plus validated query arguments
//! into SQL text and the values to bind. Identifiers only ever come from the
//! entity's static schema; every caller supplied value is a `?` placeholder.

use std::collections::BTreeSet;

use harsh_core::entity::{Entity, Property, Value};
use harsh_core::mapper::{coerce_filter_value, validate_query_args, DataMapperError};
use harsh_core::query::QueryArgsBag;

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

fn property<E: Entity>(name: &str) -> Result<&'static Property, DataMapperError> {
    E::property(name).ok_or_else(|| DataMapperError::UnknownProperties(BTreeSet::from([name.to_string()])))
}

fn column_list(columns: &[&Property]) -> String {
    columns
        .iter()
        .map(|p| p.column)
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// ` WHERE a > ? AND b = ?`, or nothing when the bag has no filters.
fn where_clause<E: Entity>(query: &QueryArgsBag) -> Result<(String, Vec<Value>), DataMapperError> {
    if query.query_by().is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut terms = Vec::with_capacity(query.query_by().len());
    let mut args = Vec::with_capacity(query.query_by().len());
    for (name, filter) in query.query_by() {
        let property = property::<E>(name)?;
        terms.push(format!("{} {} ?", property.column, filter.op.sql()));
        args.push(coerce_filter_value(property, filter)?);
    }

    Ok((format!(" WHERE {}", terms.join(" AND ")), args))
}

/// ` ORDER BY a ASC, b DESC`, or nothing when the bag has no sort directives.
fn order_by_clause<E: Entity>(query: &QueryArgsBag) -> Result<String, DataMapperError> {
    if query.sort_by().is_empty() {
        return Ok(String::new());
    }

    let terms = query
        .sort_by()
        .iter()
        .map(|(name, sort_op)| {
            property::<E>(name).map(|p| format!("{} {}", p.column, sort_op.direction.sql()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!(" ORDER BY {}", terms.join(", ")))
}

/// INSERT covering every declared property except `excluded`.
pub fn build_insert<E: Entity>(excluded: &[&str]) -> String {
    let columns: Vec<&str> = E::PROPERTIES
        .iter()
        .filter(|p| !excluded.contains(&p.name))
        .map(|p| p.column)
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::TABLE,
        columns.join(", "),
        placeholders(columns.len())
    )
}

/// SELECT of every column, filtered and ordered by `query`.
pub fn build_select<E: Entity>(query: &QueryArgsBag) -> Result<Statement, DataMapperError> {
    let columns: Vec<&Property> = E::PROPERTIES.iter().collect();
    build_select_columns::<E>(query, &columns)
}

/// SELECT of `columns` only, filtered and ordered by `query`.
pub fn build_select_columns<E: Entity>(
    query: &QueryArgsBag,
    columns: &[&Property],
) -> Result<Statement, DataMapperError> {
    validate_query_args::<E>(query)?;

    let (where_sql, args) = where_clause::<E>(query)?;
    let sql = format!(
        "SELECT {} FROM {}{}{}",
        column_list(columns),
        E::TABLE,
        where_sql,
        order_by_clause::<E>(query)?
    );

    Ok(Statement { sql, args })
}

/// UPDATE assigning `values` to the rows matching `query`.
///
/// Sort directives are validated but do not affect the statement.
pub fn build_update<E: Entity>(
    query: &QueryArgsBag,
    values: &[(&str, Value)],
) -> Result<Statement, DataMapperError> {
    validate_query_args::<E>(query)?;

    let mut assignments = Vec::with_capacity(values.len());
    let mut args = Vec::with_capacity(values.len() + query.query_by().len());
    for (name, value) in values {
        assignments.push(format!("{} = ?", property::<E>(name)?.column));
        args.push(value.clone().into_unix());
    }

    let (where_sql, where_args) = where_clause::<E>(query)?;
    args.extend(where_args);

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {}{}",
            E::TABLE,
            assignments.join(", "),
            where_sql
        ),
        args,
    })
}

/// DELETE of the rows matching `query`.
///
/// Sort directives are validated but do not affect the statement.
pub fn build_delete<E: Entity>(query: &QueryArgsBag) -> Result<Statement, DataMapperError> {
    validate_query_args::<E>(query)?;

    let (where_sql, args) = where_clause::<E>(query)?;

    Ok(Statement {
        sql: format!("DELETE FROM {}{}", E::TABLE, where_sql),
        args,
    })
}
