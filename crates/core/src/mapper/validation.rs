//! Pure checks a mapper runs before building any statement.

use std::collections::BTreeSet;

use chrono::DateTime;

use crate::entity::{Entity, Property, PropertyKind, Value};
use crate::query::{Filter, FilterOp, QueryArgsBag};

use super::DataMapperError;

fn invalid_names<'a, E: Entity>(names: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    names
        .filter(|name| !E::has_property(name))
        .cloned()
        .collect()
}

/// Checks that every filter and sort key of `bag` is a declared property of `E`.
///
/// # Errors
///
/// Returns [`DataMapperError::BadQueryArgsBag`] naming every invalid key.
pub fn validate_query_args<E: Entity>(bag: &QueryArgsBag) -> Result<(), DataMapperError> {
    let invalid_query_by = invalid_names::<E>(bag.query_by().keys());
    let invalid_sort_by = invalid_names::<E>(bag.sort_by().keys());

    if invalid_query_by.is_empty() && invalid_sort_by.is_empty() {
        Ok(())
    } else {
        Err(DataMapperError::BadQueryArgsBag {
            invalid_query_by,
            invalid_sort_by,
        })
    }
}

/// Resolves the properties named in `return_cols`, keeping their order.
///
/// An empty list selects every declared property.
///
/// # Errors
///
/// Returns the names that are not declared properties of `E`.
pub fn resolve_columns<E: Entity>(
    return_cols: &[&str],
) -> Result<Vec<&'static Property>, BTreeSet<String>> {
    if return_cols.is_empty() {
        return Ok(E::PROPERTIES.iter().collect());
    }

    let known = E::has_properties(return_cols);
    let unknown: BTreeSet<String> = return_cols
        .iter()
        .filter(|name| !known.contains(**name))
        .map(|name| name.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(unknown);
    }

    Ok(return_cols.iter().filter_map(|name| E::property(name)).collect())
}

/// Checks the `property = value` pairs of an update.
///
/// # Errors
///
/// Unknown names yield [`DataMapperError::UnknownProperties`]; assigning the
/// primary key yields [`DataMapperError::ImmutableProperty`]. A value of the
/// wrong kind, or one breaking the entity's own rules (see
/// [`Entity::check_value`]), yields [`DataMapperError::InvalidAssignment`].
pub fn validate_assignments<E: Entity>(values: &[(&str, Value)]) -> Result<(), DataMapperError> {
    let unknown: BTreeSet<String> = values
        .iter()
        .filter(|(name, _)| !E::has_property(name))
        .map(|(name, _)| name.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(DataMapperError::UnknownProperties(unknown));
    }

    if let Some((name, _)) = values.iter().find(|(name, _)| *name == E::PRIMARY_KEY) {
        return Err(DataMapperError::ImmutableProperty(name.to_string()));
    }

    for (name, value) in values {
        let invalid = |reason: String| DataMapperError::InvalidAssignment {
            property: name.to_string(),
            reason,
        };
        let Some(property) = E::property(name) else {
            continue;
        };
        if !property.accepts(value) {
            return Err(invalid(format!("expected {}, got {value:?}", property.kind)));
        }
        E::check_value(name, value).map_err(|e| invalid(e.to_string()))?;
    }

    Ok(())
}

/// Converts the raw text of a filter into a value of the property's kind.
///
/// `like` patterns are always bound as text. Timestamps accept epoch seconds
/// or RFC 3339 and are bound as epoch seconds.
///
/// # Errors
///
/// Returns [`DataMapperError::InvalidFilterValue`] when the text does not
/// parse as the property's kind.
pub fn coerce_filter_value(property: &Property, filter: &Filter) -> Result<Value, DataMapperError> {
    let raw = filter.value.as_str();
    let invalid = || DataMapperError::InvalidFilterValue {
        property: property.name.to_string(),
        kind: property.kind.to_string(),
        value: raw.to_string(),
    };

    if filter.op == FilterOp::Like {
        return Ok(Value::Text(raw.to_string()));
    }

    match property.kind {
        PropertyKind::Text => Ok(Value::Text(raw.to_string())),
        PropertyKind::Integer => raw.parse().map(Value::Integer).map_err(|_| invalid()),
        PropertyKind::Timestamp => raw
            .parse::<i64>()
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.timestamp()))
            .map(Value::Integer)
            .map_err(|_| invalid()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entity::{hash_password, User};

    fn bag(raw: &[(&str, &str)]) -> QueryArgsBag {
        let mut bag = QueryArgsBag::default();
        bag.add(raw.iter().copied()).unwrap();
        bag
    }

    #[test]
    fn test_valid_bag_passes() {
        let bag = bag(&[("id", "gt:1"), ("sort_by", "+username,-join_time")]);

        assert_eq!(validate_query_args::<User>(&bag), Ok(()));
    }

    #[test]
    fn test_invalid_keys_are_reported_separately() {
        let bag = bag(&[("bogus", "eq:1"), ("sort_by", "+username,-joinTime")]);

        assert_eq!(
            validate_query_args::<User>(&bag),
            Err(DataMapperError::BadQueryArgsBag {
                invalid_query_by: BTreeSet::from(["bogus".to_string()]),
                invalid_sort_by: BTreeSet::from(["joinTime".to_string()]),
            })
        );
    }

    #[test]
    fn test_assignments_reject_unknown_names() {
        let values = [("username", Value::from("x")), ("nope", Value::Null)];

        assert_eq!(
            validate_assignments::<User>(&values),
            Err(DataMapperError::UnknownProperties(BTreeSet::from([
                "nope".to_string()
            ])))
        );
    }

    #[test]
    fn test_assignments_reject_primary_key() {
        let values = [("id", Value::Integer(9))];

        assert_eq!(
            validate_assignments::<User>(&values),
            Err(DataMapperError::ImmutableProperty("id".to_string()))
        );
    }

    #[test]
    fn test_assignments_accept_valid_values() {
        let values = [
            ("username", Value::from("renamed")),
            ("password", Value::from(hash_password("password1"))),
            ("join_time", Value::Integer(0)),
            ("last_seen_time", Value::Timestamp(Utc::now())),
        ];

        assert_eq!(validate_assignments::<User>(&values), Ok(()));
    }

    #[test]
    fn test_assignments_reject_plaintext_password() {
        let values = [("password", Value::from("hunter22"))];

        assert_eq!(
            validate_assignments::<User>(&values),
            Err(DataMapperError::InvalidAssignment {
                property: "password".to_string(),
                reason: "Password hash is not a hex encoded SHA-256 digest".to_string(),
            })
        );
    }

    #[test]
    fn test_assignments_reject_empty_username() {
        let values = [("username", Value::from(""))];

        assert_eq!(
            validate_assignments::<User>(&values),
            Err(DataMapperError::InvalidAssignment {
                property: "username".to_string(),
                reason: "Username must be at least 1 character long".to_string(),
            })
        );
    }

    #[test]
    fn test_assignments_reject_wrong_kind() {
        let text_time = [("join_time", Value::from("yesterday"))];
        let integer_name = [("username", Value::Integer(5))];

        assert!(matches!(
            validate_assignments::<User>(&text_time),
            Err(DataMapperError::InvalidAssignment { property, .. }) if property == "join_time"
        ));
        assert!(matches!(
            validate_assignments::<User>(&integer_name),
            Err(DataMapperError::InvalidAssignment { property, .. }) if property == "username"
        ));
    }

    #[test]
    fn test_assignments_reject_null_for_required_property() {
        let values = [("last_seen_time", Value::Null)];

        assert!(matches!(
            validate_assignments::<User>(&values),
            Err(DataMapperError::InvalidAssignment { .. })
        ));
    }

    #[test]
    fn test_resolve_columns_keeps_requested_order() {
        let columns = resolve_columns::<User>(&["username", "id"]).unwrap();

        assert_eq!(
            columns.iter().map(|p| p.name).collect::<Vec<_>>(),
            vec!["username", "id"]
        );
    }

    #[test]
    fn test_resolve_columns_defaults_to_every_property() {
        assert_eq!(
            resolve_columns::<User>(&[]).unwrap().len(),
            User::PROPERTIES.len()
        );
    }

    #[test]
    fn test_resolve_columns_reports_unknown_names() {
        assert_eq!(
            resolve_columns::<User>(&["username", "email", "age"]),
            Err(BTreeSet::from(["age".to_string(), "email".to_string()]))
        );
    }

    #[test]
    fn test_integer_filter_value_is_parsed() {
        let id = User::property("id").unwrap();

        assert_eq!(
            coerce_filter_value(id, &Filter::new(FilterOp::Gt, "10")),
            Ok(Value::Integer(10))
        );
        assert!(matches!(
            coerce_filter_value(id, &Filter::new(FilterOp::Gt, "ten")),
            Err(DataMapperError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn test_timestamp_filter_accepts_epoch_and_rfc3339() {
        let join = User::property("join_time").unwrap();

        assert_eq!(
            coerce_filter_value(join, &Filter::new(FilterOp::Ge, "1704067200")),
            Ok(Value::Integer(1_704_067_200))
        );
        assert_eq!(
            coerce_filter_value(join, &Filter::new(FilterOp::Ge, "2024-01-01T00:00:00Z")),
            Ok(Value::Integer(1_704_067_200))
        );
        assert!(coerce_filter_value(join, &Filter::new(FilterOp::Ge, "yesterday")).is_err());
    }

    #[test]
    fn test_like_is_always_text() {
        let id = User::property("id").unwrap();

        assert_eq!(
            coerce_filter_value(id, &Filter::new(FilterOp::Like, "1%")),
            Ok(Value::Text("1%".to_string()))
        );
    }
}
