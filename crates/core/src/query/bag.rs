//! The query arguments bag.
//!
//! Raw parameters come in as `name=value` pairs. The parameter named after the
//! configured sort parameter carries a sort string, every other parameter
//! carries a filter string:
//!
//! - sort string: comma separated `<operator><property>` terms, e.g. `+username,-join_time`
//! - filter string: `<operator>:<value>`, e.g. `id=gt:10`
//!
//! The bag is purely syntactic. Whether a name refers to a real property is
//! checked by the data mapper that consumes the bag.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::error::QueryArgsError;
use super::filter::{Filter, FilterOp, FILTER_SEPARATOR};
use super::sort::SortOperator;

/// Parameter name that carries sort directives unless configured otherwise.
pub const DEFAULT_SORT_PARAM: &str = "sort_by";

/// Structured filter and sort directives parsed from raw query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgsBag {
    query_by: IndexMap<String, Filter>,
    sort_by: IndexMap<String, SortOperator>,
    filters: BTreeSet<FilterOp>,
    sort_ops: Vec<SortOperator>,
    sort_by_param: String,
}

impl QueryArgsBag {
    /// Creates an empty bag.
    ///
    /// `sort_ops` are tried in the given order when parsing a sort term.
    /// Operators with an empty token are ignored.
    pub fn new(
        filters: impl IntoIterator<Item = FilterOp>,
        sort_ops: impl IntoIterator<Item = SortOperator>,
        sort_by_param: impl Into<String>,
    ) -> Self {
        Self {
            query_by: IndexMap::new(),
            sort_by: IndexMap::new(),
            filters: filters.into_iter().collect(),
            sort_ops: sort_ops
                .into_iter()
                .filter(|op| !op.token.is_empty())
                .collect(),
            sort_by_param: sort_by_param.into(),
        }
    }

    pub fn filters(&self) -> &BTreeSet<FilterOp> {
        &self.filters
    }

    pub fn sort_ops(&self) -> &[SortOperator] {
        &self.sort_ops
    }

    pub fn sort_by_param(&self) -> &str {
        &self.sort_by_param
    }

    /// Filters keyed by property name, in the order they were first added.
    pub fn query_by(&self) -> &IndexMap<String, Filter> {
        &self.query_by
    }

    /// Sort directives keyed by property name, in priority order.
    pub fn sort_by(&self) -> &IndexMap<String, SortOperator> {
        &self.sort_by
    }

    pub fn is_empty(&self) -> bool {
        self.query_by.is_empty() && self.sort_by.is_empty()
    }

    /// Parses `raw` and merges the result into the bag.
    ///
    /// Later values overwrite earlier ones with the same property name,
    /// independently for filters and sort directives. If any parameter fails
    /// to parse the bag is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use harsh_core::query::{FilterOp, QueryArgsBag};
    ///
    /// let mut bag = QueryArgsBag::default();
    /// bag.add([("id", "gt:10"), ("sort_by", "+username,-join_time")]).unwrap();
    ///
    /// assert_eq!(bag.query_by()["id"].op, FilterOp::Gt);
    /// assert_eq!(bag.query_by()["id"].value, "10");
    /// assert_eq!(bag.sort_by()["join_time"].token, "-");
    /// ```
    pub fn add<I, K, V>(&mut self, raw: I) -> Result<(), QueryArgsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query_by = IndexMap::new();
        let mut sort_by = IndexMap::new();

        for (param, value) in raw {
            let (param, value) = (param.as_ref(), value.as_ref());
            if param == self.sort_by_param {
                sort_by.extend(self.parse_sort_str(value)?);
            } else {
                query_by.insert(param.to_string(), self.parse_query_by_str(param, value)?);
            }
        }

        self.query_by.extend(query_by);
        self.sort_by.extend(sort_by);
        Ok(())
    }

    fn parse_sort_str(
        &self,
        sort_str: &str,
    ) -> Result<IndexMap<String, SortOperator>, QueryArgsError> {
        let mut parsed = IndexMap::new();

        for substring in sort_str.split(',') {
            let mut matched = None;

            for sort_op in &self.sort_ops {
                match substring.find(sort_op.token.as_str()) {
                    Some(0) => {
                        matched = Some(sort_op);
                        break;
                    }
                    // operator present but preceded by other text
                    Some(_) => {
                        return Err(QueryArgsError::AmbiguousSortOperandLocation {
                            substring: substring.to_string(),
                            sort_str: sort_str.to_string(),
                        });
                    }
                    None => {}
                }
            }

            let sort_op = matched.ok_or_else(|| QueryArgsError::MissingSortOperand {
                substring: substring.to_string(),
                sort_str: sort_str.to_string(),
            })?;

            parsed.insert(
                substring[sort_op.token.len()..].to_string(),
                sort_op.clone(),
            );
        }

        Ok(parsed)
    }

    fn parse_query_by_str(&self, param: &str, query_by_str: &str) -> Result<Filter, QueryArgsError> {
        let (token, value) = query_by_str
            .split_once(FILTER_SEPARATOR)
            .filter(|(token, _)| !token.is_empty())
            .ok_or_else(|| QueryArgsError::MissingFilterOperator {
                param: param.to_string(),
                value: query_by_str.to_string(),
            })?;

        let op = FilterOp::from_token(token)
            .filter(|op| self.filters.contains(op))
            .ok_or_else(|| QueryArgsError::UnknownFilterOperator {
                param: param.to_string(),
                operator: token.to_string(),
            })?;

        Ok(Filter::new(op, value))
    }
}

impl Default for QueryArgsBag {
    /// Every filter operator, `+`/`-` for ascending/descending, `sort_by` as sort parameter.
    fn default() -> Self {
        Self::new(
            FilterOp::ALL.iter().copied(),
            [SortOperator::asc(), SortOperator::desc()],
            DEFAULT_SORT_PARAM,
        )
    }
}
