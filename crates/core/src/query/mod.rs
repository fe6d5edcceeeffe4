//! Parsing of raw query parameters into structured filter and sort directives.

mod bag;
mod error;
mod filter;
mod sort;

pub use bag::{QueryArgsBag, DEFAULT_SORT_PARAM};
pub use error::QueryArgsError;
pub use filter::{Filter, FilterOp, FILTER_SEPARATOR};
pub use sort::{SortDirection, SortOperator};
