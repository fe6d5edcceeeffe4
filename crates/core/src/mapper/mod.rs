//! Data mapper contract shared by every store implementation.

mod error;
mod model_state;
mod traits;
mod validation;

pub use error::{DataMapperError, RepositoryError, Result};
pub use model_state::ModelState;
pub use traits::{DataMapper, Projection};
pub use validation::{
    coerce_filter_value, resolve_columns, validate_assignments, validate_query_args,
};
