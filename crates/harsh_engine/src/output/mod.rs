//! Output formatting functions.

pub mod json;
pub mod pretty;

use harsh_core::mapper::ModelState;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Format a model state for output, rendering each data item with `item`.
pub fn format_state<T: Serialize>(
    state: &ModelState<T>,
    format: OutputFormat,
    item: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Json => json::format_json(state),
        OutputFormat::Pretty => pretty::format_state(state, item),
    }
}
