use thiserror::Error;

/// Syntax errors raised while parsing raw query parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryArgsError {
    #[error("Missing sort operand in substring {substring} of string {sort_str}")]
    MissingSortOperand { substring: String, sort_str: String },

    #[error("Unable to interpret sort operand in substring {substring} of string {sort_str}")]
    AmbiguousSortOperandLocation { substring: String, sort_str: String },

    #[error("Missing filter operator in {param}={value}, expected <operator>:<value>")]
    MissingFilterOperator { param: String, value: String },

    #[error("Unknown filter operator {operator} for {param}")]
    UnknownFilterOperator { param: String, operator: String },
}
