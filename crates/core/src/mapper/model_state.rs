use serde::Serialize;

use super::error::RepositoryError;

/// Outcome of a mapper operation.
///
/// Every mapper operation returns exactly one `ModelState`. Expected runtime
/// failures (a taken username, a missing row, a broken connection) are
/// reported with `valid == false` and a populated `errors` list rather than
/// as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelState<T> {
    valid: bool,
    message: String,
    data: Vec<T>,
    errors: Vec<RepositoryError>,
}

impl<T> ModelState<T> {
    pub fn success(message: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            valid: true,
            message: message.into(),
            data,
            errors: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<RepositoryError>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            data: Vec::new(),
            errors,
        }
    }

    /// Failure whose message is the error's own text.
    pub fn from_error(error: RepositoryError) -> Self {
        Self::failure(error.to_string(), vec![error])
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn errors(&self) -> &[RepositoryError] {
        &self.errors
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Consumes the state, returning the first payload item if any.
    pub fn into_first(self) -> Option<T> {
        self.data.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_errors() {
        let state = ModelState::success("ok", vec![1, 2]);

        assert!(state.valid());
        assert_eq!(state.message(), "ok");
        assert_eq!(state.data(), &[1, 2]);
        assert!(state.errors().is_empty());
    }

    #[test]
    fn test_from_error_uses_error_text() {
        let state: ModelState<()> =
            ModelState::from_error(RepositoryError::QueryFailed("disk I/O error".into()));

        assert!(!state.valid());
        assert_eq!(state.message(), "Query failed: disk I/O error");
        assert_eq!(state.errors().len(), 1);
        assert!(state.data().is_empty());
    }

    #[test]
    fn test_into_first() {
        assert_eq!(ModelState::success("", vec!["a", "b"]).into_first(), Some("a"));
        assert_eq!(ModelState::<u8>::success("", vec![]).into_first(), None);
    }
}
