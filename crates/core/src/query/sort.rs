use serde::Serialize;

/// Direction of an ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sort operator token (e.g. `+`) and the direction it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOperator {
    pub token: String,
    pub direction: SortDirection,
}

impl SortOperator {
    pub fn new(token: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            token: token.into(),
            direction,
        }
    }

    pub fn asc() -> Self {
        Self::new("+", SortDirection::Asc)
    }

    pub fn desc() -> Self {
        Self::new("-", SortDirection::Desc)
    }
}
