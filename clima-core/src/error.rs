use std::fmt;

/// Errors that can occur when parsing observation or index files.
#[derive(Debug)]
pub enum ParseError {
    Csv(csv::Error),
    Json(serde_json::Error),
    /// A year key that is not an integer.
    InvalidYear(String),
    /// The same year appeared twice in an annual index file.
    DuplicateYear(i32),
    /// A required column is absent from the header row.
    MissingColumn(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Csv(e) => write!(f, "CSV error: {e}"),
            ParseError::Json(e) => write!(f, "JSON error: {e}"),
            ParseError::InvalidYear(s) => write!(f, "Invalid year key: {s:?}"),
            ParseError::DuplicateYear(y) => write!(f, "Duplicate year: {y}"),
            ParseError::MissingColumn(c) => write!(f, "Missing column: {c}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Csv(e) => Some(e),
            ParseError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for ParseError {
    fn from(e: csv::Error) -> Self {
        ParseError::Csv(e)
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e)
    }
}
