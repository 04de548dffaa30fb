//! Query error types.

use thiserror::Error;

/// Errors a single query can produce. None of them affect catalog state.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No catalog row matched the lookup.
    #[error("not found: no {entity} matching {query:?}")]
    NotFound { entity: &'static str, query: String },

    /// The mood label is not one of the recognized moods.
    #[error("invalid mood {label:?}; expected one of: party, chill, sad, focus")]
    InvalidMood { label: String },

    /// A required name was blank.
    #[error("empty {field}")]
    EmptyQuery { field: &'static str },
}

impl QueryError {
    /// Returns `true` when the lookup simply had no match.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when the request itself was malformed.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidMood { .. } | Self::EmptyQuery { .. })
    }
}

/// Convenience alias for query results.
pub type QueryResult<T> = std::result::Result<T, QueryError>;
