//! Error types for query evaluation.

use snomed_query_ecl::{EclError, Feature, SctId};
use thiserror::Error;

/// Errors that can occur while evaluating a query.
///
/// Every error is terminal for the query: no partial result is ever
/// returned alongside one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query string is malformed.
    #[error("ECL syntax error: {0}")]
    Syntax(EclError),

    /// The query is well-formed ECL but uses a construct the engine does
    /// not evaluate.
    #[error("{}", .0.message())]
    UnsupportedFeature(Feature),

    /// The focus concept, or one of its ancestors, is not in the index.
    #[error("Concept with id {0} could not be found.")]
    NotFound(SctId),

    /// Result set exceeds configured limit.
    #[error("Result set too large: {count} exceeds limit {limit}")]
    ResultTooLarge {
        /// Number of results found.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl QueryError {
    /// The rejected feature, if this is an unsupported-feature error.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            QueryError::UnsupportedFeature(feature) => Some(*feature),
            _ => None,
        }
    }
}

impl From<EclError> for QueryError {
    fn from(err: EclError) -> Self {
        match err {
            EclError::UnsupportedFeature { feature } => QueryError::UnsupportedFeature(feature),
            other => QueryError::Syntax(other),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, QueryError>;
