use thiserror::Error;

use crate::provider::ItemId;

/// Failure reported by a [`HierarchyProvider`](crate::HierarchyProvider) query.
///
/// "No more children" and "no more siblings" are not errors; providers report
/// them as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{query} failed for {node}: {message}")]
    Query {
        node: ItemId,
        query: &'static str,
        message: String,
    },
    #[error("hierarchy I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown hierarchy node {0}")]
    UnknownNode(ItemId),
}

impl ProviderError {
    /// Build a query failure for `node`
    pub fn query(node: ItemId, query: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Query {
            node,
            query,
            message: message.into(),
        }
    }
}

/// Errors that abort a single search call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("hierarchy provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("search was cancelled")]
    Cancelled,
}

impl SearchError {
    /// Returns true if the search stopped because cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}
