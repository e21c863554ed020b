use thiserror::Error;

/// Every failure that can reach the store boundary.
///
/// Collaborator failures carry the underlying cause as text; the last three
/// variants are raised by the reducer itself and never mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("task failed: {0}")]
    Task(String),
    #[error("In progress")]
    InProgress,
    #[error("Unknown feed")]
    UnknownFeed,
    #[error("Unexpected action")]
    UnexpectedAction,
}
