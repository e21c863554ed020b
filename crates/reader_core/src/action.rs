use crate::{Feed, FeedError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    /// Reload feeds; `force_load` refetches even when the cache is populated.
    Refresh { force_load: bool },
    /// Subscribe to a feed by URL.
    Add { url: String },
    /// Unsubscribe from a feed by URL.
    Delete { url: String },
    /// Restrict the timeline to one feed, or clear the selection with `None`.
    SelectedFeed(Option<Feed>),
    /// Completed background work: the full feed list.
    Data(Vec<Feed>),
    /// Failed background work.
    Error(FeedError),
}

/// One-shot notification for transient UI feedback. Not part of state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSideEffect {
    Error(FeedError),
}
