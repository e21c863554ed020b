use std::sync::Arc;

use reader_core::{Feed, FeedError};
use reader_logging::reader_debug;

use crate::{DocumentFetcher, FeedDecoder};

/// Fetch-then-decode for a single source.
pub struct FeedLoader {
    fetcher: Arc<dyn DocumentFetcher>,
    decoder: Arc<dyn FeedDecoder>,
}

impl FeedLoader {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, decoder: Arc<dyn FeedDecoder>) -> Self {
        Self { fetcher, decoder }
    }

    pub async fn get_feed(&self, url: &str, is_default: bool) -> Result<Feed, FeedError> {
        let raw = self.fetcher.fetch_document(url).await?;
        let feed = self.decoder.decode(url, &raw, is_default)?;
        reader_debug!("Decoded {} posts={} default={}", url, feed.posts.len(), is_default);
        Ok(feed)
    }
}
