use std::sync::Arc;

use futures_util::future::try_join_all;
use reader_core::{Feed, FeedError, Settings};
use reader_logging::{reader_info, reader_warn};

use crate::{FeedLoader, FeedStorage};

/// Refresh orchestration over the cache and the loader.
pub struct RssReader {
    loader: Arc<FeedLoader>,
    storage: Arc<FeedStorage>,
    settings: Settings,
}

impl RssReader {
    pub fn new(loader: FeedLoader, storage: Arc<FeedStorage>, settings: Settings) -> Self {
        Self {
            loader: Arc::new(loader),
            storage,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the cached feeds, refetching them first when the cache is
    /// empty or `force_update` is set.
    ///
    /// Sources are fetched concurrently, each in its own task, and every
    /// fetched feed is saved as soon as it arrives. The first failure fails
    /// the call; fetches still in flight are left to finish and save.
    pub async fn get_all_feeds(&self, force_update: bool) -> Result<Vec<Feed>, FeedError> {
        let cached = self.storage.get_all_feeds()?;
        if !force_update && !cached.is_empty() {
            return Ok(cached);
        }

        let urls: Vec<String> = if cached.is_empty() {
            self.settings.default_feed_urls().iter().cloned().collect()
        } else {
            cached.into_iter().map(|feed| feed.source_url).collect()
        };
        reader_info!("Refreshing {} feeds (force={})", urls.len(), force_update);

        let tasks = urls.into_iter().map(|url| {
            let loader = Arc::clone(&self.loader);
            let storage = Arc::clone(&self.storage);
            let is_default = self.settings.is_default(&url);
            // Dropping a JoinHandle detaches the task, so a short-circuit below
            // does not cancel sibling fetches.
            let handle = tokio::spawn(async move {
                let feed = loader.get_feed(&url, is_default).await?;
                save_blocking(storage, feed.clone()).await?;
                Ok::<Feed, FeedError>(feed)
            });
            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(join_err) => Err(FeedError::Task(join_err.to_string())),
                }
            }
        });

        let feeds = try_join_all(tasks).await.inspect_err(|err| {
            reader_warn!("Refresh failed: {}", err);
        })?;
        Ok(feeds)
    }

    pub async fn add_feed(&self, url: &str) -> Result<(), FeedError> {
        let feed = self.loader.get_feed(url, self.settings.is_default(url)).await?;
        save_blocking(Arc::clone(&self.storage), feed).await?;
        reader_info!("Added feed {}", url);
        Ok(())
    }

    pub async fn delete_feed(&self, url: &str) -> Result<(), FeedError> {
        let storage = Arc::clone(&self.storage);
        let key = url.to_string();
        run_blocking(move || storage.delete_feed(&key)).await?;
        reader_info!("Deleted feed {}", url);
        Ok(())
    }
}

async fn save_blocking(storage: Arc<FeedStorage>, feed: Feed) -> Result<(), FeedError> {
    run_blocking(move || storage.save_feed(feed)).await
}

/// Cache writes sync to disk under the storage lock, so they run on the
/// blocking pool instead of an async worker.
async fn run_blocking<F>(write: F) -> Result<(), FeedError>
where
    F: FnOnce() -> Result<(), FeedError> + Send + 'static,
{
    tokio::task::spawn_blocking(write)
        .await
        .map_err(|join_err| FeedError::Task(join_err.to_string()))?
}
