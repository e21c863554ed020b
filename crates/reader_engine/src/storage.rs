use std::sync::{Arc, Mutex, PoisonError};

use reader_core::{Feed, FeedError};
use reader_logging::{reader_debug, reader_info, reader_warn};

use crate::codec::{decode_feeds, encode_feeds};
use crate::Persistence;

/// Two-tier feed cache: an insertion-ordered memory tier mirrored to a
/// [`Persistence`] blob.
///
/// The memory tier is loaded from persistence once, on first access, and
/// answers every read afterwards. `save_feed` and `delete_feed` write the
/// whole memory tier through to persistence before returning; if that write
/// fails, the memory mutation is rolled back and the call fails with
/// [`FeedError::Cache`]. One lock covers load, mutation and write-through.
pub struct FeedStorage {
    persistence: Arc<dyn Persistence>,
    memory: Mutex<Option<Vec<Feed>>>,
}

impl FeedStorage {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            memory: Mutex::new(None),
        }
    }

    pub fn get_feed(&self, url: &str) -> Result<Option<Feed>, FeedError> {
        self.with_memory(|memory| {
            Ok(memory.iter().find(|feed| feed.source_url == url).cloned())
        })
    }

    pub fn get_all_feeds(&self) -> Result<Vec<Feed>, FeedError> {
        self.with_memory(|memory| Ok(memory.clone()))
    }

    pub fn save_feed(&self, feed: Feed) -> Result<(), FeedError> {
        self.with_memory(|memory| {
            let url = feed.source_url.clone();
            let position = memory.iter().position(|f| f.source_url == url);
            let previous = match position {
                Some(index) => Some(std::mem::replace(&mut memory[index], feed)),
                None => {
                    memory.push(feed);
                    None
                }
            };

            if let Err(err) = self.write_through(memory) {
                match (position, previous) {
                    (Some(index), Some(old)) => memory[index] = old,
                    _ => {
                        memory.pop();
                    }
                }
                return Err(err);
            }
            reader_debug!("Cache saved {} (total {})", url, memory.len());
            Ok(())
        })
    }

    /// Removing an unknown key is a no-op and does not touch persistence.
    pub fn delete_feed(&self, url: &str) -> Result<(), FeedError> {
        self.with_memory(|memory| {
            let Some(index) = memory.iter().position(|f| f.source_url == url) else {
                return Ok(());
            };
            let removed = memory.remove(index);

            if let Err(err) = self.write_through(memory) {
                memory.insert(index, removed);
                return Err(err);
            }
            reader_debug!("Cache deleted {} (total {})", url, memory.len());
            Ok(())
        })
    }

    fn with_memory<R>(
        &self,
        f: impl FnOnce(&mut Vec<Feed>) -> Result<R, FeedError>,
    ) -> Result<R, FeedError> {
        let mut guard = self.memory.lock().unwrap_or_else(PoisonError::into_inner);
        let memory = match guard.take() {
            Some(memory) => memory,
            None => self.load()?,
        };
        f(guard.insert(memory))
    }

    fn load(&self) -> Result<Vec<Feed>, FeedError> {
        let Some(raw) = self.persistence.read_raw()? else {
            reader_info!("Feed cache empty; nothing persisted yet");
            return Ok(Vec::new());
        };

        match decode_feeds(&raw) {
            Ok(feeds) => {
                reader_info!("Loaded {} feeds from cache", feeds.len());
                Ok(dedupe_by_source(feeds))
            }
            Err(err) => {
                reader_warn!("Discarding unreadable feed cache: {}", err);
                Ok(Vec::new())
            }
        }
    }

    fn write_through(&self, memory: &[Feed]) -> Result<(), FeedError> {
        let raw = encode_feeds(memory).map_err(|err| FeedError::Cache(err.to_string()))?;
        self.persistence.write_raw(&raw)?;
        Ok(())
    }
}

/// Later records win, keeping the first record's position.
fn dedupe_by_source(feeds: Vec<Feed>) -> Vec<Feed> {
    let mut unique: Vec<Feed> = Vec::with_capacity(feeds.len());
    for feed in feeds {
        match unique.iter_mut().find(|f| f.source_url == feed.source_url) {
            Some(existing) => *existing = feed,
            None => unique.push(feed),
        }
    }
    unique
}
