use std::collections::BTreeSet;

/// Immutable reader configuration: the feeds fetched into an empty cache.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    default_feed_urls: BTreeSet<String>,
}

impl Settings {
    pub fn new<I, S>(default_feed_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_feed_urls: default_feed_urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn default_feed_urls(&self) -> &BTreeSet<String> {
        &self.default_feed_urls
    }

    pub fn is_default(&self, url: &str) -> bool {
        self.default_feed_urls.contains(url)
    }
}
