use crate::view_model::{FeedBadge, TimelineView};
use crate::{Feed, Post};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedState {
    pub progress: bool,
    pub feeds: Vec<Feed>,
    pub selected_feed: Option<Feed>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, feed: &Feed) -> bool {
        self.feeds.contains(feed)
    }

    /// Timeline posts: the selected feed's, or every feed's, newest first.
    pub fn main_feed_posts(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = match &self.selected_feed {
            Some(feed) => feed.posts.clone(),
            None => self
                .feeds
                .iter()
                .flat_map(|feed| feed.posts.iter().cloned())
                .collect(),
        };
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    pub fn view(&self) -> TimelineView {
        let feeds = self
            .feeds
            .iter()
            .map(|feed| FeedBadge {
                source_url: feed.source_url.clone(),
                short_name: feed.short_name(),
                title: feed.title.clone(),
                image_url: feed.image_url.clone(),
                post_count: feed.posts.len(),
                is_default: feed.is_default,
                is_selected: self.selected_feed.as_ref() == Some(feed),
            })
            .collect();

        TimelineView {
            progress: self.progress,
            posts: self.main_feed_posts(),
            feeds,
        }
    }
}
