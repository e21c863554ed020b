use crate::Post;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimelineView {
    pub progress: bool,
    pub posts: Vec<Post>,
    pub feeds: Vec<FeedBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedBadge {
    pub source_url: String,
    pub short_name: String,
    pub title: String,
    pub image_url: Option<String>,
    pub post_count: usize,
    pub is_default: bool,
    pub is_selected: bool,
}
