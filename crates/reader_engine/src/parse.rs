use feed_rs::{model, parser};
use reader_core::{Feed, FeedError, Post};

use crate::text;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse feed {source_url}: {message}")]
pub struct ParseError {
    pub source_url: String,
    pub message: String,
}

impl From<ParseError> for FeedError {
    fn from(err: ParseError) -> Self {
        FeedError::Parse(err.to_string())
    }
}

/// Decoder seam: turns a raw feed document into a [`Feed`].
pub trait FeedDecoder: Send + Sync {
    fn decode(&self, source_url: &str, raw: &str, is_default: bool) -> Result<Feed, ParseError>;
}

/// RSS 0.9x/1.0/2.0, Atom and JSON Feed decoder backed by `feed-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedRsDecoder;

impl FeedDecoder for FeedRsDecoder {
    fn decode(&self, source_url: &str, raw: &str, is_default: bool) -> Result<Feed, ParseError> {
        let raw = text::declare_utf8(raw);
        let parsed = parser::parse(raw.as_bytes()).map_err(|err| ParseError {
            source_url: source_url.to_string(),
            message: err.to_string(),
        })?;

        let image_url = parsed
            .logo
            .as_ref()
            .or(parsed.icon.as_ref())
            .map(|image| image.uri.clone());

        Ok(Feed {
            source_url: source_url.to_string(),
            title: parsed.title.map(|t| t.content).unwrap_or_default(),
            image_url,
            posts: parsed.entries.into_iter().map(to_post).collect(),
            is_default,
        })
    }
}

fn to_post(entry: model::Entry) -> Post {
    let image_url = entry_image(&entry);
    let link = entry.links.into_iter().next().map(|l| l.href);
    let date = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0);
    let desc = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body));

    Post {
        title: entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Untitled".to_string()),
        link,
        image_url,
        desc,
        date,
    }
}

fn entry_image(entry: &model::Entry) -> Option<String> {
    let thumbnail = entry
        .media
        .iter()
        .flat_map(|media| media.thumbnails.iter())
        .map(|thumb| thumb.image.uri.clone())
        .next();

    thumbnail.or_else(|| {
        entry
            .media
            .iter()
            .flat_map(|media| media.content.iter())
            // Podcast enclosures are media content too; only images qualify.
            .filter(|content| {
                content
                    .content_type
                    .as_ref()
                    .map_or(true, |mime| mime.ty().as_str() == "image")
            })
            .filter_map(|content| content.url.as_ref().map(|url| url.to_string()))
            .next()
    })
}
