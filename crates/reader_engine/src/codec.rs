//! On-disk form of the feed cache: a JSON array of feed records.
use reader_core::Feed;

pub fn encode_feeds(feeds: &[Feed]) -> Result<String, serde_json::Error> {
    serde_json::to_string(feeds)
}

/// Unknown keys are ignored and absent optionals default, so older and
/// newer cache files both load.
pub fn decode_feeds(raw: &str) -> Result<Vec<Feed>, serde_json::Error> {
    serde_json::from_str(raw)
}
