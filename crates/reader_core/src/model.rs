use serde::{Deserialize, Serialize};

/// A decoded feed, keyed by its source URL.
///
/// The serialized form is the cache's on-disk record: camelCase keys,
/// absent optionals omitted, unknown keys ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub source_url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Publication time in epoch milliseconds.
    pub date: i64,
}

impl Feed {
    /// Two-letter badge label: title without spaces, first two chars, upper-cased.
    pub fn short_name(&self) -> String {
        self.title
            .chars()
            .filter(|c| *c != ' ')
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(title: &str) -> Feed {
        Feed {
            source_url: "https://example.com/feed".to_string(),
            title: title.to_string(),
            image_url: None,
            posts: Vec::new(),
            is_default: false,
        }
    }

    #[test]
    fn short_name_skips_spaces_and_uppercases() {
        assert_eq!(feed("a blog").short_name(), "AB");
        assert_eq!(feed("Kotlin Blog").short_name(), "KO");
    }

    #[test]
    fn short_name_handles_short_titles() {
        assert_eq!(feed("x").short_name(), "X");
        assert_eq!(feed("").short_name(), "");
    }
}
