//! Plain-text rendering of the timeline view.
use std::fmt::Write;

use chrono::DateTime;
use reader_core::TimelineView;

pub fn render_feeds(view: &TimelineView) -> String {
    if view.feeds.is_empty() {
        return "No feeds.\n".to_string();
    }
    let mut out = String::new();
    for badge in &view.feeds {
        let marker = if badge.is_selected { '*' } else { ' ' };
        let default = if badge.is_default { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "{marker} [{:<2}] {} - {} posts{default}\n      {}",
            badge.short_name, badge.title, badge.post_count, badge.source_url
        );
    }
    out
}

pub fn render_timeline(view: &TimelineView, limit: usize) -> String {
    if view.posts.is_empty() {
        return "No posts.\n".to_string();
    }
    let mut out = String::new();
    for post in view.posts.iter().take(limit) {
        let _ = writeln!(out, "{}  {}", format_date(post.date), post.title);
        if let Some(link) = &post.link {
            let _ = writeln!(out, "                  {link}");
        }
    }
    let hidden = view.posts.len().saturating_sub(limit);
    if hidden > 0 {
        let _ = writeln!(out, "... {hidden} more");
    }
    out
}

fn format_date(millis: i64) -> String {
    if millis == 0 {
        return format!("{:<16}", "-");
    }
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| format!("{:<16}", "?"))
}
