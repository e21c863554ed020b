mod common;

use std::time::Duration;

use common::{harness, init_logging, ScriptedFetcher};
use pretty_assertions::assert_eq;
use reader_core::FeedError;
use reader_engine::FailureKind;

const A: &str = "https://a.example.com/feed";
const B: &str = "https://b.example.com/feed";
const C: &str = "https://c.example.com/feed";

#[tokio::test]
async fn empty_cache_fetches_defaults_then_serves_from_cache() {
    init_logging();
    let h = harness(ScriptedFetcher::new().respond(A, "Alpha"), &[A]);

    let feeds = h.reader.get_all_feeds(false).await.unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].source_url, A);
    assert_eq!(feeds[0].title, "Alpha");
    assert!(feeds[0].is_default);
    assert_eq!(h.storage.get_all_feeds().unwrap(), feeds);
    assert_eq!(h.fetcher.call_count(), 1);

    let again = h.reader.get_all_feeds(false).await.unwrap();
    assert_eq!(again, feeds);
    assert_eq!(h.fetcher.call_count(), 1);
}

#[tokio::test]
async fn force_refetches_cached_sources() {
    init_logging();
    let h = harness(
        ScriptedFetcher::new().respond(A, "Alpha").respond(B, "Beta"),
        &[A],
    );
    h.reader.get_all_feeds(false).await.unwrap();
    h.reader.add_feed(B).await.unwrap();
    h.fetcher.set_document(A, "Alpha v2");

    let feeds = h.reader.get_all_feeds(true).await.unwrap();
    let titles: Vec<_> = feeds.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha v2", "Beta"]);
    assert_eq!(h.fetcher.call_count(), 4);
    assert_eq!(h.storage.get_all_feeds().unwrap(), feeds);
}

#[tokio::test]
async fn one_failed_source_fails_refresh_but_keeps_committed_feeds() {
    init_logging();
    let h = harness(
        ScriptedFetcher::new()
            .respond(A, "Alpha")
            .respond(B, "Beta")
            .delay(B, Duration::from_millis(100)),
        &[],
    );
    h.reader.add_feed(A).await.unwrap();
    h.reader.add_feed(B).await.unwrap();

    h.fetcher.set_document(A, "Alpha v2");
    // B now answers late with an undecodable document.
    h.fetcher.set_document(B, "!");

    let err = h.reader.get_all_feeds(true).await.unwrap_err();
    match err {
        FeedError::Parse(message) => assert!(message.contains(B)),
        other => panic!("unexpected error {other:?}"),
    }

    let cached = h.storage.get_feed(A).unwrap().unwrap();
    assert_eq!(cached.title, "Alpha v2");
    assert_eq!(h.storage.get_feed(B).unwrap().unwrap().title, "Beta");
}

#[tokio::test]
async fn network_failure_carries_cause() {
    init_logging();
    let h = harness(
        ScriptedFetcher::new()
            .respond(A, "Alpha")
            .fail(B, FailureKind::Timeout),
        &[A, B],
    );

    let err = h.reader.get_all_feeds(false).await.unwrap_err();
    match err {
        FeedError::Network(message) => {
            assert!(message.contains(B));
            assert!(message.contains("timeout"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn sources_are_fetched_concurrently() {
    init_logging();
    let delay = Duration::from_millis(200);
    let h = harness(
        ScriptedFetcher::new()
            .respond(A, "Alpha")
            .respond(B, "Beta")
            .respond(C, "Gamma")
            .delay(A, delay)
            .delay(B, delay)
            .delay(C, delay),
        &[A, B, C],
    );

    let started = tokio::time::Instant::now();
    let feeds = h.reader.get_all_feeds(false).await.unwrap();
    assert_eq!(feeds.len(), 3);
    assert!(started.elapsed() < delay * 3);
}

#[tokio::test]
async fn results_follow_identifier_order() {
    init_logging();
    let h = harness(
        ScriptedFetcher::new()
            .respond(A, "Alpha")
            .respond(B, "Beta")
            .delay(A, Duration::from_millis(50)),
        &[B, A],
    );

    let feeds = h.reader.get_all_feeds(false).await.unwrap();
    let urls: Vec<_> = feeds.iter().map(|f| f.source_url.as_str()).collect();
    assert_eq!(urls, vec![A, B]);
}

#[tokio::test]
async fn add_marks_default_membership() {
    init_logging();
    let h = harness(
        ScriptedFetcher::new().respond(A, "Alpha").respond(B, "Beta"),
        &[A],
    );

    h.reader.add_feed(A).await.unwrap();
    h.reader.add_feed(B).await.unwrap();

    assert!(h.storage.get_feed(A).unwrap().unwrap().is_default);
    assert!(!h.storage.get_feed(B).unwrap().unwrap().is_default);
}

#[tokio::test]
async fn failed_add_leaves_cache_untouched() {
    init_logging();
    let h = harness(
        ScriptedFetcher::new()
            .respond(A, "Alpha")
            .fail(B, FailureKind::HttpStatus(500)),
        &[],
    );
    h.reader.add_feed(A).await.unwrap();

    assert!(h.reader.add_feed(B).await.is_err());
    let urls: Vec<_> = h
        .storage
        .get_all_feeds()
        .unwrap()
        .into_iter()
        .map(|f| f.source_url)
        .collect();
    assert_eq!(urls, vec![A.to_string()]);
}

#[tokio::test]
async fn delete_is_idempotent() {
    init_logging();
    let h = harness(ScriptedFetcher::new().respond(A, "Alpha"), &[]);
    h.reader.add_feed(A).await.unwrap();

    h.reader.delete_feed(A).await.unwrap();
    h.reader.delete_feed(A).await.unwrap();
    assert!(h.storage.get_all_feeds().unwrap().is_empty());
}

#[tokio::test]
async fn no_defaults_and_empty_cache_yields_nothing() {
    init_logging();
    let h = harness(ScriptedFetcher::new(), &[]);

    assert!(h.reader.get_all_feeds(false).await.unwrap().is_empty());
    assert_eq!(h.fetcher.call_count(), 0);
}

#[tokio::test]
async fn failed_cache_write_fails_refresh_and_delete() {
    init_logging();
    let h = harness(ScriptedFetcher::new().respond(A, "Alpha"), &[A]);

    h.persistence.fail_writes(true);
    let err = h.reader.get_all_feeds(false).await.unwrap_err();
    assert!(matches!(err, FeedError::Cache(_)));
    assert!(h.storage.get_all_feeds().unwrap().is_empty());

    h.persistence.fail_writes(false);
    h.reader.add_feed(A).await.unwrap();
    h.persistence.fail_writes(true);
    let err = h.reader.delete_feed(A).await.unwrap_err();
    assert!(matches!(err, FeedError::Cache(_)));
    assert!(h.storage.get_feed(A).unwrap().is_some());
}
