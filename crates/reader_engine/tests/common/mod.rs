#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use reader_core::{Feed, Post, Settings};
use reader_engine::{
    DocumentFetcher, FailureKind, FeedDecoder, FeedLoader, FeedStorage, FetchError,
    MemoryPersistence, ParseError, PersistError, Persistence, RssReader,
};
use tokio::sync::Notify;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reader_logging::initialize_for_tests);
}

pub fn feed(url: &str, title: &str) -> Feed {
    Feed {
        source_url: url.to_string(),
        title: title.to_string(),
        image_url: None,
        posts: vec![Post {
            title: format!("{title} post"),
            link: Some(format!("{url}/post")),
            image_url: None,
            desc: None,
            date: 1_700_000_000_000,
        }],
        is_default: false,
    }
}

/// Fetcher returning canned documents per URL and recording every call.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Result<String, FetchError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits for one `notify_one` on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(self, url: &str, document: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(document.to_string()));
        self
    }

    pub fn fail(self, url: &str, kind: FailureKind) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(FetchError::new(url, kind, "scripted failure")));
        self
    }

    pub fn delay(self, url: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    pub fn set_document(&self, url: &str, document: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(document.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for ScriptedFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::new(url, FailureKind::HttpStatus(404), "not scripted")))
    }
}

/// Fetcher that delegates to a [`ScriptedFetcher`] until armed, then panics.
pub struct PanickingFetcher {
    inner: ScriptedFetcher,
    armed: AtomicBool,
}

impl PanickingFetcher {
    pub fn new(inner: ScriptedFetcher) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for PanickingFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        if self.armed.load(Ordering::SeqCst) {
            panic!("fetcher blew up on {url}");
        }
        self.inner.fetch_document(url).await
    }
}

/// Decoder that uses the raw document as the feed title; `"!"` fails.
pub struct TitleDecoder;

impl FeedDecoder for TitleDecoder {
    fn decode(&self, source_url: &str, raw: &str, is_default: bool) -> Result<Feed, ParseError> {
        if raw == "!" {
            return Err(ParseError {
                source_url: source_url.to_string(),
                message: "not a feed".to_string(),
            });
        }
        let mut decoded = feed(source_url, raw);
        decoded.is_default = is_default;
        Ok(decoded)
    }
}

/// Persistence wrapper counting reads and optionally failing writes.
#[derive(Default)]
pub struct CountingPersistence {
    inner: MemoryPersistence,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            inner: MemoryPersistence::with_raw(raw),
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Option<String> {
        self.inner.snapshot()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Persistence for CountingPersistence {
    fn read_raw(&self) -> Result<Option<String>, PersistError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_raw()
    }

    fn write_raw(&self, raw: &str) -> Result<(), PersistError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write_raw(raw)
    }
}

pub struct Harness {
    pub fetcher: Arc<ScriptedFetcher>,
    pub persistence: Arc<CountingPersistence>,
    pub storage: Arc<FeedStorage>,
    pub reader: Arc<RssReader>,
}

pub fn harness(fetcher: ScriptedFetcher, defaults: &[&str]) -> Harness {
    harness_with(fetcher, CountingPersistence::new(), defaults)
}

pub fn harness_with(
    fetcher: ScriptedFetcher,
    persistence: CountingPersistence,
    defaults: &[&str],
) -> Harness {
    let fetcher = Arc::new(fetcher);
    let persistence = Arc::new(persistence);
    let storage = Arc::new(FeedStorage::new(persistence.clone()));
    let loader = FeedLoader::new(fetcher.clone(), Arc::new(TitleDecoder));
    let reader = Arc::new(RssReader::new(
        loader,
        storage.clone(),
        Settings::new(defaults.iter().copied()),
    ));
    Harness {
        fetcher,
        persistence,
        storage,
        reader,
    }
}
