use std::process::ExitCode;
use std::sync::Arc;

use reader_core::{Feed, FeedAction, FeedSideEffect, FeedState, Settings};
use reader_engine::{
    FeedLoader, FeedRsDecoder, FeedStorage, FeedStore, FilePersistence, ReqwestFetcher, RssReader,
};
use reader_logging::{reader_info, reader_warn};
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::render;

/// Wires the production collaborators behind a store.
pub fn build_store(config: &AppConfig, runtime: Handle) -> FeedStore {
    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch_settings()));
    let loader = FeedLoader::new(fetcher, Arc::new(FeedRsDecoder));
    let persistence = Arc::new(FilePersistence::new(
        config.cache_dir.clone(),
        config.cache_file.clone(),
    ));
    let storage = Arc::new(FeedStorage::new(persistence));
    let settings = Settings::new(config.default_feeds.iter().cloned());
    FeedStore::new(Arc::new(RssReader::new(loader, storage, settings)), runtime)
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);

    reader_info!("Running {:?}", cli.command);
    let outcome = execute(&config, cli.command).await?;
    print!("{}", outcome.output);

    Ok(if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Rendered output of one command; `failed` is set when the store reported an error.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub failed: bool,
}

pub async fn execute(config: &AppConfig, command: Command) -> anyhow::Result<Outcome> {
    let store = build_store(config, Handle::current());
    let mut session = Session::new(store);

    let output = match command {
        Command::Config => config.to_ron()?,
        Command::Refresh { force } => {
            let state = session.apply(FeedAction::Refresh { force_load: force }).await?;
            render::render_feeds(&state.view())
        }
        Command::Add { url } => {
            let state = session.apply(FeedAction::Add { url }).await?;
            render::render_feeds(&state.view())
        }
        Command::Delete { url } => {
            let state = session.apply(FeedAction::Delete { url }).await?;
            render::render_feeds(&state.view())
        }
        Command::Feeds => {
            let state = session.apply(FeedAction::Refresh { force_load: false }).await?;
            render::render_feeds(&state.view())
        }
        Command::Timeline { feed, limit } => {
            let mut state = session.apply(FeedAction::Refresh { force_load: false }).await?;
            match feed {
                Some(url) => {
                    // An unknown URL is offered as a bare feed so the store rejects it.
                    let selection = state
                        .feeds
                        .iter()
                        .find(|f| f.source_url == url)
                        .cloned()
                        .unwrap_or_else(|| bare_feed(url));
                    state = session.apply(FeedAction::SelectedFeed(Some(selection))).await?;
                    if state.selected_feed.is_some() {
                        render::render_timeline(&state.view(), limit)
                    } else {
                        String::new()
                    }
                }
                None => render::render_timeline(&state.view(), limit),
            }
        }
    };

    Ok(Outcome {
        output,
        failed: session.failed,
    })
}

fn bare_feed(source_url: String) -> Feed {
    Feed {
        source_url,
        title: String::new(),
        image_url: None,
        posts: Vec::new(),
        is_default: false,
    }
}

/// One CLI invocation's view of the store: dispatch, wait to settle, report effects.
struct Session {
    store: FeedStore,
    effects: broadcast::Receiver<FeedSideEffect>,
    failed: bool,
}

impl Session {
    fn new(store: FeedStore) -> Self {
        let effects = store.observe_side_effects();
        Self {
            store,
            effects,
            failed: false,
        }
    }

    async fn apply(&mut self, action: FeedAction) -> anyhow::Result<FeedState> {
        let mut state_rx = self.store.observe_state();
        self.store.dispatch(action);
        let state = FeedState::clone(&*state_rx.wait_for(|state| !state.progress).await?);
        self.report_effects();
        Ok(state)
    }

    fn report_effects(&mut self) {
        loop {
            match self.effects.try_recv() {
                Ok(FeedSideEffect::Error(error)) => {
                    eprintln!("error: {error}");
                    self.failed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    reader_warn!("Missed {} side effects", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}
