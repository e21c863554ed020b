use std::future::Future;
use std::sync::Arc;

use reader_core::{update, Effect, Feed, FeedAction, FeedError, FeedSideEffect, FeedState};
use reader_logging::{reader_debug, reader_info, reader_warn};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};

use crate::RssReader;

/// Side effects buffered per subscriber before the slowest one starts lagging.
pub const SIDE_EFFECT_CAPACITY: usize = 64;

/// Action-driven feed store.
///
/// `dispatch` reduces and commits under the state channel's write lock, so
/// concurrent dispatches are serialized. State observers are woken only when
/// the committed state differs by value. Background work runs on `runtime`
/// and reports back through `dispatch` with exactly one `Data` or `Error`.
#[derive(Clone)]
pub struct FeedStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    reader: Arc<RssReader>,
    runtime: Handle,
    state_tx: watch::Sender<FeedState>,
    effect_tx: broadcast::Sender<FeedSideEffect>,
}

impl FeedStore {
    pub fn new(reader: Arc<RssReader>, runtime: Handle) -> Self {
        let (state_tx, _) = watch::channel(FeedState::new());
        let (effect_tx, _) = broadcast::channel(SIDE_EFFECT_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                reader,
                runtime,
                state_tx,
                effect_tx,
            }),
        }
    }

    pub fn observe_state(&self) -> watch::Receiver<FeedState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> FeedState {
        self.inner.state_tx.borrow().clone()
    }

    /// Effects are published in commit order and are not replayed; subscribe
    /// before dispatching.
    pub fn observe_side_effects(&self) -> broadcast::Receiver<FeedSideEffect> {
        self.inner.effect_tx.subscribe()
    }

    pub fn dispatch(&self, action: FeedAction) {
        reader_debug!("Dispatch {}", action_name(&action));
        let mut tasks = Vec::new();
        self.inner.state_tx.send_if_modified(|state| {
            let (next, effects) = update(state.clone(), action);
            // Notifications are sent while commits are still serialized.
            for effect in effects {
                match effect {
                    Effect::Notify(side_effect) => self.notify(side_effect),
                    task => tasks.push(task),
                }
            }
            if next == *state {
                return false;
            }
            reader_debug!(
                "NewState: progress={} feeds={} selected={:?}",
                next.progress,
                next.feeds.len(),
                next.selected_feed.as_ref().map(|feed| feed.source_url.as_str())
            );
            *state = next;
            true
        });
        self.run_tasks(tasks);
    }

    fn notify(&self, side_effect: FeedSideEffect) {
        let FeedSideEffect::Error(error) = &side_effect;
        reader_warn!("Side effect: {}", error);
        // No subscribers is fine; effects are fire-and-forget.
        let _ = self.inner.effect_tx.send(side_effect);
    }

    fn run_tasks(&self, tasks: Vec<Effect>) {
        for task in tasks {
            match task {
                Effect::Notify(side_effect) => self.notify(side_effect),
                Effect::LoadAll { force_load } => {
                    reader_info!("LoadAll force_load={}", force_load);
                    let reader = Arc::clone(&self.inner.reader);
                    self.spawn_task(async move { reader.get_all_feeds(force_load).await });
                }
                Effect::AddFeed { url } => {
                    reader_info!("AddFeed url={}", url);
                    let reader = Arc::clone(&self.inner.reader);
                    self.spawn_task(async move {
                        reader.add_feed(&url).await?;
                        reader.get_all_feeds(false).await
                    });
                }
                Effect::DeleteFeed { url } => {
                    reader_info!("DeleteFeed url={}", url);
                    let reader = Arc::clone(&self.inner.reader);
                    self.spawn_task(async move {
                        reader.delete_feed(&url).await?;
                        reader.get_all_feeds(false).await
                    });
                }
            }
        }
    }

    /// Runs `task` and feeds its outcome back as `Data` or `Error`, also when
    /// the task panics.
    fn spawn_task<F>(&self, task: F)
    where
        F: Future<Output = Result<Vec<Feed>, FeedError>> + Send + 'static,
    {
        let store = self.clone();
        let runtime = self.inner.runtime.clone();
        self.inner.runtime.spawn(async move {
            let action = match runtime.spawn(task).await {
                Ok(Ok(feeds)) => FeedAction::Data(feeds),
                Ok(Err(error)) => FeedAction::Error(error),
                Err(join_err) => FeedAction::Error(FeedError::Task(join_err.to_string())),
            };
            store.dispatch(action);
        });
    }
}

fn action_name(action: &FeedAction) -> &'static str {
    match action {
        FeedAction::Refresh { .. } => "Refresh",
        FeedAction::Add { .. } => "Add",
        FeedAction::Delete { .. } => "Delete",
        FeedAction::SelectedFeed(_) => "SelectedFeed",
        FeedAction::Data(_) => "Data",
        FeedAction::Error(_) => "Error",
    }
}
