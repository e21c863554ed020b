use crate::{Effect, FeedAction, FeedError, FeedState};

/// Pure update function: applies an action to state and returns any effects.
///
/// At most one background task (`LoadAll`, `AddFeed`, `DeleteFeed`) and at
/// most one `Notify` are produced per action. Rejected actions leave the
/// state untouched. Only `Refresh` carries the selection into the busy
/// state; `Add`, `Delete` and a failed task clear it.
pub fn update(mut state: FeedState, action: FeedAction) -> (FeedState, Vec<Effect>) {
    let effects = match action {
        FeedAction::Refresh { force_load } => {
            if state.progress {
                vec![Effect::error(FeedError::InProgress)]
            } else {
                state.progress = true;
                vec![Effect::LoadAll { force_load }]
            }
        }
        FeedAction::Add { url } => {
            if state.progress {
                vec![Effect::error(FeedError::InProgress)]
            } else {
                state.progress = true;
                state.selected_feed = None;
                vec![Effect::AddFeed { url }]
            }
        }
        FeedAction::Delete { url } => {
            if state.progress {
                vec![Effect::error(FeedError::InProgress)]
            } else {
                state.progress = true;
                state.selected_feed = None;
                vec![Effect::DeleteFeed { url }]
            }
        }
        FeedAction::SelectedFeed(feed) => match feed {
            Some(feed) if !state.contains(&feed) => vec![Effect::error(FeedError::UnknownFeed)],
            selection => {
                state.selected_feed = selection;
                Vec::new()
            }
        },
        FeedAction::Data(feeds) => {
            if state.progress {
                state.progress = false;
                state.feeds = feeds;
                // Drop a selection that no longer matches any incoming feed by value.
                if let Some(selected) = state.selected_feed.take() {
                    if state.contains(&selected) {
                        state.selected_feed = Some(selected);
                    }
                }
                Vec::new()
            } else {
                vec![Effect::error(FeedError::UnexpectedAction)]
            }
        }
        FeedAction::Error(error) => {
            if state.progress {
                state.progress = false;
                state.selected_feed = None;
                vec![Effect::error(error)]
            } else {
                vec![Effect::error(FeedError::UnexpectedAction)]
            }
        }
    };

    (state, effects)
}
