//! Reader core: feed data model, pure reducer and view-model helpers.
mod action;
mod effect;
mod error;
mod model;
mod settings;
mod state;
mod update;
mod view_model;

pub use action::{FeedAction, FeedSideEffect};
pub use effect::Effect;
pub use error::FeedError;
pub use model::{Feed, Post};
pub use settings::Settings;
pub use state::FeedState;
pub use update::update;
pub use view_model::{FeedBadge, TimelineView};
