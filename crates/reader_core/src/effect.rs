use crate::FeedSideEffect;

/// Work requested by [`crate::update`]; executed by the store runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadAll { force_load: bool },
    AddFeed { url: String },
    DeleteFeed { url: String },
    Notify(FeedSideEffect),
}

impl Effect {
    pub(crate) fn error(error: crate::FeedError) -> Self {
        Effect::Notify(FeedSideEffect::Error(error))
    }
}
