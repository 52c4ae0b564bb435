//! Job finder core: pure search-view state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, FailureKind, Job, OverlapPolicy, RequestId, SearchFailure, DEFAULT_QUERY,
};
pub use update::update;
pub use view_model::{AppViewModel, JobCardView, LinkTarget, LinkView, LINK_REL};
