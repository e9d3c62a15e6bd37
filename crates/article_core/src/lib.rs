//! Article core: pure state machine, job-list expansion and view-model helpers.
mod effect;
mod i18n;
mod jobs;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, RunRequest};
pub use i18n::{labels, Labels, Language};
pub use jobs::{build_job_list, random_text};
pub use msg::Msg;
pub use state::{
    AppState, ArticleDescriptor, Credentials, FormError, FormState, LogKind, LogLine, RunId,
    SessionState, DEFAULT_ARTICLES, DEFAULT_DELAY_SECS, MAX_ARTICLES, MAX_DELAY_SECS,
    MIN_ARTICLES, MIN_DELAY_SECS,
};
pub use update::update;
pub use view_model::AppViewModel;
