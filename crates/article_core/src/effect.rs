use crate::{ArticleDescriptor, Credentials, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun(RunRequest),
    CancelRun { run_id: RunId },
}

/// Everything the engine needs to execute one run. Built from a validated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub run_id: RunId,
    pub wiki_url: String,
    pub credentials: Option<Credentials>,
    pub articles: Vec<ArticleDescriptor>,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
}
