pub type RunId = u64;

/// One page to create: the title and the wikitext body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Events sent from the worker to the owner of a [`crate::RunHandle`].
///
/// `index` is the position of the article in the job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    ItemCreated { index: usize, title: String },
    ItemFailed { index: usize, title: String },
    FatalError { message: String },
    Finished,
    Cancelled,
}

impl RunEvent {
    /// True for the event that ends a run. Exactly one is sent per run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunEvent::FatalError { .. } | RunEvent::Finished | RunEvent::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Finished,
    Cancelled,
    Fatal,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        self != RunStatus::Running
    }
}
