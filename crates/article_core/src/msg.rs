use crate::{Language, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Form edits.
    WikiUrlChanged(String),
    UsernameChanged(String),
    PasswordChanged(String),
    ArticleCountChanged(u32),
    TitlePrefixChanged(String),
    TemplateChanged(String),
    DelayChanged(u32),
    LanguageSelected(Language),
    /// User clicked Create Articles.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// Engine reports for the run identified by `run_id`.
    ItemCreated { run_id: RunId, title: String },
    ItemFailed { run_id: RunId, title: String },
    FatalError { run_id: RunId, message: String },
    RunFinished { run_id: RunId },
    RunCancelled { run_id: RunId },
}
