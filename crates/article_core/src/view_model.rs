use crate::{FormState, Labels, Language, LogLine, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub session: SessionState,
    pub language: Language,
    pub labels: &'static Labels,
    pub form: FormState,
    pub log: Vec<LogLine>,
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub can_start: bool,
    pub can_stop: bool,
    pub validation_error: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    /// One-line summary such as `Running | 3/5 (created 2, failed 1)`.
    pub fn status_line(&self) -> String {
        format!(
            "{} | {}/{} ({} {}, {} {})",
            self.labels.session(self.session),
            self.created + self.failed,
            self.total,
            self.labels.created,
            self.created,
            self.labels.failed,
            self.failed
        )
    }
}
