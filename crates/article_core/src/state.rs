use thiserror::Error;
use url::Url;

use crate::view_model::AppViewModel;
use crate::{labels, Language};

pub type RunId = u64;

pub const MIN_ARTICLES: u32 = 1;
pub const MAX_ARTICLES: u32 = 100;
pub const DEFAULT_ARTICLES: u32 = 5;
pub const MIN_DELAY_SECS: u32 = 1;
pub const MAX_DELAY_SECS: u32 = 60;
pub const DEFAULT_DELAY_SECS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Stopping,
    Finished,
    Cancelled,
    Failed,
}

impl SessionState {
    /// A run is in flight and a new one may not start.
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Running | SessionState::Stopping)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDescriptor {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("wiki URL is not a valid http(s) address: {0}")]
    InvalidWikiUrl(String),
    #[error("username and password must be given together")]
    IncompleteCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Created,
    Failed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LogKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub wiki_url: String,
    pub username: String,
    pub password: String,
    pub article_count: u32,
    pub title_prefix: String,
    pub content_template: String,
    pub delay_secs: u32,
    pub language: Language,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            wiki_url: String::new(),
            username: String::new(),
            password: String::new(),
            article_count: DEFAULT_ARTICLES,
            title_prefix: String::new(),
            content_template: String::new(),
            delay_secs: DEFAULT_DELAY_SECS,
            language: Language::default(),
        }
    }
}

impl FormState {
    pub(crate) fn validated_wiki_url(&self) -> Result<String, FormError> {
        let raw = self.wiki_url.trim();
        let url = Url::parse(raw).map_err(|_| FormError::InvalidWikiUrl(raw.to_string()))?;
        let web = matches!(url.scheme(), "http" | "https");
        if !web || url.host_str().is_none() {
            return Err(FormError::InvalidWikiUrl(raw.to_string()));
        }
        Ok(raw.to_string())
    }

    pub(crate) fn validated_credentials(&self) -> Result<Option<Credentials>, FormError> {
        let username = self.username.trim();
        match (username.is_empty(), self.password.is_empty()) {
            (true, true) => Ok(None),
            (false, false) => Ok(Some(Credentials {
                username: username.to_string(),
                password: self.password.clone(),
            })),
            _ => Err(FormError::IncompleteCredentials),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormState,
    session: SessionState,
    active_run: Option<RunId>,
    last_run_id: RunId,
    seed: u64,
    total: usize,
    created: usize,
    failed: usize,
    log: Vec<LogLine>,
    validation_error: Option<FormError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the generator used for articles without a content template.
    /// The same seed and form always produce the same job list.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            language: self.form.language,
            labels: labels(self.form.language),
            form: self.form.clone(),
            log: self.log.clone(),
            total: self.total,
            created: self.created,
            failed: self.failed,
            can_start: !self.session.is_active(),
            can_stop: self.session == SessionState::Running,
            validation_error: self.validation_error.as_ref().map(ToString::to_string),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active_run
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        self.dirty = true;
        self.validation_error = None;
        &mut self.form
    }

    pub(crate) fn set_validation_error(&mut self, error: FormError) {
        self.validation_error = Some(error);
        self.dirty = true;
    }

    /// Allocates the next run id and advances the content seed.
    pub(crate) fn begin_run(&mut self, total: usize) -> RunId {
        self.last_run_id += 1;
        self.seed = self.seed.wrapping_add(1);
        self.active_run = Some(self.last_run_id);
        self.session = SessionState::Running;
        self.total = total;
        self.created = 0;
        self.failed = 0;
        self.log.clear();
        self.validation_error = None;
        self.dirty = true;
        self.last_run_id
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn is_current_run(&self, run_id: RunId) -> bool {
        self.active_run == Some(run_id)
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        if !session.is_active() {
            self.active_run = None;
        }
        self.session = session;
        self.dirty = true;
    }

    pub(crate) fn record_created(&mut self) {
        self.created += 1;
    }

    pub(crate) fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub(crate) fn push_log(&mut self, kind: LogKind, text: String) {
        self.log.push(LogLine { kind, text });
        self.dirty = true;
    }
}
