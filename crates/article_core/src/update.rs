use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    build_job_list, labels, AppState, Effect, LogKind, Msg, RunId, RunRequest, SessionState,
    MAX_ARTICLES, MAX_DELAY_SECS, MIN_ARTICLES, MIN_DELAY_SECS,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::WikiUrlChanged(text) => {
            state.form_mut().wiki_url = text;
            Vec::new()
        }
        Msg::UsernameChanged(text) => {
            state.form_mut().username = text;
            Vec::new()
        }
        Msg::PasswordChanged(text) => {
            state.form_mut().password = text;
            Vec::new()
        }
        Msg::ArticleCountChanged(count) => {
            state.form_mut().article_count = count.clamp(MIN_ARTICLES, MAX_ARTICLES);
            Vec::new()
        }
        Msg::TitlePrefixChanged(text) => {
            state.form_mut().title_prefix = text;
            Vec::new()
        }
        Msg::TemplateChanged(text) => {
            state.form_mut().content_template = text;
            Vec::new()
        }
        Msg::DelayChanged(secs) => {
            state.form_mut().delay_secs = secs.clamp(MIN_DELAY_SECS, MAX_DELAY_SECS);
            Vec::new()
        }
        Msg::LanguageSelected(language) => {
            state.form_mut().language = language;
            Vec::new()
        }
        Msg::StartClicked => start_run(&mut state),
        Msg::StopClicked => match state.active_run() {
            Some(run_id) if state.session() == SessionState::Running => {
                state.set_session(SessionState::Stopping);
                let text = labels(state.form().language).stopping.to_string();
                state.push_log(LogKind::Info, text);
                vec![Effect::CancelRun { run_id }]
            }
            _ => Vec::new(),
        },
        Msg::ItemCreated { run_id, title } => {
            if state.is_current_run(run_id) {
                state.record_created();
                let text = format!("{}: {}", labels(state.form().language).created, title);
                state.push_log(LogKind::Created, text);
            }
            Vec::new()
        }
        Msg::ItemFailed { run_id, title } => {
            if state.is_current_run(run_id) {
                state.record_failed();
                let text = format!("{}: {}", labels(state.form().language).failed, title);
                state.push_log(LogKind::Failed, text);
            }
            Vec::new()
        }
        Msg::FatalError { run_id, message } => {
            if state.is_current_run(run_id) {
                let text = format!("{}: {}", labels(state.form().language).error, message);
                state.push_log(LogKind::Error, text);
                state.set_session(SessionState::Failed);
            }
            Vec::new()
        }
        Msg::RunFinished { run_id } => {
            finish_run(&mut state, run_id, SessionState::Finished);
            Vec::new()
        }
        Msg::RunCancelled { run_id } => {
            finish_run(&mut state, run_id, SessionState::Cancelled);
            Vec::new()
        }
    };

    (state, effects)
}

fn start_run(state: &mut AppState) -> Vec<Effect> {
    if state.session().is_active() {
        return Vec::new();
    }

    let form = state.form();
    let checked = form
        .validated_wiki_url()
        .and_then(|url| form.validated_credentials().map(|creds| (url, creds)));
    let (wiki_url, credentials) = match checked {
        Ok(valid) => valid,
        Err(error) => {
            state.set_validation_error(error);
            return Vec::new();
        }
    };

    let mut rng = StdRng::seed_from_u64(state.seed());
    let articles = build_job_list(
        form.article_count,
        &form.title_prefix,
        &form.content_template,
        &mut rng,
    );
    let max_delay_secs = u64::from(form.delay_secs);
    let min_delay_secs = u64::from(MIN_DELAY_SECS).min(max_delay_secs);
    let language = form.language;

    let run_id = state.begin_run(articles.len());
    let text = format!("{} ({})", labels(language).starting, articles.len());
    state.push_log(LogKind::Info, text);

    vec![Effect::StartRun(RunRequest {
        run_id,
        wiki_url,
        credentials,
        articles,
        min_delay_secs,
        max_delay_secs,
    })]
}

fn finish_run(state: &mut AppState, run_id: RunId, session: SessionState) {
    if !state.is_current_run(run_id) {
        return;
    }
    let language = state.form().language;
    let text = labels(language).session(session).to_string();
    state.set_session(session);
    state.push_log(LogKind::Info, text);
}
