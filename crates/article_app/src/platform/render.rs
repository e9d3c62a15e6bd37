use std::io::{self, Write};

use article_core::{AppViewModel, LogKind, LogLine, SessionState};
use chrono::Local;

/// Prints the view to the terminal incrementally: the form once, then only
/// log lines that were not printed before.
#[derive(Default)]
pub struct TerminalRenderer {
    header_printed: bool,
    printed_lines: usize,
    last_session: Option<SessionState>,
    last_error: Option<String>,
}

impl TerminalRenderer {
    pub fn render(&mut self, view: &AppViewModel) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // A closed stdout only loses the echo; the run itself continues.
        let _ = self.render_to(&mut out, view);
    }

    fn render_to(&mut self, out: &mut dyn Write, view: &AppViewModel) -> io::Result<()> {
        if !self.header_printed {
            for line in header_lines(view) {
                writeln!(out, "{line}")?;
            }
            self.header_printed = true;
        }

        if view.validation_error != self.last_error {
            if let Some(error) = &view.validation_error {
                writeln!(out, "! {error}")?;
            }
            self.last_error = view.validation_error.clone();
        }

        // A new run starts with a fresh log.
        if view.log.len() < self.printed_lines {
            self.printed_lines = 0;
        }
        let timestamp = Local::now().format("%H:%M:%S");
        for line in &view.log[self.printed_lines..] {
            writeln!(out, "[{timestamp}] {}", format_line(line))?;
        }
        self.printed_lines = view.log.len();

        if self.last_session != Some(view.session) {
            if view.session != SessionState::Idle {
                writeln!(out, "{}", view.status_line())?;
            }
            self.last_session = Some(view.session);
        }
        out.flush()
    }
}

fn header_lines(view: &AppViewModel) -> Vec<String> {
    let labels = view.labels;
    let form = &view.form;
    let template = if form.content_template.trim().is_empty() {
        "-"
    } else {
        form.content_template.as_str()
    };
    vec![
        format!("{} {}", labels.wiki_url, form.wiki_url),
        format!("{} {}", labels.username, form.username),
        format!("{} {}", labels.articles, form.article_count),
        format!("{} {}", labels.prefix, form.title_prefix),
        format!("{} {}", labels.content, template),
        format!("{} {}", labels.delay, form.delay_secs),
    ]
}

fn format_line(line: &LogLine) -> String {
    let marker = match line.kind {
        LogKind::Info => "*",
        LogKind::Created => "+",
        LogKind::Failed => "-",
        LogKind::Error => "!",
    };
    format!("{marker} {}", line.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use article_core::{update, AppState, Language, Msg};

    fn render_text(renderer: &mut TerminalRenderer, view: &AppViewModel) -> String {
        let mut buf = Vec::new();
        renderer.render_to(&mut buf, view).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn running_state() -> AppState {
        let mut state = AppState::new();
        for msg in [
            Msg::LanguageSelected(Language::English),
            Msg::WikiUrlChanged("https://example.fandom.com".to_string()),
            Msg::ArticleCountChanged(2),
            Msg::StartClicked,
        ] {
            state = update(state, msg).0;
        }
        state
    }

    #[test]
    fn header_is_printed_once_and_lines_only_once() {
        let mut renderer = TerminalRenderer::default();
        let state = running_state();

        let first = render_text(&mut renderer, &state.view());
        assert!(first.contains("🌐 Wiki URL: https://example.fandom.com"));
        assert!(first.contains("* Starting article creation (2)"));
        assert!(first.contains("Running | 0/2"));

        let (state, _) = update(
            state,
            Msg::ItemCreated {
                run_id: 1,
                title: "Article 1".to_string(),
            },
        );
        let second = render_text(&mut renderer, &state.view());
        assert!(!second.contains("Wiki URL"));
        assert!(!second.contains("Starting"));
        assert!(second.contains("+ Created: Article 1"));
    }

    #[test]
    fn terminal_state_prints_status() {
        let mut renderer = TerminalRenderer::default();
        let state = running_state();
        render_text(&mut renderer, &state.view());

        let (state, _) = update(state, Msg::FatalError {
            run_id: 1,
            message: "boom".to_string(),
        });
        let text = render_text(&mut renderer, &state.view());
        assert!(text.contains("! Error: boom"));
        assert!(text.contains("Aborted | 0/2"));
    }
}
