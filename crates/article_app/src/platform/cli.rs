use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use article_core::{
    Language, Msg, DEFAULT_ARTICLES, DEFAULT_DELAY_SECS, MAX_ARTICLES, MAX_DELAY_SECS,
    MIN_ARTICLES, MIN_DELAY_SECS,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use super::logging::LogDestination;

/// Creates a batch of articles on a Fandom wiki, one at a time with a
/// randomized pause in between. Ctrl-C stops the run after the current article.
#[derive(Debug, Parser)]
#[command(name = "article_app", version)]
pub struct Cli {
    /// Wiki address, e.g. https://example.fandom.com
    #[arg(long, env = "FANDOM_WIKI_URL")]
    pub wiki_url: String,

    #[arg(long, env = "FANDOM_USERNAME", default_value = "")]
    pub username: String,

    #[arg(long, env = "FANDOM_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Number of articles to create.
    #[arg(
        long,
        default_value_t = DEFAULT_ARTICLES,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(MIN_ARTICLES)..=i64::from(MAX_ARTICLES))
    )]
    pub count: u32,

    /// Title prefix; articles are named "<prefix> <n>".
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Content template; `{number}` is replaced with the article number.
    /// Without a template, filler text is generated.
    #[arg(long, conflicts_with = "template_file")]
    pub template: Option<String>,

    /// Read the content template from a file.
    #[arg(long)]
    pub template_file: Option<PathBuf>,

    /// Upper bound of the pause between articles, in seconds.
    #[arg(
        long,
        default_value_t = DEFAULT_DELAY_SECS,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(MIN_DELAY_SECS)..=i64::from(MAX_DELAY_SECS))
    )]
    pub delay: u32,

    /// Interface language: uk, en or ru.
    #[arg(long, default_value = "uk", value_parser = parse_language)]
    pub language: Language,

    /// Abort the run when a single article takes longer than this.
    #[arg(long)]
    pub call_timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    #[arg(long)]
    pub verbose: bool,

    /// Walk through the run without contacting the wiki.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

fn parse_language(raw: &str) -> Result<Language, String> {
    Language::from_code(raw)
        .ok_or_else(|| format!("unknown language {raw:?}, expected uk, en or ru"))
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }

    pub fn content_template(&self) -> anyhow::Result<String> {
        match (&self.template, &self.template_file) {
            (Some(template), _) => Ok(template.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("reading template file {}", path.display())),
            (None, None) => Ok(String::new()),
        }
    }

    /// The form edits a user would make before pressing Create.
    pub fn form_messages(&self, template: String) -> Vec<Msg> {
        vec![
            Msg::LanguageSelected(self.language),
            Msg::WikiUrlChanged(self.wiki_url.clone()),
            Msg::UsernameChanged(self.username.clone()),
            Msg::PasswordChanged(self.password.clone()),
            Msg::ArticleCountChanged(self.count),
            Msg::TitlePrefixChanged(self.prefix.clone()),
            Msg::TemplateChanged(template),
            Msg::DelayChanged(self.delay),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec!["article_app"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn defaults_match_the_form() {
        let cli = parse(&["--wiki-url", "https://example.fandom.com"]).unwrap();

        assert_eq!(cli.count, DEFAULT_ARTICLES);
        assert_eq!(cli.delay, DEFAULT_DELAY_SECS);
        assert_eq!(cli.language, Language::Ukrainian);
        assert_eq!(cli.log, LogTarget::Terminal);
        assert!(!cli.dry_run);
        assert_eq!(cli.content_template().unwrap(), "");
    }

    #[test]
    fn out_of_range_count_is_rejected() {
        assert!(parse(&["--wiki-url", "https://x.fandom.com", "--count", "0"]).is_err());
        assert!(parse(&["--wiki-url", "https://x.fandom.com", "--count", "101"]).is_err());
        assert!(parse(&["--wiki-url", "https://x.fandom.com", "--delay", "61"]).is_err());
    }

    #[test]
    fn language_codes_are_parsed() {
        let cli = parse(&["--wiki-url", "https://x.fandom.com", "--language", "ru"]).unwrap();
        assert_eq!(cli.language, Language::Russian);
        assert!(parse(&["--wiki-url", "https://x.fandom.com", "--language", "fr"]).is_err());
    }

    #[test]
    fn template_sources_conflict() {
        let result = parse(&[
            "--wiki-url",
            "https://x.fandom.com",
            "--template",
            "a",
            "--template-file",
            "b.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn template_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Entry {{number}}").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["--wiki-url", "https://x.fandom.com", "--template-file", &path]).unwrap();
        assert_eq!(cli.content_template().unwrap(), "Entry {number}");
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let cli = parse(&[
            "--wiki-url",
            "https://x.fandom.com",
            "--template-file",
            "/definitely/not/here.txt",
        ])
        .unwrap();
        let err = cli.content_template().unwrap_err();
        assert!(err.to_string().contains("reading template file"));
    }

    #[test]
    fn form_messages_start_with_language() {
        let cli = parse(&["--wiki-url", "https://x.fandom.com", "--language", "en"]).unwrap();
        let msgs = cli.form_messages("body".to_string());

        assert_eq!(msgs.first(), Some(&Msg::LanguageSelected(Language::English)));
        assert!(msgs.contains(&Msg::TemplateChanged("body".to_string())));
    }
}
