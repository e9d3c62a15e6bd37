use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use article_core::{Effect, Msg, RunId, RunRequest};
use article_engine::{
    api_endpoint, Article, ArticleCreator, CreatorSettings, DelayRange, DryRunCreator,
    MediaWikiCreator, RunCanceller, RunObserver, RunSettings,
};
use article_logging::{article_error, article_info, article_warn};

#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    pub dry_run: bool,
    pub call_timeout: Option<Duration>,
}

/// Executes core effects against the engine and feeds engine events back as `Msg`.
pub struct EffectRunner {
    msg_tx: mpsc::Sender<Msg>,
    options: RunnerOptions,
    active: Option<RunCanceller>,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>, options: RunnerOptions) -> Self {
        Self {
            msg_tx,
            options,
            active: None,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun(request) => self.start_run(request),
                Effect::CancelRun { run_id } => match &self.active {
                    Some(canceller) if canceller.run_id() == run_id => canceller.cancel(),
                    _ => article_warn!("CancelRun for unknown run {}", run_id),
                },
            }
        }
    }

    fn start_run(&mut self, request: RunRequest) {
        let run_id = request.run_id;
        article_info!(
            "StartRun run_id={} articles={} wiki={} dry_run={}",
            run_id,
            request.articles.len(),
            request.wiki_url,
            self.options.dry_run
        );

        let prepared = build_creator(&request, self.options.dry_run).and_then(|creator| {
            let settings = run_settings(&request, self.options.call_timeout)?;
            Ok((creator, settings))
        });
        let (creator, settings) = match prepared {
            Ok(prepared) => prepared,
            Err(message) => {
                article_error!("run {} could not start: {}", run_id, message);
                let _ = self.msg_tx.send(Msg::FatalError { run_id, message });
                return;
            }
        };

        let jobs = request
            .articles
            .into_iter()
            .map(|article| Article::new(article.title, article.content))
            .collect();
        let handle = article_engine::start(jobs, creator, settings);
        self.active = Some(handle.canceller());

        let mut forwarder = MsgForwarder {
            run_id,
            msg_tx: self.msg_tx.clone(),
        };
        thread::spawn(move || {
            let status = handle.wait(&mut forwarder);
            article_info!("run {} ended with {:?}", run_id, status);
        });
    }
}

fn build_creator(request: &RunRequest, dry_run: bool) -> Result<Arc<dyn ArticleCreator>, String> {
    if dry_run {
        return Ok(Arc::new(DryRunCreator));
    }

    let api_url = api_endpoint(&request.wiki_url)
        .map_err(|err| format!("invalid wiki url {}: {err}", request.wiki_url))?;
    let mut settings = CreatorSettings::new(api_url);
    if let Some(credentials) = &request.credentials {
        settings = settings.with_credentials(&credentials.username, &credentials.password);
    }
    let creator = MediaWikiCreator::new(settings).map_err(|err| err.to_string())?;
    Ok(Arc::new(creator))
}

fn run_settings(
    request: &RunRequest,
    call_timeout: Option<Duration>,
) -> Result<RunSettings, String> {
    let delay = DelayRange::from_secs(request.min_delay_secs, request.max_delay_secs)
        .map_err(|err| err.to_string())?;
    Ok(RunSettings {
        delay,
        call_timeout,
        run_id: request.run_id,
    })
}

/// Turns engine callbacks into core messages on the forwarding thread.
struct MsgForwarder {
    run_id: RunId,
    msg_tx: mpsc::Sender<Msg>,
}

impl MsgForwarder {
    fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }
}

impl RunObserver for MsgForwarder {
    fn on_item_created(&mut self, _index: usize, title: &str) {
        self.send(Msg::ItemCreated {
            run_id: self.run_id,
            title: title.to_string(),
        });
    }

    fn on_item_failed(&mut self, _index: usize, title: &str) {
        self.send(Msg::ItemFailed {
            run_id: self.run_id,
            title: title.to_string(),
        });
    }

    fn on_fatal_error(&mut self, message: &str) {
        self.send(Msg::FatalError {
            run_id: self.run_id,
            message: message.to_string(),
        });
    }

    fn on_finished(&mut self) {
        self.send(Msg::RunFinished {
            run_id: self.run_id,
        });
    }

    fn on_cancelled(&mut self) {
        self.send(Msg::RunCancelled {
            run_id: self.run_id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use article_core::ArticleDescriptor;

    fn request(run_id: RunId, titles: &[&str]) -> RunRequest {
        RunRequest {
            run_id,
            wiki_url: "https://example.fandom.com".to_string(),
            credentials: None,
            articles: titles
                .iter()
                .map(|title| ArticleDescriptor {
                    title: title.to_string(),
                    content: "body".to_string(),
                })
                .collect(),
            min_delay_secs: 0,
            max_delay_secs: 0,
        }
    }

    fn drain_until_terminal(rx: &mpsc::Receiver<Msg>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Ok(msg) = rx.recv_timeout(Duration::from_secs(5)) {
            let done = matches!(
                msg,
                Msg::RunFinished { .. } | Msg::RunCancelled { .. } | Msg::FatalError { .. }
            );
            msgs.push(msg);
            if done {
                break;
            }
        }
        msgs
    }

    #[test]
    fn dry_run_forwards_every_article() {
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(
            tx,
            RunnerOptions {
                dry_run: true,
                call_timeout: None,
            },
        );

        runner.enqueue(vec![Effect::StartRun(request(4, &["A", "B"]))]);

        assert_eq!(
            drain_until_terminal(&rx),
            vec![
                Msg::ItemCreated {
                    run_id: 4,
                    title: "A".to_string()
                },
                Msg::ItemCreated {
                    run_id: 4,
                    title: "B".to_string()
                },
                Msg::RunFinished { run_id: 4 },
            ]
        );
    }

    #[test]
    fn inverted_delay_is_reported_as_fatal() {
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(tx, RunnerOptions::default());
        let mut bad = request(2, &["A"]);
        bad.min_delay_secs = 5;
        bad.max_delay_secs = 1;

        runner.enqueue(vec![Effect::StartRun(bad)]);

        match drain_until_terminal(&rx).as_slice() {
            [Msg::FatalError { run_id: 2, message }] => assert!(message.contains("exceeds")),
            other => panic!("unexpected messages {other:?}"),
        }
    }

    #[test]
    fn cancel_reaches_the_active_run() {
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(
            tx,
            RunnerOptions {
                dry_run: true,
                call_timeout: None,
            },
        );
        let mut slow = request(9, &["A", "B", "C"]);
        slow.min_delay_secs = 30;
        slow.max_delay_secs = 30;

        runner.enqueue(vec![Effect::StartRun(slow)]);
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            first,
            Msg::ItemCreated {
                run_id: 9,
                title: "A".to_string()
            }
        );

        runner.enqueue(vec![Effect::CancelRun { run_id: 9 }]);
        assert_eq!(drain_until_terminal(&rx), vec![Msg::RunCancelled { run_id: 9 }]);
    }
}
