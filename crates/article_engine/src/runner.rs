use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use article_logging::{article_debug, article_error, article_info, article_warn};
use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::{Article, ArticleCreator, CreateError, RunEvent, RunId, RunSettings, RunStatus};

/// Receives run events on the caller's thread via [`RunHandle::dispatch_pending`]
/// or [`RunHandle::wait`]. Every method defaults to doing nothing.
pub trait RunObserver {
    fn on_item_created(&mut self, _index: usize, _title: &str) {}
    fn on_item_failed(&mut self, _index: usize, _title: &str) {}
    fn on_fatal_error(&mut self, _message: &str) {}
    fn on_finished(&mut self) {}
    fn on_cancelled(&mut self) {}
}

/// Starts creating `jobs` in order on a dedicated worker thread.
///
/// Returns immediately. Progress arrives through the returned handle; the
/// last event of every run is one of `Finished`, `Cancelled` or `FatalError`.
pub fn start(
    jobs: Vec<Article>,
    creator: Arc<dyn ArticleCreator>,
    settings: RunSettings,
) -> RunHandle {
    let (event_tx, event_rx) = mpsc::channel();
    let cancel = CancellationToken::new();
    let status = Arc::new(Mutex::new(RunStatus::Running));
    let run_id = settings.run_id;

    let worker = Worker {
        jobs,
        creator,
        settings,
        cancel: cancel.clone(),
        status: status.clone(),
        event_tx: event_tx.clone(),
    };

    let spawned = thread::Builder::new()
        .name(format!("article-run-{run_id}"))
        .spawn(move || worker.run());
    if let Err(err) = spawned {
        article_error!("run {} could not start its worker: {}", run_id, err);
        set_status(&status, RunStatus::Fatal);
        let _ = event_tx.send(RunEvent::FatalError {
            message: format!("failed to spawn worker thread: {err}"),
        });
    }

    RunHandle {
        run_id,
        cancel,
        status,
        event_rx,
    }
}

/// Cancels a run from any thread, independently of who owns the [`RunHandle`].
#[derive(Debug, Clone)]
pub struct RunCanceller {
    run_id: RunId,
    cancel: CancellationToken,
}

impl RunCanceller {
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            article_info!("cancellation requested for run {}", self.run_id);
        }
        self.cancel.cancel();
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }
}

/// Owner side of a run. Dropping the handle cancels the run.
pub struct RunHandle {
    run_id: RunId,
    cancel: CancellationToken,
    status: Arc<Mutex<RunStatus>>,
    event_rx: mpsc::Receiver<RunEvent>,
}

impl RunHandle {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Requests cooperative cancellation. The worker stops at its next
    /// checkpoint: the pause between articles or an in-flight creation.
    pub fn cancel(&self) {
        self.canceller().cancel();
    }

    pub fn canceller(&self) -> RunCanceller {
        RunCanceller {
            run_id: self.run_id,
            cancel: self.cancel.clone(),
        }
    }

    /// Current state. Switches to a terminal value just before the terminal
    /// event is sent.
    pub fn status(&self) -> RunStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn try_recv(&self) -> Option<RunEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks for the next event. `None` once the worker is gone and every
    /// event has been received.
    pub fn recv(&self) -> Option<RunEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RunEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Hands every queued event to `observer` without blocking.
    /// Returns the number of events dispatched.
    pub fn dispatch_pending(&self, observer: &mut dyn RunObserver) -> usize {
        let mut dispatched = 0;
        while let Some(event) = self.try_recv() {
            dispatch(observer, &event);
            dispatched += 1;
        }
        dispatched
    }

    /// Blocks until the run reaches a terminal state, feeding every event to
    /// `observer` along the way.
    pub fn wait(&self, observer: &mut dyn RunObserver) -> RunStatus {
        while let Some(event) = self.recv() {
            dispatch(observer, &event);
            if event.is_terminal() {
                break;
            }
        }
        self.status()
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn dispatch(observer: &mut dyn RunObserver, event: &RunEvent) {
    match event {
        RunEvent::ItemCreated { index, title } => observer.on_item_created(*index, title),
        RunEvent::ItemFailed { index, title } => observer.on_item_failed(*index, title),
        RunEvent::FatalError { message } => observer.on_fatal_error(message),
        RunEvent::Finished => observer.on_finished(),
        RunEvent::Cancelled => observer.on_cancelled(),
    }
}

fn set_status(status: &Mutex<RunStatus>, next: RunStatus) {
    *status.lock().unwrap_or_else(PoisonError::into_inner) = next;
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

enum Termination {
    Finished,
    Cancelled,
    Fatal(String),
}

struct Worker {
    jobs: Vec<Article>,
    creator: Arc<dyn ArticleCreator>,
    settings: RunSettings,
    cancel: CancellationToken,
    status: Arc<Mutex<RunStatus>>,
    event_tx: mpsc::Sender<RunEvent>,
}

impl Worker {
    fn run(self) {
        article_logging::set_run_id(self.settings.run_id);

        let termination = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime
                .block_on(AssertUnwindSafe(self.process()).catch_unwind())
                .unwrap_or_else(|payload| {
                    let message =
                        format!("article creation panicked: {}", panic_message(&*payload));
                    article_error!("{}", message);
                    Termination::Fatal(message)
                }),
            Err(err) => Termination::Fatal(format!("failed to start async runtime: {err}")),
        };
        self.terminate(termination);

        article_logging::clear_run_id();
    }

    async fn process(&self) -> Termination {
        let total = self.jobs.len();
        article_info!(
            "starting: {} article(s), delay {:?}..={:?}",
            total,
            self.settings.delay.min(),
            self.settings.delay.max()
        );

        for (index, article) in self.jobs.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Termination::Cancelled;
            }

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Termination::Cancelled,
                result = self.create(article) => result,
            };

            let event = match result {
                Ok(true) => {
                    article_info!("created {}/{}: {}", index + 1, total, article.title);
                    RunEvent::ItemCreated {
                        index,
                        title: article.title.clone(),
                    }
                }
                Ok(false) => {
                    article_warn!("rejected {}/{}: {}", index + 1, total, article.title);
                    RunEvent::ItemFailed {
                        index,
                        title: article.title.clone(),
                    }
                }
                Err(err) => {
                    article_error!(
                        "aborting at {}/{} ({}): {}",
                        index + 1,
                        total,
                        article.title,
                        err
                    );
                    return Termination::Fatal(err.to_string());
                }
            };
            self.emit(event);

            if index + 1 == total {
                break;
            }

            let delay = self.settings.delay.sample(&mut rand::thread_rng());
            article_debug!("sleeping {:?} before next article", delay);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Termination::Cancelled,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        Termination::Finished
    }

    async fn create(&self, article: &Article) -> Result<bool, CreateError> {
        let call = self
            .creator
            .create_article(&article.title, &article.content);
        match self.settings.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CreateError::Timeout(limit))?,
            None => call.await,
        }
    }

    fn terminate(&self, termination: Termination) {
        let (status, event) = match termination {
            Termination::Finished => {
                article_info!("finished");
                (RunStatus::Finished, RunEvent::Finished)
            }
            Termination::Cancelled => {
                article_info!("cancelled");
                (RunStatus::Cancelled, RunEvent::Cancelled)
            }
            Termination::Fatal(message) => (RunStatus::Fatal, RunEvent::FatalError { message }),
        };
        set_status(&self.status, status);
        self.emit(event);
    }

    fn emit(&self, event: RunEvent) {
        // The receiver only disappears with the handle, which cancels the run.
        let _ = self.event_tx.send(event);
    }
}
