use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use article_core::{update, AppState, Msg, SessionState};
use article_logging::{article_info, article_warn};
use chrono::Utc;
use clap::Parser;

use super::cli::Cli;
use super::effects::{EffectRunner, RunnerOptions};
use super::logging;
use super::render::TerminalRenderer;

/// Conventional exit status for a run stopped with Ctrl-C.
const EXIT_CANCELLED: u8 = 130;
const EXIT_INVALID_FORM: u8 = 2;

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), cli.log_level());

    let template = cli.content_template()?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    let effects = EffectRunner::new(
        msg_tx.clone(),
        RunnerOptions {
            dry_run: cli.dry_run,
            call_timeout: cli.call_timeout(),
        },
    );
    let seed = Utc::now().timestamp_micros() as u64;
    let mut app = App {
        state: AppState::with_seed(seed),
        effects,
        renderer: TerminalRenderer::default(),
    };

    for msg in cli.form_messages(template) {
        app.dispatch_msg(msg);
    }
    app.dispatch_msg(Msg::StartClicked);
    if app.state.session() != SessionState::Running {
        return Ok(ExitCode::from(EXIT_INVALID_FORM));
    }

    spawn_interrupt_listener(msg_tx);

    while let Ok(msg) = msg_rx.recv() {
        app.dispatch_msg(msg);
        if !app.state.session().is_active() {
            break;
        }
    }

    let code = match app.state.session() {
        SessionState::Finished => ExitCode::SUCCESS,
        SessionState::Cancelled => ExitCode::from(EXIT_CANCELLED),
        _ => ExitCode::FAILURE,
    };
    Ok(code)
}

struct App {
    state: AppState,
    effects: EffectRunner,
    renderer: TerminalRenderer,
}

impl App {
    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.effects.enqueue(effects);
        if state.consume_dirty() {
            self.renderer.render(&state.view());
        }
        self.state = state;
    }
}

/// Maps Ctrl-C to the Stop button. The run then ends at its next checkpoint.
fn spawn_interrupt_listener(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                article_warn!("Ctrl-C handling unavailable: {}", err);
                return;
            }
        };
        runtime.block_on(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                article_info!("interrupt received, stopping");
                if msg_tx.send(Msg::StopClicked).is_err() {
                    break;
                }
            }
        });
    });
}
