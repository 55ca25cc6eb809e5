use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracker_client::{ApiSettings, ClientHandle, HttpStatusApi, PollSettings};
use tracker_core::{update, CommandAction, HiddenJobs, JobSnapshot, Msg, TrackerState};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use super::effects::{EffectRunner, TrackerObserver};
use super::render;
use super::session::SessionHiddenJobs;

pub struct TrackerOptions {
    pub owner_id: String,
    pub base_url: String,
    pub poll_interval: Duration,
    pub session_dir: PathBuf,
}

/// Logs the host-facing callbacks; a real embedder would refresh document
/// counts from `on_saved`.
struct LogObserver;

impl TrackerObserver for LogObserver {
    fn on_state(
        &self,
        running: bool,
        job: Option<&JobSnapshot>,
        last_run: Option<&JobSnapshot>,
    ) {
        tracker_debug!(
            "state transition: running={} job={:?} last_run={:?}",
            running,
            job.map(|j| j.job_id.as_str()),
            last_run.map(|j| j.job_id.as_str())
        );
    }

    fn on_saved(&self, delta: u64, job: &JobSnapshot) {
        tracker_info!(
            "{} new documents saved for knowledge base {}",
            delta,
            job.owner_id
        );
    }
}

pub fn run_app(options: TrackerOptions) -> anyhow::Result<()> {
    let api = HttpStatusApi::new(ApiSettings::parse(&options.base_url)?)?;
    let hidden: Arc<dyn HiddenJobs> = Arc::new(SessionHiddenJobs::open(&options.session_dir));

    let (client, event_rx) = ClientHandle::spawn(
        Arc::new(api),
        PollSettings::with_interval(options.poll_interval),
    );
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let quit = Arc::new(AtomicBool::new(false));

    let runner = EffectRunner::new(client, msg_tx.clone(), vec![Arc::new(LogObserver)]);
    runner.spawn_event_loop(event_rx);
    spawn_control_input(msg_tx.clone(), quit.clone());

    // Background tick so dirty state gets rendered promptly even when no
    // poll or command message is in flight.
    let tick_tx = msg_tx.clone();
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while tick_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut state = TrackerState::new();
    let (next, effects) = update(
        state,
        Msg::TargetChanged {
            owner_id: Some(options.owner_id.clone()),
        },
        hidden.as_ref(),
    );
    state = next;
    runner.run(effects);
    tracker_info!(
        "tracking crawl activity for knowledge base {}",
        options.owner_id
    );

    loop {
        match msg_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(msg) => {
                let (next, effects) = update(std::mem::take(&mut state), msg, hidden.as_ref());
                state = next;
                runner.run(effects);
                if state.consume_dirty() {
                    render::print(&state.view());
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        if quit.load(Ordering::SeqCst) {
            // Tear polling down before leaving so no in-flight request
            // outlives the loop.
            let (next, effects) = update(
                std::mem::take(&mut state),
                Msg::TargetChanged { owner_id: None },
                hidden.as_ref(),
            );
            state = next;
            runner.run(effects);
            break;
        }
    }

    Ok(())
}

/// Read control verbs from stdin and forward them as messages. EOF or
/// `quit` ends the app.
fn spawn_control_input(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let action = match line.trim() {
                "pause" => Some(CommandAction::Pause),
                "resume" => Some(CommandAction::Resume),
                "cancel" => Some(CommandAction::Cancel),
                "retry" => Some(CommandAction::Retry),
                "quit" | "q" => break,
                "" => None,
                other => {
                    tracker_warn!("unknown command: {}", other);
                    None
                }
            };
            if let Some(action) = action {
                if msg_tx.send(Msg::ControlClicked { action }).is_err() {
                    break;
                }
            }
        }
        quit.store(true, Ordering::SeqCst);
    });
}
