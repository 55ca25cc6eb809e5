use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracker_client::{ClientEvent, ClientHandle};
use tracker_core::{Effect, JobSnapshot, Msg};
use tracker_logging::tracker_info;

/// Host-facing subscription. `on_state` fires on every state transition,
/// `on_saved` whenever the cumulative saved counter grows (hosts use it to
/// refresh unrelated document counts).
pub trait TrackerObserver: Send + Sync {
    fn on_state(
        &self,
        _running: bool,
        _job: Option<&JobSnapshot>,
        _last_run: Option<&JobSnapshot>,
    ) {
    }

    fn on_saved(&self, _delta: u64, _job: &JobSnapshot) {}
}

/// Executes core effects against the client and the observers, and pumps
/// client events back into core messages.
pub struct EffectRunner {
    client: ClientHandle,
    msg_tx: mpsc::Sender<Msg>,
    observers: Vec<Arc<dyn TrackerObserver>>,
    hide_generation: Arc<AtomicU64>,
}

impl EffectRunner {
    pub fn new(
        client: ClientHandle,
        msg_tx: mpsc::Sender<Msg>,
        observers: Vec<Arc<dyn TrackerObserver>>,
    ) -> Self {
        Self {
            client,
            msg_tx,
            observers,
            hide_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Retarget { owner_id } => self.client.watch(owner_id),
                Effect::SendCommand { job_id, action } => {
                    tracker_info!("sending {} for job {}", action, job_id);
                    self.client.control(job_id, action);
                }
                Effect::ScheduleHide { job_id, delay_ms } => {
                    self.schedule_hide(job_id, delay_ms);
                }
                Effect::CancelHide => {
                    self.hide_generation.fetch_add(1, Ordering::SeqCst);
                }
                Effect::Notify {
                    running,
                    job,
                    last_run,
                } => {
                    for observer in &self.observers {
                        observer.on_state(running, job.as_ref(), last_run.as_ref());
                    }
                }
                Effect::SavedIncreased { delta, job } => {
                    for observer in &self.observers {
                        observer.on_saved(delta, &job);
                    }
                }
            }
        }
    }

    /// Arm the cancellation-confirmation timer. Arming bumps the generation,
    /// so any earlier timer (and any timer outlived by a retarget) finds a
    /// newer generation when it wakes and stays silent.
    fn schedule_hide(&self, job_id: String, delay_ms: u64) {
        let generation = self.hide_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let hide_generation = self.hide_generation.clone();
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            if hide_generation.load(Ordering::SeqCst) == generation {
                let _ = msg_tx.send(Msg::HideTimerFired { job_id });
            }
        });
    }

    /// Pump client events into core messages, stamping the wall clock the
    /// activity synthesizer will put on feed entries.
    pub fn spawn_event_loop(&self, event_rx: mpsc::Receiver<ClientEvent>) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            while let Ok(event) = event_rx.recv() {
                let msg = match event {
                    ClientEvent::Poll { owner_id, result } => match result {
                        Ok(outcome) => Msg::PollCompleted {
                            owner_id,
                            outcome,
                            now_ms: now_ms(),
                        },
                        Err(err) => Msg::PollFailed {
                            owner_id,
                            error: err.to_string(),
                        },
                    },
                    ClientEvent::Command { action, result } => match result {
                        Ok(job) => Msg::CommandCompleted {
                            action,
                            job,
                            now_ms: now_ms(),
                        },
                        Err(err) => Msg::CommandFailed {
                            action,
                            error: err.to_string(),
                        },
                    },
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
        });
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
