use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracker_logging::{tracker_debug, tracker_warn};

use tracker_core::{CommandAction, JobId, JobSnapshot, OwnerId, PollOutcome};

use crate::api::{ApiError, StatusApi};

/// Floor for the poll interval; anything lower hammers the backend.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1_000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4_000);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollSettings {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }
}

enum ClientCommand {
    Watch { owner_id: Option<OwnerId> },
    Control { job_id: JobId, action: CommandAction },
}

#[derive(Debug)]
pub enum ClientEvent {
    Poll {
        owner_id: OwnerId,
        result: Result<PollOutcome, ApiError>,
    },
    Command {
        action: CommandAction,
        result: Result<JobSnapshot, ApiError>,
    },
}

/// Handle to the poller/dispatcher thread. Commands go in over a channel;
/// `ClientEvent`s come back on the receiver returned by [`ClientHandle::spawn`].
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    pub fn spawn(
        api: Arc<dyn StatusApi>,
        settings: PollSettings,
    ) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run(api, settings, cmd_rx, event_tx));

        (Self { cmd_tx }, event_rx)
    }

    /// Retarget the poller. `None` stops polling entirely; a new owner gets
    /// an immediate first request.
    pub fn watch(&self, owner_id: Option<OwnerId>) {
        let _ = self.cmd_tx.send(ClientCommand::Watch { owner_id });
    }

    pub fn control(&self, job_id: JobId, action: CommandAction) {
        let _ = self.cmd_tx.send(ClientCommand::Control { job_id, action });
    }
}

fn run(
    api: Arc<dyn StatusApi>,
    settings: PollSettings,
    cmd_rx: mpsc::Receiver<ClientCommand>,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let interval = settings.interval.max(MIN_POLL_INTERVAL);
    let mut poll_token: Option<CancellationToken> = None;
    let mut command_token: Option<CancellationToken> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            ClientCommand::Watch { owner_id } => {
                // The previous loop is cancelled before anything new starts;
                // a stale poll can never deliver past this point.
                if let Some(token) = poll_token.take() {
                    token.cancel();
                }
                if let Some(owner_id) = owner_id {
                    let token = CancellationToken::new();
                    poll_token = Some(token.clone());
                    runtime.spawn(poll_loop(
                        api.clone(),
                        owner_id,
                        interval,
                        token,
                        event_tx.clone(),
                    ));
                }
            }
            ClientCommand::Control { job_id, action } => {
                // At most one command in flight; a newer click supersedes.
                if let Some(token) = command_token.take() {
                    token.cancel();
                }
                let token = CancellationToken::new();
                command_token = Some(token.clone());
                runtime.spawn(run_command(
                    api.clone(),
                    job_id,
                    action,
                    token,
                    event_tx.clone(),
                ));
            }
        }
    }

    // Handle dropped: tear down before the runtime goes away.
    if let Some(token) = poll_token {
        token.cancel();
    }
    if let Some(token) = command_token {
        token.cancel();
    }
}

async fn poll_loop(
    api: Arc<dyn StatusApi>,
    owner_id: OwnerId,
    interval: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    loop {
        // At most one request in flight: issue, report, sleep.
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = api.crawl_activity(&owner_id) => result,
        };
        if let Err(err) = &result {
            tracker_warn!("poll for {} failed: {}", owner_id, err);
        }
        let event = ClientEvent::Poll {
            owner_id: owner_id.clone(),
            result,
        };
        if event_tx.send(event).is_err() {
            break;
        }
        // Rescheduling is unconditional; one failed request must never stop
        // the poller.
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn run_command(
    api: Arc<dyn StatusApi>,
    job_id: JobId,
    action: CommandAction,
    token: CancellationToken,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => {
            tracker_debug!("command {} for job {} superseded", action, job_id);
            return;
        }
        result = api.run_command(&job_id, action) => result,
    };
    let _ = event_tx.send(ClientEvent::Command { action, result });
}
