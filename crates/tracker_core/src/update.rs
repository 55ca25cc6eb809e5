use tracker_logging::tracker_debug;

use crate::activity::{synthesize, EntrySource};
use crate::{
    CommandAction, Effect, HiddenJobs, JobSnapshot, JobStatus, Msg, OwnerId, PollOutcome,
    TrackerState,
};

/// Grace period a live cancellation stays visible before the widget hides.
pub const CANCEL_HIDE_DELAY_MS: u64 = 2_000;

/// Pure update function: applies a message to state and returns any effects.
///
/// `hidden` is the session's suppressed-cancellation set, injected so the
/// reconciliation logic stays testable against an in-memory store.
pub fn update(
    mut state: TrackerState,
    msg: Msg,
    hidden: &dyn HiddenJobs,
) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::TargetChanged { owner_id } => {
            if state.watched == owner_id {
                return (state, Vec::new());
            }
            state.watched = owner_id.clone();
            state.current = None;
            state.last_run = None;
            state.activity.clear();
            state.pending = Default::default();
            state.connection_error = None;
            state.action_error = None;
            state.loaded = false;
            state.mark_dirty();
            vec![Effect::CancelHide, Effect::Retarget { owner_id }]
        }
        Msg::PriorStateLoaded {
            owner_id,
            outcome,
            now_ms,
        } => {
            if state.watched.as_deref() != Some(owner_id.as_str()) {
                return (state, Vec::new());
            }
            if !state.loaded {
                state.loaded = true;
                state.mark_dirty();
            }
            handle_outcome(&mut state, owner_id, outcome, now_ms, EntrySource::Restore, hidden)
        }
        Msg::PollCompleted {
            owner_id,
            outcome,
            now_ms,
        } => {
            if state.watched.as_deref() != Some(owner_id.as_str()) {
                return (state, Vec::new());
            }
            if !state.loaded {
                state.loaded = true;
                state.mark_dirty();
            }
            if state.connection_error.take().is_some() {
                state.mark_dirty();
            }
            handle_outcome(&mut state, owner_id, outcome, now_ms, EntrySource::Poll, hidden)
        }
        Msg::PollFailed { owner_id, error } => {
            if state.watched.as_deref() != Some(owner_id.as_str()) {
                return (state, Vec::new());
            }
            // Transport trouble never blanks the widget; the last known job
            // state (or the placeholder) stays on screen.
            state.loaded = true;
            state.connection_error = Some(error);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ControlClicked { action } => {
            if state.pending.get(action) {
                return (state, Vec::new());
            }
            let target = match action {
                CommandAction::Pause | CommandAction::Resume | CommandAction::Cancel => {
                    state.current.as_ref().map(|job| job.job_id.clone())
                }
                // Retry is meaningful after termination too.
                CommandAction::Retry => state
                    .current
                    .as_ref()
                    .or(state.last_run.as_ref())
                    .map(|job| job.job_id.clone()),
            };
            match target {
                Some(job_id) => {
                    state.pending.set(action, true);
                    state.action_error = None;
                    state.mark_dirty();
                    vec![Effect::SendCommand { job_id, action }]
                }
                None => Vec::new(),
            }
        }
        Msg::CommandCompleted {
            action,
            job,
            now_ms,
        } => {
            state.pending.set(action, false);
            state.action_error = None;
            state.mark_dirty();
            let owner_id = job.owner_id.clone();
            apply_snapshot(&mut state, owner_id, job, now_ms, EntrySource::Command, hidden)
        }
        Msg::CommandFailed { action, error } => {
            state.pending.set(action, false);
            state.action_error = Some(error);
            state.mark_dirty();
            Vec::new()
        }
        Msg::HideTimerFired { job_id } => {
            if state
                .last_run
                .as_ref()
                .is_some_and(|job| job.job_id == job_id)
            {
                state.last_run = None;
                state.mark_dirty();
                vec![Effect::Notify {
                    running: state.current.is_some(),
                    job: state.current.clone(),
                    last_run: None,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn handle_outcome(
    state: &mut TrackerState,
    owner_id: OwnerId,
    outcome: PollOutcome,
    now_ms: i64,
    source: EntrySource,
    hidden: &dyn HiddenJobs,
) -> Vec<Effect> {
    match outcome {
        PollOutcome::Active(job) => apply_snapshot(state, owner_id, job, now_ms, source, hidden),
        PollOutcome::Idle(Some(last)) => {
            apply_snapshot(state, owner_id, last, now_ms, source, hidden)
        }
        PollOutcome::Idle(None) => {
            // The backend no longer reports the job and gave no last-run
            // record; fold the held snapshot into a terminal-equivalent one.
            // Same updated_at: the equal-timestamp rule admits the flip.
            match state.current.clone() {
                Some(mut held) => {
                    held.status = JobStatus::Done;
                    apply_snapshot(state, owner_id, held, now_ms, source, hidden)
                }
                None => Vec::new(),
            }
        }
    }
}

/// Single entry point for every candidate snapshot, whatever its source.
fn apply_snapshot(
    state: &mut TrackerState,
    owner_id: OwnerId,
    incoming: JobSnapshot,
    now_ms: i64,
    source: EntrySource,
    hidden: &dyn HiddenJobs,
) -> Vec<Effect> {
    if state.watched.as_deref() != Some(owner_id.as_str()) {
        tracker_debug!("dropping snapshot for {}: not the watched owner", owner_id);
        return Vec::new();
    }

    let prev = state
        .current
        .as_ref()
        .filter(|held| held.job_id == incoming.job_id)
        .cloned();

    if let Some(held) = &prev {
        if incoming.updated_at < held.updated_at {
            tracker_debug!(
                "dropping stale snapshot for job {} ({} < {})",
                incoming.job_id,
                incoming.updated_at,
                held.updated_at
            );
            return Vec::new();
        }
        // Equal timestamps pass status/text changes through, but an
        // identical payload is a duplicate delivery.
        if incoming.updated_at == held.updated_at && incoming == *held {
            return Vec::new();
        }
    }

    let mut effects = Vec::new();

    if let Some(held) = &prev {
        let delta = incoming.saved.saturating_sub(held.saved);
        if delta > 0 {
            effects.push(Effect::SavedIncreased {
                delta,
                job: incoming.clone(),
            });
        }
    }

    if incoming.status.is_active() {
        if prev.is_none() {
            // New job (or first sight of one): never diff across job ids.
            state.activity.clear();
        }
        let entries = synthesize(prev.as_ref(), &incoming, source, now_ms, &mut state.entry_seq);
        state.push_entries(entries);
        state.current = Some(incoming.clone());
        effects.push(Effect::Notify {
            running: true,
            job: Some(incoming),
            last_run: state.last_run.clone(),
        });
    } else {
        let live_cancellation = incoming.status == JobStatus::Canceled
            && source != EntrySource::Restore
            && prev.as_ref().is_some_and(|held| held.status != JobStatus::Canceled);

        state.current = None;
        state.activity.clear();
        state.last_run = if incoming.status == JobStatus::Canceled && !live_cancellation {
            // A replayed cancellation the user already dismissed, or one
            // that ended before this view ever saw the job live. Neither
            // earns a banner.
            if hidden.contains(&incoming.job_id) {
                tracker_debug!(
                    "job {} was canceled earlier this session; banner suppressed",
                    incoming.job_id
                );
            }
            None
        } else {
            Some(incoming.clone())
        };

        if live_cancellation {
            hidden.add(&incoming.job_id);
            effects.push(Effect::ScheduleHide {
                job_id: incoming.job_id.clone(),
                delay_ms: CANCEL_HIDE_DELAY_MS,
            });
        }

        effects.push(Effect::Notify {
            running: false,
            job: None,
            last_run: state.last_run.clone(),
        });
    }

    state.mark_dirty();
    effects
}
