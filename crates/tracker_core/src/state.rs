use crate::view_model::{JobProgressView, TrackerPhase, TrackerViewModel};
use crate::{ActivityEntry, CommandAction, JobSnapshot, OwnerId, ACTIVITY_LOG_LIMIT};

/// Per-action in-flight flags for the control buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingCommands {
    pub pause: bool,
    pub resume: bool,
    pub cancel: bool,
    pub retry: bool,
}

impl PendingCommands {
    pub fn get(self, action: CommandAction) -> bool {
        match action {
            CommandAction::Pause => self.pause,
            CommandAction::Resume => self.resume,
            CommandAction::Cancel => self.cancel,
            CommandAction::Retry => self.retry,
        }
    }

    pub(crate) fn set(&mut self, action: CommandAction, value: bool) {
        match action {
            CommandAction::Pause => self.pause = value,
            CommandAction::Resume => self.resume = value,
            CommandAction::Cancel => self.cancel = value,
            CommandAction::Retry => self.retry = value,
        }
    }
}

/// Authoritative tracker state. The update function is the only writer; the
/// poller and command dispatcher merely produce candidate snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerState {
    pub(crate) watched: Option<OwnerId>,
    pub(crate) current: Option<JobSnapshot>,
    pub(crate) last_run: Option<JobSnapshot>,
    pub(crate) activity: Vec<ActivityEntry>,
    pub(crate) entry_seq: u64,
    pub(crate) pending: PendingCommands,
    pub(crate) connection_error: Option<String>,
    pub(crate) action_error: Option<String>,
    pub(crate) loaded: bool,
    dirty: bool,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watched(&self) -> Option<&str> {
        self.watched.as_deref()
    }

    /// The live job, if one is tracked.
    pub fn current(&self) -> Option<&JobSnapshot> {
        self.current.as_ref()
    }

    /// The most recent completed run still on display.
    pub fn last_run(&self) -> Option<&JobSnapshot> {
        self.last_run.as_ref()
    }

    /// Feed entries, newest first.
    pub fn activity(&self) -> &[ActivityEntry] {
        &self.activity
    }

    pub fn connection_error(&self) -> Option<&str> {
        self.connection_error.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn pending(&self) -> PendingCommands {
        self.pending
    }

    /// False until the first poll response (or prior state) arrives.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn view(&self) -> TrackerViewModel {
        let phase = if let Some(job) = &self.current {
            TrackerPhase::Running(JobProgressView::from(job))
        } else if let Some(job) = &self.last_run {
            TrackerPhase::LastRun(JobProgressView::from(job))
        } else if !self.loaded || self.connection_error.is_some() {
            TrackerPhase::Placeholder
        } else {
            TrackerPhase::Hidden
        };

        TrackerViewModel {
            phase,
            activity: self.activity.clone(),
            can_control: self
                .current
                .as_ref()
                .is_some_and(|job| job.status.is_active()),
            can_retry: self.current.is_none() && self.last_run.is_some(),
            pending: self.pending,
            connection_error: self.connection_error.clone(),
            action_error: self.action_error.clone(),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Prepend freshly synthesized entries and trim to the display cap.
    pub(crate) fn push_entries(&mut self, entries: Vec<ActivityEntry>) {
        if entries.is_empty() {
            return;
        }
        self.activity.splice(0..0, entries);
        self.activity.truncate(ACTIVITY_LOG_LIMIT);
    }
}
