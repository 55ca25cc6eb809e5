use crate::{ActivityEntry, JobId, JobSnapshot, JobStatus, PendingCommands};

/// Which visual the widget renders.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerPhase {
    /// A live job is tracked.
    Running(JobProgressView),
    /// A completed run is on display.
    LastRun(JobProgressView),
    /// Nothing is known yet (first load, or transport trouble is hiding the
    /// truth); rendered in the running visual so the widget never flickers
    /// out on mount.
    Placeholder,
    /// Nothing to show.
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobProgressView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub discovered: u64,
    pub fetched: u64,
    pub saved: u64,
    pub failed_items: u64,
    pub percent: Option<f32>,
    pub eta_seconds: Option<u64>,
    pub last_url: Option<String>,
    pub last_error: Option<String>,
}

impl From<&JobSnapshot> for JobProgressView {
    fn from(job: &JobSnapshot) -> Self {
        Self {
            job_id: job.job_id.clone(),
            status: job.status,
            discovered: job.discovered,
            fetched: job.fetched,
            saved: job.saved,
            failed_items: job.failed_items,
            percent: job.percent,
            eta_seconds: job.eta_seconds,
            last_url: job.last_url.clone(),
            last_error: job.last_error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerViewModel {
    pub phase: TrackerPhase,
    /// Feed entries, newest first.
    pub activity: Vec<ActivityEntry>,
    /// Pause/resume/cancel are only offered while a live job is tracked.
    pub can_control: bool,
    /// Retry is only offered once the displayed run has terminated.
    pub can_retry: bool,
    pub pending: PendingCommands,
    pub connection_error: Option<String>,
    pub action_error: Option<String>,
}
