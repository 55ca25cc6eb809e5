use crate::{CommandAction, JobId, JobSnapshot, OwnerId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Point the poller at a new owner (`None` tears polling down).
    Retarget { owner_id: Option<OwnerId> },
    /// Issue a control command against the job endpoint.
    SendCommand { job_id: JobId, action: CommandAction },
    /// Arm the cancellation-confirmation hide timer.
    ScheduleHide { job_id: JobId, delay_ms: u64 },
    /// Disarm any armed hide timer.
    CancelHide,
    /// Push the new authoritative state to subscribers.
    Notify {
        running: bool,
        job: Option<JobSnapshot>,
        last_run: Option<JobSnapshot>,
    },
    /// The cumulative saved counter grew; hosts refresh document counts.
    SavedIncreased { delta: u64, job: JobSnapshot },
}
