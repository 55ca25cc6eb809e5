use crate::{CommandAction, JobId, JobSnapshot, OwnerId};

/// Classified body of one status read: either a live job or the idle shape,
/// optionally carrying the backend's record of the last completed run.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Active(JobSnapshot),
    Idle(Option<JobSnapshot>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The watched knowledge base changed (`None` stops tracking).
    TargetChanged { owner_id: Option<OwnerId> },
    /// State the host already knew when the tracker mounted. Applies like a
    /// poll result except that a cancellation found here is never scheduled
    /// for the post-confirmation hide.
    PriorStateLoaded {
        owner_id: OwnerId,
        outcome: PollOutcome,
        now_ms: i64,
    },
    /// A status poll round-trip finished.
    PollCompleted {
        owner_id: OwnerId,
        outcome: PollOutcome,
        now_ms: i64,
    },
    /// A status poll failed in transport.
    PollFailed { owner_id: OwnerId, error: String },
    /// User pressed one of the control buttons.
    ControlClicked { action: CommandAction },
    /// A control command round-trip finished; the body is a fresh snapshot.
    CommandCompleted {
        action: CommandAction,
        job: JobSnapshot,
        now_ms: i64,
    },
    /// A control command was rejected or failed in transport.
    CommandFailed { action: CommandAction, error: String },
    /// The post-cancellation grace period elapsed.
    HideTimerFired { job_id: JobId },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
