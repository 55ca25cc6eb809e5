//! Tracker core: pure job-reconciliation state machine and view-model
//! helpers. All IO lives in `tracker_client`; this crate only classifies
//! snapshots, derives the activity feed, and emits effects.
mod activity;
mod effect;
mod hidden;
mod msg;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use activity::{
    format_count, synthesize, ActivityEntry, EntryKind, EntrySource, ACTIVITY_LOG_LIMIT,
};
pub use effect::Effect;
pub use hidden::{HiddenJobs, InMemoryHiddenJobs};
pub use msg::{Msg, PollOutcome};
pub use snapshot::{CommandAction, JobId, JobSnapshot, JobStatus, OwnerId};
pub use state::{PendingCommands, TrackerState};
pub use update::{update, CANCEL_HIDE_DELAY_MS};
pub use view_model::{JobProgressView, TrackerPhase, TrackerViewModel};
