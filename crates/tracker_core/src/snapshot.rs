use std::fmt;

use serde::{Deserialize, Serialize};

pub type JobId = String;
pub type OwnerId = String;

/// Lifecycle state reported by the crawl backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Paused,
    Canceled,
    Failed,
    Done,
}

impl JobStatus {
    /// Terminal states cannot resume.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Canceled | JobStatus::Failed | JobStatus::Done)
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Paused => write!(f, "paused"),
            JobStatus::Canceled => write!(f, "canceled"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Done => write!(f, "done"),
        }
    }
}

/// One point-in-time description of a crawl job.
///
/// Snapshots are produced by the backend; `updated_at` carries the
/// producer's timestamp (epoch milliseconds) and is the only field used for
/// ordering. The counters are cumulative and never decrease within the
/// lifetime of one `job_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub owner_id: OwnerId,
    pub status: JobStatus,
    #[serde(default)]
    pub discovered: u64,
    #[serde(default)]
    pub fetched: u64,
    #[serde(default)]
    pub saved: u64,
    #[serde(default)]
    pub failed_items: u64,
    #[serde(default)]
    pub last_url: Option<String>,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub percent: Option<f32>,
    #[serde(default)]
    pub eta_seconds: Option<u64>,
    pub updated_at: i64,
}

/// Control verbs accepted by the job endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Pause,
    Resume,
    Cancel,
    Retry,
}

impl CommandAction {
    /// Path segment used by the command endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandAction::Pause => "pause",
            CommandAction::Resume => "resume",
            CommandAction::Cancel => "cancel",
            CommandAction::Retry => "retry",
        }
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
