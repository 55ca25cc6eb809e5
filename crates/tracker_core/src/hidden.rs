use std::collections::HashSet;
use std::sync::Mutex;

/// Session-scoped set of job ids whose cancellation the user already saw.
///
/// A job is added the moment its live cancellation is observed and is never
/// removed within the session, so refetching status after a remount cannot
/// resurrect the dismissed banner. Implementations take `&self` because a
/// single shared handle is written from every tracker instance in the
/// process; they must degrade to a no-op instead of panicking when the
/// backing store is unavailable.
pub trait HiddenJobs: Send + Sync {
    /// True if this job was canceled earlier in the session.
    fn contains(&self, job_id: &str) -> bool;

    /// Record a canceled job. Adding the same id twice is harmless.
    fn add(&self, job_id: &str);
}

/// Plain in-memory implementation: the test double and the degraded
/// fallback when no persistent session store is available.
#[derive(Debug, Default)]
pub struct InMemoryHiddenJobs {
    ids: Mutex<HashSet<String>>,
}

impl InMemoryHiddenJobs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HiddenJobs for InMemoryHiddenJobs {
    fn contains(&self, job_id: &str) -> bool {
        self.ids
            .lock()
            .map(|ids| ids.contains(job_id))
            .unwrap_or(false)
    }

    fn add(&self, job_id: &str) {
        if let Ok(mut ids) = self.ids.lock() {
            ids.insert(job_id.to_string());
        }
    }
}
