use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracker_client::write_atomic;
use tracker_core::HiddenJobs;
use tracker_logging::{tracker_info, tracker_warn};

const SESSION_FILENAME: &str = ".crawl_session.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SessionFile {
    hidden_jobs: Vec<String>,
}

/// Hidden-job set backed by a RON file in the session directory, so the
/// suppression survives tracker remounts within one session. Any IO or
/// parse failure degrades to the in-memory set with a warning; suppression
/// must never take the tracker down.
pub struct SessionHiddenJobs {
    dir: PathBuf,
    ids: Mutex<HashSet<String>>,
}

impl SessionHiddenJobs {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let ids = Mutex::new(load(&dir));
        Self { dir, ids }
    }

    fn save(&self, ids: &HashSet<String>) {
        let mut hidden_jobs: Vec<String> = ids.iter().cloned().collect();
        hidden_jobs.sort();
        let state = SessionFile { hidden_jobs };

        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&state, pretty) {
            Ok(text) => text,
            Err(err) => {
                tracker_warn!("Failed to serialize session state: {}", err);
                return;
            }
        };

        if let Err(err) = write_atomic(&self.dir, SESSION_FILENAME, &content) {
            tracker_warn!("Failed to write session state to {:?}: {}", self.dir, err);
        }
    }
}

fn load(dir: &Path) -> HashSet<String> {
    let path = dir.join(SESSION_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return HashSet::new();
        }
        Err(err) => {
            tracker_warn!("Failed to read session state from {:?}: {}", path, err);
            return HashSet::new();
        }
    };

    let state: SessionFile = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            tracker_warn!("Failed to parse session state from {:?}: {}", path, err);
            return HashSet::new();
        }
    };

    tracker_info!("Loaded session state from {:?}", path);
    state.hidden_jobs.into_iter().collect()
}

impl HiddenJobs for SessionHiddenJobs {
    fn contains(&self, job_id: &str) -> bool {
        self.ids
            .lock()
            .map(|ids| ids.contains(job_id))
            .unwrap_or(false)
    }

    fn add(&self, job_id: &str) {
        let Ok(mut ids) = self.ids.lock() else {
            return;
        };
        if ids.insert(job_id.to_string()) {
            self.save(&ids);
        }
    }
}
