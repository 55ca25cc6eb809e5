use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("session directory missing or not writable: {0}")]
    SessionDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the session directory exists; create if missing.
pub fn ensure_session_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::SessionDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::SessionDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::SessionDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::SessionDir(e.to_string()))?;
    Ok(())
}

/// Atomically write `content` to `{dir}/{filename}`: temp file, fsync,
/// rename. Readers never observe a half-written session file.
pub fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    ensure_session_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace an existing file if present to keep determinism.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
