//! Tracker client: HTTP plumbing for the crawl backend — the status poller,
//! the command dispatcher, and the session-file write helper.
mod api;
mod client;
mod persist;

pub use api::{ApiError, ApiSettings, HttpStatusApi, StatusApi};
pub use client::{
    ClientEvent, ClientHandle, PollSettings, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL,
};
pub use persist::{ensure_session_dir, write_atomic, PersistError};
