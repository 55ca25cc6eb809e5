mod app;
mod effects;
mod logging;
mod render;
mod session;

pub use app::{run_app, TrackerOptions};
pub use logging::{initialize as initialize_logging, LogDestination};
