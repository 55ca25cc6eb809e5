mod runtime;

use std::time::Duration;

use anyhow::bail;
use log::LevelFilter;

use runtime::{initialize_logging, LogDestination, TrackerOptions};

fn main() -> anyhow::Result<()> {
    initialize_logging(LogDestination::File, LevelFilter::Info);

    let options = parse_args()?;
    runtime::run_app(options)
}

fn parse_args() -> anyhow::Result<TrackerOptions> {
    let mut owner_id = None;
    let mut base_url = "http://127.0.0.1:8080".to_string();
    let mut poll_interval = Duration::from_millis(4_000);
    let mut session_dir = std::env::temp_dir().join("crawl_tracker_session");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base-url" => match args.next() {
                Some(value) => base_url = value,
                None => bail!("--base-url needs a value"),
            },
            "--interval-ms" => match args.next().and_then(|v| v.parse().ok()) {
                Some(value) => poll_interval = Duration::from_millis(value),
                None => bail!("--interval-ms needs a numeric value"),
            },
            "--session-dir" => match args.next() {
                Some(value) => session_dir = value.into(),
                None => bail!("--session-dir needs a value"),
            },
            other if owner_id.is_none() && !other.starts_with('-') => {
                owner_id = Some(other.to_string());
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    let Some(owner_id) = owner_id else {
        bail!(
            "usage: tracker_app <knowledge-base-id> [--base-url URL] \
             [--interval-ms N] [--session-dir PATH]"
        );
    };

    Ok(TrackerOptions {
        owner_id,
        base_url,
        poll_interval,
        session_dir,
    })
}
