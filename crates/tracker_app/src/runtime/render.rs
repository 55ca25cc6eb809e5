use chrono::{Local, LocalResult, TimeZone};
use tracker_core::{format_count, EntryKind, TrackerPhase, TrackerViewModel};

/// Build the console lines for one render of the view model.
pub fn render(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    match &view.phase {
        TrackerPhase::Running(job) => {
            let mut status = format!(
                "[{}] saved {} / fetched {} / discovered {}",
                job.status,
                format_count(job.saved),
                format_count(job.fetched),
                format_count(job.discovered)
            );
            if let Some(percent) = job.percent {
                status.push_str(&format!(" ({percent:.0}%)"));
            }
            if let Some(eta) = job.eta_seconds {
                status.push_str(&format!(" (eta {eta}s)"));
            }
            lines.push(status);
            if job.failed_items > 0 {
                lines.push(format!(
                    "{} pages failed so far",
                    format_count(job.failed_items)
                ));
            }
        }
        TrackerPhase::LastRun(job) => {
            lines.push(format!(
                "[{}] last run saved {} documents",
                job.status,
                format_count(job.saved)
            ));
            if let Some(error) = &job.last_error {
                lines.push(format!("last error: {error}"));
            }
        }
        TrackerPhase::Placeholder => {
            lines.push("[running] waiting for crawl status...".to_string());
        }
        TrackerPhase::Hidden => {}
    }

    if let Some(error) = &view.connection_error {
        lines.push(format!("connection lost: {error}"));
    }
    if let Some(error) = &view.action_error {
        lines.push(format!("action failed: {error}"));
    }

    for entry in &view.activity {
        lines.push(format!(
            "  {} {} {}",
            format_time(entry.timestamp_ms),
            kind_tag(entry.kind),
            entry.message
        ));
    }

    if view.can_control {
        lines.push("commands: pause / resume / cancel / quit".to_string());
    } else if view.can_retry {
        lines.push("commands: retry / quit".to_string());
    }

    lines
}

pub fn print(view: &TrackerViewModel) {
    for line in render(view) {
        println!("{line}");
    }
}

fn kind_tag(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Status => "[status]",
        EntryKind::Info => "[info]",
        EntryKind::Error => "[error]",
    }
}

fn format_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms) {
        LocalResult::Single(at) => at.format("%H:%M:%S").to_string(),
        _ => "--:--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{JobProgressView, JobStatus, PendingCommands};

    fn progress(status: JobStatus) -> JobProgressView {
        JobProgressView {
            job_id: "job-1".to_string(),
            status,
            discovered: 1200,
            fetched: 340,
            saved: 56,
            failed_items: 0,
            percent: Some(28.0),
            eta_seconds: None,
            last_url: None,
            last_error: None,
        }
    }

    #[test]
    fn running_view_lists_counters_with_separators() {
        let view = TrackerViewModel {
            phase: TrackerPhase::Running(progress(JobStatus::Running)),
            activity: Vec::new(),
            can_control: true,
            can_retry: false,
            pending: PendingCommands::default(),
            connection_error: None,
            action_error: None,
        };

        let lines = render(&view);
        assert!(lines[0].contains("1,200"));
        assert!(lines[0].contains("(28%)"));
        assert!(lines.last().unwrap().contains("pause"));
    }

    #[test]
    fn placeholder_renders_as_running() {
        let view = TrackerViewModel {
            phase: TrackerPhase::Placeholder,
            activity: Vec::new(),
            can_control: false,
            can_retry: false,
            pending: PendingCommands::default(),
            connection_error: None,
            action_error: None,
        };

        let lines = render(&view);
        assert!(lines[0].starts_with("[running]"));
    }
}
