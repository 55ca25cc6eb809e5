use crate::{JobSnapshot, JobStatus};

/// Entries kept per active job, newest first.
pub const ACTIVITY_LOG_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Status,
    Info,
    Error,
}

/// A derived, display-only feed line. Not persisted anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Stable list key: `{source}-{seq}-{now_ms}`. The sequence keeps ids
    /// unique even for entries synthesized within the same millisecond.
    pub id: String,
    pub kind: EntryKind,
    pub message: String,
    pub timestamp_ms: i64,
}

/// Which update source a synthesized entry came from (id prefix only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    Poll,
    Command,
    Restore,
}

impl EntrySource {
    fn prefix(self) -> &'static str {
        match self {
            EntrySource::Poll => "poll",
            EntrySource::Command => "cmd",
            EntrySource::Restore => "init",
        }
    }
}

/// Diff two consecutive snapshots of the same job into feed entries.
///
/// `previous == None` means the job is seen for the first time; only the
/// synthetic "started" entry is emitted then. Otherwise every rule below
/// triggers independently, so one diff can produce several entries.
/// Timestamps are the caller's wall clock at synthesis time, not the
/// producer's `updated_at`.
pub fn synthesize(
    previous: Option<&JobSnapshot>,
    incoming: &JobSnapshot,
    source: EntrySource,
    now_ms: i64,
    seq: &mut u64,
) -> Vec<ActivityEntry> {
    let mut entries = Vec::new();

    let Some(prev) = previous else {
        entries.push(entry(seq, source, now_ms, EntryKind::Status, "Crawl started".to_string()));
        return entries;
    };

    if prev.status != incoming.status {
        let kind = if incoming.status == JobStatus::Failed {
            EntryKind::Error
        } else {
            EntryKind::Status
        };
        entries.push(entry(
            seq,
            source,
            now_ms,
            kind,
            format!("Crawl {}", incoming.status),
        ));
    }

    let saved = incoming.saved.saturating_sub(prev.saved);
    if saved > 0 {
        entries.push(entry(
            seq,
            source,
            now_ms,
            EntryKind::Info,
            format!("Saved {} new documents", format_count(saved)),
        ));
    }

    let fetched = incoming.fetched.saturating_sub(prev.fetched);
    if fetched > 0 {
        entries.push(entry(
            seq,
            source,
            now_ms,
            EntryKind::Info,
            format!("Fetched {} pages", format_count(fetched)),
        ));
    }

    let discovered = incoming.discovered.saturating_sub(prev.discovered);
    if discovered > 0 {
        entries.push(entry(
            seq,
            source,
            now_ms,
            EntryKind::Info,
            format!("Discovered {} links", format_count(discovered)),
        ));
    }

    let failed = incoming.failed_items.saturating_sub(prev.failed_items);
    if failed > 0 {
        entries.push(entry(
            seq,
            source,
            now_ms,
            EntryKind::Error,
            format!("{} pages failed", format_count(failed)),
        ));
    }

    if let Some(url) = incoming.last_url.as_deref() {
        if prev.last_url.as_deref() != Some(url) {
            entries.push(entry(
                seq,
                source,
                now_ms,
                EntryKind::Info,
                format!("Crawling {url}"),
            ));
        }
    }

    if let Some(error) = incoming.last_error.as_deref() {
        if prev.last_error.as_deref() != Some(error) {
            entries.push(entry(
                seq,
                source,
                now_ms,
                EntryKind::Error,
                error.to_string(),
            ));
        }
    }

    entries
}

fn entry(
    seq: &mut u64,
    source: EntrySource,
    now_ms: i64,
    kind: EntryKind,
    message: String,
) -> ActivityEntry {
    *seq += 1;
    ActivityEntry {
        id: format!("{}-{}-{}", source.prefix(), seq, now_ms),
        kind,
        message,
        timestamp_ms: now_ms,
    }
}

/// Format a counter delta with thousands separators ("12,345").
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
