use tracker_core::{
    update, Effect, InMemoryHiddenJobs, JobSnapshot, JobStatus, Msg, PollOutcome, TrackerState,
};

fn init_logging() {
    tracker_logging::initialize_for_tests();
}

fn snapshot(job_id: &str, status: JobStatus, saved: u64, updated_at: i64) -> JobSnapshot {
    JobSnapshot {
        job_id: job_id.to_string(),
        owner_id: "kb-1".to_string(),
        status,
        discovered: 0,
        fetched: 0,
        saved,
        failed_items: 0,
        last_url: None,
        last_error: None,
        percent: None,
        eta_seconds: None,
        updated_at,
    }
}

fn watching(hidden: &InMemoryHiddenJobs) -> TrackerState {
    let (state, _) = update(
        TrackerState::new(),
        Msg::TargetChanged {
            owner_id: Some("kb-1".to_string()),
        },
        hidden,
    );
    state
}

fn poll(
    state: TrackerState,
    outcome: PollOutcome,
    now_ms: i64,
    hidden: &InMemoryHiddenJobs,
) -> (TrackerState, Vec<Effect>) {
    update(
        state,
        Msg::PollCompleted {
            owner_id: "kb-1".to_string(),
            outcome,
            now_ms,
        },
        hidden,
    )
}

#[test]
fn first_snapshot_adopts_job_and_seeds_feed() {
    init_logging();
    let hidden = InMemoryHiddenJobs::new();
    let mut state = watching(&hidden);
    state.consume_dirty();

    let job = snapshot("a", JobStatus::Running, 0, 100);
    let (mut state, effects) = poll(state, PollOutcome::Active(job.clone()), 1_000, &hidden);

    assert_eq!(state.current(), Some(&job));
    assert_eq!(state.activity().len(), 1);
    assert_eq!(state.activity()[0].message, "Crawl started");
    assert!(state.consume_dirty());
    assert!(effects.contains(&Effect::Notify {
        running: true,
        job: Some(job),
        last_run: None,
    }));
}

#[test]
fn counter_growth_emits_delta_and_saved_effect() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 10, 100)),
        1_000,
        &hidden,
    );

    let newer = snapshot("a", JobStatus::Running, 15, 200);
    let (state, effects) = poll(state, PollOutcome::Active(newer.clone()), 2_000, &hidden);

    assert_eq!(state.current().unwrap().saved, 15);
    let info: Vec<_> = state
        .activity()
        .iter()
        .filter(|entry| entry.message.contains('5'))
        .collect();
    assert_eq!(info.len(), 1);
    assert!(effects.contains(&Effect::SavedIncreased {
        delta: 5,
        job: newer,
    }));
}

#[test]
fn stale_snapshot_never_changes_state() {
    init_logging();
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (mut state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 10, 200)),
        1_000,
        &hidden,
    );
    state.consume_dirty();
    let before = state.clone();

    let (mut state, effects) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 5, 100)),
        2_000,
        &hidden,
    );

    assert!(!state.consume_dirty());
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn duplicate_payload_is_skipped() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let job = snapshot("a", JobStatus::Running, 10, 200);
    let (mut state, _) = poll(state, PollOutcome::Active(job.clone()), 1_000, &hidden);
    state.consume_dirty();
    let before = state.clone();

    let (mut state, effects) = poll(state, PollOutcome::Active(job), 2_000, &hidden);

    assert!(!state.consume_dirty());
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn equal_timestamp_passes_status_change() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 10, 200)),
        1_000,
        &hidden,
    );

    let paused = snapshot("a", JobStatus::Paused, 10, 200);
    let (state, _) = poll(state, PollOutcome::Active(paused), 2_000, &hidden);

    assert_eq!(state.current().unwrap().status, JobStatus::Paused);
    assert!(state
        .activity()
        .iter()
        .any(|entry| entry.message.contains("paused")));
}

#[test]
fn new_job_id_resets_feed() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 0, 100)),
        1_000,
        &hidden,
    );
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 8, 200)),
        2_000,
        &hidden,
    );
    assert!(state.activity().len() > 1);

    // A different job id must never be diffed against the old one.
    let (state, effects) = poll(
        state,
        PollOutcome::Active(snapshot("b", JobStatus::Running, 2, 150)),
        3_000,
        &hidden,
    );

    assert_eq!(state.current().unwrap().job_id, "b");
    assert_eq!(state.activity().len(), 1);
    assert_eq!(state.activity()[0].message, "Crawl started");
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::SavedIncreased { .. })));
}

#[test]
fn held_counters_are_monotonic_under_replay() {
    let hidden = InMemoryHiddenJobs::new();
    let mut state = watching(&hidden);

    // Ordered updates interleaved with out-of-order replays.
    let feed = [
        (100, 1),
        (200, 4),
        (150, 2), // stale, must be dropped
        (300, 9),
        (100, 1), // stale duplicate of the first
        (400, 12),
    ];
    let mut highest = 0;
    for (updated_at, saved) in feed {
        let (next, _) = poll(
            state,
            PollOutcome::Active(snapshot("a", JobStatus::Running, saved, updated_at)),
            updated_at,
            &hidden,
        );
        state = next;
        let held = state.current().unwrap().saved;
        assert!(held >= highest, "counter went backwards: {held} < {highest}");
        highest = held;
    }
    assert_eq!(highest, 12);
}

#[test]
fn snapshot_for_other_owner_is_ignored() {
    let hidden = InMemoryHiddenJobs::new();
    let mut state = watching(&hidden);
    state.consume_dirty();
    let before = state.clone();

    let mut foreign = snapshot("a", JobStatus::Running, 3, 100);
    foreign.owner_id = "kb-2".to_string();
    let (state, effects) = update(
        state,
        Msg::PollCompleted {
            owner_id: "kb-2".to_string(),
            outcome: PollOutcome::Active(foreign),
            now_ms: 1_000,
        },
        &hidden,
    );

    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn poll_failure_keeps_job_and_sets_connection_error() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let job = snapshot("a", JobStatus::Running, 10, 100);
    let (state, _) = poll(state, PollOutcome::Active(job.clone()), 1_000, &hidden);

    let (state, effects) = update(
        state,
        Msg::PollFailed {
            owner_id: "kb-1".to_string(),
            error: "connection refused".to_string(),
        },
        &hidden,
    );

    assert_eq!(state.current(), Some(&job));
    assert_eq!(state.connection_error(), Some("connection refused"));
    assert!(effects.is_empty());

    // The next successful poll clears the banner.
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 11, 200)),
        2_000,
        &hidden,
    );
    assert_eq!(state.connection_error(), None);
}

#[test]
fn idle_poll_moves_last_run_into_completed_slot() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 10, 100)),
        1_000,
        &hidden,
    );

    let done = snapshot("a", JobStatus::Done, 12, 300);
    let (state, effects) = poll(state, PollOutcome::Idle(Some(done.clone())), 2_000, &hidden);

    assert_eq!(state.current(), None);
    assert_eq!(state.last_run(), Some(&done));
    assert!(state.activity().is_empty());
    assert!(effects.contains(&Effect::Notify {
        running: false,
        job: None,
        last_run: Some(done),
    }));
}

#[test]
fn idle_poll_without_payload_synthesizes_done_from_held() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 10, 100)),
        1_000,
        &hidden,
    );

    let (state, _) = poll(state, PollOutcome::Idle(None), 2_000, &hidden);

    assert_eq!(state.current(), None);
    let last = state.last_run().unwrap();
    assert_eq!(last.status, JobStatus::Done);
    assert_eq!(last.saved, 10);
    assert_eq!(last.updated_at, 100);
}

#[test]
fn idle_poll_with_no_state_is_quiet() {
    let hidden = InMemoryHiddenJobs::new();
    let mut state = watching(&hidden);
    state.consume_dirty();

    let (mut state, effects) = poll(state, PollOutcome::Idle(None), 1_000, &hidden);

    assert_eq!(state.current(), None);
    assert_eq!(state.last_run(), None);
    assert!(effects.is_empty());
    // Becoming loaded is still a visible change (placeholder -> hidden).
    assert!(state.consume_dirty());
    assert!(state.is_loaded());
}

#[test]
fn failed_job_keeps_banner_for_retry() {
    let hidden = InMemoryHiddenJobs::new();
    let state = watching(&hidden);
    let (state, _) = poll(
        state,
        PollOutcome::Active(snapshot("a", JobStatus::Running, 10, 100)),
        1_000,
        &hidden,
    );

    let mut failed = snapshot("a", JobStatus::Failed, 10, 200);
    failed.last_error = Some("robots.txt disallowed".to_string());
    let (state, effects) = poll(state, PollOutcome::Active(failed.clone()), 2_000, &hidden);

    assert_eq!(state.current(), None);
    assert_eq!(state.last_run(), Some(&failed));
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::ScheduleHide { .. })));
    assert!(state.view().can_retry);
}
