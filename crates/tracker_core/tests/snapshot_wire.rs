use tracker_core::{JobSnapshot, JobStatus};

#[test]
fn snapshot_decodes_from_backend_json() {
    let body = r#"{
        "jobId": "job-7",
        "ownerId": "kb-1",
        "status": "running",
        "discovered": 120,
        "fetched": 80,
        "saved": 42,
        "failedItems": 2,
        "lastUrl": "https://example.com/docs",
        "lastError": null,
        "percent": 35.5,
        "etaSeconds": 240,
        "updatedAt": 1723000000000
    }"#;

    let snapshot: JobSnapshot = serde_json::from_str(body).unwrap();
    assert_eq!(snapshot.job_id, "job-7");
    assert_eq!(snapshot.owner_id, "kb-1");
    assert_eq!(snapshot.status, JobStatus::Running);
    assert_eq!(snapshot.saved, 42);
    assert_eq!(snapshot.failed_items, 2);
    assert_eq!(snapshot.last_url.as_deref(), Some("https://example.com/docs"));
    assert_eq!(snapshot.last_error, None);
    assert_eq!(snapshot.percent, Some(35.5));
    assert_eq!(snapshot.eta_seconds, Some(240));
    assert_eq!(snapshot.updated_at, 1_723_000_000_000);
}

#[test]
fn omitted_counters_and_indicators_default() {
    let body = r#"{
        "jobId": "job-8",
        "ownerId": "kb-1",
        "status": "canceled",
        "updatedAt": 1723000000001
    }"#;

    let snapshot: JobSnapshot = serde_json::from_str(body).unwrap();
    assert_eq!(snapshot.status, JobStatus::Canceled);
    assert!(snapshot.status.is_terminal());
    assert_eq!(snapshot.discovered, 0);
    assert_eq!(snapshot.saved, 0);
    assert_eq!(snapshot.percent, None);
    assert_eq!(snapshot.last_url, None);
}
