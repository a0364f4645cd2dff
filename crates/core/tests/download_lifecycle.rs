//! Download lifecycle integration tests.
//!
//! These tests drive the orchestrator through the public API with mock
//! transport and storage:
//! - Full cycle: listing -> per-item download/delete -> completed
//! - Interruption on a gate-close edge and resume on reopen
//! - Counting policy differences between report kinds

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use skysync_core::{
    gate::{gate, Gate},
    testing::{MockStorage, MockTransport, RecordedCall},
    CountPolicy, DeviceTransport, DownloadOrchestrator, DownloaderConfig, ItemKind,
    ProgressSnapshot, RemoteEntry, ReportStorage, TaskState, TransportError,
};

/// Test helper bundling the orchestrator with its collaborators.
struct TestHarness {
    orchestrator: DownloadOrchestrator,
    gate: Gate,
    transport: Arc<MockTransport>,
    storage: Arc<MockStorage>,
}

impl TestHarness {
    fn new(policy: CountPolicy, kind: ItemKind) -> Self {
        let transport = Arc::new(MockTransport::new());
        let storage = Arc::new(MockStorage::new("/work"));
        let (gate_ctl, monitor) = gate(false);

        let config = DownloaderConfig {
            count_policy: policy,
            ..DownloaderConfig::default()
        };
        let orchestrator = DownloadOrchestrator::new(
            config,
            kind,
            Arc::clone(&transport) as Arc<dyn DeviceTransport>,
            Arc::clone(&storage) as Arc<dyn ReportStorage>,
            monitor,
        );

        Self {
            orchestrator,
            gate: gate_ctl,
            transport,
            storage,
        }
    }

    async fn list_entries(&self, names: &[&str]) {
        let entries = names
            .iter()
            .map(|name| RemoteEntry::new(*name, format!("/data/{name}")))
            .collect();
        self.transport.set_list_result(Ok(entries)).await;
    }
}

async fn collect_until(
    rx: &mut broadcast::Receiver<ProgressSnapshot>,
    terminal: TaskState,
) -> Vec<ProgressSnapshot> {
    let mut snapshots = Vec::new();
    loop {
        let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for progress")
            .expect("progress channel closed");
        let state = snapshot.state;
        snapshots.push(snapshot);
        if state == terminal {
            return snapshots;
        }
    }
}

#[tokio::test]
async fn test_flight_data_full_cycle() {
    let harness = TestHarness::new(CountPolicy::AfterDownload, ItemKind::FlightData);
    harness.list_entries(&["log1.pud", "log2.pud", "log3.pud"]).await;

    let mut rx = harness.orchestrator.subscribe();
    harness.orchestrator.start().await.unwrap();
    harness.gate.set_allowed(true);

    let snapshots = collect_until(&mut rx, TaskState::Completed).await;
    let last = snapshots.last().unwrap();
    assert_eq!(last.downloaded_count, 3);
    assert_eq!(last.total_items, 3);

    // Every item was staged and every remote copy deleted.
    assert_eq!(harness.storage.notified().len(), 3);
    let deletes = harness
        .transport
        .calls()
        .await
        .into_iter()
        .filter(|call| matches!(call, RecordedCall::Delete { .. }))
        .count();
    assert_eq!(deletes, 3);

    harness.orchestrator.stop().await.unwrap();
}

#[tokio::test]
async fn test_interrupted_cycle_resumes_from_fresh_listing() {
    let harness = TestHarness::new(CountPolicy::AfterDelete, ItemKind::FlightData);
    harness.list_entries(&["a.pud", "b.pud"]).await;
    harness.transport.hold_downloads();

    let mut rx = harness.orchestrator.subscribe();
    harness.orchestrator.start().await.unwrap();
    harness.gate.set_allowed(true);

    // Wait until the first download is actually blocked in flight.
    for _ in 0..200 {
        if harness.transport.download_in_flight() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(harness.transport.download_in_flight());

    harness.gate.set_allowed(false);
    let snapshots = collect_until(&mut rx, TaskState::Idle).await;
    let states: Vec<TaskState> = snapshots.iter().map(|s| s.state).collect();
    assert!(states.ends_with(&[TaskState::Interrupted, TaskState::Idle]));
    assert!(harness.transport.disposed());

    // The latest snapshot observed by polling matches the sequence.
    assert_eq!(harness.orchestrator.progress().state, TaskState::Idle);

    harness.orchestrator.stop().await.unwrap();
}

#[tokio::test]
async fn test_delete_failure_still_counts_under_both_policies() {
    for (policy, expected_count) in [
        (CountPolicy::AfterDelete, 1),
        (CountPolicy::AfterDownload, 1),
    ] {
        let harness = TestHarness::new(policy, ItemKind::FlightData);
        harness.list_entries(&["a.pud"]).await;
        harness
            .transport
            .set_delete_result(Err(TransportError::Status { code: 503 }))
            .await;

        let mut rx = harness.orchestrator.subscribe();
        harness.orchestrator.start().await.unwrap();
        harness.gate.set_allowed(true);

        let snapshots = collect_until(&mut rx, TaskState::Completed).await;
        assert_eq!(
            snapshots.last().unwrap().downloaded_count,
            expected_count,
            "policy {policy:?}"
        );

        harness.orchestrator.stop().await.unwrap();
    }
}

#[tokio::test]
async fn test_download_failure_counts_under_neither_policy() {
    for policy in [CountPolicy::AfterDelete, CountPolicy::AfterDownload] {
        let harness = TestHarness::new(policy, ItemKind::FlightData);
        harness.list_entries(&["a.pud"]).await;
        harness
            .transport
            .set_download_result(Err(TransportError::network("connection reset")))
            .await;

        let mut rx = harness.orchestrator.subscribe();
        harness.orchestrator.start().await.unwrap();
        harness.gate.set_allowed(true);

        let snapshots = collect_until(&mut rx, TaskState::Completed).await;
        assert_eq!(snapshots.last().unwrap().downloaded_count, 0, "policy {policy:?}");
        assert!(harness.storage.notified().is_empty());

        harness.orchestrator.stop().await.unwrap();
    }
}

#[tokio::test]
async fn test_crash_report_stages_both_renditions() {
    let harness = TestHarness::new(CountPolicy::AfterDelete, ItemKind::CrashReport);
    harness.list_entries(&["report.tar.gz"]).await;

    let mut rx = harness.orchestrator.subscribe();
    harness.orchestrator.start().await.unwrap();
    harness.gate.set_allowed(true);

    let snapshots = collect_until(&mut rx, TaskState::Completed).await;
    assert_eq!(snapshots.last().unwrap().downloaded_count, 1);

    let notified = harness.storage.notified();
    assert_eq!(notified.len(), 2);
    assert!(notified[0].to_string_lossy().ends_with("report.tar.gz"));
    assert!(notified[1].to_string_lossy().ends_with("report.tar.gz.anon"));

    harness.orchestrator.stop().await.unwrap();
}
