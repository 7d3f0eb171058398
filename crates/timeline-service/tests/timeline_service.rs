use serde_json::{json, Value};
use timeline_core::{DescribeWorkflowResponse, HistoryEvent, Status, TimelineItem, WorkflowExecutionInfo};
use timeline_service::{ExecutionRef, InMemoryBackend, TimelineConfig, TimelineError, TimelineService};

fn running_log() -> Vec<HistoryEvent> {
    serde_json::from_value(json!([
        { "eventId": "1", "eventTime": "2024-03-01T12:00:00Z", "eventType": "EVENT_TYPE_WORKFLOW_EXECUTION_STARTED",
          "workflowExecutionStartedEventAttributes": { "workflowId": "wf1", "originalExecutionRunId": "run-1",
                                                       "workflowType": { "name": "OrderWorkflow" } } },
        { "eventId": "2", "eventTime": "2024-03-01T12:00:01Z", "eventType": "EVENT_TYPE_WORKFLOW_TASK_SCHEDULED",
          "workflowTaskScheduledEventAttributes": {} },
        { "eventId": "3", "eventTime": "2024-03-01T12:00:02Z", "eventType": "EVENT_TYPE_ACTIVITY_TASK_SCHEDULED",
          "activityTaskScheduledEventAttributes": { "activityId": "a1", "activityType": { "name": "Charge" } } },
        { "eventId": "4", "eventTime": "2024-03-01T12:00:03Z",
          "eventType": "EVENT_TYPE_START_CHILD_WORKFLOW_EXECUTION_INITIATED",
          "startChildWorkflowExecutionInitiatedEventAttributes": { "workflowId": "child-1",
                                                                   "workflowType": { "name": "Ship" } } },
        { "eventId": "5", "eventTime": "2024-03-01T12:00:04Z",
          "eventType": "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_STARTED",
          "childWorkflowExecutionStartedEventAttributes": {
              "initiatedEventId": "4",
              "workflowExecution": { "workflowId": "child-1", "runId": "c-run" } } }
    ])).unwrap()
}

fn root_describe(pending: Value) -> DescribeWorkflowResponse {
    serde_json::from_value(json!({
        "workflowExecutionInfo": {
            "execution": { "workflowId": "wf1", "runId": "run-1" },
            "status": "WORKFLOW_EXECUTION_STATUS_RUNNING",
            "startTime": "2024-03-01T12:00:00Z"
        },
        "pendingActivities": pending
    })).unwrap()
}

fn config(page_size: usize) -> TimelineConfig {
    TimelineConfig { history_page_size: page_size,
                     ..TimelineConfig::default() }
}

#[test]
fn history_is_fetched_across_pages_in_order() {
    let backend = InMemoryBackend::new().with_history("wf1", running_log());
    let service = TimelineService::new(backend, config(2));
    let events = service.fetch_history(&ExecutionRef::new("wf1", None)).unwrap();
    let ids: Vec<u64> = events.iter().map(|e| e.event_id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn too_many_pages_is_an_upstream_failure() {
    let backend = InMemoryBackend::new().with_history("wf1", running_log());
    let cfg = TimelineConfig { max_history_pages: 2,
                               ..config(1) };
    let err = TimelineService::new(backend, cfg).fetch_history(&ExecutionRef::new("wf1", None))
                                                .unwrap_err();
    assert!(matches!(err, TimelineError::Upstream(_)));
}

#[test]
fn open_records_are_reconciled_and_missing_child_is_skipped() {
    let backend = InMemoryBackend::new().with_history("wf1", running_log())
                                        .with_describe(root_describe(json!([{ "activityId": "a1", "attempt": 3 }])))
                                        .unwrap();
    let service = TimelineService::new(backend, config(2));
    let timeline = service.workflow_timeline("wf1", None).unwrap();

    assert_eq!(timeline.len(), 3);
    let root = timeline.root().unwrap();
    assert_eq!(root.status, Status::Running);
    assert_eq!(root.namespace.as_deref(), Some("default"));

    let act = timeline.items[1].as_activity().unwrap();
    assert_eq!(act.status, Status::Retrying);
    assert_eq!(act.attempts, Some(3));

    let TimelineItem::ChildWorkflow(child) = &timeline.items[2] else { panic!("child expected") };
    assert_eq!(child.status, Status::Running);
    assert_eq!(child.run_id.as_deref(), Some("c-run"));
}

#[test]
fn child_snapshot_is_applied_when_available() {
    let child: DescribeWorkflowResponse = serde_json::from_value(json!({
        "workflowExecutionInfo": {
            "execution": { "workflowId": "child-1", "runId": "c-run" },
            "status": "WORKFLOW_EXECUTION_STATUS_TERMINATED",
            "closeTime": "2024-03-01T12:10:00Z"
        }
    })).unwrap();
    let backend = InMemoryBackend::new().with_history("wf1", running_log())
                                        .with_describe(root_describe(json!([])))
                                        .unwrap()
                                        .with_describe(child)
                                        .unwrap();
    let timeline = TimelineService::new(backend, config(100)).workflow_timeline("wf1", None).unwrap();
    let child = timeline.items[2].as_workflow().unwrap();
    assert_eq!(child.status, Status::Terminated);
    assert!(child.end_time.is_some());
}

#[test]
fn missing_root_describe_propagates() {
    let backend = InMemoryBackend::new().with_history("wf1", running_log());
    let err = TimelineService::new(backend, config(100)).workflow_timeline("wf1", None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn reconcile_can_be_disabled() {
    let backend = InMemoryBackend::new().with_history("wf1", running_log());
    let cfg = TimelineConfig { reconcile: false,
                               ..config(100) };
    let timeline = TimelineService::new(backend, cfg).workflow_timeline("wf1", Some("run-x")).unwrap();
    assert_eq!(timeline.root().unwrap().run_id.as_deref(), Some("run-x"));
    assert_eq!(timeline.items[1].as_activity().unwrap().status, Status::Scheduled);
}

#[test]
fn unknown_workflow_and_rootless_log_are_not_found() {
    let service = TimelineService::new(InMemoryBackend::new(), config(100));
    assert!(service.workflow_timeline("nope", None).unwrap_err().is_not_found());

    let rootless: Vec<HistoryEvent> = running_log().into_iter().skip(1).collect();
    let backend = InMemoryBackend::new().with_history("wf1", rootless);
    let err = TimelineService::new(backend, config(100)).workflow_timeline("wf1", None).unwrap_err();
    assert!(matches!(err, TimelineError::Projection(_)));
    assert!(err.is_not_found());
}

#[test]
fn search_rows_carry_display_labels() {
    let rows: Vec<WorkflowExecutionInfo> = serde_json::from_value(json!([
        { "execution": { "workflowId": "wf1", "runId": "run-1" }, "type": { "name": "OrderWorkflow" },
          "status": "WORKFLOW_EXECUTION_STATUS_TIMED_OUT" },
        { "execution": { "workflowId": "wf2", "runId": "run-2" }, "type": { "name": "OrderWorkflow" },
          "status": "WORKFLOW_EXECUTION_STATUS_RUNNING" }
    ])).unwrap();
    let service = TimelineService::new(InMemoryBackend::new().with_executions(rows), config(100));
    let found = service.search_workflows(Some("Order")).unwrap();
    let labels: Vec<&str> = found.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(labels, vec!["TimedOut", "Running"]);
    assert!(service.search_workflows(Some("nothing")).unwrap().is_empty());
}
