use std::fs;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use temporal_timeline::cli::{parse_args, Command};
use temporal_timeline::errors::CliError;
use temporal_timeline::run;
use timeline_service::TimelineConfig;

fn write_fixture(name: &str, value: &Value) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("temporal-timeline-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn history() -> Value {
    json!({
        "history": { "events": [
            { "eventId": "1", "eventTime": "2024-03-01T12:00:00Z",
              "eventType": "EVENT_TYPE_WORKFLOW_EXECUTION_STARTED",
              "workflowExecutionStartedEventAttributes": {
                  "workflowId": "order-7", "originalExecutionRunId": "run-7",
                  "input": { "payloads": [ { "data": STANDARD.encode("{\"id\":7}") } ] } } },
            { "eventId": "2", "eventTime": "2024-03-01T12:00:01Z",
              "eventType": "EVENT_TYPE_ACTIVITY_TASK_SCHEDULED",
              "activityTaskScheduledEventAttributes": { "activityId": "charge", "activityType": { "name": "Charge" } } }
        ] },
        "nextPageToken": ""
    })
}

fn describe() -> Value {
    json!({
        "workflowExecutionInfo": {
            "execution": { "workflowId": "order-7", "runId": "run-7" },
            "status": "WORKFLOW_EXECUTION_STATUS_RUNNING"
        },
        "pendingActivities": [ { "activityId": "charge", "attempt": 1, "lastWorkerIdentity": "w@host" } ]
    })
}

fn command(args: &[&str]) -> Command {
    parse_args(args.iter().copied()).unwrap()
}

#[test]
fn project_prints_reconciled_timeline() {
    let h = write_fixture("history.json", &history());
    let d = write_fixture("describe.json", &describe());
    let cmd = command(&["project", "--history", h.to_str().unwrap(), "--describe", d.to_str().unwrap()]);

    let out: Value = serde_json::from_str(&run(&cmd, TimelineConfig::default()).unwrap()).unwrap();
    assert_eq!(out[0]["type"], "workflow");
    assert_eq!(out[0]["workflowId"], "order-7");
    assert_eq!(out[0]["input"], "{\"id\":7}");
    assert_eq!(out[0]["namespace"], "default");
    assert_eq!(out[1]["type"], "activity");
    assert_eq!(out[1]["status"], "PENDING");
    assert_eq!(out[1]["lastWorkerIdentity"], "w@host");
}

#[test]
fn project_without_reconcile_keeps_scheduled() {
    let h = write_fixture("history-noreconcile.json", &history());
    let cmd = command(&["project", "--history", h.to_str().unwrap(), "--no-reconcile", "--namespace", "prod"]);
    let out: Value = serde_json::from_str(&run(&cmd, TimelineConfig::default()).unwrap()).unwrap();
    assert_eq!(out[0]["namespace"], "prod");
    assert_eq!(out[1]["status"], "SCHEDULED");
}

#[test]
fn missing_root_describe_exits_not_found() {
    let h = write_fixture("history-nodescribe.json", &history());
    let cmd = command(&["project", "--history", h.to_str().unwrap()]);
    let err = run(&cmd, TimelineConfig::default()).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn rootless_history_exits_not_found() {
    let h = write_fixture("rootless.json", &json!([]));
    let err = run(&command(&["project", "--history", h.to_str().unwrap()]), TimelineConfig::default()).unwrap_err();
    assert!(matches!(err, CliError::Timeline(_)));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn search_renders_display_labels() {
    let rows = write_fixture("rows.json",
                             &json!({ "executions": [
                                 { "execution": { "workflowId": "order-7", "runId": "run-7" },
                                   "type": { "name": "OrderWorkflow" },
                                   "status": "WORKFLOW_EXECUTION_STATUS_CANCELED" }
                             ] }));
    let cmd = command(&["search", "--executions", rows.to_str().unwrap(), "--query", "order"]);
    let out: Value = serde_json::from_str(&run(&cmd, TimelineConfig::default()).unwrap()).unwrap();
    assert_eq!(out, json!([{ "execution": { "workflowId": "order-7", "runId": "run-7" },
                             "type": { "name": "OrderWorkflow" },
                             "status": "Canceled" }]));
}
