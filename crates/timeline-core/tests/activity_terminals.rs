use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use timeline_core::{project, EventId, HistoryEvent, Projector, Status, Workflow};

fn event(id: u64, kind: &str, block: &str, attrs: Value) -> Value {
    json!({ "eventId": id.to_string(), "eventTime": format!("2024-03-01T12:00:{id:02}Z"),
            "eventType": kind, block: attrs })
}

fn root() -> Value {
    event(1,
          "EVENT_TYPE_WORKFLOW_EXECUTION_STARTED",
          "workflowExecutionStartedEventAttributes",
          json!({ "workflowId": "wf1", "originalExecutionRunId": "run-1" }))
}

fn scheduled(id: u64) -> Value {
    event(id,
          "EVENT_TYPE_ACTIVITY_TASK_SCHEDULED",
          "activityTaskScheduledEventAttributes",
          json!({ "activityId": "a1", "activityType": { "name": "Charge" } }))
}

fn started(id: u64, scheduled: u64, attrs: Value) -> Value {
    let mut block = json!({ "scheduledEventId": scheduled.to_string() });
    if let (Some(obj), Value::Object(more)) = (block.as_object_mut(), attrs) {
        obj.extend(more);
    }
    event(id, "EVENT_TYPE_ACTIVITY_TASK_STARTED", "activityTaskStartedEventAttributes", block)
}

fn closed(id: u64, kind: &str, block: &str, failure: Option<Value>) -> Value {
    let mut attrs = json!({ "scheduledEventId": "2", "startedEventId": "3" });
    if let (Some(obj), Some(f)) = (attrs.as_object_mut(), failure) {
        obj.insert("failure".into(), f);
    }
    event(id, kind, block, attrs)
}

fn events(values: Vec<Value>) -> Vec<HistoryEvent> {
    serde_json::from_value(Value::Array(values)).unwrap()
}

fn time(id: u64) -> DateTime<Utc> {
    format!("2024-03-01T12:00:{id:02}Z").parse().unwrap()
}

fn parsed(raw: Option<&str>) -> Value {
    serde_json::from_str(raw.expect("snapshot expected")).unwrap()
}

/// scheduled(2), started(3), terminal(4), started(5) tardío.
fn close_with(kind: &str, block: &str, failure: Option<Value>) -> timeline_core::Projection {
    let log = events(vec![root(),
                          scheduled(2),
                          started(3, 2, json!({ "attempt": 1 })),
                          closed(4, kind, block, failure),
                          started(5, 2, json!({ "attempt": 2 }))]);
    Projector::new().project(&log).unwrap()
}

#[test]
fn failed_activity_keeps_failure_snapshot() {
    let p = close_with("EVENT_TYPE_ACTIVITY_TASK_FAILED",
                       "activityTaskFailedEventAttributes",
                       Some(json!({ "message": "boom" })));
    let act = p.activity(EventId(2)).unwrap();
    assert_eq!(act.status, Status::Failed);
    assert_eq!(parsed(act.failure.as_deref()), json!({ "message": "boom" }));
    assert_eq!(act.end_time, Some(time(4)));
    assert_eq!(act.related_event_ids, vec![EventId(2), EventId(3), EventId(4)]);
    assert_eq!(act.attempts, Some(1));
}

#[test]
fn timed_out_activity_keeps_failure_snapshot() {
    let p = close_with("EVENT_TYPE_ACTIVITY_TASK_TIMED_OUT",
                       "activityTaskTimedOutEventAttributes",
                       Some(json!({ "message": "to" })));
    let act = p.activity(EventId(2)).unwrap();
    assert_eq!(act.status, Status::TimedOut);
    assert_eq!(parsed(act.failure.as_deref()), json!({ "message": "to" }));
    assert_eq!(act.end_time, Some(time(4)));
    assert_eq!(act.related_event_ids, vec![EventId(2), EventId(3), EventId(4)]);
}

#[test]
fn canceled_activity_is_terminal_without_failure() {
    let p = close_with("EVENT_TYPE_ACTIVITY_TASK_CANCELED", "activityTaskCanceledEventAttributes", None);
    let act = p.activity(EventId(2)).unwrap();
    assert_eq!(act.status, Status::Canceled);
    assert!(act.failure.is_none());
    assert_eq!(act.end_time, Some(time(4)));
    assert_eq!(act.related_event_ids, vec![EventId(2), EventId(3), EventId(4)]);
    assert_eq!(act.start_time, Some(time(3)));
}

#[test]
fn repeated_started_keeps_status_and_refreshes_attempt_data() {
    let log = events(vec![root(),
                          scheduled(2),
                          started(3, 2, json!({ "attempt": 1 })),
                          started(4, 2, json!({ "attempt": 2, "lastFailure": { "message": "prev" } }))]);
    let p = Projector::new().project(&log).unwrap();
    let act = p.activity(EventId(2)).unwrap();
    assert_eq!(act.status, Status::Started);
    assert_eq!(act.attempts, Some(2));
    assert_eq!(parsed(act.last_failure.as_deref()), json!({ "message": "prev" }));
    assert_eq!(act.start_time, Some(time(4)));
    assert_eq!(act.related_event_ids, vec![EventId(2), EventId(3), EventId(4)]);
    assert!(act.end_time.is_none());
}

fn root_after(kind: &str, block: &str, attrs: Value) -> Workflow {
    let late = event(3,
                     "EVENT_TYPE_WORKFLOW_EXECUTION_COMPLETED",
                     "workflowExecutionCompletedEventAttributes",
                     json!({}));
    let tl = project(&events(vec![root(), event(2, kind, block, attrs), late])).unwrap();
    tl.root().unwrap().clone()
}

#[test]
fn terminated_root_keeps_attribute_snapshot() {
    let wf = root_after("EVENT_TYPE_WORKFLOW_EXECUTION_TERMINATED",
                        "workflowExecutionTerminatedEventAttributes",
                        json!({ "reason": "ops", "identity": "me" }));
    assert_eq!(wf.status, Status::Terminated);
    assert_eq!(parsed(wf.result.as_deref()), json!({ "reason": "ops", "identity": "me" }));
    assert_eq!(wf.end_time, Some(time(2)));
    assert_eq!(wf.related_event_ids, vec![EventId(1), EventId(2)]);
}

#[test]
fn timed_out_and_canceled_root_set_only_status_and_end_time() {
    for (kind, block, status) in [("EVENT_TYPE_WORKFLOW_EXECUTION_TIMED_OUT",
                                   "workflowExecutionTimedOutEventAttributes",
                                   Status::TimedOut),
                                  ("EVENT_TYPE_WORKFLOW_EXECUTION_CANCELED",
                                   "workflowExecutionCanceledEventAttributes",
                                   Status::Canceled)]
    {
        let wf = root_after(kind, block, json!({ "retryState": "RETRY_STATE_TIMEOUT" }));
        assert_eq!(wf.status, status, "{kind}");
        assert!(wf.result.is_none(), "{kind}");
        assert_eq!(wf.end_time, Some(time(2)), "{kind}");
        assert_eq!(wf.related_event_ids, vec![EventId(1), EventId(2)], "{kind}");
    }
}
