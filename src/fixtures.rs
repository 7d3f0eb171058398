//! Lectura de los archivos JSON que alimentan la CLI.
//!
//! El historial se acepta en tres formas: arreglo de eventos,
//! `{ "events": [...] }` o la respuesta paginada completa
//! `{ "history": { "events": [...] }, ... }`.
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use timeline_core::{DescribeWorkflowResponse, EventAttributes, HistoryEvent, WorkflowExecutionInfo};
use timeline_service::SearchResponse;

use crate::errors::CliError;

fn read_json(path: &Path) -> Result<Value, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_path_buf(),
                                                                       source })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json { path: path.to_path_buf(),
                                                                 source })
}

fn from_value<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, CliError> {
    serde_json::from_value(value).map_err(|source| CliError::Json { path: path.to_path_buf(),
                                                                    source })
}

pub fn load_history(path: &Path) -> Result<Vec<HistoryEvent>, CliError> {
    let mut value = read_json(path)?;
    if let Some(history) = value.get_mut("history").map(Value::take) {
        value = history;
    }
    if let Some(events) = value.get_mut("events").map(Value::take) {
        value = events;
    }
    if !value.is_array() {
        return Err(CliError::Fixture(format!("{}: expected a list of history events", path.display())));
    }
    from_value(path, value)
}

pub fn load_describe(path: &Path) -> Result<DescribeWorkflowResponse, CliError> {
    from_value(path, read_json(path)?)
}

/// Arreglo de ejecuciones o respuesta de búsqueda `{ "executions": [...] }`.
pub fn load_executions(path: &Path) -> Result<Vec<WorkflowExecutionInfo>, CliError> {
    let value = read_json(path)?;
    if value.is_array() {
        return from_value(path, value);
    }
    from_value::<SearchResponse>(path, value).map(|r| r.executions)
}

/// `workflowId` del evento de inicio del workflow raíz, si el log lo trae.
pub fn root_workflow_id(events: &[HistoryEvent]) -> Option<String> {
    events.iter().find_map(|e| match e.attributes.as_ref() {
                     Some(EventAttributes::WorkflowExecutionStarted(a)) if !a.workflow_id.is_empty() => {
                         Some(a.workflow_id.clone())
                     }
                     _ => None,
                 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn write_tmp(name: &str, value: &Value) -> PathBuf {
        let path = std::env::temp_dir().join(format!("temporal-timeline-{}-{name}", std::process::id()));
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn started() -> Value {
        json!({ "eventId": "1", "eventTime": "2024-03-01T12:00:00Z",
                "eventType": "EVENT_TYPE_WORKFLOW_EXECUTION_STARTED",
                "workflowExecutionStartedEventAttributes": { "workflowId": "wf1" } })
    }

    #[test]
    fn history_shapes_are_equivalent() {
        for (name, doc) in [("plain.json", json!([started()])),
                            ("events.json", json!({ "events": [started()] })),
                            ("page.json", json!({ "history": { "events": [started()] }, "nextPageToken": null }))]
        {
            let path = write_tmp(name, &doc);
            let events = load_history(&path).unwrap();
            assert_eq!(root_workflow_id(&events).as_deref(), Some("wf1"), "{name}");
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn bad_files_report_their_path() {
        let missing = load_history(Path::new("/nonexistent/history.json")).unwrap_err();
        assert!(matches!(missing, CliError::Io { .. }));

        let path = write_tmp("object.json", &json!({ "foo": 1 }));
        assert!(matches!(load_history(&path).unwrap_err(), CliError::Fixture(_)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn executions_accept_array_or_search_response() {
        let row = json!({ "execution": { "workflowId": "wf1", "runId": "r" },
                          "status": "WORKFLOW_EXECUTION_STATUS_RUNNING" });
        let a = write_tmp("rows.json", &json!([row.clone()]));
        let b = write_tmp("search.json", &json!({ "executions": [row] }));
        assert_eq!(load_executions(&a).unwrap(), load_executions(&b).unwrap());
        let _ = fs::remove_file(a);
        let _ = fs::remove_file(b);
    }
}
