//! Forma del poll en vivo (describe de una ejecución).
//!
//! Sólo los campos que consume el reconciliador o el listado de búsqueda.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{TypeName, WorkflowExecution};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<WorkflowExecution>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<TypeName>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_execution: Option<WorkflowExecution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_execution: Option<WorkflowExecution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_queue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_attributes: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PendingActivityInfo {
    pub activity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<TypeName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub attempt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_started_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_complete_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_worker_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<Value>,
}

/// Respuesta del describe: info de ejecución más actividades pendientes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DescribeWorkflowResponse {
    pub workflow_execution_info: WorkflowExecutionInfo,
    pub pending_activities: Vec<PendingActivityInfo>,
    pub pending_children: Vec<Value>,
}
