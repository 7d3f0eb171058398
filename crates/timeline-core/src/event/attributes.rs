//! Bloques de atributos por tipo de evento.
//!
//! Sólo se modelan los campos que el proyector lee o transporta al timeline.
//! Los bloques de falla/terminación conservan además todo campo desconocido
//! (`other`) porque el timeline expone un snapshot serializado del bloque
//! completo.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EventId, EventType, Payloads};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueue {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default)]
    pub run_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionStartedAttributes {
    pub workflow_id: String,
    pub workflow_type: Option<TypeName>,
    pub task_queue: Option<TaskQueue>,
    pub input: Option<Payloads>,
    pub workflow_execution_timeout: Option<String>,
    pub workflow_run_timeout: Option<String>,
    pub workflow_task_timeout: Option<String>,
    pub original_execution_run_id: Option<String>,
    pub first_execution_run_id: Option<String>,
    pub identity: Option<String>,
    pub attempt: Option<u32>,
    pub parent_workflow_namespace: Option<String>,
    pub parent_workflow_execution: Option<WorkflowExecution>,
    pub retry_policy: Option<Value>,
    pub header: Option<Value>,
    pub memo: Option<Value>,
    pub search_attributes: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionCompletedAttributes {
    pub result: Option<Payloads>,
    pub workflow_task_completed_event_id: Option<EventId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionFailedAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_task_completed_event_id: Option<EventId>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionTimedOutAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_state: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionCanceledAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Payloads>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_task_completed_event_id: Option<EventId>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowExecutionTerminatedAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Payloads>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Bloques de workflow task: se parsean pero no alteran el timeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowTaskAttributes {
    pub scheduled_event_id: Option<EventId>,
    pub started_event_id: Option<EventId>,
    pub task_queue: Option<TaskQueue>,
    pub identity: Option<String>,
    pub attempt: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskScheduledAttributes {
    pub activity_id: String,
    #[serde(default)]
    pub activity_type: Option<TypeName>,
    #[serde(default)]
    pub task_queue: Option<TaskQueue>,
    #[serde(default)]
    pub header: Option<Value>,
    #[serde(default)]
    pub input: Option<Payloads>,
    #[serde(default)]
    pub schedule_to_close_timeout: Option<String>,
    #[serde(default)]
    pub schedule_to_start_timeout: Option<String>,
    #[serde(default)]
    pub start_to_close_timeout: Option<String>,
    #[serde(default)]
    pub heartbeat_timeout: Option<String>,
    #[serde(default)]
    pub workflow_task_completed_event_id: Option<EventId>,
    #[serde(default)]
    pub retry_policy: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskStartedAttributes {
    pub scheduled_event_id: EventId,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub attempt: Option<u32>,
    #[serde(default)]
    pub last_failure: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskCompletedAttributes {
    pub scheduled_event_id: EventId,
    #[serde(default)]
    pub started_event_id: Option<EventId>,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub result: Option<Payloads>,
}

/// Compartido por failed / timed-out / canceled de actividad.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskClosedAttributes {
    pub scheduled_event_id: EventId,
    #[serde(default)]
    pub started_event_id: Option<EventId>,
    #[serde(default)]
    pub failure: Option<Value>,
    #[serde(default)]
    pub retry_state: Option<String>,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub details: Option<Payloads>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartChildWorkflowExecutionInitiatedAttributes {
    pub workflow_id: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub workflow_type: Option<TypeName>,
    #[serde(default)]
    pub task_queue: Option<TaskQueue>,
    #[serde(default)]
    pub input: Option<Payloads>,
    #[serde(default)]
    pub workflow_execution_timeout: Option<String>,
    #[serde(default)]
    pub workflow_run_timeout: Option<String>,
    #[serde(default)]
    pub workflow_task_timeout: Option<String>,
    #[serde(default)]
    pub workflow_id_reuse_policy: Option<String>,
    #[serde(default)]
    pub retry_policy: Option<Value>,
    #[serde(default)]
    pub header: Option<Value>,
    #[serde(default)]
    pub memo: Option<Value>,
    #[serde(default)]
    pub search_attributes: Option<Value>,
    #[serde(default)]
    pub workflow_task_completed_event_id: Option<EventId>,
}

/// Eventos de hijo correlacionados por `initiatedEventId` (started, completed,
/// failed, timed-out, canceled, terminated y start-failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildWorkflowAttributes {
    pub initiated_event_id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution: Option<WorkflowExecution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<TypeName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Payloads>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_state: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Bloque de atributos poblado; la variante queda fijada por `eventType`.
#[derive(Debug, Clone)]
pub enum EventAttributes {
    WorkflowExecutionStarted(WorkflowExecutionStartedAttributes),
    WorkflowExecutionCompleted(WorkflowExecutionCompletedAttributes),
    WorkflowExecutionFailed(WorkflowExecutionFailedAttributes),
    WorkflowExecutionTimedOut(WorkflowExecutionTimedOutAttributes),
    WorkflowExecutionCanceled(WorkflowExecutionCanceledAttributes),
    WorkflowExecutionTerminated(WorkflowExecutionTerminatedAttributes),
    WorkflowTaskScheduled(WorkflowTaskAttributes),
    WorkflowTaskStarted(WorkflowTaskAttributes),
    WorkflowTaskCompleted(WorkflowTaskAttributes),
    ActivityTaskScheduled(ActivityTaskScheduledAttributes),
    ActivityTaskStarted(ActivityTaskStartedAttributes),
    ActivityTaskCompleted(ActivityTaskCompletedAttributes),
    ActivityTaskFailed(ActivityTaskClosedAttributes),
    ActivityTaskTimedOut(ActivityTaskClosedAttributes),
    ActivityTaskCanceled(ActivityTaskClosedAttributes),
    StartChildWorkflowExecutionInitiated(StartChildWorkflowExecutionInitiatedAttributes),
    StartChildWorkflowExecutionFailed(ChildWorkflowAttributes),
    ChildWorkflowExecutionStarted(ChildWorkflowAttributes),
    ChildWorkflowExecutionCompleted(ChildWorkflowAttributes),
    ChildWorkflowExecutionFailed(ChildWorkflowAttributes),
    ChildWorkflowExecutionTimedOut(ChildWorkflowAttributes),
    ChildWorkflowExecutionCanceled(ChildWorkflowAttributes),
    ChildWorkflowExecutionTerminated(ChildWorkflowAttributes),
}

impl EventAttributes {
    /// Tipo de evento implicado por la variante.
    pub fn event_type(&self) -> EventType {
        use EventAttributes as A;
        match self {
            A::WorkflowExecutionStarted(_) => EventType::WorkflowExecutionStarted,
            A::WorkflowExecutionCompleted(_) => EventType::WorkflowExecutionCompleted,
            A::WorkflowExecutionFailed(_) => EventType::WorkflowExecutionFailed,
            A::WorkflowExecutionTimedOut(_) => EventType::WorkflowExecutionTimedOut,
            A::WorkflowExecutionCanceled(_) => EventType::WorkflowExecutionCanceled,
            A::WorkflowExecutionTerminated(_) => EventType::WorkflowExecutionTerminated,
            A::WorkflowTaskScheduled(_) => EventType::WorkflowTaskScheduled,
            A::WorkflowTaskStarted(_) => EventType::WorkflowTaskStarted,
            A::WorkflowTaskCompleted(_) => EventType::WorkflowTaskCompleted,
            A::ActivityTaskScheduled(_) => EventType::ActivityTaskScheduled,
            A::ActivityTaskStarted(_) => EventType::ActivityTaskStarted,
            A::ActivityTaskCompleted(_) => EventType::ActivityTaskCompleted,
            A::ActivityTaskFailed(_) => EventType::ActivityTaskFailed,
            A::ActivityTaskTimedOut(_) => EventType::ActivityTaskTimedOut,
            A::ActivityTaskCanceled(_) => EventType::ActivityTaskCanceled,
            A::StartChildWorkflowExecutionInitiated(_) => EventType::StartChildWorkflowExecutionInitiated,
            A::StartChildWorkflowExecutionFailed(_) => EventType::StartChildWorkflowExecutionFailed,
            A::ChildWorkflowExecutionStarted(_) => EventType::ChildWorkflowExecutionStarted,
            A::ChildWorkflowExecutionCompleted(_) => EventType::ChildWorkflowExecutionCompleted,
            A::ChildWorkflowExecutionFailed(_) => EventType::ChildWorkflowExecutionFailed,
            A::ChildWorkflowExecutionTimedOut(_) => EventType::ChildWorkflowExecutionTimedOut,
            A::ChildWorkflowExecutionCanceled(_) => EventType::ChildWorkflowExecutionCanceled,
            A::ChildWorkflowExecutionTerminated(_) => EventType::ChildWorkflowExecutionTerminated,
        }
    }

    /// Deserializa el bloque crudo según el tipo. `Ok(None)` para tipos
    /// desconocidos.
    pub fn from_block(event_type: &EventType, block: Value) -> Result<Option<Self>, serde_json::Error> {
        use serde_json::from_value as de;
        use EventAttributes as A;
        let attrs = match event_type {
            EventType::WorkflowExecutionStarted => A::WorkflowExecutionStarted(de(block)?),
            EventType::WorkflowExecutionCompleted => A::WorkflowExecutionCompleted(de(block)?),
            EventType::WorkflowExecutionFailed => A::WorkflowExecutionFailed(de(block)?),
            EventType::WorkflowExecutionTimedOut => A::WorkflowExecutionTimedOut(de(block)?),
            EventType::WorkflowExecutionCanceled => A::WorkflowExecutionCanceled(de(block)?),
            EventType::WorkflowExecutionTerminated => A::WorkflowExecutionTerminated(de(block)?),
            EventType::WorkflowTaskScheduled => A::WorkflowTaskScheduled(de(block)?),
            EventType::WorkflowTaskStarted => A::WorkflowTaskStarted(de(block)?),
            EventType::WorkflowTaskCompleted => A::WorkflowTaskCompleted(de(block)?),
            EventType::ActivityTaskScheduled => A::ActivityTaskScheduled(de(block)?),
            EventType::ActivityTaskStarted => A::ActivityTaskStarted(de(block)?),
            EventType::ActivityTaskCompleted => A::ActivityTaskCompleted(de(block)?),
            EventType::ActivityTaskFailed => A::ActivityTaskFailed(de(block)?),
            EventType::ActivityTaskTimedOut => A::ActivityTaskTimedOut(de(block)?),
            EventType::ActivityTaskCanceled => A::ActivityTaskCanceled(de(block)?),
            EventType::StartChildWorkflowExecutionInitiated => A::StartChildWorkflowExecutionInitiated(de(block)?),
            EventType::StartChildWorkflowExecutionFailed => A::StartChildWorkflowExecutionFailed(de(block)?),
            EventType::ChildWorkflowExecutionStarted => A::ChildWorkflowExecutionStarted(de(block)?),
            EventType::ChildWorkflowExecutionCompleted => A::ChildWorkflowExecutionCompleted(de(block)?),
            EventType::ChildWorkflowExecutionFailed => A::ChildWorkflowExecutionFailed(de(block)?),
            EventType::ChildWorkflowExecutionTimedOut => A::ChildWorkflowExecutionTimedOut(de(block)?),
            EventType::ChildWorkflowExecutionCanceled => A::ChildWorkflowExecutionCanceled(de(block)?),
            EventType::ChildWorkflowExecutionTerminated => A::ChildWorkflowExecutionTerminated(de(block)?),
            EventType::Unknown(_) => return Ok(None),
        };
        Ok(Some(attrs))
    }
}
