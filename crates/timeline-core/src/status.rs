//! Taxonomía canónica de estados y sus tablas de normalización.
//!
//! Dos tablas estáticas alimentan el mismo vocabulario:
//! - tipo de evento → estado (`for_event_type`);
//! - estado de ejecución del poll en vivo → estado (`for_execution_status`).
//!
//! Las entradas no mapeadas pasan sin cambios como `Status::Other` y se
//! registran con `warn!`; nunca abortan la proyección.
//!
//! Transiciones usadas por el proyector:
//! - Workflow: `Initiated` -> `Running` -> terminal
//! - Actividad: `Scheduled` -> `Started` -> terminal
//! - El reconciliador puede promover `Scheduled` a `Pending` y cualquier
//!   actividad con reintentos a `Retrying`.
use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event::EventType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Running,
    Completed,
    Failed,
    TimedOut,
    Canceled,
    Terminated,
    Scheduled,
    Started,
    Pending,
    Retrying,
    Initiated,
    /// Valor fuera de la taxonomía, transportado tal cual.
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Running => "RUNNING",
            Status::Completed => "COMPLETED",
            Status::Failed => "FAILED",
            Status::TimedOut => "TIMED_OUT",
            Status::Canceled => "CANCELED",
            Status::Terminated => "TERMINATED",
            Status::Scheduled => "SCHEDULED",
            Status::Started => "STARTED",
            Status::Pending => "PENDING",
            Status::Retrying => "RETRYING",
            Status::Initiated => "INITIATED",
            Status::Other(raw) => raw,
        }
    }

    /// Inverso de `as_str`; lo desconocido queda en `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "RUNNING" => Status::Running,
            "COMPLETED" => Status::Completed,
            "FAILED" => Status::Failed,
            "TIMED_OUT" => Status::TimedOut,
            "CANCELED" => Status::Canceled,
            "TERMINATED" => Status::Terminated,
            "SCHEDULED" => Status::Scheduled,
            "STARTED" => Status::Started,
            "PENDING" => Status::Pending,
            "RETRYING" => Status::Retrying,
            "INITIATED" => Status::Initiated,
            other => Status::Other(other.to_string()),
        }
    }

    /// Un registro terminal no vuelve a abrirse.
    pub fn is_terminal(&self) -> bool {
        matches!(self,
                 Status::Completed | Status::Failed | Status::TimedOut | Status::Canceled | Status::Terminated)
    }

    /// Estado canónico para un tipo de evento.
    pub fn for_event_type(event_type: &EventType) -> Status {
        use EventType as T;
        match event_type {
            T::WorkflowExecutionStarted | T::ChildWorkflowExecutionStarted | T::ActivityTaskStarted => Status::Running,
            T::WorkflowExecutionCompleted | T::ChildWorkflowExecutionCompleted | T::ActivityTaskCompleted => {
                Status::Completed
            }
            T::WorkflowExecutionFailed
            | T::ChildWorkflowExecutionFailed
            | T::ActivityTaskFailed
            | T::StartChildWorkflowExecutionFailed => Status::Failed,
            T::WorkflowExecutionTimedOut | T::ChildWorkflowExecutionTimedOut | T::ActivityTaskTimedOut => {
                Status::TimedOut
            }
            T::WorkflowExecutionCanceled | T::ChildWorkflowExecutionCanceled | T::ActivityTaskCanceled => {
                Status::Canceled
            }
            T::WorkflowExecutionTerminated | T::ChildWorkflowExecutionTerminated => Status::Terminated,
            T::ActivityTaskScheduled => Status::Scheduled,
            other => {
                warn!("no canonical status for event type {other}; passing through");
                Status::Other(other.as_str().to_string())
            }
        }
    }

    /// Estado canónico para el vocabulario `WORKFLOW_EXECUTION_STATUS_*` del
    /// poll en vivo.
    pub fn for_execution_status(raw: &str) -> Status {
        match raw {
            "WORKFLOW_EXECUTION_STATUS_RUNNING" => Status::Running,
            "WORKFLOW_EXECUTION_STATUS_COMPLETED" => Status::Completed,
            "WORKFLOW_EXECUTION_STATUS_FAILED" => Status::Failed,
            "WORKFLOW_EXECUTION_STATUS_TIMED_OUT" => Status::TimedOut,
            "WORKFLOW_EXECUTION_STATUS_CANCELED" => Status::Canceled,
            "WORKFLOW_EXECUTION_STATUS_TERMINATED" => Status::Terminated,
            other => {
                warn!("no canonical status for execution status {other:?}; passing through");
                Status::Other(other.to_string())
            }
        }
    }

    /// Etiqueta para listados: `TIMED_OUT` -> `TimedOut`.
    pub fn display_name(&self) -> String {
        pascal_case(self.as_str())
    }
}

/// `SOME_RAW_VALUE` -> `SomeRawValue`.
pub fn pascal_case(raw: &str) -> String {
    raw.to_lowercase()
       .split('_')
       .map(|word| {
           let mut chars = word.chars();
           match chars.next() {
               Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
               None => String::new(),
           }
       })
       .collect()
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Status::parse(&raw))
    }
}
