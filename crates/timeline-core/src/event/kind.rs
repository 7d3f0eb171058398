//! Enumeración de tipos de evento conocidos.
//!
//! Cada tipo conoce su nombre en el wire (`EVENT_TYPE_*`) y la clave del
//! bloque de atributos que lo acompaña. Los nombres que la plataforma agregue
//! en el futuro se conservan en `EventType::Unknown`.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! event_types {
    ($( $variant:ident => $wire:literal, $attrs:literal; )+) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum EventType {
            $($variant,)+
            /// Tipo no reconocido; se guarda el nombre crudo.
            Unknown(String),
        }

        impl EventType {
            pub fn from_wire(name: &str) -> Self {
                match name {
                    $($wire => EventType::$variant,)+
                    other => EventType::Unknown(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(EventType::$variant => $wire,)+
                    EventType::Unknown(name) => name,
                }
            }

            /// Clave JSON del bloque de atributos (`<kind>EventAttributes`).
            pub fn attributes_key(&self) -> Option<&'static str> {
                match self {
                    $(EventType::$variant => Some($attrs),)+
                    EventType::Unknown(_) => None,
                }
            }
        }
    };
}

event_types! {
    WorkflowExecutionStarted => "EVENT_TYPE_WORKFLOW_EXECUTION_STARTED", "workflowExecutionStartedEventAttributes";
    WorkflowExecutionCompleted => "EVENT_TYPE_WORKFLOW_EXECUTION_COMPLETED", "workflowExecutionCompletedEventAttributes";
    WorkflowExecutionFailed => "EVENT_TYPE_WORKFLOW_EXECUTION_FAILED", "workflowExecutionFailedEventAttributes";
    WorkflowExecutionTimedOut => "EVENT_TYPE_WORKFLOW_EXECUTION_TIMED_OUT", "workflowExecutionTimedOutEventAttributes";
    WorkflowExecutionCanceled => "EVENT_TYPE_WORKFLOW_EXECUTION_CANCELED", "workflowExecutionCanceledEventAttributes";
    WorkflowExecutionTerminated => "EVENT_TYPE_WORKFLOW_EXECUTION_TERMINATED", "workflowExecutionTerminatedEventAttributes";
    WorkflowTaskScheduled => "EVENT_TYPE_WORKFLOW_TASK_SCHEDULED", "workflowTaskScheduledEventAttributes";
    WorkflowTaskStarted => "EVENT_TYPE_WORKFLOW_TASK_STARTED", "workflowTaskStartedEventAttributes";
    WorkflowTaskCompleted => "EVENT_TYPE_WORKFLOW_TASK_COMPLETED", "workflowTaskCompletedEventAttributes";
    ActivityTaskScheduled => "EVENT_TYPE_ACTIVITY_TASK_SCHEDULED", "activityTaskScheduledEventAttributes";
    ActivityTaskStarted => "EVENT_TYPE_ACTIVITY_TASK_STARTED", "activityTaskStartedEventAttributes";
    ActivityTaskCompleted => "EVENT_TYPE_ACTIVITY_TASK_COMPLETED", "activityTaskCompletedEventAttributes";
    ActivityTaskFailed => "EVENT_TYPE_ACTIVITY_TASK_FAILED", "activityTaskFailedEventAttributes";
    ActivityTaskTimedOut => "EVENT_TYPE_ACTIVITY_TASK_TIMED_OUT", "activityTaskTimedOutEventAttributes";
    ActivityTaskCanceled => "EVENT_TYPE_ACTIVITY_TASK_CANCELED", "activityTaskCanceledEventAttributes";
    StartChildWorkflowExecutionInitiated => "EVENT_TYPE_START_CHILD_WORKFLOW_EXECUTION_INITIATED", "startChildWorkflowExecutionInitiatedEventAttributes";
    StartChildWorkflowExecutionFailed => "EVENT_TYPE_START_CHILD_WORKFLOW_EXECUTION_FAILED", "startChildWorkflowExecutionFailedEventAttributes";
    ChildWorkflowExecutionStarted => "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_STARTED", "childWorkflowExecutionStartedEventAttributes";
    ChildWorkflowExecutionCompleted => "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_COMPLETED", "childWorkflowExecutionCompletedEventAttributes";
    ChildWorkflowExecutionFailed => "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_FAILED", "childWorkflowExecutionFailedEventAttributes";
    ChildWorkflowExecutionTimedOut => "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_TIMED_OUT", "childWorkflowExecutionTimedOutEventAttributes";
    ChildWorkflowExecutionCanceled => "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_CANCELED", "childWorkflowExecutionCanceledEventAttributes";
    ChildWorkflowExecutionTerminated => "EVENT_TYPE_CHILD_WORKFLOW_EXECUTION_TERMINATED", "childWorkflowExecutionTerminatedEventAttributes";
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EventType::from_wire(&raw))
    }
}
