//! Registros del timeline: workflows (raíz o hijo) y actividades.
//!
//! El timeline es una secuencia en orden de primer avistamiento, no un
//! ordenamiento por tiempo. Workflow y actividad no se referencian entre sí:
//! la relación padre/hijo se expresa con ids (`workflow_id`,
//! `parent_workflow_id`) y la correlación con el log vive en los índices del
//! proyector.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::PROJECTOR_VERSION;
use crate::event::{EventId, TaskQueue};
use crate::hashing::hash_value;
use crate::status::Status;

/// Capacidad común de todo registro del timeline: estado y eventos que lo
/// mutaron.
pub trait TimelineRecord {
    fn status(&self) -> &Status;
    fn set_status(&mut self, status: Status);
    fn record_event(&mut self, event_id: EventId);

    fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub workflow_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<String>,
    pub status: Status,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_workflow_namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    pub related_event_ids: Vec<EventId>,
    /// Sólo hijos: evento `START_CHILD_WORKFLOW_EXECUTION_INITIATED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiated_event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_execution_run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_execution_run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_queue: Option<TaskQueue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_execution_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_run_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_task_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id_reuse_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_attributes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_task_completed_event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl Workflow {
    /// Registro mínimo; el proyector completa el resto de los campos.
    pub fn new(workflow_id: impl Into<String>, status: Status, start_time: DateTime<Utc>) -> Self {
        Self { workflow_id: workflow_id.into(),
               run_id: None,
               workflow_type: None,
               status,
               start_time,
               end_time: None,
               namespace: None,
               parent_workflow_id: None,
               parent_run_id: None,
               parent_workflow_namespace: None,
               input: None,
               result: None,
               attempts: None,
               related_event_ids: Vec::new(),
               initiated_event_id: None,
               original_execution_run_id: None,
               first_execution_run_id: None,
               task_queue: None,
               workflow_execution_timeout: None,
               workflow_run_timeout: None,
               workflow_task_timeout: None,
               workflow_id_reuse_policy: None,
               retry_policy: None,
               memo: None,
               search_attributes: None,
               header: None,
               workflow_task_completed_event_id: None,
               task_id: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Workflow dueño (el raíz del log proyectado).
    pub workflow_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_run_id: Option<String>,
    pub status: Status,
    pub schedule_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_started_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_complete_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_worker_identity: Option<String>,
    pub related_event_ids: Vec<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_queue: Option<TaskQueue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_to_close_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_to_start_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_to_close_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_task_completed_event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl Activity {
    pub fn new(activity_id: impl Into<String>, schedule_time: DateTime<Utc>) -> Self {
        Self { activity_id: activity_id.into(),
               activity_type: None,
               workflow_id: String::new(),
               workflow_run_id: None,
               status: Status::Scheduled,
               schedule_time,
               start_time: None,
               end_time: None,
               input: None,
               result: None,
               failure: None,
               last_failure: None,
               attempts: None,
               last_started_time: None,
               last_attempt_complete_time: None,
               last_worker_identity: None,
               related_event_ids: Vec::new(),
               task_queue: None,
               schedule_to_close_timeout: None,
               schedule_to_start_timeout: None,
               start_to_close_timeout: None,
               heartbeat_timeout: None,
               retry_policy: None,
               header: None,
               workflow_task_completed_event_id: None,
               task_id: None }
    }
}

macro_rules! impl_timeline_record {
    ($ty:ty) => {
        impl TimelineRecord for $ty {
            fn status(&self) -> &Status {
                &self.status
            }
            fn set_status(&mut self, status: Status) {
                self.status = status;
            }
            fn record_event(&mut self, event_id: EventId) {
                if !self.related_event_ids.contains(&event_id) {
                    self.related_event_ids.push(event_id);
                }
            }
        }
    };
}

impl_timeline_record!(Workflow);
impl_timeline_record!(Activity);

/// Elemento del timeline, etiquetado por `type` en JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimelineItem {
    #[serde(rename = "workflow")]
    Workflow(Workflow),
    #[serde(rename = "childWorkflow")]
    ChildWorkflow(Workflow),
    #[serde(rename = "activity")]
    Activity(Activity),
}

impl TimelineItem {
    pub fn record(&self) -> &dyn TimelineRecord {
        match self {
            TimelineItem::Workflow(w) | TimelineItem::ChildWorkflow(w) => w,
            TimelineItem::Activity(a) => a,
        }
    }

    pub fn status(&self) -> &Status {
        self.record().status()
    }

    pub fn as_workflow(&self) -> Option<&Workflow> {
        match self {
            TimelineItem::Workflow(w) | TimelineItem::ChildWorkflow(w) => Some(w),
            TimelineItem::Activity(_) => None,
        }
    }

    pub fn as_workflow_mut(&mut self) -> Option<&mut Workflow> {
        match self {
            TimelineItem::Workflow(w) | TimelineItem::ChildWorkflow(w) => Some(w),
            TimelineItem::Activity(_) => None,
        }
    }

    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            TimelineItem::Activity(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_activity_mut(&mut self) -> Option<&mut Activity> {
        match self {
            TimelineItem::Activity(a) => Some(a),
            _ => None,
        }
    }
}

/// Timeline proyectado. Invariante: `items[0]` es el workflow raíz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    pub items: Vec<TimelineItem>,
}

impl Timeline {
    pub fn root(&self) -> Option<&Workflow> {
        self.items.first().and_then(TimelineItem::as_workflow)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineItem> {
        self.items.iter()
    }

    /// Posiciones de workflows (raíz o hijos) que siguen abiertos.
    pub fn open_workflow_positions(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.as_workflow().is_some() && !item.status().is_terminal())
            .map(|(i, _)| i)
            .collect()
    }

    /// Fingerprint determinista del timeline (blake3 sobre JSON canónico).
    pub fn fingerprint(&self) -> String {
        let items = serde_json::to_value(&self.items).unwrap_or(Value::Null);
        hash_value(&json!({
            "projector_version": PROJECTOR_VERSION,
            "items": items,
        }))
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineItem;
    type IntoIter = std::slice::Iter<'a, TimelineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn open_positions_skip_activities_and_closed_workflows() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut closed_child = Workflow::new("c1", Status::Completed, t0);
        closed_child.record_event(EventId(4));
        closed_child.record_event(EventId(4));
        let tl = Timeline { items: vec![TimelineItem::Workflow(Workflow::new("wf1", Status::Running, t0)),
                                        TimelineItem::Activity(Activity::new("a1", t0)),
                                        TimelineItem::ChildWorkflow(closed_child),
                                        TimelineItem::ChildWorkflow(Workflow::new("c2", Status::Initiated, t0))] };
        assert_eq!(tl.items[1].status(), &Status::Scheduled);
        assert_eq!(tl.items[2].status(), &Status::Completed);
        assert_eq!(tl.items[2].as_workflow().unwrap().related_event_ids, vec![EventId(4)]);
        assert_eq!(tl.open_workflow_positions(), vec![0, 3]);
    }
}
