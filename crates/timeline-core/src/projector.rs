//! Proyector del historial: pliega el log ordenado en el timeline.
//!
//! Un único recorrido de izquierda a derecha, sin reordenar ni mirar hacia
//! adelante. Estado del pliegue:
//! - el workflow raíz (creado por `WORKFLOW_EXECUTION_STARTED`);
//! - la secuencia de registros en orden de primer avistamiento;
//! - `scheduledEventId -> posición` para actividades;
//! - `initiatedEventId -> posición` para workflows hijos.
//!
//! Los eventos que correlacionan con un registro inexistente, los tipos
//! desconocidos y los bloques de atributos ausentes no modifican nada. Un
//! registro terminal ignora cualquier evento posterior.
use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use crate::decode::decode;
use crate::errors::ProjectionError;
use crate::event::{ActivityTaskClosedAttributes, ActivityTaskScheduledAttributes, ActivityTaskStartedAttributes,
                   ChildWorkflowAttributes, EventAttributes, EventId, HistoryEvent,
                   StartChildWorkflowExecutionInitiatedAttributes, WorkflowExecutionStartedAttributes};
use crate::status::Status;
use crate::timeline::{Activity, Timeline, TimelineItem, TimelineRecord, Workflow};

/// Resultado de la proyección: timeline más los índices de correlación
/// (posiciones dentro de `timeline.items`).
#[derive(Debug, Clone)]
pub struct Projection {
    pub timeline: Timeline,
    pub activities_by_scheduled_event_id: HashMap<EventId, usize>,
    pub children_by_initiated_event_id: HashMap<EventId, usize>,
}

impl Projection {
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn activity(&self, scheduled_event_id: EventId) -> Option<&Activity> {
        self.activities_by_scheduled_event_id
            .get(&scheduled_event_id)
            .and_then(|&i| self.timeline.items.get(i))
            .and_then(TimelineItem::as_activity)
    }

    pub fn child(&self, initiated_event_id: EventId) -> Option<&Workflow> {
        self.children_by_initiated_event_id
            .get(&initiated_event_id)
            .and_then(|&i| self.timeline.items.get(i))
            .and_then(TimelineItem::as_workflow)
    }
}

/// Opciones de la proyección. Ninguna es obligatoria.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    namespace: Option<String>,
    root_run_id: Option<String>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace transportado al workflow raíz.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Run id solicitado por el llamador; tiene prioridad sobre los run ids
    /// que trae el evento de inicio.
    pub fn root_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.root_run_id = Some(run_id.into());
        self
    }

    pub fn project(&self, events: &[HistoryEvent]) -> Result<Projection, ProjectionError> {
        let mut fold = Fold::new(self);
        for event in events {
            fold.apply(event);
        }
        fold.finish()
    }
}

/// Proyección con opciones por defecto.
pub fn project(events: &[HistoryEvent]) -> Result<Timeline, ProjectionError> {
    Projector::default().project(events).map(Projection::into_timeline)
}

struct Fold<'a> {
    options: &'a Projector,
    root: Option<Workflow>,
    items: Vec<TimelineItem>,
    by_scheduled: HashMap<EventId, usize>,
    by_initiated: HashMap<EventId, usize>,
}

impl<'a> Fold<'a> {
    fn new(options: &'a Projector) -> Self {
        Self { options,
               root: None,
               items: Vec::new(),
               by_scheduled: HashMap::new(),
               by_initiated: HashMap::new() }
    }

    fn apply(&mut self, ev: &HistoryEvent) {
        let Some(attrs) = ev.attributes.as_ref() else {
            debug!("skip event {} ({}): no attributes", ev.event_id, ev.event_type);
            return;
        };
        let closing = || Status::for_event_type(&attrs.event_type());
        use EventAttributes as A;
        match attrs {
            A::WorkflowExecutionStarted(a) => self.on_root_started(ev, a),
            A::WorkflowExecutionCompleted(a) => self.close_root(ev, closing(), decode(a.result.as_ref())),
            A::WorkflowExecutionFailed(a) => self.close_root(ev, closing(), snapshot(a)),
            A::WorkflowExecutionTerminated(a) => self.close_root(ev, closing(), snapshot(a)),
            A::WorkflowExecutionTimedOut(_) | A::WorkflowExecutionCanceled(_) => self.close_root(ev, closing(), None),
            A::WorkflowTaskScheduled(_) | A::WorkflowTaskStarted(_) | A::WorkflowTaskCompleted(_) => {}
            A::ActivityTaskScheduled(a) => self.on_activity_scheduled(ev, a),
            A::ActivityTaskStarted(a) => self.on_activity_started(ev, a),
            A::ActivityTaskCompleted(a) => {
                let result = decode(a.result.as_ref());
                self.close_activity(ev, a.scheduled_event_id, closing(), |act| act.result = result);
            }
            A::ActivityTaskFailed(a) | A::ActivityTaskTimedOut(a) => {
                self.close_activity_with_failure(ev, a, closing())
            }
            A::ActivityTaskCanceled(a) => self.close_activity(ev, a.scheduled_event_id, closing(), |_| {}),
            A::StartChildWorkflowExecutionInitiated(a) => self.on_child_initiated(ev, a),
            A::ChildWorkflowExecutionStarted(a) => self.on_child_started(ev, a),
            A::ChildWorkflowExecutionCompleted(a) => {
                self.close_child(ev, a, closing(), decode(a.result.as_ref()))
            }
            A::ChildWorkflowExecutionFailed(a)
            | A::ChildWorkflowExecutionTerminated(a)
            | A::StartChildWorkflowExecutionFailed(a) => self.close_child(ev, a, closing(), snapshot(a)),
            A::ChildWorkflowExecutionTimedOut(a) | A::ChildWorkflowExecutionCanceled(a) => {
                self.close_child(ev, a, closing(), None)
            }
        }
    }

    fn on_root_started(&mut self, ev: &HistoryEvent, a: &WorkflowExecutionStartedAttributes) {
        if self.root.is_some() {
            warn!("event {}: second workflow start in one log; ignored", ev.event_id);
            return;
        }
        let mut wf = Workflow::new(a.workflow_id.clone(), Status::Running, ev.event_time);
        wf.run_id = self.options
                        .root_run_id
                        .clone()
                        .or_else(|| a.original_execution_run_id.clone())
                        .or_else(|| a.first_execution_run_id.clone());
        wf.workflow_type = a.workflow_type.as_ref().map(|t| t.name.clone());
        wf.namespace = self.options.namespace.clone();
        wf.input = decode(a.input.as_ref());
        wf.attempts = a.attempt;
        wf.parent_workflow_id = a.parent_workflow_execution.as_ref().map(|p| p.workflow_id.clone());
        wf.parent_run_id = a.parent_workflow_execution.as_ref().map(|p| p.run_id.clone());
        wf.parent_workflow_namespace = a.parent_workflow_namespace.clone();
        wf.original_execution_run_id = a.original_execution_run_id.clone();
        wf.first_execution_run_id = a.first_execution_run_id.clone();
        wf.task_queue = a.task_queue.clone();
        wf.workflow_execution_timeout = a.workflow_execution_timeout.clone();
        wf.workflow_run_timeout = a.workflow_run_timeout.clone();
        wf.workflow_task_timeout = a.workflow_task_timeout.clone();
        wf.retry_policy = a.retry_policy.clone();
        wf.memo = a.memo.clone();
        wf.search_attributes = a.search_attributes.clone();
        wf.header = a.header.clone();
        wf.task_id = ev.task_id.clone();
        wf.record_event(ev.event_id);
        self.root = Some(wf);
    }

    fn close_root(&mut self, ev: &HistoryEvent, status: Status, result: Option<String>) {
        let Some(wf) = self.root.as_mut() else {
            debug!("event {} ({}): no root workflow yet; ignored", ev.event_id, ev.event_type);
            return;
        };
        if wf.is_terminal() {
            debug!("event {}: root already {}; ignored", ev.event_id, wf.status);
            return;
        }
        wf.end_time = Some(ev.event_time);
        wf.status = status;
        wf.record_event(ev.event_id);
        if result.is_some() {
            wf.result = result;
        }
    }

    fn on_activity_scheduled(&mut self, ev: &HistoryEvent, a: &ActivityTaskScheduledAttributes) {
        if self.by_scheduled.contains_key(&ev.event_id) {
            debug!("event {}: activity already scheduled; ignored", ev.event_id);
            return;
        }
        let mut act = Activity::new(a.activity_id.clone(), ev.event_time);
        act.activity_type = a.activity_type.as_ref().map(|t| t.name.clone());
        act.input = decode(a.input.as_ref());
        act.task_queue = a.task_queue.clone();
        act.schedule_to_close_timeout = a.schedule_to_close_timeout.clone();
        act.schedule_to_start_timeout = a.schedule_to_start_timeout.clone();
        act.start_to_close_timeout = a.start_to_close_timeout.clone();
        act.heartbeat_timeout = a.heartbeat_timeout.clone();
        act.retry_policy = a.retry_policy.clone();
        act.header = a.header.clone();
        act.workflow_task_completed_event_id = a.workflow_task_completed_event_id;
        act.task_id = ev.task_id.clone();
        act.record_event(ev.event_id);
        self.items.push(TimelineItem::Activity(act));
        self.by_scheduled.insert(ev.event_id, self.items.len() - 1);
    }

    fn open_activity(&mut self, ev: &HistoryEvent, scheduled_event_id: EventId) -> Option<&mut Activity> {
        let Some(&pos) = self.by_scheduled.get(&scheduled_event_id) else {
            debug!("event {} ({}): no activity scheduled at {scheduled_event_id}; ignored",
                   ev.event_id,
                   ev.event_type);
            return None;
        };
        let act = self.items.get_mut(pos).and_then(TimelineItem::as_activity_mut)?;
        if act.is_terminal() {
            debug!("event {}: activity {} already {}; ignored", ev.event_id, act.activity_id, act.status);
            return None;
        }
        Some(act)
    }

    fn on_activity_started(&mut self, ev: &HistoryEvent, a: &ActivityTaskStartedAttributes) {
        let Some(act) = self.open_activity(ev, a.scheduled_event_id) else { return };
        if act.status == Status::Scheduled {
            act.status = Status::Started;
        }
        act.start_time = Some(ev.event_time);
        act.record_event(ev.event_id);
        if a.attempt.is_some() {
            act.attempts = a.attempt;
        }
        if let Some(failure) = a.last_failure.as_ref() {
            act.last_failure = snapshot(failure);
        }
    }

    fn close_activity(&mut self,
                      ev: &HistoryEvent,
                      scheduled_event_id: EventId,
                      status: Status,
                      apply: impl FnOnce(&mut Activity)) {
        let Some(act) = self.open_activity(ev, scheduled_event_id) else { return };
        act.end_time = Some(ev.event_time);
        act.status = status;
        act.record_event(ev.event_id);
        apply(act);
    }

    fn close_activity_with_failure(&mut self, ev: &HistoryEvent, a: &ActivityTaskClosedAttributes, status: Status) {
        let failure = a.failure.as_ref().and_then(snapshot);
        self.close_activity(ev, a.scheduled_event_id, status, |act| {
                if failure.is_some() {
                    act.failure = failure;
                }
            });
    }

    fn on_child_initiated(&mut self, ev: &HistoryEvent, a: &StartChildWorkflowExecutionInitiatedAttributes) {
        let pos = match self.by_initiated.get(&ev.event_id) {
            Some(&pos) => pos,
            None => {
                let mut wf = Workflow::new(a.workflow_id.clone(), Status::Initiated, ev.event_time);
                wf.initiated_event_id = Some(ev.event_id);
                self.items.push(TimelineItem::ChildWorkflow(wf));
                let pos = self.items.len() - 1;
                self.by_initiated.insert(ev.event_id, pos);
                pos
            }
        };
        let Some(wf) = self.items.get_mut(pos).and_then(TimelineItem::as_workflow_mut) else { return };
        if wf.is_terminal() {
            debug!("event {}: child {} already {}; ignored", ev.event_id, wf.workflow_id, wf.status);
            return;
        }
        if wf.workflow_id.is_empty() {
            wf.workflow_id = a.workflow_id.clone();
        }
        if wf.workflow_type.is_none() {
            wf.workflow_type = a.workflow_type.as_ref().map(|t| t.name.clone());
        }
        if a.namespace.is_some() {
            wf.namespace = a.namespace.clone();
        }
        if wf.input.is_none() {
            wf.input = decode(a.input.as_ref());
        }
        wf.task_queue = a.task_queue.clone();
        wf.workflow_execution_timeout = a.workflow_execution_timeout.clone();
        wf.workflow_run_timeout = a.workflow_run_timeout.clone();
        wf.workflow_task_timeout = a.workflow_task_timeout.clone();
        wf.workflow_id_reuse_policy = a.workflow_id_reuse_policy.clone();
        wf.retry_policy = a.retry_policy.clone();
        wf.memo = a.memo.clone();
        wf.search_attributes = a.search_attributes.clone();
        wf.header = a.header.clone();
        wf.workflow_task_completed_event_id = a.workflow_task_completed_event_id;
        wf.task_id = ev.task_id.clone();
        wf.record_event(ev.event_id);
    }

    fn on_child_started(&mut self, ev: &HistoryEvent, a: &ChildWorkflowAttributes) {
        let key = a.initiated_event_id;
        let pos = match self.by_initiated.get(&key) {
            Some(&pos) => pos,
            None => {
                let workflow_id = a.workflow_execution.as_ref().map(|x| x.workflow_id.clone()).unwrap_or_default();
                let mut wf = Workflow::new(workflow_id, Status::Running, ev.event_time);
                wf.initiated_event_id = Some(key);
                wf.namespace = a.namespace.clone();
                self.items.push(TimelineItem::ChildWorkflow(wf));
                let pos = self.items.len() - 1;
                self.by_initiated.insert(key, pos);
                pos
            }
        };
        let Some(wf) = self.items.get_mut(pos).and_then(TimelineItem::as_workflow_mut) else { return };
        if wf.is_terminal() {
            debug!("event {}: child {} already {}; ignored", ev.event_id, wf.workflow_id, wf.status);
            return;
        }
        if wf.status == Status::Initiated {
            wf.status = Status::Running;
        }
        wf.start_time = ev.event_time;
        if let Some(exec) = a.workflow_execution.as_ref() {
            wf.run_id = Some(exec.run_id.clone());
        }
        if wf.workflow_type.is_none() {
            wf.workflow_type = a.workflow_type.as_ref().map(|t| t.name.clone());
        }
        wf.record_event(ev.event_id);
    }

    fn close_child(&mut self, ev: &HistoryEvent, a: &ChildWorkflowAttributes, status: Status, result: Option<String>) {
        let Some(&pos) = self.by_initiated.get(&a.initiated_event_id) else {
            debug!("event {} ({}): no child initiated at {}; ignored",
                   ev.event_id,
                   ev.event_type,
                   a.initiated_event_id);
            return;
        };
        let Some(wf) = self.items.get_mut(pos).and_then(TimelineItem::as_workflow_mut) else { return };
        if wf.is_terminal() {
            debug!("event {}: child {} already {}; ignored", ev.event_id, wf.workflow_id, wf.status);
            return;
        }
        wf.end_time = Some(ev.event_time);
        wf.status = status;
        wf.record_event(ev.event_id);
        if wf.run_id.is_none() {
            wf.run_id = a.workflow_execution.as_ref().map(|x| x.run_id.clone());
        }
        if result.is_some() {
            wf.result = result;
        }
    }

    /// Coloca el raíz en la posición 0 y completa el dueño de cada registro.
    fn finish(self) -> Result<Projection, ProjectionError> {
        let root = self.root.ok_or(ProjectionError::RootWorkflowNotFound)?;
        let mut items = Vec::with_capacity(self.items.len() + 1);
        for mut item in self.items {
            match &mut item {
                TimelineItem::Activity(act) => {
                    act.workflow_id = root.workflow_id.clone();
                    act.workflow_run_id = root.run_id.clone();
                }
                TimelineItem::ChildWorkflow(child) => {
                    child.parent_workflow_id = Some(root.workflow_id.clone());
                    child.parent_run_id = root.run_id.clone();
                }
                TimelineItem::Workflow(_) => {}
            }
            items.push(item);
        }
        items.insert(0, TimelineItem::Workflow(root));
        let shift = |m: HashMap<EventId, usize>| -> HashMap<EventId, usize> { m.into_iter().map(|(k, v)| (k, v + 1)).collect() };
        Ok(Projection { timeline: Timeline { items },
                        activities_by_scheduled_event_id: shift(self.by_scheduled),
                        children_by_initiated_event_id: shift(self.by_initiated) })
    }
}

/// Snapshot JSON de un bloque de atributos o de una falla.
fn snapshot<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    serde_json::to_string(value).map_err(|e| warn!("failed to serialize snapshot: {e}"))
                                .ok()
}
