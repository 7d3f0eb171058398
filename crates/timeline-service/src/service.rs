//! Flujo del llamador: traer el log completo, proyectarlo y superponer el
//! poll en vivo sobre cada workflow que siga abierto.
use log::{debug, warn};
use timeline_core::status::pascal_case;
use timeline_core::{reconcile, HistoryEvent, Projector, Status, Timeline, TimelineItem, WorkflowExecutionInfo};

use crate::backend::{ExecutionRef, WorkflowBackend};
use crate::config::TimelineConfig;
use crate::error::TimelineError;

const EXECUTION_STATUS_PREFIX: &str = "WORKFLOW_EXECUTION_STATUS_";

pub struct TimelineService<B: WorkflowBackend> {
    backend: B,
    config: TimelineConfig,
}

impl<B: WorkflowBackend> TimelineService<B> {
    pub fn new(backend: B, config: TimelineConfig) -> Self {
        Self { backend, config }
    }

    /// Sigue `nextPageToken` hasta agotarlo y concatena las páginas en orden.
    pub fn fetch_history(&self, execution: &ExecutionRef) -> Result<Vec<HistoryEvent>, TimelineError> {
        let mut events = Vec::new();
        let mut token: Option<String> = None;
        for page_no in 0..self.config.max_history_pages {
            let page = self.backend.history_page(&self.config.namespace,
                                                 execution,
                                                 self.config.history_page_size,
                                                 token.as_deref())?;
            debug!("fetched page {page_no} of {} ({} events)",
                   execution.workflow_id,
                   page.history.events.len());
            let next = page.continuation().map(str::to_string);
            events.extend(page.history.events);
            match next {
                Some(t) => token = Some(t),
                None => return Ok(events),
            }
        }
        Err(TimelineError::Upstream(format!("history of {} exceeds {} pages",
                                            execution.workflow_id, self.config.max_history_pages)))
    }

    /// Timeline de una ejecución, reconciliado con el poll si la
    /// configuración lo habilita.
    pub fn workflow_timeline(&self, workflow_id: &str, run_id: Option<&str>) -> Result<Timeline, TimelineError> {
        let execution = ExecutionRef::new(workflow_id, run_id);
        let events = self.fetch_history(&execution)?;

        let mut projector = Projector::new().namespace(self.config.namespace.clone());
        if let Some(run) = execution.run_id.as_deref() {
            projector = projector.root_run_id(run);
        }
        let mut timeline = projector.project(&events)?.into_timeline();
        debug!("projected {} records for {workflow_id} from {} events", timeline.len(), events.len());

        if self.config.reconcile {
            self.reconcile_open(&mut timeline)?;
        }
        Ok(timeline)
    }

    fn reconcile_open(&self, timeline: &mut Timeline) -> Result<(), TimelineError> {
        for position in timeline.open_workflow_positions() {
            let Some(wf) = timeline.items[position].as_workflow() else { continue };
            let is_root = matches!(timeline.items[position], TimelineItem::Workflow(_));
            let (workflow_id, run_id) = (wf.workflow_id.clone(), wf.run_id.clone());

            let snapshot = match self.backend.describe(&self.config.namespace, &workflow_id, run_id.as_deref()) {
                Ok(snapshot) => snapshot,
                Err(e) if !is_root && e.is_not_found() => {
                    warn!("child workflow {workflow_id} not found in live poll; left as projected");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let report = reconcile(timeline, position, &snapshot);
            debug!("reconciled {workflow_id}: workflow_patched={} activities_patched={}",
                   report.workflow_patched, report.activities_patched);
        }
        Ok(())
    }

    /// Ejecuciones que cumplen `query`, con el estado en su etiqueta de
    /// listado (`WORKFLOW_EXECUTION_STATUS_TIMED_OUT` -> `TimedOut`).
    pub fn search_workflows(&self, query: Option<&str>) -> Result<Vec<WorkflowExecutionInfo>, TimelineError> {
        let response = self.backend.search(&self.config.namespace, query)?;
        Ok(response.executions
                   .into_iter()
                   .map(|mut info| {
                       info.status = status_label(&info.status);
                       info
                   })
                   .collect())
    }
}

fn status_label(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match Status::for_execution_status(raw) {
        Status::Other(other) => pascal_case(other.trim_start_matches(EXECUTION_STATUS_PREFIX)),
        known => known.display_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_for_search_rows() {
        assert_eq!(status_label("WORKFLOW_EXECUTION_STATUS_RUNNING"), "Running");
        assert_eq!(status_label("WORKFLOW_EXECUTION_STATUS_TIMED_OUT"), "TimedOut");
        assert_eq!(status_label("WORKFLOW_EXECUTION_STATUS_CONTINUED_AS_NEW"), "ContinuedAsNew");
        assert_eq!(status_label(""), "");
    }
}
