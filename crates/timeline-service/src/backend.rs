//! Colaboradores externos: historial paginado, describe en vivo y búsqueda.
//!
//! `WorkflowBackend` es la costura hacia la plataforma; `InMemoryBackend`
//! sirve fixtures cargados en memoria (tests y CLI).
use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use timeline_core::{DescribeWorkflowResponse, HistoryEvent, WorkflowExecutionInfo};

use crate::error::TimelineError;

/// Ejecución solicitada: `workflowId` más un `runId` opcional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRef {
    pub workflow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl ExecutionRef {
    pub fn new(workflow_id: impl Into<String>, run_id: Option<&str>) -> Self {
        Self { workflow_id: workflow_id.into(),
               run_id: run_id.filter(|r| !r.is_empty()).map(str::to_string) }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct History {
    pub events: Vec<HistoryEvent>,
}

/// Una página del historial, con la forma de la respuesta de la plataforma.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryPage {
    pub history: History,
    pub next_page_token: Option<String>,
}

impl HistoryPage {
    /// Token de continuación utilizable (ausente o vacío cierra la paginación).
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResponse {
    pub executions: Vec<WorkflowExecutionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Acceso a la plataforma de workflows.
pub trait WorkflowBackend {
    /// Una página del historial de `execution`, empezando en `page_token`.
    fn history_page(&self,
                    namespace: &str,
                    execution: &ExecutionRef,
                    page_size: usize,
                    page_token: Option<&str>)
                    -> Result<HistoryPage, TimelineError>;
    /// Snapshot en vivo de una ejecución.
    fn describe(&self, namespace: &str, workflow_id: &str, run_id: Option<&str>)
                -> Result<DescribeWorkflowResponse, TimelineError>;
    /// Listado de ejecuciones filtrado por `query`.
    fn search(&self, namespace: &str, query: Option<&str>) -> Result<SearchResponse, TimelineError>;
}

/// Backend en memoria. Los historiales y describes se indexan por
/// `workflowId`; el `runId` sólo se valida si el fixture lo conoce.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    pub histories: HashMap<String, Vec<HistoryEvent>>,
    pub describes: HashMap<String, DescribeWorkflowResponse>,
    pub executions: Vec<WorkflowExecutionInfo>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, workflow_id: impl Into<String>, events: Vec<HistoryEvent>) -> Self {
        self.histories.insert(workflow_id.into(), events);
        self
    }

    /// Registra un describe bajo el `workflowId` de su `workflowExecutionInfo`.
    pub fn with_describe(mut self, snapshot: DescribeWorkflowResponse) -> Result<Self, TimelineError> {
        let workflow_id = snapshot.workflow_execution_info
                                  .execution
                                  .as_ref()
                                  .map(|e| e.workflow_id.clone())
                                  .filter(|id| !id.is_empty())
                                  .ok_or_else(|| {
                                      TimelineError::Config("describe snapshot without workflowExecutionInfo.execution"
                                                                .into())
                                  })?;
        self.describes.insert(workflow_id, snapshot);
        Ok(self)
    }

    pub fn with_executions(mut self, executions: Vec<WorkflowExecutionInfo>) -> Self {
        self.executions = executions;
        self
    }
}

fn matches_query(info: &WorkflowExecutionInfo, query: &str) -> bool {
    let id = info.execution.as_ref().map(|e| e.workflow_id.as_str()).unwrap_or_default();
    let kind = info.workflow_type.as_ref().map(|t| t.name.as_str()).unwrap_or_default();
    id.contains(query) || kind.contains(query)
}

impl WorkflowBackend for InMemoryBackend {
    fn history_page(&self,
                    _namespace: &str,
                    execution: &ExecutionRef,
                    page_size: usize,
                    page_token: Option<&str>)
                    -> Result<HistoryPage, TimelineError> {
        let events = self.histories
                         .get(&execution.workflow_id)
                         .ok_or_else(|| TimelineError::NotFound(format!("workflow {}", execution.workflow_id)))?;
        let offset = match page_token {
            None => 0,
            Some(t) => t.parse::<usize>()
                        .map_err(|_| TimelineError::Upstream(format!("invalid page token {t:?}")))?,
        };
        if offset > events.len() {
            return Err(TimelineError::Upstream(format!("page token {offset} past end of history")));
        }
        let end = events.len().min(offset + page_size.max(1));
        debug!("history page {}[{offset}..{end}] of {}", execution.workflow_id, events.len());
        let next_page_token = (end < events.len()).then(|| end.to_string());
        Ok(HistoryPage { history: History { events: events[offset..end].to_vec() },
                         next_page_token })
    }

    fn describe(&self, _namespace: &str, workflow_id: &str, run_id: Option<&str>)
                -> Result<DescribeWorkflowResponse, TimelineError> {
        let snapshot = self.describes
                           .get(workflow_id)
                           .ok_or_else(|| TimelineError::NotFound(format!("workflow {workflow_id}")))?;
        let known_run = snapshot.workflow_execution_info
                                .execution
                                .as_ref()
                                .map(|e| e.run_id.as_str())
                                .filter(|r| !r.is_empty());
        if let (Some(asked), Some(known)) = (run_id, known_run) {
            if asked != known {
                return Err(TimelineError::NotFound(format!("workflow {workflow_id} run {asked}")));
            }
        }
        Ok(snapshot.clone())
    }

    fn search(&self, _namespace: &str, query: Option<&str>) -> Result<SearchResponse, TimelineError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let executions = self.executions
                             .iter()
                             .filter(|info| query.map_or(true, |q| matches_query(info, q)))
                             .cloned()
                             .collect();
        Ok(SearchResponse { executions,
                            next_page_token: None })
    }
}
