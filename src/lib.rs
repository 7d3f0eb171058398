//! temporal-timeline: driver de línea de comandos sobre fixtures JSON.
//!
//! - `cli` parsea los argumentos.
//! - `fixtures` lee historial, describes y filas de búsqueda.
//! - `run` arma un `InMemoryBackend` con esos archivos y delega en
//!   `TimelineService`.

pub mod cli;
pub mod errors;
pub mod fixtures;

use log::info;
use timeline_core::ProjectionError;
use timeline_service::{InMemoryBackend, TimelineConfig, TimelineService};

use crate::cli::{Command, ProjectArgs, SearchArgs};
use crate::errors::CliError;

/// Ejecuta el comando y devuelve el JSON (pretty) a imprimir.
pub fn run(command: &Command, config: TimelineConfig) -> Result<String, CliError> {
    match command {
        Command::Project(args) => run_project(args, config),
        Command::Search(args) => run_search(args, config),
    }
}

fn run_project(args: &ProjectArgs, mut config: TimelineConfig) -> Result<String, CliError> {
    let events = fixtures::load_history(&args.history)?;
    let workflow_id = fixtures::root_workflow_id(&events).ok_or(ProjectionError::RootWorkflowNotFound)
                                                         .map_err(|e| CliError::Timeline(e.into()))?;
    let mut backend = InMemoryBackend::new().with_history(workflow_id.clone(), events);
    for path in &args.describes {
        backend = backend.with_describe(fixtures::load_describe(path)?)?;
    }
    if let Some(ns) = args.namespace.as_deref() {
        config = config.with_namespace(ns);
    }
    config.reconcile = config.reconcile && args.reconcile;
    info!("projecting {workflow_id} (namespace={}, reconcile={})", config.namespace, config.reconcile);

    let service = TimelineService::new(backend, config);
    let timeline = service.workflow_timeline(&workflow_id, args.run_id.as_deref())?;
    info!("timeline {workflow_id}: {} records, fingerprint {}", timeline.len(), timeline.fingerprint());
    Ok(serde_json::to_string_pretty(&timeline)?)
}

fn run_search(args: &SearchArgs, config: TimelineConfig) -> Result<String, CliError> {
    let backend = InMemoryBackend::new().with_executions(fixtures::load_executions(&args.executions)?);
    let rows = TimelineService::new(backend, config).search_workflows(args.query.as_deref())?;
    Ok(serde_json::to_string_pretty(&rows)?)
}
