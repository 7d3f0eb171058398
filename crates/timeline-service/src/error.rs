//! Errores en el borde del sistema.
//! Los dos tipos que reportan los colaboradores externos (no encontrado /
//! falla upstream) más la condición fatal del proyector y la configuración.

use thiserror::Error;
use timeline_core::ProjectionError;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl TimelineError {
    /// Verdadero cuando la ejecución solicitada no existe o su log no tiene
    /// workflow raíz.
    pub fn is_not_found(&self) -> bool {
        matches!(self,
                 TimelineError::NotFound(_) | TimelineError::Projection(ProjectionError::RootWorkflowNotFound))
    }
}
