use std::path::PathBuf;

use thiserror::Error;
use timeline_service::TimelineError;

/// Errores de la CLI. Cada variante define su código de salida.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Fixture(String),
    #[error("cannot render output: {0}")]
    Output(#[from] serde_json::Error),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

impl CliError {
    /// 2 uso, 4 no encontrado, 5 cualquier otro error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Timeline(e) if e.is_not_found() => 4,
            _ => 5,
        }
    }
}
