//! Errores específicos del core.
//!
//! El proyector es total sobre logs bien tipados: la única condición fatal es
//! la ausencia del workflow raíz.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ProjectionError {
    #[error("root workflow not found")] RootWorkflowNotFound,
}
