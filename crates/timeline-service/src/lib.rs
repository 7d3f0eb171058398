//! timeline-service: lado llamador del proyector.
//!
//! Pagina el historial a través de un `WorkflowBackend`, proyecta con
//! `timeline-core` y reconcilia los workflows abiertos contra el poll en vivo.
pub mod backend;
pub mod config;
pub mod error;
pub mod service;

pub use backend::{ExecutionRef, HistoryPage, InMemoryBackend, SearchResponse, WorkflowBackend};
pub use config::TimelineConfig;
pub use error::TimelineError;
pub use service::TimelineService;
