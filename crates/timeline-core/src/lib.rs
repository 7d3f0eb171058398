//! timeline-core: proyección determinista del historial de ejecución.
//!
//! Convierte el log append-only de una ejecución de workflow en un timeline
//! plano de workflows y actividades con estado normalizado, y superpone sobre
//! él los datos del poll en vivo. Sin I/O ni estado compartido: cada llamada
//! es un pliegue puro sobre su entrada.
pub mod constants;
pub mod decode;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod poll;
pub mod projector;
pub mod reconcile;
pub mod status;
pub mod timeline;

pub use decode::{decode, decode_payloads};
pub use errors::ProjectionError;
pub use event::{EventAttributes, EventId, EventType, HistoryEvent, Payload, Payloads};
pub use poll::{DescribeWorkflowResponse, PendingActivityInfo, WorkflowExecutionInfo};
pub use projector::{project, Projection, Projector};
pub use reconcile::{reconcile, ReconcileReport};
pub use status::Status;
pub use timeline::{Activity, Timeline, TimelineItem, TimelineRecord, Workflow};
