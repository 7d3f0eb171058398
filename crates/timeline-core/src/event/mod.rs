//! Modelo de eventos del log de ejecución.

mod attributes;
mod id;
mod kind;
mod payload;
mod types;

pub use attributes::*;
pub use id::EventId;
pub use kind::EventType;
pub use payload::{Payload, Payloads};
pub use types::HistoryEvent;
