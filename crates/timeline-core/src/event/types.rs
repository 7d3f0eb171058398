//! Estructura `HistoryEvent` y su decodificación desde el wire.
//!
//! Rol en el flujo:
//! - El log de ejecución llega como lista ordenada por `eventId`.
//! - Cada entrada trae `eventType` y, a lo sumo, un bloque de atributos
//!   poblado cuyo nombre depende del tipo. Sólo se lee ese bloque; el resto
//!   de las claves se descarta.
//! - Un bloque ausente o mal formado deja `attributes = None`: el proyector
//!   salta el evento en lugar de abortar.
use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{EventAttributes, EventId, EventType};

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "WireEvent")]
pub struct HistoryEvent {
    pub event_id: EventId,
    pub event_time: DateTime<Utc>,
    pub event_type: EventType,
    pub task_id: Option<String>,
    pub attributes: Option<EventAttributes>,
}

impl HistoryEvent {
    /// Construye un evento a partir del bloque de atributos; el tipo se
    /// deriva de la variante.
    pub fn new(event_id: impl Into<EventId>, event_time: DateTime<Utc>, attributes: EventAttributes) -> Self {
        Self { event_id: event_id.into(),
               event_time,
               event_type: attributes.event_type(),
               task_id: None,
               attributes: Some(attributes) }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    event_id: EventId,
    event_time: DateTime<Utc>,
    event_type: EventType,
    #[serde(default)]
    task_id: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<WireEvent> for HistoryEvent {
    fn from(mut wire: WireEvent) -> Self {
        let block = wire.event_type
                        .attributes_key()
                        .and_then(|key| wire.rest.remove(key))
                        .filter(|v| !v.is_null());
        let attributes = match block {
            Some(block) => match EventAttributes::from_block(&wire.event_type, block) {
                Ok(attrs) => attrs,
                Err(e) => {
                    warn!("event {} ({}): unreadable attributes: {e}", wire.event_id, wire.event_type);
                    None
                }
            },
            None => None,
        };
        let task_id = wire.task_id.map(|v| match v {
                                      Value::String(s) => s,
                                      other => other.to_string(),
                                  });
        HistoryEvent { event_id: wire.event_id,
                       event_time: wire.event_time,
                       event_type: wire.event_type,
                       task_id,
                       attributes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_only_the_block_matching_the_type() {
        let ev: HistoryEvent = serde_json::from_value(json!({
            "eventId": "5",
            "eventTime": "2024-05-01T10:00:00Z",
            "eventType": "EVENT_TYPE_ACTIVITY_TASK_STARTED",
            "taskId": "1048600",
            "activityTaskStartedEventAttributes": { "scheduledEventId": "4", "attempt": 1 },
            "activityTaskCompletedEventAttributes": { "scheduledEventId": "99" }
        })).unwrap();
        assert_eq!(ev.event_id, EventId(5));
        assert_eq!(ev.task_id.as_deref(), Some("1048600"));
        match ev.attributes {
            Some(EventAttributes::ActivityTaskStarted(a)) => assert_eq!(a.scheduled_event_id, EventId(4)),
            other => panic!("unexpected attributes: {other:?}"),
        }
    }

    #[test]
    fn missing_or_broken_block_leaves_attributes_empty() {
        let missing: HistoryEvent = serde_json::from_value(json!({
            "eventId": "2",
            "eventTime": "2024-05-01T10:00:00Z",
            "eventType": "EVENT_TYPE_ACTIVITY_TASK_COMPLETED"
        })).unwrap();
        assert!(missing.attributes.is_none());

        let broken: HistoryEvent = serde_json::from_value(json!({
            "eventId": "3",
            "eventTime": "2024-05-01T10:00:00Z",
            "eventType": "EVENT_TYPE_ACTIVITY_TASK_COMPLETED",
            "activityTaskCompletedEventAttributes": { "scheduledEventId": "not-a-number" }
        })).unwrap();
        assert!(broken.attributes.is_none());
    }

    #[test]
    fn unknown_type_is_kept_without_attributes() {
        let ev: HistoryEvent = serde_json::from_value(json!({
            "eventId": "9",
            "eventTime": "2024-05-01T10:00:00Z",
            "eventType": "EVENT_TYPE_MARKER_RECORDED",
            "markerRecordedEventAttributes": { "markerName": "Version" }
        })).unwrap();
        assert_eq!(ev.event_type, EventType::Unknown("EVENT_TYPE_MARKER_RECORDED".into()));
        assert!(ev.attributes.is_none());
    }
}
