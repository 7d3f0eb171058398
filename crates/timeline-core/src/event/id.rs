//! `EventId`: clave de orden y de correlación dentro del log de una
//! ejecución.
//!
//! En el wire llega como string decimal (`"42"`); algunos clientes lo emiten
//! como número JSON. Se aceptan ambas formas y se serializa siempre como
//! string.
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u64);

impl From<u64> for EventId {
    fn from(v: u64) -> Self {
        EventId(v)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct EventIdVisitor;

impl<'de> Visitor<'de> for EventIdVisitor {
    type Value = EventId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal event id as string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<EventId, E> {
        Ok(EventId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<EventId, E> {
        u64::try_from(v).map(EventId)
                        .map_err(|_| E::custom(format!("negative event id: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EventId, E> {
        v.trim()
         .parse::<u64>()
         .map(EventId)
         .map_err(|_| E::custom(format!("invalid event id: {v:?}")))
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EventIdVisitor)
    }
}
