//! Forma wire de los payloads: metadata opcional y bytes en base64.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Payload {
    pub fn with_data(data: impl Into<String>) -> Self {
        Self { metadata: None, data: Some(data.into()) }
    }
}

/// Contenedor `{ "payloads": [...] }` usado por input/result/details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payloads {
    #[serde(default)]
    pub payloads: Vec<Payload>,
}
