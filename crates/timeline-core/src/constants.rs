//! Constantes del proyector.
//!
//! `PROJECTOR_VERSION` participa en el fingerprint del timeline: un cambio
//! en las reglas de proyección debe cambiar el fingerprint aunque el log de
//! eventos sea el mismo.

/// Versión lógica de las reglas de proyección. Subir cuando cambie la forma
/// o la semántica del timeline emitido.
pub const PROJECTOR_VERSION: &str = "P1.0";

/// Texto emitido por el decodificador cuando un payload no trae bytes.
pub const NULL_PAYLOAD: &str = "null";
