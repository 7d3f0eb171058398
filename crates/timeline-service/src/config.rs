//! Carga de configuración desde variables de entorno.
//! El valor resultante se pasa explícitamente a `TimelineService`; el core no
//! necesita configuración.

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::TimelineError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_MAX_PAGES: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineConfig {
    /// Namespace de la plataforma donde viven las ejecuciones.
    pub namespace: String,
    /// Tamaño de página pedido al backend de historial.
    pub history_page_size: usize,
    /// Tope de páginas por historial; superarlo es una falla upstream.
    pub max_history_pages: usize,
    /// Si es falso se devuelve el timeline proyectado sin consultar el poll.
    pub reconcile: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { namespace: DEFAULT_NAMESPACE.to_string(),
               history_page_size: DEFAULT_PAGE_SIZE,
               max_history_pages: DEFAULT_MAX_PAGES,
               reconcile: true }
    }
}

impl TimelineConfig {
    /// `TIMELINE_NAMESPACE`, `TIMELINE_PAGE_SIZE`, `TIMELINE_MAX_PAGES`,
    /// `TIMELINE_RECONCILE`. Las ausentes toman el valor por defecto.
    pub fn from_env() -> Result<Self, TimelineError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectada.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TimelineError> {
        let defaults = Self::default();
        let namespace = lookup("TIMELINE_NAMESPACE").filter(|v| !v.trim().is_empty())
                                                    .unwrap_or(defaults.namespace);
        let history_page_size = parse_var(&lookup, "TIMELINE_PAGE_SIZE")?.unwrap_or(defaults.history_page_size);
        let max_history_pages = parse_var(&lookup, "TIMELINE_MAX_PAGES")?.unwrap_or(defaults.max_history_pages);
        let reconcile = match lookup("TIMELINE_RECONCILE") {
            None => defaults.reconcile,
            Some(v) => parse_flag(&v).ok_or_else(|| {
                                         TimelineError::Config(format!("TIMELINE_RECONCILE: expected a boolean, got {v:?}"))
                                     })?,
        };
        if history_page_size == 0 || max_history_pages == 0 {
            return Err(TimelineError::Config("page size and max pages must be positive".into()));
        }
        Ok(Self { namespace,
                  history_page_size,
                  max_history_pages,
                  reconcile })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, TimelineError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim()
                        .parse::<T>()
                        .map(Some)
                        .map_err(|_| TimelineError::Config(format!("{key}: invalid value {raw:?}"))),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = TimelineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, TimelineConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = TimelineConfig::from_lookup(lookup(&[("TIMELINE_NAMESPACE", "prod"),
                                                        ("TIMELINE_PAGE_SIZE", "25"),
                                                        ("TIMELINE_MAX_PAGES", "4"),
                                                        ("TIMELINE_RECONCILE", "off")])).unwrap();
        assert_eq!(cfg.namespace, "prod");
        assert_eq!(cfg.history_page_size, 25);
        assert_eq!(cfg.max_history_pages, 4);
        assert!(!cfg.reconcile);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = TimelineConfig::from_lookup(lookup(&[("TIMELINE_PAGE_SIZE", "many")])).unwrap_err();
        assert!(matches!(err, TimelineError::Config(_)));
        let err = TimelineConfig::from_lookup(lookup(&[("TIMELINE_RECONCILE", "maybe")])).unwrap_err();
        assert!(matches!(err, TimelineError::Config(_)));
        let err = TimelineConfig::from_lookup(lookup(&[("TIMELINE_MAX_PAGES", "0")])).unwrap_err();
        assert!(matches!(err, TimelineError::Config(_)));
    }
}
