//! Cache-invalidation keys derived from the current backend's state
//!
//! The host engine uses these keys as opaque delete/upsert scopes when
//! previously-ingested rows must be invalidated; this crate does not
//! interpret them further.

use serde_json::{Map, Value};
use tfsight_state::BackendRegistry;

use crate::error::{RowError, RowResult};

/// `{"lineage": ...}` key for the current backend's state
///
/// Lineage changes only when state history is discarded, so this scopes the
/// broadest invalidation.
pub fn lineage_key(registry: &BackendRegistry) -> RowResult<Map<String, Value>> {
    let state = registry
        .current()
        .ok_or(RowError::NoCurrentBackend)?
        .state();

    let mut key = Map::new();
    key.insert("lineage".to_string(), Value::String(state.lineage.clone()));
    Ok(key)
}

/// `{"lineage": ..., "serial": ...}` key for the current backend's state
///
/// Narrows the lineage key down to a single state write.
pub fn lineage_serial_key(registry: &BackendRegistry) -> RowResult<Map<String, Value>> {
    let state = registry
        .current()
        .ok_or(RowError::NoCurrentBackend)?
        .state();

    let mut key = Map::new();
    key.insert("lineage".to_string(), Value::String(state.lineage.clone()));
    key.insert("serial".to_string(), Value::from(state.serial));
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfsight_state::{
        BackendKind, ResolvedBackend, SUPPORTED_STATE_VERSION, StateDocument,
    };

    fn registry(lineage: &str, serial: u64) -> BackendRegistry {
        let state = StateDocument {
            version: SUPPORTED_STATE_VERSION,
            terraform_version: "1.2.0".to_string(),
            serial,
            lineage: lineage.to_string(),
            resources: vec![],
        };
        BackendRegistry::new(vec![ResolvedBackend::new("dev", BackendKind::Local, state)])
            .unwrap()
    }

    #[test]
    fn test_lineage_key() {
        let key = lineage_key(&registry("abc-123", 7)).unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key["lineage"], "abc-123");
    }

    #[test]
    fn test_lineage_serial_key() {
        let key = lineage_serial_key(&registry("abc-123", 7)).unwrap();
        assert_eq!(key.len(), 2);
        assert_eq!(key["lineage"], "abc-123");
        assert_eq!(key["serial"], 7);
    }

    #[test]
    fn test_keys_require_a_current_backend() {
        let empty = BackendRegistry::new(vec![]).unwrap();

        let error = lineage_key(&empty).unwrap_err();
        assert!(matches!(error, RowError::NoCurrentBackend));

        let error = lineage_serial_key(&empty).unwrap_err();
        assert!(matches!(error, RowError::NoCurrentBackend));
    }
}
