//! Registry of resolved backends with deterministic selection
//!
//! Backends are held in declaration order so the fallback "current" backend
//! is reproducible across runs. The set is write-once: all resolutions
//! complete before the registry is constructed and nothing mutates it
//! afterward, so views can share it freely.

use std::sync::Arc;

use tracing::info;

use crate::backend::{BackendDeclaration, BackendError, BackendResult, ResolvedBackend};
use crate::backends;

/// The single point of truth for "which state are we looking at right now"
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Arc<Vec<ResolvedBackend>>,
    current: Option<String>,
}

impl BackendRegistry {
    /// Build a registry from resolved backends, in declaration order
    ///
    /// Two backends under the same name are a configuration error, never a
    /// silent last-wins overwrite.
    pub fn new(backends: Vec<ResolvedBackend>) -> BackendResult<Self> {
        for (index, backend) in backends.iter().enumerate() {
            if backends[..index]
                .iter()
                .any(|other| other.name() == backend.name())
            {
                return Err(BackendError::DuplicateName {
                    name: backend.name().to_string(),
                });
            }
        }

        Ok(Self {
            backends: Arc::new(backends),
            current: None,
        })
    }

    /// The currently selected backend
    ///
    /// Falls back to the first-declared backend when nothing was selected
    /// explicitly; `None` on an empty registry, which consumers must treat
    /// as "no data".
    pub fn current(&self) -> Option<&ResolvedBackend> {
        match &self.current {
            Some(name) => self.backends.iter().find(|b| b.name() == name.as_str()),
            None => self.backends.first(),
        }
    }

    /// A view of this registry pinned to the named backend
    ///
    /// The underlying backend set is shared with the original, never
    /// copied. Returns `None` for an unknown name.
    pub fn select(&self, name: &str) -> Option<Self> {
        if !self.backends.iter().any(|b| b.name() == name) {
            return None;
        }
        Some(Self {
            backends: Arc::clone(&self.backends),
            current: Some(name.to_string()),
        })
    }

    /// All backends, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedBackend> {
        self.backends.iter()
    }

    /// Declared backend names, in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|b| b.name())
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// Resolve every declared backend and build the registry
///
/// Any single resolution failure aborts the whole run: downstream row
/// production assumes every declared backend resolved successfully.
pub async fn configure(declarations: &[BackendDeclaration]) -> BackendResult<BackendRegistry> {
    if declarations.is_empty() {
        return Err(BackendError::config("no backends were declared"));
    }

    // Reject bad names before any network or filesystem I/O happens
    for (index, declaration) in declarations.iter().enumerate() {
        if declaration.name.is_empty() {
            return Err(BackendError::config("backend name must not be empty"));
        }
        if declarations[..index]
            .iter()
            .any(|other| other.name == declaration.name)
        {
            return Err(BackendError::DuplicateName {
                name: declaration.name.clone(),
            });
        }
    }

    let mut resolved = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        let backend = backends::resolve(declaration).await?;
        info!(
            backend = backend.name(),
            kind = backend.kind().as_str(),
            serial = backend.state().serial,
            lineage = backend.state().lineage.as_str(),
            "resolved backend"
        );
        resolved.push(backend);
    }

    BackendRegistry::new(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendKind, BackendSettings};
    use crate::state::{SUPPORTED_STATE_VERSION, StateDocument};
    use tempfile::tempdir;

    fn document(lineage: &str, serial: u64) -> StateDocument {
        StateDocument {
            version: SUPPORTED_STATE_VERSION,
            terraform_version: "1.2.0".to_string(),
            serial,
            lineage: lineage.to_string(),
            resources: vec![],
        }
    }

    fn backend(name: &str, lineage: &str) -> ResolvedBackend {
        ResolvedBackend::new(name, BackendKind::Local, document(lineage, 1))
    }

    #[test]
    fn test_registry_rejects_duplicate_names() {
        let result = BackendRegistry::new(vec![backend("prod", "L1"), backend("prod", "L2")]);
        match result {
            Err(BackendError::DuplicateName { name }) => assert_eq!(name, "prod"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_current_falls_back_to_first_declared() {
        let registry =
            BackendRegistry::new(vec![backend("staging", "L1"), backend("prod", "L2")]).unwrap();
        assert_eq!(registry.current().unwrap().name(), "staging");
    }

    #[test]
    fn test_registry_current_on_empty_registry() {
        let registry = BackendRegistry::new(vec![]).unwrap();
        assert!(registry.current().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_select_pins_a_view() {
        let registry =
            BackendRegistry::new(vec![backend("staging", "L1"), backend("prod", "L2")]).unwrap();

        let view = registry.select("prod").unwrap();
        assert_eq!(view.current().unwrap().name(), "prod");
        assert_eq!(view.len(), 2);

        // The original view is untouched
        assert_eq!(registry.current().unwrap().name(), "staging");

        assert!(registry.select("unknown").is_none());
    }

    #[tokio::test]
    async fn test_configure_rejects_empty_declarations() {
        let error = configure(&[]).await.unwrap_err();
        assert!(matches!(error, BackendError::Config(_)));
    }

    #[tokio::test]
    async fn test_configure_rejects_duplicate_declarations() {
        let declarations = vec![
            BackendDeclaration::new(
                "prod",
                BackendSettings::Local {
                    path: "a.tfstate".into(),
                },
            ),
            BackendDeclaration::new(
                "prod",
                BackendSettings::Local {
                    path: "b.tfstate".into(),
                },
            ),
        ];
        let error = configure(&declarations).await.unwrap_err();
        assert!(matches!(error, BackendError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn test_configure_resolves_local_backends_in_order() {
        let dir = tempdir().unwrap();
        let mut declarations = Vec::new();
        for (name, lineage) in [("staging", "L1"), ("prod", "L2")] {
            let path = dir.path().join(format!("{name}.tfstate"));
            let state = serde_json::to_vec(&document(lineage, 3)).unwrap();
            std::fs::write(&path, state).unwrap();
            declarations.push(BackendDeclaration::new(
                name,
                BackendSettings::Local { path },
            ));
        }

        let registry = configure(&declarations).await.unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["staging", "prod"]);
        assert_eq!(registry.current().unwrap().state().lineage, "L1");
        assert_eq!(
            registry.select("prod").unwrap().current().unwrap().state().lineage,
            "L2"
        );
    }

    #[tokio::test]
    async fn test_configure_aborts_on_single_failure() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.tfstate");
        std::fs::write(&good, serde_json::to_vec(&document("L1", 1)).unwrap()).unwrap();

        let declarations = vec![
            BackendDeclaration::new("good", BackendSettings::Local { path: good }),
            BackendDeclaration::new(
                "bad",
                BackendSettings::Local {
                    path: dir.path().join("missing.tfstate"),
                },
            ),
        ];

        let error = configure(&declarations).await.unwrap_err();
        assert!(matches!(error, BackendError::StateRead { .. }));
    }
}
