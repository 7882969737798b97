//! Lazy traversal of a state document into resource and instance rows
//!
//! The host engine drives the walk: it asks for state rows, then hands each
//! parent row back to get its children. Parent rows travel as opaque
//! [`RowItem`] tokens; asking for children of the wrong shape is a
//! defensive error rather than a panic. Each level is produced lazily, so
//! nothing beyond one level is buffered at a time.

use tfsight_state::{BackendRegistry, ResourceInstance, StateDocument, StateResource};

use crate::error::{RowError, RowResult};

/// Opaque parent-row token exchanged with the host engine
#[derive(Debug, Clone)]
pub enum RowItem {
    State(StateDocument),
    Resource(StateResource),
    Instance(ResourceInstance),
}

impl RowItem {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::Resource(_) => "resource",
            Self::Instance(_) => "instance",
        }
    }
}

/// Emit the currently selected state
///
/// Empty when no backend is selected: that signals "nothing to ingest",
/// not an error.
pub fn resolve_state(registry: &BackendRegistry) -> impl Iterator<Item = RowItem> {
    registry
        .current()
        .map(|backend| RowItem::State(backend.state().clone()))
        .into_iter()
}

/// Emit the state's resources, in document order
pub fn resolve_resources(parent: &RowItem) -> RowResult<impl Iterator<Item = RowItem> + '_> {
    match parent {
        RowItem::State(state) => Ok(state.resources.iter().cloned().map(RowItem::Resource)),
        other => Err(RowError::TypeMismatch {
            expected: "state",
            actual: other.kind(),
        }),
    }
}

/// Emit the resource's instances, in document order
pub fn resolve_instances(parent: &RowItem) -> RowResult<impl Iterator<Item = RowItem> + '_> {
    match parent {
        RowItem::Resource(resource) => {
            Ok(resource.instances.iter().cloned().map(RowItem::Instance))
        }
        other => Err(RowError::TypeMismatch {
            expected: "resource",
            actual: other.kind(),
        }),
    }
}
