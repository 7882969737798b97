//! Local file backend: state read straight from the filesystem

use std::path::Path;

use crate::backend::{BackendError, BackendResult};
use crate::state::StateDocument;

/// Read and validate a state file from the local filesystem
pub(crate) fn read_state(name: &str, path: &Path) -> BackendResult<StateDocument> {
    let bytes = std::fs::read(path).map_err(|source| BackendError::StateRead {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    })?;

    super::decode_state(name, &bytes)
}
