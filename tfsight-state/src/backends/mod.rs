//! Backend resolution: turning declarations into validated state documents

mod local;
mod s3;

pub use s3::DEFAULT_DISCOVERY_REGION;

use crate::backend::{
    BackendDeclaration, BackendError, BackendResult, BackendSettings, ResolvedBackend,
};
use crate::state::{SUPPORTED_STATE_VERSION, StateDocument};

/// Resolve a backend declaration into a fetched, validated state document
///
/// Dispatches over the closed kind set. Resolution is read-only and
/// idempotent: resolving the same declaration twice yields the same logical
/// document unless the source was mutated externally. No retries are
/// performed; a transient failure surfaces immediately.
pub async fn resolve(declaration: &BackendDeclaration) -> BackendResult<ResolvedBackend> {
    let state = match &declaration.settings {
        BackendSettings::Local { path } => local::read_state(&declaration.name, path)?,
        BackendSettings::S3 {
            bucket,
            key,
            region,
            role_arn,
        } => {
            s3::fetch_state(
                &declaration.name,
                bucket,
                key,
                region.as_deref(),
                role_arn.as_deref(),
            )
            .await?
        }
    };

    Ok(ResolvedBackend::new(
        declaration.name.clone(),
        declaration.kind(),
        state,
    ))
}

/// Decode raw state bytes and gate on the supported schema version
///
/// Shared by every backend kind so an unsupported document is rejected
/// before it can reach consumers.
pub(crate) fn decode_state(name: &str, bytes: &[u8]) -> BackendResult<StateDocument> {
    let state: StateDocument =
        serde_json::from_slice(bytes).map_err(|source| BackendError::StateFormat {
            name: name.to_string(),
            source,
        })?;

    if state.version != SUPPORTED_STATE_VERSION {
        return Err(BackendError::UnsupportedVersion {
            name: name.to_string(),
            found: state.version,
        });
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_state_accepts_supported_version() {
        let json = br#"{"version": 4, "terraform_version": "1.2.0", "serial": 7, "lineage": "L1", "resources": []}"#;
        let state = decode_state("dev", json).unwrap();
        assert_eq!(state.serial, 7);
        assert_eq!(state.lineage, "L1");
    }

    #[test]
    fn test_decode_state_rejects_unsupported_version() {
        let json = br#"{"version": 3, "terraform_version": "0.12.0", "serial": 1, "lineage": "L1", "resources": []}"#;
        let error = decode_state("dev", json).unwrap_err();
        match error {
            BackendError::UnsupportedVersion { name, found } => {
                assert_eq!(name, "dev");
                assert_eq!(found, 3);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_state_rejects_invalid_payload() {
        let error = decode_state("dev", b"not json at all").unwrap_err();
        assert!(matches!(error, BackendError::StateFormat { .. }));

        // Valid JSON that is not a state document is a format error too
        let error = decode_state("dev", br#"{"hello": "world"}"#).unwrap_err();
        assert!(matches!(error, BackendError::StateFormat { .. }));
    }
}
