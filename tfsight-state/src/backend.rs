//! Backend declarations, resolved backends, and error types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{StateDocument, SUPPORTED_STATE_VERSION};

/// Errors that can occur while configuring or resolving a backend
///
/// Every variant names the offending backend; remote variants additionally
/// carry the bucket/key so misconfiguration is diagnosable from the message
/// alone.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Configuration error (missing backend name, unsupported kind, empty
    /// backend set)
    #[error("backend configuration error: {0}")]
    Config(String),

    /// Two backends declared under the same name
    #[error("duplicate backend name {name:?}")]
    DuplicateName { name: String },

    /// Local state file could not be opened or read
    #[error("backend {name:?}: cannot read state file {}: {source}", .path.display())]
    StateRead {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload is not valid Terraform state JSON
    #[error("backend {name:?}: payload is not a valid Terraform state document: {source}")]
    StateFormat {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// State schema version other than the supported one
    #[error(
        "backend {name:?}: unsupported state version {found} (supported version is {})",
        SUPPORTED_STATE_VERSION
    )]
    UnsupportedVersion { name: String, found: u64 },

    /// Bucket-region discovery call failed
    #[error("backend {name:?}: failed to discover region for bucket {bucket:?}: {message}")]
    RegionDiscovery {
        name: String,
        bucket: String,
        message: String,
    },

    /// Declared role ARN is malformed
    #[error("backend {name:?}: invalid role ARN {arn:?}: {message}")]
    InvalidRoleArn {
        name: String,
        arn: String,
        message: String,
    },

    /// The assume-role exchange for temporary credentials failed
    #[error("backend {name:?}: failed to assume role {role_arn:?}: {message}")]
    AssumeRole {
        name: String,
        role_arn: String,
        message: String,
    },

    /// Fetching the state object failed
    #[error("backend {name:?}: failed to fetch s3://{bucket}/{key}: {kind}: {message}")]
    ObjectFetch {
        name: String,
        bucket: String,
        key: String,
        kind: FetchFailureKind,
        message: String,
    },
}

impl BackendError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Caller-visible classification of a failed object fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The object does not exist at bucket/key
    NotFound,
    /// Credentials do not permit reading the object
    AccessDenied,
    /// Anything else; retrying is the caller's decision
    Transient,
}

impl FetchFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "object not found",
            Self::AccessDenied => "access denied",
            Self::Transient => "transient failure",
        }
    }
}

impl std::fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend kind discriminator, as exposed in row output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    S3,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific backend settings
///
/// The kind set is closed: new backends are added as variants so dispatch
/// stays exhaustiveness-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendSettings {
    /// State file on the local filesystem
    Local { path: PathBuf },
    /// State object in an S3 bucket
    S3 {
        bucket: String,
        key: String,
        /// Auto-discovered from the bucket when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
        /// Role to assume for cross-account access
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role_arn: Option<String>,
    },
}

impl BackendSettings {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local { .. } => BackendKind::Local,
            Self::S3 { .. } => BackendKind::S3,
        }
    }
}

/// A named backend declaration, as handed over by the configuration
/// front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDeclaration {
    pub name: String,
    #[serde(flatten)]
    pub settings: BackendSettings,
}

impl BackendDeclaration {
    pub fn new(name: impl Into<String>, settings: BackendSettings) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.settings.kind()
    }
}

/// A backend whose state has been fetched and validated
///
/// Created once during configuration and immutable thereafter.
#[derive(Debug, Clone)]
pub struct ResolvedBackend {
    name: String,
    kind: BackendKind,
    state: StateDocument,
}

impl ResolvedBackend {
    pub fn new(name: impl Into<String>, kind: BackendKind, state: StateDocument) -> Self {
        Self {
            name: name.into(),
            kind,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn state(&self) -> &StateDocument {
        &self.state
    }
}
