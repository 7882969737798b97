//! tfsight State Ingestion
//!
//! This crate resolves declared Terraform state backends into validated
//! state documents and holds them in a registry for row production.
//!
//! # Overview
//!
//! - **StateDocument**: the parsed, versioned state payload (version 4 only)
//! - **BackendDeclaration / ResolvedBackend**: a named source (local file or
//!   S3 object) and its fetched, validated state
//! - **BackendRegistry**: all resolved backends in declaration order, with a
//!   deterministic "current" selection
//!
//! # Example
//!
//! ```ignore
//! use tfsight_state::{BackendDeclaration, BackendSettings, configure};
//!
//! let declarations = vec![
//!     BackendDeclaration::new("dev", BackendSettings::Local {
//!         path: "/path/to/terraform.tfstate".into(),
//!     }),
//!     BackendDeclaration::new("prod", BackendSettings::S3 {
//!         bucket: "terraform-state-prod".to_string(),
//!         key: "network/terraform.tfstate".to_string(),
//!         region: None,
//!         role_arn: Some("arn:aws:iam::123456789012:role/state-reader".to_string()),
//!     }),
//! ];
//!
//! let registry = configure(&declarations).await?;
//! let current = registry.current().expect("at least one backend");
//! println!("{}: serial {}", current.name(), current.state().serial);
//! ```

pub mod backend;
pub mod backends;
pub mod registry;
pub mod state;

// Re-export main types for convenience
pub use backend::{
    BackendDeclaration, BackendError, BackendKind, BackendResult, BackendSettings,
    FetchFailureKind, ResolvedBackend,
};
pub use backends::resolve;
pub use registry::{BackendRegistry, configure};
pub use state::{
    ResourceInstance, ResourceMode, SUPPORTED_STATE_VERSION, StateDocument, StateResource,
};
