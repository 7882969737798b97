//! Terraform state document structures
//!
//! The model covers the version 4 state format only: a versioned document
//! holding resources, each owning zero or more instances. Instance
//! attributes vary per resource type and are kept as opaque JSON.

use serde::{Deserialize, Serialize};

/// The single state schema version this crate accepts
pub const SUPPORTED_STATE_VERSION: u64 = 4;

/// A parsed Terraform state payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    /// State file format version; anything but [`SUPPORTED_STATE_VERSION`]
    /// is rejected at decode time and never reaches consumers
    pub version: u64,
    /// Terraform release that last wrote this state (informational)
    pub terraform_version: String,
    /// Monotonically increasing counter bumped on every state write
    pub serial: u64,
    /// Identifier that changes only when state history is discarded;
    /// the primary cache-invalidation key
    pub lineage: String,
    /// Recorded resources, in document order
    #[serde(default)]
    pub resources: Vec<StateResource>,
}

impl StateDocument {
    /// Total number of instances across all resources
    pub fn instance_count(&self) -> usize {
        self.resources.iter().map(|r| r.instances.len()).sum()
    }
}

/// Whether a resource is managed by Terraform or a read-only data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    Managed,
    Data,
}

impl ResourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::Data => "data",
        }
    }
}

impl std::fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared infrastructure object recorded in the state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResource {
    /// Module address; absent for the root module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub mode: ResourceMode,
    /// Resource type (e.g., "aws_instance")
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    /// Encoded provider config path, e.g.
    /// `provider["registry.terraform.io/hashicorp/aws"]`
    #[serde(rename = "provider")]
    pub provider_config: String,
    /// Concrete materializations of this resource, in document order.
    /// Instances have no existence outside their owning resource.
    #[serde(default)]
    pub instances: Vec<ResourceInstance>,
}

/// One concrete materialization of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInstance {
    /// Resource-type-specific schema revision
    #[serde(default)]
    pub schema_version: u64,
    /// Opaque attributes blob; schema varies per resource type and is not
    /// modeled structurally beyond a best-effort `id` extraction
    #[serde(rename = "attributes", default)]
    pub attributes_raw: serde_json::Value,
    /// Resource addresses this instance depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Lifecycle flag
    #[serde(default)]
    pub create_before_destroy: bool,
}
