//! Row structs handed to the external tabular engine
//!
//! One `tf_data` row per resolved current state, one `tf_resources` child
//! row per resource, one `tf_resource_instances` grandchild row per
//! instance. Derived fields are enriched here so the engine only ever sees
//! finished rows.

use serde::Serialize;
use serde_json::Value;
use tfsight_state::{ResolvedBackend, ResourceInstance, ResourceMode, StateResource};

use crate::derive;
use crate::error::RowResult;

/// A `tf_data` row: the current backend and its state header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRow {
    pub backend: &'static str,
    pub backend_name: String,
    pub version: u64,
    pub terraform_version: String,
    pub serial: u64,
    pub lineage: String,
}

impl StateRow {
    pub fn new(backend: &ResolvedBackend) -> Self {
        let state = backend.state();
        Self {
            backend: backend.kind().as_str(),
            backend_name: backend.name().to_string(),
            version: state.version,
            terraform_version: state.terraform_version.clone(),
            serial: state.serial,
            lineage: state.lineage.clone(),
        }
    }
}

/// A `tf_resources` row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub mode: ResourceMode,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub provider_path: String,
    /// Derived provider type; unset when the provider path is not parseable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ResourceRow {
    pub fn new(resource: &StateResource) -> Self {
        Self {
            module: resource.module.clone(),
            mode: resource.mode,
            resource_type: resource.resource_type.clone(),
            name: resource.name.clone(),
            provider_path: resource.provider_config.clone(),
            provider: derive::derive_provider_type(&resource.provider_config),
        }
    }
}

/// A `tf_resource_instances` row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceRow {
    /// Best-effort `id` attribute; unset when the attributes carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<Value>,
    pub schema_version: u64,
    /// Canonical JSON bytes of the opaque attributes blob
    pub attributes: Vec<u8>,
    pub dependencies: Vec<String>,
    pub create_before_destroy: bool,
}

impl InstanceRow {
    pub fn new(instance: &ResourceInstance) -> RowResult<Self> {
        Ok(Self {
            internal_id: derive::derive_instance_id(instance),
            schema_version: instance.schema_version,
            attributes: derive::derive_instance_attributes_json(instance)?,
            dependencies: instance.dependencies.clone(),
            create_before_destroy: instance.create_before_destroy,
        })
    }
}
