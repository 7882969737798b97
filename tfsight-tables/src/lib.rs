//! tfsight Tables
//!
//! Row production over resolved Terraform state for an external tabular
//! resolution engine. The engine drives a three-level walk (state, then
//! resources, then resource instances) and receives finished rows with
//! derived fields already enriched, plus lineage-based invalidation keys
//! for its delete/upsert logic.
//!
//! # Overview
//!
//! - **walker**: lazy state/resource/instance traversal with defensive
//!   parent-shape checks
//! - **rows**: the `tf_data` / `tf_resources` / `tf_resource_instances`
//!   row structs
//! - **derive**: provider-type and instance-id derivation (soft failures)
//!   and attribute serialization (fatal failure)
//! - **filter**: lineage and lineage+serial invalidation keys

pub mod derive;
pub mod error;
pub mod filter;
pub mod rows;
pub mod walker;

// Re-export main types for convenience
pub use derive::{derive_instance_attributes_json, derive_instance_id, derive_provider_type};
pub use error::{RowError, RowResult};
pub use filter::{lineage_key, lineage_serial_key};
pub use rows::{InstanceRow, ResourceRow, StateRow};
pub use walker::{RowItem, resolve_instances, resolve_resources, resolve_state};
