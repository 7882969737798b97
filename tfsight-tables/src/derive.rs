//! Derived row fields not present verbatim in the state payload

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tfsight_state::ResourceInstance;

use crate::error::{RowError, RowResult};

/// Matches the `<hostname>/<namespace>/<type>` path embedded in an encoded
/// provider config string such as
/// `provider["registry.terraform.io/hashicorp/aws"]`
static PROVIDER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^.*\["(?P<hostname>[^"]*)/(?P<namespace>[^"]*)/(?P<type>[^"]*)"\].*?$"#)
        .expect("provider path pattern is valid")
});

/// Derive the provider type from a resource's encoded provider config path
///
/// Returns `None` when no bracketed path can be parsed out of the string.
/// A malformed provider path must not abort ingestion of an otherwise-valid
/// resource, so this is a soft failure: the field is simply left unset.
pub fn derive_provider_type(provider_config: &str) -> Option<String> {
    PROVIDER_PATH
        .captures(provider_config)?
        .name("type")
        .map(|m| m.as_str().to_string())
}

/// Best-effort `id` field of the opaque instance attributes
///
/// `None` when the attributes are not a JSON object or carry no `id` key;
/// never an error. The value keeps whatever JSON type `id` holds.
pub fn derive_instance_id(instance: &ResourceInstance) -> Option<Value> {
    match &instance.attributes_raw {
        Value::Object(attributes) => attributes.get("id").cloned(),
        _ => None,
    }
}

/// Canonical JSON bytes of the instance attributes
pub fn derive_instance_attributes_json(instance: &ResourceInstance) -> RowResult<Vec<u8>> {
    serde_json::to_vec(&instance.attributes_raw).map_err(RowError::from)
}
