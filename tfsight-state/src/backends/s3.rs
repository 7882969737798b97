//! S3 backend: region discovery, optional role assumption, object fetch
//!
//! Ambient shared credentials are honored throughout; when a role ARN is
//! declared, temporary credentials from a one-hop assume-role exchange
//! replace them for the state fetch.

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use tracing::debug;

use crate::backend::{BackendError, BackendResult, FetchFailureKind};
use crate::state::StateDocument;

/// Region the bucket-region discovery call is issued against when no region
/// was declared
pub const DEFAULT_DISCOVERY_REGION: &str = "us-east-1";

/// Session name attached to assumed-role credentials
const ASSUME_ROLE_SESSION_NAME: &str = "tfsight-state";

/// Fetch and validate a state object from S3
pub(crate) async fn fetch_state(
    name: &str,
    bucket: &str,
    key: &str,
    region: Option<&str>,
    role_arn: Option<&str>,
) -> BackendResult<StateDocument> {
    let region = match region {
        Some(region) => region.to_string(),
        None => discover_bucket_region(name, bucket).await?,
    };

    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region))
        .load()
        .await;

    let client = match role_arn {
        Some(arn) => {
            validate_role_arn(name, arn)?;
            let credentials = assume_role(name, &aws_config, arn).await?;
            let config = aws_sdk_s3::config::Builder::from(&aws_config)
                .credentials_provider(credentials)
                .build();
            Client::from_conf(config)
        }
        None => Client::new(&aws_config),
    };

    let output = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|err| BackendError::ObjectFetch {
            name: name.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            kind: classify_fetch_error(&err),
            message: err.to_string(),
        })?;

    let body = output
        .body
        .collect()
        .await
        .map_err(|err| BackendError::ObjectFetch {
            name: name.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            kind: FetchFailureKind::Transient,
            message: err.to_string(),
        })?;
    let bytes = body.into_bytes();
    debug!(backend = name, bucket, key, bytes = bytes.len(), "fetched state object");

    super::decode_state(name, &bytes)
}

/// Ask S3 where the bucket lives, using the default discovery region
async fn discover_bucket_region(name: &str, bucket: &str) -> BackendResult<String> {
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(DEFAULT_DISCOVERY_REGION))
        .load()
        .await;
    let client = Client::new(&aws_config);

    let output = client
        .get_bucket_location()
        .bucket(bucket)
        .send()
        .await
        .map_err(|err| BackendError::RegionDiscovery {
            name: name.to_string(),
            bucket: bucket.to_string(),
            message: err.to_string(),
        })?;

    let region = normalize_location_constraint(output.location_constraint().map(|c| c.as_str()));
    debug!(backend = name, bucket, region = region.as_str(), "discovered bucket region");
    Ok(region)
}

/// GetBucketLocation reports us-east-1 buckets with an empty constraint
fn normalize_location_constraint(constraint: Option<&str>) -> String {
    match constraint {
        None | Some("") => DEFAULT_DISCOVERY_REGION.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Exchange ambient credentials for temporary ones tied to the role
async fn assume_role(
    name: &str,
    aws_config: &aws_config::SdkConfig,
    role_arn: &str,
) -> BackendResult<Credentials> {
    let assume_role_error = |message: String| BackendError::AssumeRole {
        name: name.to_string(),
        role_arn: role_arn.to_string(),
        message,
    };

    let sts = aws_sdk_sts::Client::new(aws_config);
    let output = sts
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(ASSUME_ROLE_SESSION_NAME)
        .send()
        .await
        .map_err(|err| assume_role_error(err.to_string()))?;

    let credentials = output
        .credentials()
        .ok_or_else(|| assume_role_error("no credentials in assume-role response".to_string()))?;
    debug!(backend = name, role_arn, "assumed role for state fetch");

    Ok(Credentials::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        Some(credentials.session_token().to_string()),
        None,
        "tfsight-assume-role",
    ))
}

/// Validate the `arn:partition:service:region:account:resource` shape of a
/// role ARN without calling out to AWS
fn validate_role_arn(name: &str, arn: &str) -> BackendResult<()> {
    let invalid = |message: &str| BackendError::InvalidRoleArn {
        name: name.to_string(),
        arn: arn.to_string(),
        message: message.to_string(),
    };

    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    if parts.len() != 6 {
        return Err(invalid("expected 6 colon-separated sections"));
    }
    if parts[0] != "arn" {
        return Err(invalid("missing arn: prefix"));
    }
    if parts[1].is_empty() {
        return Err(invalid("missing partition"));
    }
    if parts[2].is_empty() {
        return Err(invalid("missing service"));
    }
    if parts[5].is_empty() {
        return Err(invalid("missing resource"));
    }

    Ok(())
}

/// Classify a failed GetObject into the caller-visible taxonomy
fn classify_fetch_error(err: &SdkError<GetObjectError>) -> FetchFailureKind {
    if let Some(service_error) = err.as_service_error() {
        if service_error.is_no_such_key() {
            return FetchFailureKind::NotFound;
        }
        if service_error.code() == Some("AccessDenied") {
            return FetchFailureKind::AccessDenied;
        }
    }

    // Fall back to the raw HTTP status for errors the SDK leaves unmodeled
    match err.raw_response().map(|r| r.status().as_u16()) {
        Some(404) => FetchFailureKind::NotFound,
        Some(403) => FetchFailureKind::AccessDenied,
        _ => FetchFailureKind::Transient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_location_constraint() {
        assert_eq!(normalize_location_constraint(None), "us-east-1");
        assert_eq!(normalize_location_constraint(Some("")), "us-east-1");
        assert_eq!(
            normalize_location_constraint(Some("ap-northeast-1")),
            "ap-northeast-1"
        );
        assert_eq!(normalize_location_constraint(Some("eu-west-1")), "eu-west-1");
    }

    #[test]
    fn test_validate_role_arn_accepts_well_formed() {
        validate_role_arn("prod", "arn:aws:iam::123456789012:role/state-reader").unwrap();
        validate_role_arn("prod", "arn:aws-cn:iam::123456789012:role/path/to/role").unwrap();
    }

    #[test]
    fn test_validate_role_arn_rejects_malformed() {
        for arn in ["", "not-an-arn", "arn:aws:iam", "role/state-reader", "arn:aws:iam::123:"] {
            let error = validate_role_arn("prod", arn).unwrap_err();
            match error {
                BackendError::InvalidRoleArn { name, arn: got, .. } => {
                    assert_eq!(name, "prod");
                    assert_eq!(got, arn);
                }
                other => panic!("expected InvalidRoleArn, got {other:?}"),
            }
        }
    }
}
