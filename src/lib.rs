//! Canned S3 bucket policies for MinIO-backed infrastructure.
//!
//! A caller names an access profile and a bucket; the crate composes the
//! matching policy document and renders it as canonical JSON, ready to hand
//! to the storage backend:
//!
//! ```rust
//! let policy = bucket_policy_core::build("public", "photos").unwrap();
//! assert_eq!(
//!     String::from_utf8(policy).unwrap(),
//!     r#"{"Version":"2012-10-17","Statement":[{"Sid":"AllowAllS3Actions","Effect":"Allow","Principal":"*","Action":["s3:*"],"Resource":["arn:aws:s3:::photos","arn:aws:s3:::photos/*"]}]}"#
//! );
//! ```
//!
//! Everything here is pure: no I/O, no shared mutable state, and builds may
//! run concurrently from any number of threads.

use std::time::{Duration, Instant};

use tracing::{debug, info};

pub use catalog::{GroupName, group, groups, union};
pub use composer::{RecipeRow, compose, compose_named};
pub use error::{PolicyError, StatementError};
pub use profile::{PolicyRequest, Profile};
pub use serializer::{parse, parse_str, to_canonical_json, to_canonical_string, to_pretty_string};
pub use types::{
    ARN_PREFIX, Action, ActionGroup, Conditions, Effect, POLICY_VERSION, PolicyDocument, Principal,
    Resource, ResourceScope, Statement, StatementBuilder,
};

mod catalog;
mod composer;
mod error;
#[cfg(feature = "observability")]
pub mod metrics;
mod profile;
mod serializer;
mod timers;
mod types;

#[cfg(test)]
mod tests;

use timers::{PhaseTimer, as_millis_f64};

/// Build the canonical policy for an external profile name and a bucket.
///
/// Fails with [`PolicyError::UnknownProfile`] or
/// [`PolicyError::InvalidBucketName`] on bad input; nothing is returned on
/// failure.
pub fn build(profile: &str, bucket: &str) -> Result<Vec<u8>, PolicyError> {
    debug!(event = "Build", phase = "Lookup", profile, bucket);
    build_profile(Profile::lookup(profile)?, bucket)
}

/// [`build`] for an already resolved profile.
pub fn build_profile(profile: Profile, bucket: &str) -> Result<Vec<u8>, PolicyError> {
    let started = Instant::now();
    let mut compose_time = Duration::ZERO;
    let mut serialize_time = Duration::ZERO;

    let doc = {
        let _timer = PhaseTimer::new(&mut compose_time);
        composer::compose(profile, bucket)?
    };

    let bytes = {
        let _timer = PhaseTimer::new(&mut serialize_time);
        serializer::to_canonical_json(&doc)?
    };

    let total = started.elapsed();
    info!(
        event = "Build",
        phase = "Complete",
        profile = %profile,
        bucket,
        statements = doc.statements().len(),
        bytes = bytes.len(),
        compose_ms = as_millis_f64(compose_time),
        serialize_ms = as_millis_f64(serialize_time),
        total_ms = as_millis_f64(total)
    );

    #[cfg(feature = "observability")]
    metrics::record_build(
        metrics::BuildStats {
            duration: total,
            profile,
            bucket: bucket.to_string(),
            statements: doc.statements().len(),
            bytes: bytes.len(),
        },
        metrics::BuildPhases {
            compose_ms: as_millis_f64(compose_time),
            serialize_ms: as_millis_f64(serialize_time),
            total_ms: as_millis_f64(total),
        },
    );

    Ok(bytes)
}
