//! S3 resource ARNs for bucket policies.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Fixed prefix of every S3 resource ARN.
pub const ARN_PREFIX: &str = "arn:aws:s3:::";

const OBJECTS_SUFFIX: &str = "/*";

const FORBIDDEN: [char; 3] = ['/', '*', '?'];

/// Check that `name` can be embedded in an ARN verbatim.
///
/// Names must be non-empty and contain no whitespace, control characters,
/// `/` or the ARN wildcards `*` and `?`. No URL encoding is applied.
pub fn validate_bucket_name(name: &str) -> Result<(), PolicyError> {
    if name.is_empty() {
        return Err(PolicyError::InvalidBucketName(
            "bucket name must not be empty".to_string(),
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN.contains(c))
    {
        return Err(PolicyError::InvalidBucketName(format!(
            "'{}' contains forbidden character {:?}",
            name.escape_debug(),
            c
        )));
    }
    Ok(())
}

/// What part of the bucket namespace a resource covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    /// `arn:aws:s3:::*`
    AllBuckets,
    /// `arn:aws:s3:::<bucket>`
    Bucket,
    /// `arn:aws:s3:::<bucket>/*`
    Objects,
}

/// A resource identifier, always prefixed with [`ARN_PREFIX`].
///
/// The tail is one of `*`, `<bucket>` or `<bucket>/*`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resource(String);

impl Resource {
    /// `arn:aws:s3:::<name>`
    pub fn bucket(name: &str) -> Result<Self, PolicyError> {
        validate_bucket_name(name)?;
        Ok(Resource(format!("{ARN_PREFIX}{name}")))
    }

    /// `arn:aws:s3:::<name>/*`, every object in the bucket.
    pub fn objects(name: &str) -> Result<Self, PolicyError> {
        validate_bucket_name(name)?;
        Ok(Resource(format!("{ARN_PREFIX}{name}{OBJECTS_SUFFIX}")))
    }

    /// `arn:aws:s3:::*`, every bucket.
    pub fn all_buckets() -> Self {
        Resource(format!("{ARN_PREFIX}*"))
    }

    /// Materialize a scope for `bucket`. The bucket is ignored for
    /// [`ResourceScope::AllBuckets`].
    pub fn for_scope(scope: ResourceScope, bucket: &str) -> Result<Self, PolicyError> {
        match scope {
            ResourceScope::AllBuckets => Ok(Resource::all_buckets()),
            ResourceScope::Bucket => Resource::bucket(bucket),
            ResourceScope::Objects => Resource::objects(bucket),
        }
    }

    pub fn scope(&self) -> ResourceScope {
        let tail = self.tail();
        if tail == "*" {
            ResourceScope::AllBuckets
        } else if tail.ends_with(OBJECTS_SUFFIX) {
            ResourceScope::Objects
        } else {
            ResourceScope::Bucket
        }
    }

    /// The bucket this resource refers to, `None` for the all-buckets wildcard.
    pub fn bucket_name(&self) -> Option<&str> {
        match self.scope() {
            ResourceScope::AllBuckets => None,
            ResourceScope::Bucket => Some(self.tail()),
            ResourceScope::Objects => self.tail().strip_suffix(OBJECTS_SUFFIX),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn tail(&self) -> &str {
        &self.0[ARN_PREFIX.len()..]
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for Resource {
    type Err = PolicyError;

    /// Accepts:
    /// - arn:aws:s3:::*
    /// - arn:aws:s3:::photos
    /// - arn:aws:s3:::photos/*
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tail = s.strip_prefix(ARN_PREFIX).ok_or_else(|| {
            PolicyError::InvalidResource(format!(
                "'{s}' does not start with '{ARN_PREFIX}'"
            ))
        })?;

        if tail == "*" {
            return Ok(Resource::all_buckets());
        }

        let invalid = |e: PolicyError| {
            PolicyError::InvalidResource(format!(
                "'{s}' (expected format: {ARN_PREFIX}*, {ARN_PREFIX}bucket or {ARN_PREFIX}bucket/*): {e}"
            ))
        };
        match tail.strip_suffix(OBJECTS_SUFFIX) {
            Some(name) => Resource::objects(name).map_err(invalid),
            None => Resource::bucket(tail).map_err(invalid),
        }
    }
}

impl TryFrom<String> for Resource {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resource> for String {
    fn from(resource: Resource) -> Self {
        resource.0
    }
}
