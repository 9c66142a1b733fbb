//! Access profiles and the registry mapping external names onto them.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};
use tracing::warn;
use utoipa::ToSchema;

use crate::composer::{self, RecipeRow};
use crate::error::PolicyError;

/// A symbolic access profile that expands into a multi-statement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum Profile {
    #[strum(serialize = "public")]
    Public,
    #[strum(serialize = "readonly")]
    ReadOnly,
    #[strum(serialize = "writeonly")]
    WriteOnly,
    #[strum(serialize = "readwrite")]
    ReadWrite,
}

/// External names accepted for each profile, in lower case.
///
/// The `public-*` entries are the canned ACL names the MinIO provider exposes
/// on bucket resources.
const REGISTRY: &[(&str, Profile)] = &[
    ("public", Profile::Public),
    ("readonly", Profile::ReadOnly),
    ("read-only", Profile::ReadOnly),
    ("public-read", Profile::ReadOnly),
    ("writeonly", Profile::WriteOnly),
    ("write-only", Profile::WriteOnly),
    ("public-write", Profile::WriteOnly),
    ("readwrite", Profile::ReadWrite),
    ("read-write", Profile::ReadWrite),
    ("public-read-write", Profile::ReadWrite),
];

impl Profile {
    /// Resolve an external profile name. Matching is case-insensitive.
    pub fn lookup(name: &str) -> Result<Self, PolicyError> {
        let normalized = name.to_ascii_lowercase();
        REGISTRY
            .iter()
            .find(|(registered, _)| *registered == normalized)
            .map(|(_, profile)| *profile)
            .ok_or_else(|| {
                warn!(event = "Lookup", phase = "Registry", profile = name, "unknown profile");
                PolicyError::UnknownProfile(name.to_string())
            })
    }

    /// Every registered name, canonical names and aliases alike.
    pub fn registered_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(name, _)| *name)
    }

    /// The ordered statement rows this profile expands into.
    pub fn recipe(self) -> &'static [RecipeRow] {
        composer::recipe(self)
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_ref())
    }
}

impl FromStr for Profile {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::lookup(s)
    }
}

impl TryFrom<String> for Profile {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Profile::lookup(&value)
    }
}

impl From<Profile> for String {
    fn from(profile: Profile) -> Self {
        profile.as_ref().to_string()
    }
}

/// A bucket declared by the host engine together with its requested profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct PolicyRequest {
    /// Bucket the policy is generated for.
    pub bucket: String,
    /// Profile name, e.g. "public" or "readonly".
    #[schema(value_type = String)]
    pub profile: Profile,
}

impl PolicyRequest {
    pub fn new(bucket: impl Into<String>, profile: Profile) -> Self {
        Self {
            bucket: bucket.into(),
            profile,
        }
    }

    /// Compose and serialize the policy for this request.
    pub fn build(&self) -> Result<Vec<u8>, PolicyError> {
        crate::build_profile(self.profile, &self.bucket)
    }
}
