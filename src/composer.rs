//! Statement recipes per profile and their materialization for a bucket.

use tracing::{debug, error, warn};

use crate::catalog::{self, GroupName};
use crate::error::PolicyError;
use crate::profile::Profile;
use crate::types::{
    Effect, PolicyDocument, Principal, Resource, ResourceScope, Statement, validate_bucket_name,
};

/// One row of a profile recipe; materializes into one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRow {
    pub sid: &'static str,
    pub effect: Effect,
    pub principal: Principal,
    pub actions: GroupName,
    pub resources: &'static [ResourceScope],
}

const BUCKET_AND_OBJECTS: &[ResourceScope] = &[ResourceScope::Bucket, ResourceScope::Objects];

static PUBLIC: [RecipeRow; 1] = [RecipeRow {
    sid: "AllowAllS3Actions",
    effect: Effect::Allow,
    principal: Principal::Anonymous,
    actions: GroupName::AllBucket,
    resources: BUCKET_AND_OBJECTS,
}];

static READ_ONLY: [RecipeRow; 3] = [
    RecipeRow {
        sid: "ListAllBucket",
        effect: Effect::Allow,
        principal: Principal::Anonymous,
        actions: GroupName::ReadOnlyAllBuckets,
        resources: &[ResourceScope::AllBuckets],
    },
    RecipeRow {
        sid: "DenyOtherBuckets",
        effect: Effect::Deny,
        principal: Principal::Anonymous,
        actions: GroupName::ReadOnlyBucket,
        resources: BUCKET_AND_OBJECTS,
    },
    RecipeRow {
        sid: "AllObjectActionsMyBuckets",
        effect: Effect::Allow,
        principal: Principal::Anonymous,
        actions: GroupName::ReadListMyObject,
        resources: BUCKET_AND_OBJECTS,
    },
];

static WRITE_ONLY: [RecipeRow; 2] = [
    RecipeRow {
        sid: "AllowListMyBuckets",
        effect: Effect::Allow,
        principal: Principal::Anonymous,
        actions: GroupName::CommonBucket,
        resources: &[ResourceScope::Bucket],
    },
    RecipeRow {
        sid: "AllowWriteObjects",
        effect: Effect::Allow,
        principal: Principal::Anonymous,
        actions: GroupName::WriteOnlyObject,
        resources: &[ResourceScope::Objects],
    },
];

static READ_WRITE: [RecipeRow; 2] = [
    RecipeRow {
        sid: "AllowBucketMeta",
        effect: Effect::Allow,
        principal: Principal::Anonymous,
        actions: GroupName::ReadListMultObject,
        resources: &[ResourceScope::Bucket],
    },
    RecipeRow {
        sid: "AllowObjectRW",
        effect: Effect::Allow,
        principal: Principal::Anonymous,
        actions: GroupName::ReadWriteObject,
        resources: &[ResourceScope::Objects],
    },
];

/// The ordered rows for `profile`.
pub fn recipe(profile: Profile) -> &'static [RecipeRow] {
    match profile {
        Profile::Public => &PUBLIC,
        Profile::ReadOnly => &READ_ONLY,
        Profile::WriteOnly => &WRITE_ONLY,
        Profile::ReadWrite => &READ_WRITE,
    }
}

impl RecipeRow {
    /// Build the statement for this row against `bucket`.
    ///
    /// Builder faults are reported with `index`, the row's position in its
    /// recipe.
    pub fn materialize(&self, index: usize, bucket: &str) -> Result<Statement, PolicyError> {
        let resources = self
            .resources
            .iter()
            .map(|scope| Resource::for_scope(*scope, bucket))
            .collect::<Result<Vec<_>, _>>()?;

        Statement::builder(self.sid)
            .effect(self.effect)
            .principal(self.principal.clone())
            .actions(catalog::group(self.actions))
            .resources(resources)
            .build()
            .map_err(|e| {
                error!(event = "Compose", phase = "Statement", index, sid = self.sid, error = %e);
                PolicyError::at_statement(index, e)
            })
    }
}

/// Compose the policy document for `profile` on `bucket`.
pub fn compose(profile: Profile, bucket: &str) -> Result<PolicyDocument, PolicyError> {
    // Checked before any row, all-buckets rows never see the name.
    validate_bucket_name(bucket).inspect_err(|e| {
        warn!(event = "Compose", phase = "Validate", profile = %profile, bucket, error = %e);
    })?;

    let rows = recipe(profile);
    debug!(
        event = "Compose",
        phase = "Recipe",
        profile = %profile,
        bucket,
        rows = rows.len()
    );

    let statements = rows
        .iter()
        .enumerate()
        .map(|(index, row)| row.materialize(index, bucket))
        .collect::<Result<Vec<_>, _>>()?;

    PolicyDocument::new(statements)
}

/// Compose the policy document for an external profile name.
pub fn compose_named(profile: &str, bucket: &str) -> Result<PolicyDocument, PolicyError> {
    compose(Profile::lookup(profile)?, bucket)
}
