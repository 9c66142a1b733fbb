//! The closed catalog of named S3 action groups.
//!
//! Base groups list their members directly; derived groups are defined as the
//! union of two other groups and resolved once, on first access.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};
use tracing::debug;

use crate::types::ActionGroup;

/// Names of the action groups in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, AsRefStr, EnumIter,
)]
pub enum GroupName {
    AllBucket,
    CommonBucket,
    ReadOnlyBucket,
    WriteOnlyBucket,
    ReadOnlyAllBuckets,
    ReadOnlyObject,
    UploadObject,
    WriteOnlyObject,
    AllObject,
    ReadWriteObject,
    ReadListObject,
    ReadListMultObject,
    ReadListMyObject,
}

enum Definition {
    Members(&'static [&'static str]),
    Union(GroupName, GroupName),
}

fn definition(name: GroupName) -> Definition {
    use Definition::{Members, Union};
    match name {
        GroupName::AllBucket => Members(&["s3:*"]),
        GroupName::CommonBucket => Members(&["s3:GetBucketLocation"]),
        GroupName::ReadOnlyBucket => Members(&["s3:ListBucket"]),
        GroupName::WriteOnlyBucket => Members(&["s3:ListBucketMultipartUploads"]),
        GroupName::ReadOnlyAllBuckets => Members(&["s3:ListBucket", "s3:ListAllMyBuckets"]),
        GroupName::ReadOnlyObject => Members(&["s3:GetObject"]),
        GroupName::UploadObject => Members(&["s3:PutObject"]),
        GroupName::WriteOnlyObject => Members(&[
            "s3:AbortMultipartUpload",
            "s3:DeleteObject",
            "s3:ListMultipartUploadParts",
            "s3:PutObject",
        ]),
        GroupName::AllObject => Members(&["s3:*Object"]),
        GroupName::ReadWriteObject => Union(GroupName::ReadOnlyObject, GroupName::WriteOnlyObject),
        GroupName::ReadListObject => Union(GroupName::ReadOnlyBucket, GroupName::CommonBucket),
        GroupName::ReadListMultObject => Union(GroupName::ReadListObject, GroupName::WriteOnlyBucket),
        GroupName::ReadListMyObject => Union(GroupName::ReadOnlyBucket, GroupName::ReadOnlyObject),
    }
}

fn resolve(name: GroupName) -> ActionGroup {
    match definition(name) {
        Definition::Members(tokens) => ActionGroup::from_static(tokens),
        Definition::Union(a, b) => union(&resolve(a), &resolve(b)),
    }
}

static CATALOG: Lazy<BTreeMap<GroupName, ActionGroup>> = Lazy::new(|| {
    let catalog: BTreeMap<_, _> = GroupName::iter().map(|name| (name, resolve(name))).collect();
    debug!(event = "Catalog", phase = "Initialized", groups = catalog.len());
    catalog
});

/// The action group registered under `name`.
pub fn group(name: GroupName) -> &'static ActionGroup {
    // Every variant is inserted when the catalog is built.
    &CATALOG[&name]
}

/// Pure union of two groups.
pub fn union(a: &ActionGroup, b: &ActionGroup) -> ActionGroup {
    a.union(b)
}

/// Snapshot of the whole catalog, for debugging and diagnostics.
pub fn groups() -> BTreeMap<GroupName, ActionGroup> {
    CATALOG.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn members(name: GroupName) -> Vec<&'static str> {
        group(name).iter().map(|a| a.as_str()).collect()
    }

    #[parameterized(
        all_bucket = { GroupName::AllBucket, &["s3:*"] },
        common_bucket = { GroupName::CommonBucket, &["s3:GetBucketLocation"] },
        read_only_bucket = { GroupName::ReadOnlyBucket, &["s3:ListBucket"] },
        write_only_bucket = { GroupName::WriteOnlyBucket, &["s3:ListBucketMultipartUploads"] },
        read_only_all_buckets = { GroupName::ReadOnlyAllBuckets, &["s3:ListAllMyBuckets", "s3:ListBucket"] },
        read_only_object = { GroupName::ReadOnlyObject, &["s3:GetObject"] },
        upload_object = { GroupName::UploadObject, &["s3:PutObject"] },
        write_only_object = { GroupName::WriteOnlyObject, &["s3:AbortMultipartUpload", "s3:DeleteObject", "s3:ListMultipartUploadParts", "s3:PutObject"] },
        all_object = { GroupName::AllObject, &["s3:*Object"] },
        read_write_object = { GroupName::ReadWriteObject, &["s3:AbortMultipartUpload", "s3:DeleteObject", "s3:GetObject", "s3:ListMultipartUploadParts", "s3:PutObject"] },
        read_list_object = { GroupName::ReadListObject, &["s3:GetBucketLocation", "s3:ListBucket"] },
        read_list_mult_object = { GroupName::ReadListMultObject, &["s3:GetBucketLocation", "s3:ListBucket", "s3:ListBucketMultipartUploads"] },
        read_list_my_object = { GroupName::ReadListMyObject, &["s3:GetObject", "s3:ListBucket"] },
    )]
    fn test_catalog_members(name: GroupName, expected: &[&str]) {
        assert_eq!(members(name), expected);
    }

    #[test]
    fn test_every_group_is_non_empty() {
        for name in GroupName::iter() {
            assert!(!group(name).is_empty(), "{name} is empty");
        }
    }

    #[test]
    fn test_groups_enumerates_whole_catalog() {
        let all = groups();
        assert_eq!(all.len(), GroupName::iter().count());
        assert_eq!(&all[&GroupName::UploadObject], group(GroupName::UploadObject));
    }

    #[test]
    fn test_groups_serialize_by_name() {
        let value = serde_json::to_value(groups()).unwrap();
        assert_eq!(value["AllObject"], serde_json::json!(["s3:*Object"]));
        assert_eq!(
            value["ReadOnlyAllBuckets"],
            serde_json::json!(["s3:ListAllMyBuckets", "s3:ListBucket"])
        );
    }
}
