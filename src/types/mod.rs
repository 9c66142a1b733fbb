//! Value types of the bucket-policy model.
//!
//! Canonical string forms:
//! - Action: `s3:GetObject`, `s3:*Object`, `s3:*`
//! - Resource: `arn:aws:s3:::*`, `arn:aws:s3:::bucket`, `arn:aws:s3:::bucket/*`
//! - Principal: `"*"` or `{"AWS":[..],"CanonicalUser":[..]}`
//!
//! Sets are ordered (`BTreeSet`) so their wire order is lexicographic.

mod action;
mod condition;
mod document;
mod effect;
mod principal;
mod resource;
mod set;
mod statement;

pub use action::{Action, ActionGroup};
pub use condition::Conditions;
pub use document::{POLICY_VERSION, PolicyDocument};
pub use effect::Effect;
pub use principal::Principal;
pub use resource::{ARN_PREFIX, Resource, ResourceScope, validate_bucket_name};
pub use statement::{Statement, StatementBuilder};
