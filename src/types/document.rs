//! Complete bucket policy documents.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

use super::action::Action;
use super::effect::Effect;
use super::principal::Principal;
use super::statement::{RawStatement, Statement};

/// Policy language version; the only one S3 and MinIO accept.
pub const POLICY_VERSION: &str = "2012-10-17";

const ALL_S3_ACTIONS: &str = "s3:*";

/// A policy document: the fixed version plus an ordered list of statements.
///
/// Invariants: at least one statement, and Sids are unique. Statement order
/// is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPolicyDocument")]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<Statement>) -> Result<Self, PolicyError> {
        if statements.is_empty() {
            return Err(PolicyError::EmptyPolicy);
        }
        if let Some(sid) = statements.iter().map(Statement::sid).duplicates().next() {
            return Err(PolicyError::DuplicateSid(sid.to_string()));
        }
        Ok(PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statements,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Look up a statement by its Sid.
    pub fn statement(&self, sid: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.sid() == sid)
    }

    /// Every action mentioned by any statement, regardless of effect.
    pub fn actions(&self) -> BTreeSet<&Action> {
        self.statements.iter().flat_map(|s| s.actions()).collect()
    }

    /// True when some statement allows every S3 action to anonymous callers.
    pub fn is_public(&self) -> bool {
        self.statements.iter().any(|s| {
            s.effect() == Effect::Allow
                && s.principal().is_some_and(Principal::is_anonymous)
                && s.actions().iter().any(|a| a.as_str() == ALL_S3_ACTIONS)
        })
    }
}

impl Display for PolicyDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Version {} [{}]",
            self.version,
            self.statements.iter().join("; ")
        )
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicyDocument {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<RawStatement>,
}

impl TryFrom<RawPolicyDocument> for PolicyDocument {
    type Error = PolicyError;

    fn try_from(raw: RawPolicyDocument) -> Result<Self, Self::Error> {
        if raw.version != POLICY_VERSION {
            return Err(PolicyError::InvalidVersion(format!(
                "'{}' (expected '{POLICY_VERSION}')",
                raw.version
            )));
        }

        let statements = raw
            .statements
            .into_iter()
            .enumerate()
            .map(|(index, statement)| {
                Statement::try_from(statement).map_err(|e| PolicyError::at_statement(index, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        PolicyDocument::new(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GroupName, group};
    use crate::error::StatementError;
    use crate::types::Resource;

    fn statement(sid: &str, effect: Effect, group_name: GroupName) -> Statement {
        Statement::builder(sid)
            .effect(effect)
            .principal(Principal::Anonymous)
            .actions(group(group_name))
            .resource(Resource::bucket("data").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(PolicyDocument::new(Vec::new()), Err(PolicyError::EmptyPolicy));
    }

    #[test]
    fn test_new_rejects_duplicate_sids() {
        let result = PolicyDocument::new(vec![
            statement("Same", Effect::Allow, GroupName::ReadOnlyBucket),
            statement("Other", Effect::Allow, GroupName::ReadOnlyObject),
            statement("Same", Effect::Deny, GroupName::ReadOnlyBucket),
        ]);
        assert_eq!(result, Err(PolicyError::DuplicateSid("Same".to_string())));
    }

    #[test]
    fn test_statement_lookup_and_order() {
        let doc = PolicyDocument::new(vec![
            statement("B", Effect::Allow, GroupName::ReadOnlyBucket),
            statement("A", Effect::Deny, GroupName::ReadOnlyObject),
        ])
        .unwrap();
        assert_eq!(doc.version(), POLICY_VERSION);
        let sids: Vec<&str> = doc.statements().iter().map(Statement::sid).collect();
        assert_eq!(sids, vec!["B", "A"]);
        assert_eq!(doc.statement("A").unwrap().effect(), Effect::Deny);
        assert!(doc.statement("C").is_none());
    }

    #[test]
    fn test_actions_union() {
        let doc = PolicyDocument::new(vec![
            statement("One", Effect::Allow, GroupName::ReadListObject),
            statement("Two", Effect::Allow, GroupName::ReadListMyObject),
        ])
        .unwrap();
        let actions: Vec<&str> = doc.actions().into_iter().map(Action::as_str).collect();
        assert_eq!(
            actions,
            vec!["s3:GetBucketLocation", "s3:GetObject", "s3:ListBucket"]
        );
    }

    #[test]
    fn test_is_public() {
        let public = PolicyDocument::new(vec![statement("All", Effect::Allow, GroupName::AllBucket)]).unwrap();
        let denied = PolicyDocument::new(vec![statement("All", Effect::Deny, GroupName::AllBucket)]).unwrap();
        let narrow = PolicyDocument::new(vec![statement("Get", Effect::Allow, GroupName::ReadOnlyObject)]).unwrap();
        assert!(public.is_public());
        assert!(!denied.is_public());
        assert!(!narrow.is_public());
    }

    #[test]
    fn test_deserialize_rejects_wrong_version() {
        let input = r#"{"Version":"2008-10-17","Statement":[{"Sid":"a","Effect":"Allow","Action":["s3:*"],"Resource":["arn:aws:s3:::b"]}]}"#;
        let err = serde_json::from_str::<PolicyDocument>(input).unwrap_err();
        assert!(err.to_string().contains("unsupported policy version"));
    }

    #[test]
    fn test_try_from_reports_statement_index() {
        let raw: RawPolicyDocument = serde_json::from_str(
            r#"{"Version":"2012-10-17","Statement":[
                {"Sid":"ok","Effect":"Allow","Action":"s3:*","Resource":"arn:aws:s3:::b"},
                {"Sid":"bad","Effect":"Allow","Action":[],"Resource":"arn:aws:s3:::b"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            PolicyDocument::try_from(raw),
            Err(PolicyError::at_statement(
                1,
                StatementError::EmptyActions {
                    sid: "bad".to_string()
                }
            ))
        );
    }
}
