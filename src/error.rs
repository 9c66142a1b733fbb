use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Faults detected while assembling a single statement.
///
/// These indicate a broken recipe rather than bad caller input; the composer
/// wraps them in [`PolicyError::InvalidStatement`] together with the index of
/// the offending row.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatementError {
    #[error("statement sid must not be empty")]
    EmptySid,

    #[error("statement '{sid}' has no actions")]
    EmptyActions { sid: String },

    #[error("statement '{sid}' has no resources")]
    EmptyResources { sid: String },

    #[error("statement '{sid}' has invalid effect '{effect}' (expected Allow or Deny)")]
    InvalidEffect { sid: String, effect: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid bucket name: {0}")]
    InvalidBucketName(String),

    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    #[error("invalid statement at index {index}: {source}")]
    InvalidStatement {
        index: usize,
        #[source]
        source: StatementError,
    },

    #[error("duplicate statement sid: {0}")]
    DuplicateSid(String),

    #[error("policy document must contain at least one statement")]
    EmptyPolicy,

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unsupported policy version: {0}")]
    InvalidVersion(String),

    #[error("failed to parse policy: {0}")]
    ParseError(String),

    #[error("failed to serialize policy: {0}")]
    SerializationFailure(String),
}

impl PolicyError {
    /// Wrap a statement fault with the position of the statement in its document.
    pub fn at_statement(index: usize, source: StatementError) -> Self {
        PolicyError::InvalidStatement { index, source }
    }
}
