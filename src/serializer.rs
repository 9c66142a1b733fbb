//! Canonical JSON wire form of policy documents.
//!
//! Output is compact UTF-8 without BOM or trailing whitespace. Keys follow the
//! struct field order (`Version`, `Statement`; `Sid`, `Effect`, `Principal`,
//! `Action`, `Resource`, `Condition`) and every set is an array sorted
//! lexicographically, one-element sets included. The encoding is therefore a
//! pure function of the document, and parsing it back then re-serializing
//! yields identical bytes.

use tracing::{debug, error};

use crate::error::PolicyError;
use crate::types::PolicyDocument;

/// Render `doc` in canonical form.
pub fn to_canonical_json(doc: &PolicyDocument) -> Result<Vec<u8>, PolicyError> {
    serde_json::to_vec(doc).map_err(|e| {
        error!(event = "Serialize", phase = "Canonical", error = %e);
        PolicyError::SerializationFailure(e.to_string())
    })
}

/// [`to_canonical_json`] as a `String`.
pub fn to_canonical_string(doc: &PolicyDocument) -> Result<String, PolicyError> {
    serde_json::to_string(doc).map_err(|e| {
        error!(event = "Serialize", phase = "Canonical", error = %e);
        PolicyError::SerializationFailure(e.to_string())
    })
}

/// Indented rendering with the canonical key and member order, for humans.
pub fn to_pretty_string(doc: &PolicyDocument) -> Result<String, PolicyError> {
    serde_json::to_string_pretty(doc).map_err(|e| {
        error!(event = "Serialize", phase = "Pretty", error = %e);
        PolicyError::SerializationFailure(e.to_string())
    })
}

/// Parse a policy document, checking every document and statement invariant.
///
/// Besides the canonical form this accepts single strings where AWS allows
/// them (actions, resources, principal lists, condition values).
pub fn parse(bytes: &[u8]) -> Result<PolicyDocument, PolicyError> {
    serde_json::from_slice(bytes).map_err(|e| {
        debug!(event = "Parse", phase = "Document", error = %e);
        PolicyError::ParseError(e.to_string())
    })
}

/// [`parse`] for string input.
pub fn parse_str(text: &str) -> Result<PolicyDocument, PolicyError> {
    parse(text.as_bytes())
}
