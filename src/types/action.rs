//! S3 action tokens and immutable action groups.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

static ACTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+:[A-Za-z*]+$").expect("action pattern is a valid regex"));

/// A permissioned operation name, e.g. `s3:GetObject` or `s3:*Object`.
///
/// Ordering is byte-wise lexicographic, which is the order actions are
/// emitted in on the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Action(String);

impl Action {
    /// Build an action from a catalog literal without validating it.
    pub(crate) fn known(token: &'static str) -> Self {
        Action(token.to_string())
    }

    /// The service part of the token, e.g. `s3`.
    pub fn service(&self) -> &str {
        self.0.split_once(':').map(|(svc, _)| svc).unwrap_or_default()
    }

    /// The verb part of the token, e.g. `GetObject`.
    pub fn verb(&self) -> &str {
        self.0.split_once(':').map(|(_, verb)| verb).unwrap_or_default()
    }

    pub fn is_wildcard(&self) -> bool {
        self.verb().contains('*')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for Action {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !ACTION_PATTERN.is_match(s) {
            return Err(PolicyError::InvalidAction(format!(
                "'{s}' (expected format: service:Verb, verb may contain '*')"
            )));
        }
        Ok(Action(s.to_string()))
    }
}

impl TryFrom<String> for Action {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.0
    }
}

/// An immutable set of actions.
///
/// Groups are never mutated after construction; derived groups come from
/// [`ActionGroup::union`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ActionGroup {
    actions: BTreeSet<Action>,
}

impl ActionGroup {
    /// Collect actions into a group. Returns `None` for an empty input.
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Option<Self> {
        let actions: BTreeSet<Action> = actions.into_iter().collect();
        (!actions.is_empty()).then_some(ActionGroup { actions })
    }

    pub(crate) fn from_static(tokens: &[&'static str]) -> Self {
        ActionGroup {
            actions: tokens.iter().copied().map(Action::known).collect(),
        }
    }

    /// Set union of two groups. Commutative, associative and idempotent.
    pub fn union(&self, other: &ActionGroup) -> ActionGroup {
        ActionGroup {
            actions: self.actions.union(&other.actions).cloned().collect(),
        }
    }

    pub fn contains(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a.as_str() == action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn actions(&self) -> &BTreeSet<Action> {
        &self.actions
    }
}

impl From<ActionGroup> for BTreeSet<Action> {
    fn from(group: ActionGroup) -> Self {
        group.actions
    }
}
