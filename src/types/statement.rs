//! Policy statements and their builder.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::StatementError;

use super::action::{Action, ActionGroup};
use super::condition::Conditions;
use super::effect::Effect;
use super::principal::Principal;
use super::resource::Resource;
use super::set::one_or_many;

/// One statement of a bucket policy.
///
/// Field order is the canonical wire order: `Sid`, `Effect`, `Principal`,
/// `Action`, `Resource`, `Condition`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStatement")]
pub struct Statement {
    #[serde(rename = "Sid")]
    sid: String,
    #[serde(rename = "Effect")]
    effect: Effect,
    #[serde(rename = "Principal", skip_serializing_if = "Option::is_none")]
    principal: Option<Principal>,
    #[serde(rename = "Action")]
    actions: BTreeSet<Action>,
    #[serde(rename = "Resource")]
    resources: BTreeSet<Resource>,
    #[serde(rename = "Condition", skip_serializing_if = "Conditions::is_empty")]
    conditions: Conditions,
}

impl Statement {
    pub fn builder(sid: impl Into<String>) -> StatementBuilder {
        StatementBuilder::new(sid)
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn actions(&self) -> &BTreeSet<Action> {
        &self.actions
    }

    pub fn resources(&self) -> &BTreeSet<Resource> {
        &self.resources
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: {} {} [{}] on [{}]",
            self.sid,
            self.effect,
            self.principal
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            self.actions.iter().join(", "),
            self.resources.iter().join(", ")
        )
    }
}

/// Assembles a [`Statement`], checking its invariants in [`StatementBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    sid: String,
    effect: Option<Effect>,
    rejected_effect: Option<String>,
    principal: Option<Principal>,
    actions: BTreeSet<Action>,
    resources: BTreeSet<Resource>,
    conditions: Conditions,
}

impl StatementBuilder {
    pub fn new(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            ..Self::default()
        }
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self.rejected_effect = None;
        self
    }

    /// Set the effect from its wire name (`Allow` or `Deny`).
    ///
    /// An unknown name is kept and reported by [`StatementBuilder::build`].
    pub fn effect_name(mut self, name: &str) -> Self {
        match Effect::from_str(name) {
            Ok(effect) => self.effect(effect),
            Err(_) => {
                self.effect = None;
                self.rejected_effect = Some(name.to_string());
                self
            }
        }
    }

    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Add every action of `group`.
    pub fn actions(mut self, group: &ActionGroup) -> Self {
        self.actions.extend(group.iter().cloned());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.insert(action);
        self
    }

    pub fn resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.insert(resource);
        self
    }

    pub fn condition<I, S>(mut self, operator: impl Into<String>, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.insert(operator, key, values);
        self
    }

    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn build(self) -> Result<Statement, StatementError> {
        if self.sid.trim().is_empty() {
            return Err(StatementError::EmptySid);
        }

        let effect = match (self.effect, self.rejected_effect) {
            (Some(effect), _) => effect,
            (None, rejected) => {
                return Err(StatementError::InvalidEffect {
                    sid: self.sid,
                    effect: rejected.unwrap_or_default(),
                });
            }
        };

        if self.actions.is_empty() {
            return Err(StatementError::EmptyActions { sid: self.sid });
        }
        if self.resources.is_empty() {
            return Err(StatementError::EmptyResources { sid: self.sid });
        }

        Ok(Statement {
            sid: self.sid,
            effect,
            principal: self.principal,
            actions: self.actions,
            resources: self.resources,
            conditions: self.conditions,
        })
    }
}

/// Wire shape accepted by the parser; validated through [`StatementBuilder`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawStatement {
    #[serde(rename = "Sid", default)]
    sid: String,
    #[serde(rename = "Effect", default)]
    effect: String,
    #[serde(rename = "Principal", default)]
    principal: Option<Principal>,
    #[serde(rename = "Action", default, deserialize_with = "one_or_many")]
    actions: BTreeSet<Action>,
    #[serde(rename = "Resource", default, deserialize_with = "one_or_many")]
    resources: BTreeSet<Resource>,
    #[serde(rename = "Condition", default)]
    conditions: Conditions,
}

impl TryFrom<RawStatement> for Statement {
    type Error = StatementError;

    fn try_from(raw: RawStatement) -> Result<Self, Self::Error> {
        let mut builder = StatementBuilder::new(raw.sid)
            .effect_name(&raw.effect)
            .resources(raw.resources)
            .conditions(raw.conditions);
        builder.actions = raw.actions;
        builder.principal = raw.principal;
        builder.build()
    }
}
