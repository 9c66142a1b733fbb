//! Statement conditions: operator -> condition key -> set of values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::set::one_or_many;

#[derive(Deserialize)]
#[serde(transparent)]
struct ValueSet(#[serde(deserialize_with = "one_or_many")] BTreeSet<String>);

/// Condition block of a statement, e.g.
/// `{"StringEquals":{"s3:prefix":["home/"]}}`.
///
/// Operators and keys are kept sorted; an empty block is omitted from the
/// wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Conditions(BTreeMap<String, BTreeMap<String, BTreeSet<String>>>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values under `operator` / `key`, merging with any existing values.
    pub fn insert<I, S>(&mut self, operator: impl Into<String>, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(operator.into())
            .or_default()
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Builder form of [`Conditions::insert`].
    pub fn with<I, S>(mut self, operator: impl Into<String>, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(operator, key, values);
        self
    }

    pub fn get(&self, operator: &str, key: &str) -> Option<&BTreeSet<String>> {
        self.0.get(operator).and_then(|keys| keys.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for Conditions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, BTreeMap<String, ValueSet>>::deserialize(deserializer)?;
        let mut conditions = Conditions::new();
        for (operator, keys) in raw {
            for (key, ValueSet(values)) in keys {
                conditions.insert(operator.clone(), key, values);
            }
        }
        Ok(conditions)
    }
}
