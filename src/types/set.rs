//! Serde helpers for the "one value or a list of values" shape AWS policies use.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Deserialize either a single element or an array into an ordered set.
///
/// Sets are always serialized as arrays, so this only widens what the parser
/// accepts.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Ord,
{
    Ok(match OneOrMany::<T>::deserialize(deserializer)? {
        OneOrMany::One(value) => BTreeSet::from([value]),
        OneOrMany::Many(values) => values.into_iter().collect(),
    })
}
