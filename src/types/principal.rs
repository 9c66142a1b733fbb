//! Statement principals: anonymous (`"*"`) or named identities.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::set::one_or_many;

const ANONYMOUS: &str = "*";
const AWS_KEY: &str = "AWS";
const CANONICAL_USER_KEY: &str = "CanonicalUser";

/// The identity a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    /// Everyone, rendered as the literal `"*"`.
    Anonymous,
    /// Named identities, rendered as `{"AWS":[..],"CanonicalUser":[..]}`.
    /// Empty lists are omitted from the wire form.
    Identities {
        aws: BTreeSet<String>,
        canonical_user: BTreeSet<String>,
    },
}

impl Principal {
    /// A principal naming AWS identities (account ids, ARNs or `*`).
    pub fn aws<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Principal::Identities {
            aws: identities.into_iter().map(Into::into).collect(),
            canonical_user: BTreeSet::new(),
        }
    }

    /// A principal naming canonical-user identities.
    pub fn canonical_users<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Principal::Identities {
            aws: BTreeSet::new(),
            canonical_user: identities.into_iter().map(Into::into).collect(),
        }
    }

    /// Add canonical-user identities to this principal.
    ///
    /// Turning an anonymous principal into a structured one drops the
    /// wildcard.
    pub fn with_canonical_users<I, S>(self, identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extra: Vec<String> = identities.into_iter().map(Into::into).collect();
        match self {
            Principal::Anonymous => Principal::canonical_users(extra),
            Principal::Identities {
                aws,
                mut canonical_user,
            } => {
                canonical_user.extend(extra);
                Principal::Identities { aws, canonical_user }
            }
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Principal::Anonymous => f.write_str(ANONYMOUS),
            Principal::Identities {
                aws,
                canonical_user,
            } => {
                let names: Vec<String> = aws
                    .iter()
                    .map(|id| format!("{AWS_KEY}:{id}"))
                    .chain(canonical_user.iter().map(|id| format!("{CANONICAL_USER_KEY}:{id}")))
                    .collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

impl Serialize for Principal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Principal::Anonymous => serializer.serialize_str(ANONYMOUS),
            Principal::Identities {
                aws,
                canonical_user,
            } => {
                let len = usize::from(!aws.is_empty()) + usize::from(!canonical_user.is_empty());
                let mut map = serializer.serialize_map(Some(len))?;
                if !aws.is_empty() {
                    map.serialize_entry(AWS_KEY, aws)?;
                }
                if !canonical_user.is_empty() {
                    map.serialize_entry(CANONICAL_USER_KEY, canonical_user)?;
                }
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IdentitiesDoc {
    #[serde(rename = "AWS", default, deserialize_with = "one_or_many")]
    aws: BTreeSet<String>,
    #[serde(rename = "CanonicalUser", default, deserialize_with = "one_or_many")]
    canonical_user: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrincipalRepr {
    Literal(String),
    Identities(IdentitiesDoc),
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PrincipalRepr::deserialize(deserializer)? {
            PrincipalRepr::Literal(s) if s == ANONYMOUS => Ok(Principal::Anonymous),
            PrincipalRepr::Literal(s) => Err(serde::de::Error::custom(format!(
                "expected principal \"*\" or an identity document, found \"{s}\""
            ))),
            PrincipalRepr::Identities(doc) => Ok(Principal::Identities {
                aws: doc.aws,
                canonical_user: doc.canonical_user,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_anonymous_serializes_as_star() {
        assert_eq!(serde_json::to_string(&Principal::Anonymous).unwrap(), r#""*""#);
    }

    #[test]
    fn test_identities_omit_empty_lists() {
        let principal = Principal::aws(["arn:aws:iam::123456789012:root"]);
        assert_eq!(
            serde_json::to_string(&principal).unwrap(),
            r#"{"AWS":["arn:aws:iam::123456789012:root"]}"#
        );
    }

    #[test]
    fn test_identities_key_order_and_sorting() {
        let principal = Principal::aws(["222", "111"]).with_canonical_users(["c0ffee"]);
        assert_eq!(
            serde_json::to_string(&principal).unwrap(),
            r#"{"AWS":["111","222"],"CanonicalUser":["c0ffee"]}"#
        );
    }

    #[test]
    fn test_anonymous_with_canonical_users_becomes_structured() {
        let principal = Principal::Anonymous.with_canonical_users(["abc"]);
        assert!(!principal.is_anonymous());
        assert_eq!(principal, Principal::canonical_users(["abc"]));
    }

    #[parameterized(
        star = { r#""*""#, Principal::Anonymous },
        aws_single = { r#"{"AWS":"111"}"#, Principal::aws(["111"]) },
        aws_list = { r#"{"AWS":["222","111"]}"#, Principal::aws(["111", "222"]) },
        canonical = { r#"{"CanonicalUser":"abc"}"#, Principal::canonical_users(["abc"]) },
    )]
    fn test_principal_deserialize(input: &str, expected: Principal) {
        let principal: Principal = serde_json::from_str(input).unwrap();
        assert_eq!(principal, expected);
    }

    #[parameterized(
        other_literal = { r#""someone""# },
        unknown_key = { r#"{"Service":"s3.amazonaws.com"}"# },
        number = { "42" },
    )]
    fn test_principal_deserialize_rejects(input: &str) {
        assert!(serde_json::from_str::<Principal>(input).is_err());
    }

    #[test]
    fn test_principal_display() {
        assert_eq!(Principal::Anonymous.to_string(), "*");
        assert_eq!(Principal::aws(["111"]).to_string(), "[AWS:111]");
    }
}
