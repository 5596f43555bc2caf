use std::{
    collections::BTreeSet,
    convert::TryInto,
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scope value that satisfies every scope requirement during introspection.
pub const ADMINISTRATOR_SCOPE: &str = "administrator";

/// Scope values the registry refuses to edit or delete.
pub const RESERVED_SCOPES: &[&str] = &[ADMINISTRATOR_SCOPE, "me"];

pub fn is_reserved_scope(value: &str) -> bool {
    RESERVED_SCOPES.contains(&value)
}

/// A set of OAuth2 scope strings.
///
/// Parts never contain whitespace and are never empty, whichever way the set was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope(BTreeSet<String>);

impl Scope {
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = parts
            .into_iter()
            .flat_map(|p| {
                p.as_ref()
                    .split_whitespace()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self(set)
    }

    pub fn from_delimited_parts(parts: &str) -> Self {
        Self::from_parts(parts.split_whitespace())
    }

    pub fn as_joined(&self) -> String {
        self.0
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(" ")
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    pub fn contains_all(&self, other: &Scope) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_administrator(&self) -> bool {
        self.contains(ADMINISTRATOR_SCOPE)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Delimited(String),
            Parts(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Delimited(s) => Self::from_delimited_parts(&s),
            Repr::Parts(parts) => Self::from_parts(parts),
        })
    }
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

/// Key used to address a scope: its database id or its OAuth2 string value.
///
/// Ids are accepted over the full JSON integer range; one the store cannot hold simply
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ScopeIdentifier {
    Id(i64),
    Value(String),
}

impl ScopeIdentifier {
    /// Only a value identifier can be recognised as reserved without a lookup.
    pub fn is_reserved(&self) -> bool {
        match self {
            Self::Id(_) => false,
            Self::Value(v) => is_reserved_scope(v),
        }
    }
}

impl FromStr for ScopeIdentifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Value(s.to_string()),
        })
    }
}

impl fmt::Display for ScopeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Value(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    AccessToken,
    RefreshToken,
}

/// A token value as presented by a caller.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenValue(pub String);

impl AsRef<str> for TokenValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenValue(..)")
    }
}

/// The lookup representation of a token value, as kept by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashedTokenValue(pub String);

impl From<String> for HashedTokenValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for HashedTokenValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(pub String);

/// Seconds since the UNIX epoch, the unit every stored timestamp uses.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
        .try_into()
        .unwrap_or(i64::MAX)
}
