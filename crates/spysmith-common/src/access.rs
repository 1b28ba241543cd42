//! Access levels for emitted declarations.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Swift access level, ordered from most restrictive to most permissive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    Fileprivate,
    Internal,
    Package,
    Public,
    Open,
}

impl AccessLevel {
    pub const ALL: [Self; 6] = [
        Self::Private,
        Self::Fileprivate,
        Self::Internal,
        Self::Package,
        Self::Public,
        Self::Open,
    ];

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Fileprivate => "fileprivate",
            Self::Internal => "internal",
            Self::Package => "package",
            Self::Public => "public",
            Self::Open => "open",
        }
    }

    /// The level actually written on spy members.
    ///
    /// A `private` spy would be unusable outside its own declaration scope, so
    /// it is widened to `fileprivate`. Every other level is kept.
    #[must_use]
    pub const fn emittable(self) -> Self {
        match self {
            Self::Private => Self::Fileprivate,
            other => other,
        }
    }

    /// Parse a keyword, tolerating case and a leading `.` (`.public`).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.keyword() == normalized)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown access level '{s}'"))
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let text = String::deserialize(deserializer)?;
        Self::parse(&text).ok_or_else(|| {
            Error::custom(format!(
                "invalid access level: '{text}'. Expected one of private, fileprivate, internal, package, public, open"
            ))
        })
    }
}
