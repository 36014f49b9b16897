//! Identity, selector and address types.
//!
//! Raw identifier strings are parsed once at the boundary. Namespace
//! membership is carried by the enum variant from then on.

use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selector value that targets every registered dietitian.
pub const ALL_DIETITIANS: &str = "all-dietitians";

/// The disjoint identity namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Ordinary users. Any identifier without a reserved prefix.
    User,
    /// Dietitians, marked by the `dietitian-` prefix.
    Dietitian,
}

impl Namespace {
    /// Reserved identifier prefix for this namespace, if any.
    #[must_use]
    pub const fn prefix(&self) -> Option<&'static str> {
        match self {
            Namespace::User => None,
            Namespace::Dietitian => Some("dietitian-"),
        }
    }

    fn of(raw: &str) -> Self {
        match Namespace::Dietitian.prefix() {
            Some(prefix) if raw.starts_with(prefix) => Namespace::Dietitian,
            _ => Namespace::User,
        }
    }
}

/// A registration target.
///
/// Holds the full identifier exactly as the client sent it, so
/// `Identity::parse(s)?.as_str() == s`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Identity {
    User(String),
    Dietitian(String),
}

impl Identity {
    /// Parses a raw identifier, classifying it by prefix.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(match Namespace::of(raw) {
            Namespace::User => Identity::User(raw.to_string()),
            Namespace::Dietitian => Identity::Dietitian(raw.to_string()),
        })
    }

    /// Returns the namespace this identity belongs to.
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        match self {
            Identity::User(_) => Namespace::User,
            Identity::Dietitian(_) => Namespace::Dietitian,
        }
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Identity::User(id) | Identity::Dietitian(id) => id,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        match identity {
            Identity::User(id) | Identity::Dietitian(id) => id,
        }
    }
}

/// Who a notification should go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelector {
    /// Broadcast to every registered dietitian.
    AllDietitians,
    /// A single user or dietitian.
    Single(Identity),
}

impl RecipientSelector {
    /// Parses a caller-supplied recipient id.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        if raw == ALL_DIETITIANS {
            return Ok(RecipientSelector::AllDietitians);
        }
        Identity::parse(raw).map(RecipientSelector::Single)
    }

    /// Returns true for the broadcast selector.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        matches!(self, RecipientSelector::AllDietitians)
    }
}

impl fmt::Display for RecipientSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientSelector::AllDietitians => f.write_str(ALL_DIETITIANS),
            RecipientSelector::Single(identity) => f.write_str(identity.as_str()),
        }
    }
}

impl FromStr for RecipientSelector {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An opaque provider push address.
///
/// Construction does not check the format; see
/// [`is_valid_address`](crate::is_valid_address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushAddress(String);

impl PushAddress {
    /// Wraps a raw address string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PushAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PushAddress {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PushAddress {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
