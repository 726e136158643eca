//! Store-assigned identifiers.
//!
//! All three are opaque strings minted by the row store. They are distinct
//! types because they address distinct things: an aggregated contact, the
//! single writable raw contact behind it, and one data row.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an aggregated contact — what the store has already merged from
/// one or more raw contacts. Immutable once assigned.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(pub String);

/// Identifies the single underlying writable contact record. Under the
/// local-account assumption a [`ContactId`] resolves to at most one of
/// these; resolution may fail if the contact was removed concurrently.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RawContactId(pub String);

/// Identifies one data row (e.g. one specific phone number entry). Required
/// to target updates and deletes at that row rather than the whole field.
/// Destroyed when the row is deleted.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DataId(pub String);

impl ContactId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl RawContactId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl DataId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl fmt::Display for RawContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl fmt::Display for DataId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for ContactId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<String> for RawContactId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<String> for DataId {
  fn from(s: String) -> Self { Self(s) }
}
