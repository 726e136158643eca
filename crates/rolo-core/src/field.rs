//! The field catalog — every extractable contact attribute.
//!
//! A field is self-describing: it knows whether it lives on the contacts
//! table (one row per contact) or in the data table (zero-or-many rows,
//! keyed by mimetype), which columns it needs to decode, and, for data
//! fields, its cardinality. The enum is closed on purpose: adding a field
//! is a compile-time-checked, exhaustive change in the query builder and
//! the aggregator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::{columns, mime};

// ─── Field ───────────────────────────────────────────────────────────────────

/// One extractable attribute of a contact.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
  // ── contacts table, exactly one row per contact ───────────────────────
  Name,
  Starred,
  LookupKey,

  // ── data table, zero-or-many rows per contact ─────────────────────────
  Phones,
  Emails,
  Addresses,
  Organization,
  Events,
  Relations,
  Websites,
  Note,
}

/// How many values of a data field a contact may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  /// At most one row per contact; duplicate rows in the store are tolerated
  /// by keeping the first one encountered.
  Single,
  /// A variable-length list; every matching row is kept.
  List,
}

/// Where a field's rows live and what it takes to decode them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// A column on the contacts table.
  Contact { column: &'static str },
  /// Rows in the data table matching `mime_type`.
  Data {
    mime_type:   &'static str,
    columns:     &'static [&'static str],
    cardinality: Cardinality,
  },
}

impl Field {
  /// Every field, in catalog order.
  pub const ALL: [Field; 11] = [
    Field::Name,
    Field::Starred,
    Field::LookupKey,
    Field::Phones,
    Field::Emails,
    Field::Addresses,
    Field::Organization,
    Field::Events,
    Field::Relations,
    Field::Websites,
    Field::Note,
  ];

  pub fn kind(self) -> FieldKind {
    match self {
      Field::Name => FieldKind::Contact { column: columns::DISPLAY_NAME },
      Field::Starred => FieldKind::Contact { column: columns::STARRED },
      Field::LookupKey => FieldKind::Contact { column: columns::LOOKUP_KEY },

      Field::Phones => FieldKind::Data {
        mime_type:   mime::PHONE,
        columns:     &[columns::DATA1, columns::DATA2],
        cardinality: Cardinality::List,
      },
      Field::Emails => FieldKind::Data {
        mime_type:   mime::EMAIL,
        columns:     &[columns::DATA1, columns::DATA2],
        cardinality: Cardinality::List,
      },
      Field::Addresses => FieldKind::Data {
        mime_type:   mime::ADDRESS,
        columns:     &[
          columns::DATA1,
          columns::DATA2,
          columns::DATA3,
          columns::DATA4,
          columns::DATA5,
          columns::DATA6,
        ],
        cardinality: Cardinality::List,
      },
      Field::Organization => FieldKind::Data {
        mime_type:   mime::ORGANIZATION,
        columns:     &[columns::DATA1, columns::DATA3],
        cardinality: Cardinality::Single,
      },
      Field::Events => FieldKind::Data {
        mime_type:   mime::EVENT,
        columns:     &[columns::DATA1, columns::DATA2],
        cardinality: Cardinality::List,
      },
      Field::Relations => FieldKind::Data {
        mime_type:   mime::RELATION,
        columns:     &[columns::DATA1, columns::DATA2],
        cardinality: Cardinality::List,
      },
      Field::Websites => FieldKind::Data {
        mime_type:   mime::WEBSITE,
        columns:     &[columns::DATA1, columns::DATA2],
        cardinality: Cardinality::List,
      },
      Field::Note => FieldKind::Data {
        mime_type:   mime::NOTE,
        columns:     &[columns::DATA1],
        cardinality: Cardinality::Single,
      },
    }
  }

  /// The mimetype this field matches in the data table, if it is a data
  /// field.
  pub fn mime_type(self) -> Option<&'static str> {
    match self.kind() {
      FieldKind::Contact { .. } => None,
      FieldKind::Data { mime_type, .. } => Some(mime_type),
    }
  }

  pub fn is_data(self) -> bool {
    matches!(self.kind(), FieldKind::Data { .. })
  }
}

// ─── FieldSet ────────────────────────────────────────────────────────────────

/// The set of fields a caller wants populated.
///
/// Iteration order is catalog order, which keeps generated projections and
/// selections deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<Field>);

impl FieldSet {
  pub fn new() -> Self { Self::default() }

  /// Every catalog field.
  pub fn all() -> Self { Field::ALL.into_iter().collect() }

  /// Builder-style insertion.
  pub fn with(mut self, field: Field) -> Self {
    self.0.insert(field);
    self
  }

  pub fn insert(&mut self, field: Field) { self.0.insert(field); }

  pub fn contains(&self, field: Field) -> bool { self.0.contains(&field) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
    self.0.iter().copied()
  }

  /// The requested contacts-table fields.
  pub fn contact_fields(&self) -> impl Iterator<Item = Field> + '_ {
    self.iter().filter(|f| !f.is_data())
  }

  /// The requested data-table fields.
  pub fn data_fields(&self) -> impl Iterator<Item = Field> + '_ {
    self.iter().filter(|f| f.is_data())
  }
}

impl FromIterator<Field> for FieldSet {
  fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl From<&[Field]> for FieldSet {
  fn from(fields: &[Field]) -> Self {
    fields.iter().copied().collect()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
