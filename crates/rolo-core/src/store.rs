//! The `StoreClient` trait and the row/value/batch types that cross it.
//!
//! The trait is the boundary to the platform row store: a URI-addressed,
//! column-oriented table store with blocking I/O behind an async facade.
//! Backends implement it in their own crate (e.g. `rolo-store-sqlite`);
//! the engine depends on this abstraction only.

use std::{collections::HashMap, future::Future};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The three addressable tables of the contact store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
  /// Aggregated contacts, derived by the store. The engine only reads this
  /// table; all writes go through raw contacts and data rows.
  Contacts,
  /// The writable per-account contact records.
  RawContacts,
  /// The generic multi-valued rows, tagged by mimetype.
  Data,
}

impl Table {
  pub fn as_str(self) -> &'static str {
    match self {
      Table::Contacts => "contacts",
      Table::RawContacts => "raw_contacts",
      Table::Data => "data",
    }
  }
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single store cell. The store is loosely typed; everything the engine
/// reads and writes fits in these three shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Text(String),
  Integer(i64),
  Null,
}

impl Value {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Value::Text(s) => Some(s),
      Value::Integer(_) | Value::Null => None,
    }
  }

  pub fn as_integer(&self) -> Option<i64> {
    match self {
      Value::Integer(n) => Some(*n),
      Value::Text(_) | Value::Null => None,
    }
  }

  pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Value::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Value::Text(s) }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self { Value::Integer(n) }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self { Value::Integer(b as i64) }
}

impl From<Option<String>> for Value {
  fn from(s: Option<String>) -> Self {
    match s {
      Some(s) => Value::Text(s),
      None => Value::Null,
    }
  }
}

// ─── RowValues ───────────────────────────────────────────────────────────────

/// The column → value map submitted with an insert or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
  entries: Vec<(&'static str, Value)>,
}

impl RowValues {
  pub fn new() -> Self { Self::default() }

  /// Builder-style put. Re-putting a column overwrites the earlier value.
  pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
    self.set(column, value);
    self
  }

  pub fn set(&mut self, column: &'static str, value: impl Into<Value>) {
    let value = value.into();
    if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
      entry.1 = value;
    } else {
      self.entries.push((column, value));
    }
  }

  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .entries
      .iter()
      .find(|(c, _)| *c == column)
      .map(|(_, v)| v)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
    self.entries.iter().map(|(c, v)| (*c, v))
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

// ─── Row & Cursor ────────────────────────────────────────────────────────────

/// One physical row read back from the store: a column → value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
  values: HashMap<String, Value>,
}

impl Row {
  pub fn new(values: impl IntoIterator<Item = (String, Value)>) -> Self {
    Self { values: values.into_iter().collect() }
  }

  pub fn get(&self, column: &str) -> Option<&Value> { self.values.get(column) }

  /// Text content of a column; `None` for null or absent.
  pub fn text(&self, column: &str) -> Option<&str> {
    self.values.get(column).and_then(Value::as_text)
  }

  pub fn integer(&self, column: &str) -> Option<i64> {
    self.values.get(column).and_then(Value::as_integer)
  }

  /// Boolean reading of an integer flag column.
  pub fn flag(&self, column: &str) -> Option<bool> {
    self.integer(column).map(|n| n != 0)
  }

  /// An id column rendered as its string form. The store is free to hand
  /// ids back as integers or text; both are accepted.
  pub fn id(&self, column: &str) -> Option<String> {
    match self.values.get(column)? {
      Value::Text(s) => Some(s.clone()),
      Value::Integer(n) => Some(n.to_string()),
      Value::Null => None,
    }
  }
}

/// An open result set, positioned before the first row.
///
/// A cursor is iterated exactly once and is closed by `Drop` on every exit
/// path, including early returns and cancellation.
#[derive(Debug)]
pub struct Cursor {
  rows: std::vec::IntoIter<Row>,
}

impl Cursor {
  pub fn from_rows(rows: Vec<Row>) -> Self {
    Self { rows: rows.into_iter() }
  }

  /// Rows not yet consumed.
  pub fn remaining(&self) -> usize { self.rows.len() }
}

impl Iterator for Cursor {
  type Item = Row;

  fn next(&mut self) -> Option<Row> { self.rows.next() }

  fn size_hint(&self) -> (usize, Option<usize>) { self.rows.size_hint() }
}

impl ExactSizeIterator for Cursor {}

// ─── Query parameters ────────────────────────────────────────────────────────

/// A selection predicate with positional `?` placeholders and the argument
/// list bound to them, in placeholder order.
///
/// Predicate and arguments must always be assembled from the same iteration;
/// building them independently is how off-by-one bugs happen silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
  pub clause: String,
  pub args:   Vec<Value>,
}

impl Selection {
  pub fn new(clause: impl Into<String>, args: Vec<Value>) -> Self {
    Self { clause: clause.into(), args }
  }
}

/// Sort orders the identifying query supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  #[default]
  NameAsc,
  NameDesc,
}

/// Everything a `query` call carries.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
  /// Columns to project. Never empty: a store query with zero projected
  /// columns is invalid.
  pub projection: Vec<&'static str>,
  pub selection:  Option<Selection>,
  pub sort:       Option<SortOrder>,
  pub limit:      Option<u32>,
  pub offset:     Option<u32>,
}

// ─── Batch operations ────────────────────────────────────────────────────────

/// A reference from a later batch operation to the id assigned by an earlier
/// insert in the same batch. Required when data rows must point at a raw
/// contact whose id does not exist until the batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackRef {
  /// Column to fill with the earlier result.
  pub column:   &'static str,
  /// Index of the earlier operation; must be an insert.
  pub op_index: usize,
}

/// One primitive mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
  Insert {
    table:     Table,
    values:    RowValues,
    back_refs: Vec<BackRef>,
  },
  Update {
    table:     Table,
    values:    RowValues,
    selection: Selection,
  },
  Delete {
    table:     Table,
    selection: Selection,
  },
}

/// Per-operation outcome of an applied batch, index-aligned with the
/// submitted operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchResult {
  /// The id assigned to an inserted row.
  Inserted(String),
  /// Rows affected by an update or delete.
  Affected(usize),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the platform row store.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes. Implementations perform blocking I/O on
/// their own dedicated threads.
pub trait StoreClient: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run a read and return the result set as an open cursor.
  fn query(
    &self,
    table: Table,
    params: QueryParams,
  ) -> impl Future<Output = Result<Cursor, Self::Error>> + Send + '_;

  /// Insert one row; returns the store-assigned id.
  fn insert(
    &self,
    table: Table,
    values: RowValues,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Update all rows matching `selection`; returns the affected count.
  fn update(
    &self,
    table: Table,
    values: RowValues,
    selection: Selection,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete all rows matching `selection`; returns the affected count.
  fn delete(
    &self,
    table: Table,
    selection: Selection,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Apply `ops` atomically: after this call returns, either every
  /// operation is visible to readers or none is. No isolation beyond that
  /// is promised; concurrent batches from other callers may interleave
  /// between calls.
  fn apply_batch(
    &self,
    ops: Vec<BatchOp>,
  ) -> impl Future<Output = Result<Vec<BatchResult>, Self::Error>> + Send + '_;
}
