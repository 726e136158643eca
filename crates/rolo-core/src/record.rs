//! Typed contact records and the per-mimetype data entries they aggregate.
//!
//! Every data entry type implements [`DataRecord`]: it names the mimetype
//! tagging its rows, the data columns it needs, and how to decode one row /
//! encode itself back into column values. The engine's query builder and
//! aggregator are written entirely against that contract.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  field::Field,
  id::{ContactId, DataId},
  label::{
    AddressLabel, EmailLabel, EventLabel, PhoneLabel, RelationLabel,
    WebsiteLabel,
  },
  schema::{columns, mime},
  store::{Row, RowValues},
};

// ─── DataRecord ──────────────────────────────────────────────────────────────

/// A value that lives in the data table as one row of its mimetype.
pub trait DataRecord: Sized + Send + Sync {
  /// Mimetype literal tagging this record's rows.
  const MIME_TYPE: &'static str;
  /// The catalog field this record belongs to.
  const FIELD: Field;
  /// Data columns required to decode a row. The query builder unions these
  /// into the projection, so `from_row` can rely on their presence.
  const COLUMNS: &'static [&'static str];

  /// Decode one matching data row.
  fn from_row(row: &Row) -> Result<Self>;

  /// Encode into the column → value map for an insert or update. Does not
  /// include the mimetype or any id column.
  fn to_values(&self) -> RowValues;

  /// The row id, present on entries read from the store and absent on
  /// entries authored by the caller.
  fn data_id(&self) -> Option<&DataId>;
}

fn row_data_id(row: &Row) -> Result<DataId> {
  row
    .id(columns::DATA_ID)
    .map(DataId)
    .ok_or(crate::Error::MissingColumn(columns::DATA_ID))
}

fn owned_text(row: &Row, column: &'static str) -> String {
  row.text(column).unwrap_or_default().to_owned()
}

fn optional_text(row: &Row, column: &'static str) -> Option<String> {
  row.text(column).map(str::to_owned)
}

// ─── Phone ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:     Option<DataId>,
  pub number: String,
  pub label:  PhoneLabel,
}

impl PhoneEntry {
  pub fn new(number: impl Into<String>, label: PhoneLabel) -> Self {
    Self { id: None, number: number.into(), label }
  }
}

impl DataRecord for PhoneEntry {
  const MIME_TYPE: &'static str = mime::PHONE;
  const FIELD: Field = Field::Phones;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1, columns::DATA2];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:     Some(row_data_id(row)?),
      number: owned_text(row, columns::DATA1),
      label:  PhoneLabel::from_store(row.text(columns::DATA2).unwrap_or("")),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.number.as_str())
      .with(columns::DATA2, self.label.as_store())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Email ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:      Option<DataId>,
  pub address: String,
  pub label:   EmailLabel,
}

impl EmailEntry {
  pub fn new(address: impl Into<String>, label: EmailLabel) -> Self {
    Self { id: None, address: address.into(), label }
  }
}

impl DataRecord for EmailEntry {
  const MIME_TYPE: &'static str = mime::EMAIL;
  const FIELD: Field = Field::Emails;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1, columns::DATA2];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:      Some(row_data_id(row)?),
      address: owned_text(row, columns::DATA1),
      label:   EmailLabel::from_store(row.text(columns::DATA2).unwrap_or("")),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.address.as_str())
      .with(columns::DATA2, self.label.as_store())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Postal address ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:          Option<DataId>,
  pub label:       AddressLabel,
  pub street:      Option<String>,
  pub city:        Option<String>,
  pub region:      Option<String>,
  pub postal_code: Option<String>,
  pub country:     Option<String>,
}

impl DataRecord for AddressEntry {
  const MIME_TYPE: &'static str = mime::ADDRESS;
  const FIELD: Field = Field::Addresses;
  const COLUMNS: &'static [&'static str] = &[
    columns::DATA1,
    columns::DATA2,
    columns::DATA3,
    columns::DATA4,
    columns::DATA5,
    columns::DATA6,
  ];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:          Some(row_data_id(row)?),
      label:       AddressLabel::from_store(
        row.text(columns::DATA2).unwrap_or(""),
      ),
      street:      optional_text(row, columns::DATA1),
      city:        optional_text(row, columns::DATA3),
      region:      optional_text(row, columns::DATA4),
      postal_code: optional_text(row, columns::DATA5),
      country:     optional_text(row, columns::DATA6),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.street.clone())
      .with(columns::DATA2, self.label.as_store())
      .with(columns::DATA3, self.city.clone())
      .with(columns::DATA4, self.region.clone())
      .with(columns::DATA5, self.postal_code.clone())
      .with(columns::DATA6, self.country.clone())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Organization ────────────────────────────────────────────────────────────

/// A contact holds at most one organization row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:      Option<DataId>,
  pub company: String,
  pub title:   Option<String>,
}

impl OrganizationEntry {
  pub fn new(company: impl Into<String>, title: Option<String>) -> Self {
    Self { id: None, company: company.into(), title }
  }
}

impl DataRecord for OrganizationEntry {
  const MIME_TYPE: &'static str = mime::ORGANIZATION;
  const FIELD: Field = Field::Organization;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1, columns::DATA3];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:      Some(row_data_id(row)?),
      company: owned_text(row, columns::DATA1),
      title:   optional_text(row, columns::DATA3),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.company.as_str())
      .with(columns::DATA3, self.title.clone())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A dated event. The date is kept in the store's own string form
/// (`yyyy-mm-dd`, or `--mm-dd` for year-less dates) rather than parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:    Option<DataId>,
  pub date:  String,
  pub label: EventLabel,
}

impl EventEntry {
  pub fn new(date: impl Into<String>, label: EventLabel) -> Self {
    Self { id: None, date: date.into(), label }
  }
}

impl DataRecord for EventEntry {
  const MIME_TYPE: &'static str = mime::EVENT;
  const FIELD: Field = Field::Events;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1, columns::DATA2];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:    Some(row_data_id(row)?),
      date:  owned_text(row, columns::DATA1),
      label: EventLabel::from_store(row.text(columns::DATA2).unwrap_or("")),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.date.as_str())
      .with(columns::DATA2, self.label.as_store())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Relation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:    Option<DataId>,
  /// Free-text name of the related person.
  pub name:  String,
  pub label: RelationLabel,
}

impl RelationEntry {
  pub fn new(name: impl Into<String>, label: RelationLabel) -> Self {
    Self { id: None, name: name.into(), label }
  }
}

impl DataRecord for RelationEntry {
  const MIME_TYPE: &'static str = mime::RELATION;
  const FIELD: Field = Field::Relations;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1, columns::DATA2];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:    Some(row_data_id(row)?),
      name:  owned_text(row, columns::DATA1),
      label: RelationLabel::from_store(row.text(columns::DATA2).unwrap_or("")),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.name.as_str())
      .with(columns::DATA2, self.label.as_store())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Website ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:    Option<DataId>,
  pub url:   String,
  pub label: WebsiteLabel,
}

impl WebsiteEntry {
  pub fn new(url: impl Into<String>, label: WebsiteLabel) -> Self {
    Self { id: None, url: url.into(), label }
  }
}

impl DataRecord for WebsiteEntry {
  const MIME_TYPE: &'static str = mime::WEBSITE;
  const FIELD: Field = Field::Websites;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1, columns::DATA2];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:    Some(row_data_id(row)?),
      url:   owned_text(row, columns::DATA1),
      label: WebsiteLabel::from_store(row.text(columns::DATA2).unwrap_or("")),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new()
      .with(columns::DATA1, self.url.as_str())
      .with(columns::DATA2, self.label.as_store())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A contact holds at most one note row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:   Option<DataId>,
  pub text: String,
}

impl NoteEntry {
  pub fn new(text: impl Into<String>) -> Self {
    Self { id: None, text: text.into() }
  }
}

impl DataRecord for NoteEntry {
  const MIME_TYPE: &'static str = mime::NOTE;
  const FIELD: Field = Field::Note;
  const COLUMNS: &'static [&'static str] = &[columns::DATA1];

  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id:   Some(row_data_id(row)?),
      text: owned_text(row, columns::DATA1),
    })
  }

  fn to_values(&self) -> RowValues {
    RowValues::new().with(columns::DATA1, self.text.as_str())
  }

  fn data_id(&self) -> Option<&DataId> { self.id.as_ref() }
}

// ─── Cardinality access ──────────────────────────────────────────────────────

/// A list-cardinality data record; knows its slot on [`Contact`].
pub trait ListRecord: DataRecord {
  fn take_from(contact: Contact) -> Vec<Self>;
}

/// A single-cardinality data record; knows its slot on [`Contact`].
pub trait SingleRecord: DataRecord {
  fn take_from(contact: Contact) -> Option<Self>;
}

impl ListRecord for PhoneEntry {
  fn take_from(contact: Contact) -> Vec<Self> { contact.phones }
}

impl ListRecord for EmailEntry {
  fn take_from(contact: Contact) -> Vec<Self> { contact.emails }
}

impl ListRecord for AddressEntry {
  fn take_from(contact: Contact) -> Vec<Self> { contact.addresses }
}

impl ListRecord for EventEntry {
  fn take_from(contact: Contact) -> Vec<Self> { contact.events }
}

impl ListRecord for RelationEntry {
  fn take_from(contact: Contact) -> Vec<Self> { contact.relations }
}

impl ListRecord for WebsiteEntry {
  fn take_from(contact: Contact) -> Vec<Self> { contact.websites }
}

impl SingleRecord for OrganizationEntry {
  fn take_from(contact: Contact) -> Option<Self> { contact.organization }
}

impl SingleRecord for NoteEntry {
  fn take_from(contact: Contact) -> Option<Self> { contact.note }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// An aggregated contact, populated only with the fields a caller asked
/// for. Recomputed on every read; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub id:           ContactId,
  pub name:         Option<String>,
  pub starred:      Option<bool>,
  pub lookup_key:   Option<String>,
  pub phones:       Vec<PhoneEntry>,
  pub emails:       Vec<EmailEntry>,
  pub addresses:    Vec<AddressEntry>,
  pub organization: Option<OrganizationEntry>,
  pub events:       Vec<EventEntry>,
  pub relations:    Vec<RelationEntry>,
  pub websites:     Vec<WebsiteEntry>,
  pub note:         Option<NoteEntry>,
}

impl Contact {
  /// An empty record for `id`; the aggregator fills requested fields in.
  pub fn empty(id: ContactId) -> Self {
    Self {
      id,
      name: None,
      starred: None,
      lookup_key: None,
      phones: Vec::new(),
      emails: Vec::new(),
      addresses: Vec::new(),
      organization: None,
      events: Vec::new(),
      relations: Vec::new(),
      websites: Vec::new(),
      note: None,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
