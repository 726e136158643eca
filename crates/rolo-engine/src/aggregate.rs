//! The query aggregator: folds raw store cursors into typed records.
//!
//! Contacts-table rows and data-table rows arrive as two separate passes
//! (the two tables cannot be projected together). Rows for a given contact
//! are not guaranteed to be contiguous, so aggregation is keyed by contact
//! id in an insertion-ordered map rather than flushed on id change; output
//! order is the contacts-pass order.

use std::collections::HashMap;

use rolo_core::{
  Error, Result,
  field::{Field, FieldSet},
  id::ContactId,
  record::{
    AddressEntry, Contact, DataRecord, EmailEntry, EventEntry, NoteEntry,
    OrganizationEntry, PhoneEntry, RelationEntry, WebsiteEntry,
  },
  schema::columns,
  store::{Cursor, Row},
};

/// Rows consumed between cooperative yields, so that a caller abandoning a
/// query stops cursor consumption promptly instead of running to
/// completion.
const YIELD_INTERVAL: usize = 64;

/// In-progress aggregation for one read. Feed it the contacts pass, then
/// the data pass, then [`finish`](Aggregator::finish) it.
pub struct Aggregator {
  fields: FieldSet,
  order:  Vec<ContactId>,
  by_id:  HashMap<ContactId, Contact>,
}

impl Aggregator {
  pub fn new(fields: FieldSet) -> Self {
    Self { fields, order: Vec::new(), by_id: HashMap::new() }
  }

  /// Consume the contacts-table cursor. Every row seeds a record (in cursor
  /// order) and decodes the requested contact-level fields, at most once
  /// per contact.
  pub async fn absorb_contacts(&mut self, cursor: Cursor) -> Result<()> {
    for (n, row) in cursor.enumerate() {
      self.absorb_contact_row(&row)?;
      if (n + 1) % YIELD_INTERVAL == 0 {
        tokio::task::yield_now().await;
      }
    }
    Ok(())
  }

  /// Consume the data-table cursor, dispatching each row on its mimetype.
  /// Rows owned by contacts the contacts pass never saw are skipped: they
  /// belong to contacts created concurrently between the two passes.
  pub async fn absorb_data(&mut self, cursor: Cursor) -> Result<()> {
    for (n, row) in cursor.enumerate() {
      self.absorb_data_row(&row)?;
      if (n + 1) % YIELD_INTERVAL == 0 {
        tokio::task::yield_now().await;
      }
    }
    Ok(())
  }

  /// Finalise the builders into immutable records, in contacts-pass order.
  /// A contact with zero data rows still yields a record with empty list
  /// fields and absent optional fields.
  pub fn finish(self) -> Vec<Contact> {
    let Self { order, mut by_id, .. } = self;
    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
  }

  fn absorb_contact_row(&mut self, row: &Row) -> Result<()> {
    let Self { fields, order, by_id } = self;

    let id = row
      .id(columns::CONTACT_ID)
      .map(ContactId)
      .ok_or(Error::MissingColumn(columns::CONTACT_ID))?;

    let contact = by_id.entry(id.clone()).or_insert_with(|| {
      order.push(id.clone());
      Contact::empty(id)
    });

    for field in fields.contact_fields() {
      match field {
        Field::Name => {
          contact.name = row.text(columns::DISPLAY_NAME).map(str::to_owned);
        }
        Field::Starred => contact.starred = row.flag(columns::STARRED),
        Field::LookupKey => {
          contact.lookup_key = row.text(columns::LOOKUP_KEY).map(str::to_owned);
        }
        // Data fields are populated by the data pass.
        Field::Phones
        | Field::Emails
        | Field::Addresses
        | Field::Organization
        | Field::Events
        | Field::Relations
        | Field::Websites
        | Field::Note => {}
      }
    }
    Ok(())
  }

  fn absorb_data_row(&mut self, row: &Row) -> Result<()> {
    let Self { fields, by_id, .. } = self;

    let mime_type = row
      .text(columns::MIMETYPE)
      .ok_or(Error::MissingColumn(columns::MIMETYPE))?;

    // The selection already restricts to requested mimetypes, but the store
    // is external: an unexpected row is skipped, not an error.
    let Some(field) = fields
      .data_fields()
      .find(|f| f.mime_type() == Some(mime_type))
    else {
      return Ok(());
    };

    let id = row
      .id(columns::CONTACT_ID)
      .map(ContactId)
      .ok_or(Error::MissingColumn(columns::CONTACT_ID))?;
    let Some(contact) = by_id.get_mut(&id) else {
      return Ok(());
    };

    match field {
      Field::Phones => contact.phones.push(PhoneEntry::from_row(row)?),
      Field::Emails => contact.emails.push(EmailEntry::from_row(row)?),
      Field::Addresses => {
        contact.addresses.push(AddressEntry::from_row(row)?);
      }
      Field::Events => contact.events.push(EventEntry::from_row(row)?),
      Field::Relations => {
        contact.relations.push(RelationEntry::from_row(row)?);
      }
      Field::Websites => contact.websites.push(WebsiteEntry::from_row(row)?),

      // Single cardinality: the first row per (contact, mimetype) wins;
      // later duplicates are a tolerated store anomaly. "First" is cursor
      // order, which the store does not guarantee to be stable.
      Field::Organization => {
        if contact.organization.is_none() {
          contact.organization = Some(OrganizationEntry::from_row(row)?);
        }
      }
      Field::Note => {
        if contact.note.is_none() {
          contact.note = Some(NoteEntry::from_row(row)?);
        }
      }

      // Contact-level fields never match a mimetype.
      Field::Name | Field::Starred | Field::LookupKey => {}
    }
    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
