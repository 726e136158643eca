//! [`ContactRepository`] — the façade over the row store.
//!
//! The only component that talks to the store directly. Reads are two-pass
//! (identifying/contacts query, then data query) joined in memory by the
//! aggregator; writes go through `apply_batch` so no partial mutation is
//! ever visible. Every operation re-queries the store; there is no cache
//! and no internal retry.

use rolo_core::{
  Error, Result,
  field::FieldSet,
  id::{ContactId, DataId, RawContactId},
  record::{Contact, DataRecord},
  schema::columns,
  store::{BatchResult, QueryParams, SortOrder, StoreClient, Table},
  write::{ContactPatch, NewContact, UpdateContact},
};

use crate::{aggregate::Aggregator, query, write};

pub struct ContactRepository<S> {
  store: S,
}

impl<S: StoreClient> ContactRepository<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Page through contact ids, optionally filtered by a name substring.
  ///
  /// Pagination is applied to this identifying query only, never to the
  /// field query: field expansion multiplies row counts unpredictably, so
  /// this is the only place a limit keeps its meaning.
  pub async fn get_all_ids(
    &self,
    limit: u32,
    offset: u32,
    searched_name: Option<&str>,
    sort: Option<SortOrder>,
  ) -> Result<Vec<ContactId>> {
    let params = query::ids_query(limit, offset, searched_name, sort);
    let cursor = self
      .store
      .query(Table::Contacts, params)
      .await
      .map_err(Error::store)?;
    Ok(
      cursor
        .filter_map(|row| row.id(columns::CONTACT_ID).map(ContactId))
        .collect(),
    )
  }

  /// Read one contact, populated with `fields` only. Returns `None` when
  /// the id no longer resolves — a concurrently deleted contact is an
  /// expected outcome, not an error.
  pub async fn get_by_id(
    &self,
    fields: &FieldSet,
    id: &ContactId,
  ) -> Result<Option<Contact>> {
    let contacts = self
      .get_all(fields, Some(std::slice::from_ref(id)))
      .await?;
    Ok(contacts.into_iter().next())
  }

  /// Read many contacts. `ids: None` means all contacts; an explicit empty
  /// collection means none and short-circuits without touching the store.
  /// Output order follows the caller's id order when restricted, store
  /// order otherwise.
  pub async fn get_all(
    &self,
    fields: &FieldSet,
    ids: Option<&[ContactId]>,
  ) -> Result<Vec<Contact>> {
    if let Some(ids) = ids
      && ids.is_empty()
    {
      return Ok(Vec::new());
    }

    let mut aggregator = Aggregator::new(fields.clone());

    let contacts_cursor = self
      .store
      .query(Table::Contacts, query::contacts_query(fields, ids))
      .await
      .map_err(Error::store)?;
    aggregator.absorb_contacts(contacts_cursor).await?;

    if let Some(params) = query::data_query(fields, ids) {
      let data_cursor = self
        .store
        .query(Table::Data, params)
        .await
        .map_err(Error::store)?;
      aggregator.absorb_data(data_cursor).await?;
    }

    let mut contacts = aggregator.finish();
    if let Some(ids) = ids {
      let position: std::collections::HashMap<&ContactId, usize> =
        ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
      contacts.sort_by_key(|c| {
        position.get(&c.id).copied().unwrap_or(usize::MAX)
      });
    }

    tracing::debug!(count = contacts.len(), "aggregated contacts");
    Ok(contacts)
  }

  /// Total number of contacts.
  pub async fn count(&self) -> Result<usize> {
    let params = QueryParams {
      projection: vec![columns::CONTACT_ID],
      ..Default::default()
    };
    let cursor = self
      .store
      .query(Table::Contacts, params)
      .await
      .map_err(Error::store)?;
    Ok(cursor.remaining())
  }

  /// Resolve the writable raw contact behind `id`, constrained to the
  /// local, unsynced account.
  pub async fn raw_contact_id(
    &self,
    id: &ContactId,
  ) -> Result<Option<RawContactId>> {
    let mut cursor = self
      .store
      .query(Table::RawContacts, query::raw_contact_query(id))
      .await
      .map_err(Error::store)?;
    Ok(
      cursor
        .next()
        .and_then(|row| row.id(columns::RAW_CONTACT_ID))
        .map(RawContactId),
    )
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Create a contact as one atomic batch and resolve its new id.
  pub async fn insert(&self, new: NewContact) -> Result<ContactId> {
    let ops = write::insert_ops(&new);
    let results = self
      .store
      .apply_batch(ops)
      .await
      .map_err(Error::store)?;

    let raw_id = match results.first() {
      Some(BatchResult::Inserted(id)) => RawContactId(id.clone()),
      _ => {
        return Err(Error::UnexpectedBatchResult(
          "insert batch did not report a raw contact id",
        ));
      }
    };

    // Should not fail for a batch that just succeeded, but a store that
    // broke its aggregation promise is reportable, not a panic.
    let contact_id = self
      .contact_id_of(&raw_id)
      .await?
      .ok_or(Error::ContactIdNotFound(raw_id))?;

    tracing::debug!(%contact_id, "inserted contact");
    Ok(contact_id)
  }

  /// Apply only the supplied field changes, as one batch. Returns `false`
  /// when the patch is empty or the contact no longer has a writable raw
  /// contact.
  pub async fn patch(&self, patch: ContactPatch) -> Result<bool> {
    if patch.is_empty() {
      return Ok(false);
    }
    let Some(raw_id) = self.raw_contact_id(&patch.id).await? else {
      return Ok(false);
    };
    let ops = write::patch_ops(&raw_id, &patch);
    self.store.apply_batch(ops).await.map_err(Error::store)?;
    Ok(true)
  }

  /// Replace the contact's whole data-row set and header flag, as one
  /// batch. Returns `false` when the contact no longer has a writable raw
  /// contact.
  pub async fn update(&self, update: UpdateContact) -> Result<bool> {
    let Some(raw_id) = self.raw_contact_id(&update.id).await? else {
      return Ok(false);
    };
    let ops = write::update_ops(&raw_id, &update);
    self.store.apply_batch(ops).await.map_err(Error::store)?;
    Ok(true)
  }

  /// Delete the contact's raw contact (data rows go with it). Idempotent:
  /// deleting an already-absent contact returns `false`, not an error.
  pub async fn delete(&self, id: &ContactId) -> Result<bool> {
    let removed = self
      .store
      .delete(Table::RawContacts, query::by_contact_id(id))
      .await
      .map_err(Error::store)?;
    Ok(removed > 0)
  }

  // ── Single data-row primitives ────────────────────────────────────────

  /// Append one data row for `entry` to an existing raw contact.
  pub async fn append_entry<T: DataRecord>(
    &self,
    raw_id: &RawContactId,
    entry: &T,
  ) -> Result<DataId> {
    let values = write::data_values(entry)
      .with(columns::RAW_CONTACT_ID, raw_id.0.as_str());
    let id = self
      .store
      .insert(Table::Data, values)
      .await
      .map_err(Error::store)?;
    Ok(DataId(id))
  }

  /// Rewrite the data row at `data_id` in place.
  pub async fn update_entry<T: DataRecord>(
    &self,
    data_id: &DataId,
    entry: &T,
  ) -> Result<bool> {
    let count = self
      .store
      .update(Table::Data, entry.to_values(), query::by_data_id(data_id))
      .await
      .map_err(Error::store)?;
    Ok(count > 0)
  }

  /// Delete the data row at `data_id`. Idempotent.
  pub async fn delete_entry(&self, data_id: &DataId) -> Result<bool> {
    let count = self
      .store
      .delete(Table::Data, query::by_data_id(data_id))
      .await
      .map_err(Error::store)?;
    Ok(count > 0)
  }

  async fn contact_id_of(
    &self,
    raw_id: &RawContactId,
  ) -> Result<Option<ContactId>> {
    let mut cursor = self
      .store
      .query(Table::RawContacts, query::contact_of_raw_query(raw_id))
      .await
      .map_err(Error::store)?;
    Ok(
      cursor
        .next()
        .and_then(|row| row.id(columns::CONTACT_ID))
        .map(ContactId),
    )
  }
}
