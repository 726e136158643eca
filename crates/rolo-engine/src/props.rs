//! Property accessors — stateless per-field-shape wrappers over the
//! repository, so callers can get/set one field without hand-rolling
//! repository calls.

use std::marker::PhantomData;

use rolo_core::{
  Error, Result,
  field::{Field, FieldSet},
  id::{ContactId, DataId},
  record::{
    AddressEntry, EmailEntry, EventEntry, ListRecord, NoteEntry,
    OrganizationEntry, PhoneEntry, RelationEntry, SingleRecord, WebsiteEntry,
  },
  store::StoreClient,
  write::ContactPatch,
};

use crate::ContactRepository;

fn singleton(field: Field) -> FieldSet {
  FieldSet::new().with(field)
}

// ─── List property ───────────────────────────────────────────────────────────

/// Accessor for a list-cardinality data field (phones, emails, ...).
pub struct ListProperty<'r, S, T> {
  repo:   &'r ContactRepository<S>,
  record: PhantomData<T>,
}

impl<'r, S: StoreClient, T: ListRecord> ListProperty<'r, S, T> {
  pub fn new(repo: &'r ContactRepository<S>) -> Self {
    Self { repo, record: PhantomData }
  }

  /// All entries of this field, with their row ids.
  pub async fn get_all(&self, id: &ContactId) -> Result<Vec<T>> {
    let contact = self.repo.get_by_id(&singleton(T::FIELD), id).await?;
    Ok(contact.map(T::take_from).unwrap_or_default())
  }

  /// Append a new entry. Fails fast when the contact has no local writable
  /// backing.
  pub async fn add(&self, id: &ContactId, entry: &T) -> Result<DataId> {
    let raw_id = self
      .repo
      .raw_contact_id(id)
      .await?
      .ok_or_else(|| Error::RawContactIdNotFound(id.clone()))?;
    self.repo.append_entry(&raw_id, entry).await
  }

  /// Rewrite one entry in place, addressed by its row id.
  pub async fn update(&self, data_id: &DataId, entry: &T) -> Result<bool> {
    self.repo.update_entry(data_id, entry).await
  }

  /// Delete one entry, addressed by its row id.
  pub async fn delete(&self, data_id: &DataId) -> Result<bool> {
    self.repo.delete_entry(data_id).await
  }
}

// ─── Single property ─────────────────────────────────────────────────────────

/// Accessor for a single-cardinality data field (organization, note).
pub struct SingleProperty<'r, S, T> {
  repo:   &'r ContactRepository<S>,
  record: PhantomData<T>,
}

impl<'r, S: StoreClient, T: SingleRecord> SingleProperty<'r, S, T> {
  pub fn new(repo: &'r ContactRepository<S>) -> Self {
    Self { repo, record: PhantomData }
  }

  pub async fn get(&self, id: &ContactId) -> Result<Option<T>> {
    let contact = self.repo.get_by_id(&singleton(T::FIELD), id).await?;
    Ok(contact.and_then(T::take_from))
  }

  /// Set the field's value, creating or rewriting its row as needed.
  ///
  /// The store has no upsert, so this is an explicit two-step protocol:
  /// read the existing row id, then branch between patch-in-place and
  /// append-new. The two steps are not atomic; a concurrent writer can
  /// interleave between them.
  pub async fn set(&self, id: &ContactId, entry: &T) -> Result<()> {
    let raw_id = self
      .repo
      .raw_contact_id(id)
      .await?
      .ok_or_else(|| Error::RawContactIdNotFound(id.clone()))?;

    let existing = self.get(id).await?;
    match existing.and_then(|e| e.data_id().cloned()) {
      Some(data_id) => {
        self.repo.update_entry(&data_id, entry).await?;
      }
      None => {
        self.repo.append_entry(&raw_id, entry).await?;
      }
    }
    Ok(())
  }

  /// Remove the field's row, if any.
  pub async fn clear(&self, id: &ContactId) -> Result<bool> {
    match self.get(id).await?.and_then(|e| e.data_id().cloned()) {
      Some(data_id) => self.repo.delete_entry(&data_id).await,
      None => Ok(false),
    }
  }
}

// ─── Header property ─────────────────────────────────────────────────────────

/// Accessor for the starred flag — the one writable contacts-table field.
/// No row-existence ambiguity here: the header row exists as long as the
/// contact does.
pub struct HeaderProperty<'r, S> {
  repo: &'r ContactRepository<S>,
}

impl<'r, S: StoreClient> HeaderProperty<'r, S> {
  pub fn new(repo: &'r ContactRepository<S>) -> Self {
    Self { repo }
  }

  /// `None` when the contact does not exist.
  pub async fn get(&self, id: &ContactId) -> Result<Option<bool>> {
    let contact = self
      .repo
      .get_by_id(&singleton(Field::Starred), id)
      .await?;
    Ok(contact.and_then(|c| c.starred))
  }

  pub async fn set(&self, id: &ContactId, starred: bool) -> Result<bool> {
    let mut patch = ContactPatch::new(id.clone());
    patch.starred = Some(starred);
    self.repo.patch(patch).await
  }
}

// ─── Repository conveniences ─────────────────────────────────────────────────

impl<S: StoreClient> ContactRepository<S> {
  pub fn phones(&self) -> ListProperty<'_, S, PhoneEntry> {
    ListProperty::new(self)
  }

  pub fn emails(&self) -> ListProperty<'_, S, EmailEntry> {
    ListProperty::new(self)
  }

  pub fn addresses(&self) -> ListProperty<'_, S, AddressEntry> {
    ListProperty::new(self)
  }

  pub fn events(&self) -> ListProperty<'_, S, EventEntry> {
    ListProperty::new(self)
  }

  pub fn relations(&self) -> ListProperty<'_, S, RelationEntry> {
    ListProperty::new(self)
  }

  pub fn websites(&self) -> ListProperty<'_, S, WebsiteEntry> {
    ListProperty::new(self)
  }

  pub fn organization(&self) -> SingleProperty<'_, S, OrganizationEntry> {
    SingleProperty::new(self)
  }

  pub fn note(&self) -> SingleProperty<'_, S, NoteEntry> {
    SingleProperty::new(self)
  }

  pub fn starred(&self) -> HeaderProperty<'_, S> {
    HeaderProperty::new(self)
  }
}
