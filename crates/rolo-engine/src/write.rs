//! Decomposition of typed write intents into primitive store operations.
//!
//! Every function here returns the finite, ordered operation list for one
//! atomic batch. Nothing touches the store; the repository submits the
//! result through `StoreClient::apply_batch`.

use rolo_core::{
  id::RawContactId,
  record::DataRecord,
  schema::{columns, mime},
  store::{BackRef, BatchOp, RowValues, Table, Value},
  write::{ContactPatch, NewContact, Patch, UpdateContact},
};

use crate::query;

// ─── Insert ──────────────────────────────────────────────────────────────────

/// The operation sequence creating a brand-new contact.
///
/// The raw-contact row is operation 0; every data row back-references its
/// not-yet-assigned id. The contact is created in the local, unsynced
/// account.
pub fn insert_ops(new: &NewContact) -> Vec<BatchOp> {
  let mut ops = vec![BatchOp::Insert {
    table:     Table::RawContacts,
    values:    RowValues::new()
      .with(columns::ACCOUNT_TYPE, Value::Null)
      .with(columns::ACCOUNT_NAME, Value::Null)
      .with(columns::STARRED, new.starred),
    back_refs: vec![],
  }];

  if let Some(name) = &new.name {
    ops.push(back_referencing_data_op(name_values(name)));
  }
  for phone in &new.phones {
    ops.push(back_referencing_data_op(data_values(phone)));
  }
  for email in &new.emails {
    ops.push(back_referencing_data_op(data_values(email)));
  }
  for address in &new.addresses {
    ops.push(back_referencing_data_op(data_values(address)));
  }
  if let Some(org) = &new.organization {
    ops.push(back_referencing_data_op(data_values(org)));
  }
  for event in &new.events {
    ops.push(back_referencing_data_op(data_values(event)));
  }
  for relation in &new.relations {
    ops.push(back_referencing_data_op(data_values(relation)));
  }
  for website in &new.websites {
    ops.push(back_referencing_data_op(data_values(website)));
  }
  if let Some(note) = &new.note {
    ops.push(back_referencing_data_op(data_values(note)));
  }

  ops
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Mutations for the supplied fields of a sparse patch — and nothing else.
pub fn patch_ops(raw_id: &RawContactId, patch: &ContactPatch) -> Vec<BatchOp> {
  let mut ops = Vec::new();

  match &patch.name {
    Patch::Keep => {}
    Patch::Clear => ops.push(delete_mime_op(raw_id, mime::NAME)),
    Patch::Set(name) => {
      ops.push(delete_mime_op(raw_id, mime::NAME));
      ops.push(owned_data_op(raw_id, name_values(name)));
    }
  }

  if let Some(starred) = patch.starred {
    ops.push(starred_op(raw_id, starred));
  }

  if let Some(phones) = &patch.phones {
    replace_entries(&mut ops, raw_id, phones);
  }
  if let Some(emails) = &patch.emails {
    replace_entries(&mut ops, raw_id, emails);
  }
  if let Some(addresses) = &patch.addresses {
    replace_entries(&mut ops, raw_id, addresses);
  }
  if let Some(events) = &patch.events {
    replace_entries(&mut ops, raw_id, events);
  }
  if let Some(relations) = &patch.relations {
    replace_entries(&mut ops, raw_id, relations);
  }
  if let Some(websites) = &patch.websites {
    replace_entries(&mut ops, raw_id, websites);
  }

  replace_single(&mut ops, raw_id, &patch.organization);
  replace_single(&mut ops, raw_id, &patch.note);

  ops
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// The full-replacement sequence: delete every existing data row for the
/// raw contact, reinsert the supplied set, and update the header flag.
/// Write amplification is the price for the guarantee that stale rows from
/// removed fields cannot linger.
pub fn update_ops(
  raw_id: &RawContactId,
  update: &UpdateContact,
) -> Vec<BatchOp> {
  let mut ops = vec![BatchOp::Delete {
    table:     Table::Data,
    selection: query::by_raw_contact_id(raw_id),
  }];

  if let Some(name) = &update.name {
    ops.push(owned_data_op(raw_id, name_values(name)));
  }
  for phone in &update.phones {
    ops.push(owned_data_op(raw_id, data_values(phone)));
  }
  for email in &update.emails {
    ops.push(owned_data_op(raw_id, data_values(email)));
  }
  for address in &update.addresses {
    ops.push(owned_data_op(raw_id, data_values(address)));
  }
  if let Some(org) = &update.organization {
    ops.push(owned_data_op(raw_id, data_values(org)));
  }
  for event in &update.events {
    ops.push(owned_data_op(raw_id, data_values(event)));
  }
  for relation in &update.relations {
    ops.push(owned_data_op(raw_id, data_values(relation)));
  }
  for website in &update.websites {
    ops.push(owned_data_op(raw_id, data_values(website)));
  }
  if let Some(note) = &update.note {
    ops.push(owned_data_op(raw_id, data_values(note)));
  }

  ops.push(starred_op(raw_id, update.starred));
  ops
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Data-row values for an entry, including its mimetype tag.
pub(crate) fn data_values<T: DataRecord>(entry: &T) -> RowValues {
  let mut values = entry.to_values();
  values.set(columns::MIMETYPE, T::MIME_TYPE);
  values
}

fn name_values(name: &str) -> RowValues {
  RowValues::new()
    .with(columns::MIMETYPE, mime::NAME)
    .with(columns::DATA1, name)
}

/// A data insert pointing at the raw contact created by operation 0 of the
/// same batch.
fn back_referencing_data_op(values: RowValues) -> BatchOp {
  BatchOp::Insert {
    table: Table::Data,
    values,
    back_refs: vec![BackRef {
      column:   columns::RAW_CONTACT_ID,
      op_index: 0,
    }],
  }
}

/// A data insert for an already-existing raw contact.
fn owned_data_op(raw_id: &RawContactId, values: RowValues) -> BatchOp {
  BatchOp::Insert {
    table:     Table::Data,
    values:    values.with(columns::RAW_CONTACT_ID, raw_id.0.as_str()),
    back_refs: vec![],
  }
}

fn delete_mime_op(raw_id: &RawContactId, mime_type: &'static str) -> BatchOp {
  BatchOp::Delete {
    table:     Table::Data,
    selection: query::by_raw_and_mime(raw_id, mime_type),
  }
}

fn starred_op(raw_id: &RawContactId, starred: bool) -> BatchOp {
  BatchOp::Update {
    table:     Table::RawContacts,
    values:    RowValues::new().with(columns::STARRED, starred),
    selection: query::by_raw_contact_id(raw_id),
  }
}

/// Replace every row of `T`'s mimetype with the supplied entries. An empty
/// slice therefore clears the field.
fn replace_entries<T: DataRecord>(
  ops: &mut Vec<BatchOp>,
  raw_id: &RawContactId,
  entries: &[T],
) {
  ops.push(delete_mime_op(raw_id, T::MIME_TYPE));
  for entry in entries {
    ops.push(owned_data_op(raw_id, data_values(entry)));
  }
}

fn replace_single<T: DataRecord>(
  ops: &mut Vec<BatchOp>,
  raw_id: &RawContactId,
  patch: &Patch<T>,
) {
  match patch {
    Patch::Keep => {}
    Patch::Clear => ops.push(delete_mime_op(raw_id, T::MIME_TYPE)),
    Patch::Set(entry) => {
      ops.push(delete_mime_op(raw_id, T::MIME_TYPE));
      ops.push(owned_data_op(raw_id, data_values(entry)));
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use rolo_core::{
    id::ContactId,
    label::{EmailLabel, PhoneLabel},
    record::{EmailEntry, NoteEntry, PhoneEntry},
  };

  use super::*;

  #[test]
  fn insert_puts_the_raw_contact_first() {
    let mut new = NewContact::named("Ada");
    new.phones.push(PhoneEntry::new("555-0100", PhoneLabel::Mobile));

    let ops = insert_ops(&new);
    assert!(matches!(
      ops[0],
      BatchOp::Insert { table: Table::RawContacts, .. }
    ));

    // Every following insert back-references operation 0.
    for op in &ops[1..] {
      let BatchOp::Insert { table, back_refs, .. } = op else {
        panic!("expected insert");
      };
      assert_eq!(*table, Table::Data);
      assert_eq!(back_refs.len(), 1);
      assert_eq!(back_refs[0].op_index, 0);
      assert_eq!(back_refs[0].column, columns::RAW_CONTACT_ID);
    }
    // Raw contact + name row + phone row.
    assert_eq!(ops.len(), 3);
  }

  #[test]
  fn patch_touches_only_supplied_mimetypes() {
    let raw_id = RawContactId("4".into());
    let mut patch = ContactPatch::new(ContactId("4".into()));
    patch.emails =
      Some(vec![EmailEntry::new("ada@example.com", EmailLabel::Work)]);

    let ops = patch_ops(&raw_id, &patch);
    // One delete of the email mimetype, one insert.
    assert_eq!(ops.len(), 2);
    let BatchOp::Delete { selection, .. } = &ops[0] else {
      panic!("expected delete");
    };
    assert!(
      selection
        .args
        .contains(&Value::Text(mime::EMAIL.to_owned()))
    );
    let BatchOp::Insert { values, .. } = &ops[1] else {
      panic!("expected insert");
    };
    assert_eq!(
      values.get(columns::MIMETYPE),
      Some(&Value::Text(mime::EMAIL.to_owned()))
    );
  }

  #[test]
  fn empty_patch_produces_no_ops() {
    let raw_id = RawContactId("4".into());
    let patch = ContactPatch::new(ContactId("4".into()));
    assert!(patch_ops(&raw_id, &patch).is_empty());
  }

  #[test]
  fn patch_clear_note_deletes_without_insert() {
    let raw_id = RawContactId("4".into());
    let mut patch = ContactPatch::new(ContactId("4".into()));
    patch.note = Patch::Clear;

    let ops = patch_ops(&raw_id, &patch);
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], BatchOp::Delete { .. }));
  }

  #[test]
  fn update_starts_with_delete_all_and_ends_with_header() {
    let raw_id = RawContactId("4".into());
    let update = UpdateContact {
      id: ContactId("4".into()),
      name: Some("Ada".into()),
      starred: true,
      note: Some(NoteEntry::new("met at conference")),
      ..Default::default()
    };

    let ops = update_ops(&raw_id, &update);
    let BatchOp::Delete { selection, .. } = &ops[0] else {
      panic!("expected leading delete");
    };
    assert_eq!(selection.clause, "raw_contact_id = ?");

    assert!(matches!(
      ops.last(),
      Some(BatchOp::Update { table: Table::RawContacts, .. })
    ));
    // delete-all + name + note + starred.
    assert_eq!(ops.len(), 4);
  }
}
