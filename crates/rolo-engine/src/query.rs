//! The query builder: turns a requested field set (plus an optional id
//! restriction) into the minimal projection, a selection predicate, and its
//! argument list.
//!
//! Every selection predicate the engine ever sends to the store is
//! assembled in this module, and always from the same iteration that
//! collects its arguments, so predicate text and argument order cannot
//! drift apart.

use rolo_core::{
  field::{FieldKind, FieldSet},
  id::{ContactId, DataId, RawContactId},
  schema::columns,
  store::{QueryParams, Selection, SortOrder, Value},
};

// ─── Read passes ─────────────────────────────────────────────────────────────

/// The contacts-table pass: identifying column plus whatever contact-level
/// fields were requested.
///
/// An empty field set still projects the contact id — a query with zero
/// projected columns is invalid.
pub fn contacts_query(
  fields: &FieldSet,
  ids: Option<&[ContactId]>,
) -> QueryParams {
  let mut projection = vec![columns::CONTACT_ID];
  for field in fields.contact_fields() {
    if let FieldKind::Contact { column } = field.kind()
      && !projection.contains(&column)
    {
      projection.push(column);
    }
  }

  QueryParams {
    projection,
    selection: ids.map(id_restriction),
    ..Default::default()
  }
}

/// The data-table pass: identifying columns plus the union of the columns
/// every requested data field needs, restricted to those fields' mimetypes.
///
/// Returns `None` when no data field was requested — the data table is not
/// queried at all in that case.
pub fn data_query(
  fields: &FieldSet,
  ids: Option<&[ContactId]>,
) -> Option<QueryParams> {
  let mut projection =
    vec![columns::CONTACT_ID, columns::DATA_ID, columns::MIMETYPE];
  let mut mime_types: Vec<&'static str> = Vec::new();

  for field in fields.data_fields() {
    if let FieldKind::Data { mime_type, columns: needed, .. } = field.kind() {
      mime_types.push(mime_type);
      for column in needed {
        if !projection.contains(column) {
          projection.push(column);
        }
      }
    }
  }

  if mime_types.is_empty() {
    return None;
  }

  let mut clause = String::new();
  let mut args = Vec::new();
  if let Some(ids) = ids {
    let restriction = id_restriction(ids);
    clause.push_str(&restriction.clause);
    clause.push_str(" AND ");
    args.extend(restriction.args);
  }
  clause.push_str(columns::MIMETYPE);
  clause.push_str(" IN (");
  for (i, mime_type) in mime_types.iter().enumerate() {
    if i > 0 {
      clause.push_str(", ");
    }
    clause.push('?');
    args.push(Value::Text((*mime_type).to_owned()));
  }
  clause.push(')');

  Some(QueryParams {
    projection,
    selection: Some(Selection { clause, args }),
    ..Default::default()
  })
}

/// The identifying query behind `get_all_ids`. Pagination is applied here
/// and only here: expanding fields multiplies row counts unpredictably, so
/// limiting any other query would skew page sizes.
pub fn ids_query(
  limit: u32,
  offset: u32,
  searched_name: Option<&str>,
  sort: Option<SortOrder>,
) -> QueryParams {
  let selection = searched_name.map(|name| {
    Selection::new(
      "display_name LIKE ?",
      vec![Value::Text(format!("%{name}%"))],
    )
  });

  QueryParams {
    projection: vec![columns::CONTACT_ID],
    selection,
    sort: Some(sort.unwrap_or_default()),
    limit: Some(limit),
    offset: Some(offset),
  }
}

/// Resolve the writable raw contact behind `id`. Restricted to the local,
/// unsynced account: rows with an account are owned by a sync adapter and
/// are not written by this engine.
pub fn raw_contact_query(id: &ContactId) -> QueryParams {
  QueryParams {
    projection: vec![columns::RAW_CONTACT_ID],
    selection: Some(Selection::new(
      "contact_id = ? AND account_type IS NULL AND account_name IS NULL",
      vec![Value::Text(id.0.clone())],
    )),
    ..Default::default()
  }
}

/// Resolve the aggregated contact a raw contact belongs to.
pub fn contact_of_raw_query(raw_id: &RawContactId) -> QueryParams {
  QueryParams {
    projection: vec![columns::CONTACT_ID],
    selection: Some(Selection::new(
      "raw_contact_id = ?",
      vec![Value::Text(raw_id.0.clone())],
    )),
    ..Default::default()
  }
}

// ─── Selections shared with the write path ───────────────────────────────────

pub fn by_contact_id(id: &ContactId) -> Selection {
  Selection::new("contact_id = ?", vec![Value::Text(id.0.clone())])
}

pub fn by_raw_contact_id(raw_id: &RawContactId) -> Selection {
  Selection::new("raw_contact_id = ?", vec![Value::Text(raw_id.0.clone())])
}

pub fn by_data_id(data_id: &DataId) -> Selection {
  Selection::new("data_id = ?", vec![Value::Text(data_id.0.clone())])
}

pub fn by_raw_and_mime(
  raw_id: &RawContactId,
  mime_type: &'static str,
) -> Selection {
  Selection::new(
    "raw_contact_id = ? AND mimetype = ?",
    vec![Value::Text(raw_id.0.clone()), Value::Text(mime_type.to_owned())],
  )
}

fn id_restriction(ids: &[ContactId]) -> Selection {
  // An empty slice is handled by the repository before any query is built.
  debug_assert!(!ids.is_empty(), "id restriction over an empty collection");

  let mut clause = String::from("contact_id IN (");
  let mut args = Vec::with_capacity(ids.len());
  for (i, id) in ids.iter().enumerate() {
    if i > 0 {
      clause.push_str(", ");
    }
    clause.push('?');
    args.push(Value::Text(id.0.clone()));
  }
  clause.push(')');
  Selection { clause, args }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use rolo_core::field::Field;

  use super::*;

  fn placeholders(clause: &str) -> usize {
    clause.matches('?').count()
  }

  #[test]
  fn contacts_projection_is_minimal() {
    let fields = FieldSet::new().with(Field::Name).with(Field::Phones);
    let params = contacts_query(&fields, None);
    assert_eq!(
      params.projection,
      vec![columns::CONTACT_ID, columns::DISPLAY_NAME]
    );
    assert!(params.selection.is_none());
  }

  #[test]
  fn empty_field_set_still_projects_the_id() {
    let params = contacts_query(&FieldSet::new(), None);
    assert_eq!(params.projection, vec![columns::CONTACT_ID]);
  }

  #[test]
  fn data_projection_unions_field_columns_once() {
    // Phones and emails share data1/data2; they must appear exactly once.
    let fields = FieldSet::new().with(Field::Phones).with(Field::Emails);
    let params = data_query(&fields, None).expect("data pass");
    assert_eq!(
      params.projection,
      vec![
        columns::CONTACT_ID,
        columns::DATA_ID,
        columns::MIMETYPE,
        columns::DATA1,
        columns::DATA2,
      ]
    );
  }

  #[test]
  fn data_projection_excludes_unrequested_field_columns() {
    // Organization needs data3; a phones-only request must not fetch it.
    let fields = FieldSet::new().with(Field::Phones);
    let params = data_query(&fields, None).expect("data pass");
    assert!(!params.projection.contains(&columns::DATA3));

    let with_org = FieldSet::new().with(Field::Phones).with(Field::Organization);
    let params = data_query(&with_org, None).expect("data pass");
    assert!(params.projection.contains(&columns::DATA3));
  }

  #[test]
  fn no_data_fields_means_no_data_pass() {
    let fields = FieldSet::new().with(Field::Name).with(Field::Starred);
    assert!(data_query(&fields, None).is_none());
  }

  #[test]
  fn argument_count_matches_placeholder_count() {
    let ids = [ContactId("3".into()), ContactId("9".into())];
    let fields = FieldSet::new().with(Field::Phones).with(Field::Emails);

    let params = data_query(&fields, Some(&ids)).expect("data pass");
    let selection = params.selection.expect("selection");
    assert_eq!(placeholders(&selection.clause), selection.args.len());
  }

  #[test]
  fn argument_order_follows_clause_order() {
    let ids = [ContactId("3".into()), ContactId("9".into())];
    let fields = FieldSet::new().with(Field::Phones);

    let params = data_query(&fields, Some(&ids)).expect("data pass");
    let selection = params.selection.expect("selection");
    assert_eq!(
      selection.clause,
      "contact_id IN (?, ?) AND mimetype IN (?)"
    );
    assert_eq!(
      selection.args,
      vec![
        Value::Text("3".into()),
        Value::Text("9".into()),
        Value::Text(Field::Phones.mime_type().unwrap().to_owned()),
      ]
    );
  }

  #[test]
  fn ids_query_pages_only_the_identifying_columns() {
    let params = ids_query(25, 50, Some("ada"), None);
    assert_eq!(params.projection, vec![columns::CONTACT_ID]);
    assert_eq!(params.limit, Some(25));
    assert_eq!(params.offset, Some(50));
    let selection = params.selection.expect("name filter");
    assert_eq!(selection.args, vec![Value::Text("%ada%".into())]);
  }

  #[test]
  fn raw_contact_resolution_filters_to_local_account() {
    let params = raw_contact_query(&ContactId("5".into()));
    let selection = params.selection.expect("selection");
    assert!(selection.clause.contains("account_type IS NULL"));
    assert!(selection.clause.contains("account_name IS NULL"));
    assert_eq!(selection.args.len(), placeholders(&selection.clause));
  }
}
