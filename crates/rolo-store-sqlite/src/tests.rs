//! Integration tests for `SqliteClient` against an in-memory database.

use rolo_core::{
  schema::{columns, mime},
  store::{
    BackRef, BatchOp, BatchResult, QueryParams, RowValues, Selection,
    SortOrder, StoreClient, Table, Value,
  },
};

use crate::{Error, SqliteClient};

async fn client() -> SqliteClient {
  SqliteClient::open_in_memory()
    .await
    .expect("in-memory store")
}

fn local_raw_contact() -> RowValues {
  RowValues::new()
    .with(columns::ACCOUNT_TYPE, Value::Null)
    .with(columns::ACCOUNT_NAME, Value::Null)
    .with(columns::STARRED, false)
}

fn phone_values(raw_id: &str, number: &str, label: &str) -> RowValues {
  RowValues::new()
    .with(columns::RAW_CONTACT_ID, raw_id)
    .with(columns::MIMETYPE, mime::PHONE)
    .with(columns::DATA1, number)
    .with(columns::DATA2, label)
}

// ─── Inserts & store-assigned ids ────────────────────────────────────────────

#[tokio::test]
async fn insert_assigns_contact_id_and_lookup_key() {
  let c = client().await;
  let raw_id = c
    .insert(Table::RawContacts, local_raw_contact())
    .await
    .unwrap();

  let params = QueryParams {
    projection: vec![columns::CONTACT_ID, columns::LOOKUP_KEY],
    selection: Some(Selection::new(
      "raw_contact_id = ?",
      vec![Value::Text(raw_id.clone())],
    )),
    ..Default::default()
  };
  let mut cursor = c.query(Table::RawContacts, params).await.unwrap();
  let row = cursor.next().expect("row");

  // Local aggregation: contact id mirrors the raw contact id.
  assert_eq!(row.id(columns::CONTACT_ID), Some(raw_id));
  assert!(row.text(columns::LOOKUP_KEY).is_some_and(|k| !k.is_empty()));
}

#[tokio::test]
async fn data_row_is_denormalised_with_owner_contact_id() {
  let c = client().await;
  let raw_id = c
    .insert(Table::RawContacts, local_raw_contact())
    .await
    .unwrap();
  c.insert(Table::Data, phone_values(&raw_id, "555-0100", "home"))
    .await
    .unwrap();

  let params = QueryParams {
    projection: vec![columns::CONTACT_ID, columns::DATA1],
    selection: Some(Selection::new(
      "contact_id = ?",
      vec![Value::Text(raw_id.clone())],
    )),
    ..Default::default()
  };
  let rows: Vec<_> = c.query(Table::Data, params).await.unwrap().collect();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].text(columns::DATA1), Some("555-0100"));
}

#[tokio::test]
async fn name_row_derives_display_name() {
  let c = client().await;
  let raw_id = c
    .insert(Table::RawContacts, local_raw_contact())
    .await
    .unwrap();

  let name_row = RowValues::new()
    .with(columns::RAW_CONTACT_ID, raw_id.as_str())
    .with(columns::MIMETYPE, mime::NAME)
    .with(columns::DATA1, "Alice Liddell");
  c.insert(Table::Data, name_row).await.unwrap();

  let params = QueryParams {
    projection: vec![columns::DISPLAY_NAME],
    selection: Some(Selection::new(
      "contact_id = ?",
      vec![Value::Text(raw_id.clone())],
    )),
    ..Default::default()
  };
  let mut cursor = c.query(Table::Contacts, params).await.unwrap();
  let row = cursor.next().expect("contact row");
  assert_eq!(row.text(columns::DISPLAY_NAME), Some("Alice Liddell"));

  // Deleting the name row clears the derived column.
  c.delete(
    Table::Data,
    Selection::new(
      "contact_id = ? AND mimetype = ?",
      vec![Value::Text(raw_id.clone()), Value::Text(mime::NAME.into())],
    ),
  )
  .await
  .unwrap();

  let params = QueryParams {
    projection: vec![columns::DISPLAY_NAME],
    selection: Some(Selection::new(
      "contact_id = ?",
      vec![Value::Text(raw_id)],
    )),
    ..Default::default()
  };
  let mut cursor = c.query(Table::Contacts, params).await.unwrap();
  let row = cursor.next().expect("contact row");
  assert_eq!(row.text(columns::DISPLAY_NAME), None);
}

// ─── Batches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_back_reference_links_data_to_new_raw_contact() {
  let c = client().await;

  let ops = vec![
    BatchOp::Insert {
      table:     Table::RawContacts,
      values:    local_raw_contact(),
      back_refs: vec![],
    },
    BatchOp::Insert {
      table:     Table::Data,
      values:    RowValues::new()
        .with(columns::MIMETYPE, mime::PHONE)
        .with(columns::DATA1, "555-0100")
        .with(columns::DATA2, "home"),
      back_refs: vec![BackRef {
        column:   columns::RAW_CONTACT_ID,
        op_index: 0,
      }],
    },
  ];

  let results = c.apply_batch(ops).await.unwrap();
  assert_eq!(results.len(), 2);
  let BatchResult::Inserted(raw_id) = &results[0] else {
    panic!("expected inserted id");
  };

  let params = QueryParams {
    projection: vec![columns::DATA1],
    selection: Some(Selection::new(
      "raw_contact_id = ?",
      vec![Value::Text(raw_id.clone())],
    )),
    ..Default::default()
  };
  let rows: Vec<_> = c.query(Table::Data, params).await.unwrap().collect();
  assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn failing_batch_leaves_no_partial_state() {
  let c = client().await;

  let ops = vec![
    BatchOp::Insert {
      table:     Table::RawContacts,
      values:    local_raw_contact(),
      back_refs: vec![],
    },
    // Missing the NOT NULL mimetype column — this operation fails.
    BatchOp::Insert {
      table:     Table::Data,
      values:    RowValues::new().with(columns::DATA1, "555-0100"),
      back_refs: vec![BackRef {
        column:   columns::RAW_CONTACT_ID,
        op_index: 0,
      }],
    },
  ];

  assert!(c.apply_batch(ops).await.is_err());

  let params = QueryParams {
    projection: vec![columns::CONTACT_ID],
    ..Default::default()
  };
  let cursor = c.query(Table::Contacts, params).await.unwrap();
  assert_eq!(cursor.remaining(), 0, "raw contact insert must roll back");
}

#[tokio::test]
async fn forward_back_reference_is_rejected() {
  let c = client().await;

  let ops = vec![BatchOp::Insert {
    table:     Table::Data,
    values:    RowValues::new().with(columns::MIMETYPE, mime::PHONE),
    back_refs: vec![BackRef {
      column:   columns::RAW_CONTACT_ID,
      op_index: 0, // references itself
    }],
  }];

  let err = c.apply_batch(ops).await.unwrap_err();
  assert!(matches!(err, Error::InvalidBackRef { op: 0, target: 0 }));
}

#[tokio::test]
async fn back_reference_to_delete_is_rejected() {
  let c = client().await;

  let ops = vec![
    BatchOp::Delete {
      table:     Table::Data,
      selection: Selection::new("data_id = ?", vec![Value::Text("1".into())]),
    },
    BatchOp::Insert {
      table:     Table::Data,
      values:    RowValues::new().with(columns::MIMETYPE, mime::PHONE),
      back_refs: vec![BackRef {
        column:   columns::RAW_CONTACT_ID,
        op_index: 0,
      }],
    },
  ];

  let err = c.apply_batch(ops).await.unwrap_err();
  assert!(matches!(err, Error::InvalidBackRef { op: 1, target: 0 }));
}

// ─── Deletes & cascades ──────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_raw_contact_cascades_to_data_rows() {
  let c = client().await;
  let raw_id = c
    .insert(Table::RawContacts, local_raw_contact())
    .await
    .unwrap();
  c.insert(Table::Data, phone_values(&raw_id, "555-0100", "home"))
    .await
    .unwrap();
  c.insert(Table::Data, phone_values(&raw_id, "555-0101", "work"))
    .await
    .unwrap();

  let removed = c
    .delete(
      Table::RawContacts,
      Selection::new("contact_id = ?", vec![Value::Text(raw_id.clone())]),
    )
    .await
    .unwrap();
  assert_eq!(removed, 1);

  let params = QueryParams {
    projection: vec![columns::DATA_ID],
    selection: Some(Selection::new(
      "raw_contact_id = ?",
      vec![Value::Text(raw_id)],
    )),
    ..Default::default()
  };
  let cursor = c.query(Table::Data, params).await.unwrap();
  assert_eq!(cursor.remaining(), 0);
}

// ─── Query shapes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn sort_limit_and_offset_page_through_contacts() {
  let c = client().await;
  for name in ["Charlie", "alice", "Bob", "dora"] {
    let raw_id = c
      .insert(Table::RawContacts, local_raw_contact())
      .await
      .unwrap();
    let name_row = RowValues::new()
      .with(columns::RAW_CONTACT_ID, raw_id.as_str())
      .with(columns::MIMETYPE, mime::NAME)
      .with(columns::DATA1, name);
    c.insert(Table::Data, name_row).await.unwrap();
  }

  let params = QueryParams {
    projection: vec![columns::DISPLAY_NAME],
    sort: Some(SortOrder::NameAsc),
    limit: Some(2),
    offset: Some(1),
    ..Default::default()
  };
  let names: Vec<String> = c
    .query(Table::Contacts, params)
    .await
    .unwrap()
    .filter_map(|row| row.text(columns::DISPLAY_NAME).map(str::to_owned))
    .collect();

  // Case-insensitive name order: alice, Bob, Charlie, dora.
  assert_eq!(names, vec!["Bob".to_owned(), "Charlie".to_owned()]);
}

#[tokio::test]
async fn empty_projection_is_rejected() {
  let c = client().await;
  let err = c
    .query(Table::Contacts, QueryParams::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyProjection));
}

#[tokio::test]
async fn update_with_no_values_is_rejected() {
  let c = client().await;
  let err = c
    .update(
      Table::RawContacts,
      RowValues::new(),
      Selection::new("contact_id = ?", vec![Value::Text("1".into())]),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyValues));
}

#[tokio::test]
async fn in_clause_restricts_to_given_ids() {
  let c = client().await;
  let mut ids = Vec::new();
  for _ in 0..3 {
    ids.push(
      c.insert(Table::RawContacts, local_raw_contact())
        .await
        .unwrap(),
    );
  }

  let params = QueryParams {
    projection: vec![columns::CONTACT_ID],
    selection: Some(Selection::new(
      "contact_id IN (?, ?)",
      vec![Value::Text(ids[0].clone()), Value::Text(ids[2].clone())],
    )),
    ..Default::default()
  };
  let got: Vec<String> = c
    .query(Table::Contacts, params)
    .await
    .unwrap()
    .filter_map(|row| row.id(columns::CONTACT_ID))
    .collect();
  assert_eq!(got.len(), 2);
  assert!(got.contains(&ids[0]) && got.contains(&ids[2]));
}
