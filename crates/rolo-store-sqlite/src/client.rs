//! [`SqliteClient`] — the SQLite implementation of [`StoreClient`].

use std::path::Path;

use rolo_core::{
  schema::columns,
  store::{
    BackRef, BatchOp, BatchResult, Cursor, QueryParams, Row, RowValues,
    Selection, SortOrder, StoreClient, Table, Value,
  },
};
use uuid::Uuid;

use crate::{Error, Result, schema::SCHEMA};

// ─── Client ──────────────────────────────────────────────────────────────────

/// A contact row store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteClient {
  conn: tokio_rusqlite::Connection,
}

impl SqliteClient {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let client = Self { conn };
    client.init_schema().await?;
    Ok(client)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let client = Self { conn };
    client.init_schema().await?;
    Ok(client)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SQL assembly ────────────────────────────────────────────────────────────

fn sort_sql(sort: SortOrder) -> &'static str {
  match sort {
    SortOrder::NameAsc => "display_name COLLATE NOCASE ASC",
    SortOrder::NameDesc => "display_name COLLATE NOCASE DESC",
  }
}

fn build_select(table: Table, params: &QueryParams) -> String {
  let mut sql = format!(
    "SELECT {} FROM {}",
    params.projection.join(", "),
    table.as_str()
  );
  if let Some(selection) = &params.selection {
    sql.push_str(" WHERE ");
    sql.push_str(&selection.clause);
  }
  if let Some(sort) = params.sort {
    sql.push_str(" ORDER BY ");
    sql.push_str(sort_sql(sort));
  }
  match (params.limit, params.offset) {
    (Some(limit), Some(offset)) => {
      sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    }
    (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
    // SQLite has no bare OFFSET; -1 means "no limit".
    (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
    (None, None) => {}
  }
  sql
}

fn encode_value(value: &Value) -> rusqlite::types::Value {
  match value {
    Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
    Value::Integer(n) => rusqlite::types::Value::Integer(*n),
    Value::Null => rusqlite::types::Value::Null,
  }
}

fn decode_value(value: rusqlite::types::ValueRef<'_>) -> Value {
  match value {
    rusqlite::types::ValueRef::Null => Value::Null,
    rusqlite::types::ValueRef::Integer(n) => Value::Integer(n),
    rusqlite::types::ValueRef::Real(f) => Value::Text(f.to_string()),
    rusqlite::types::ValueRef::Text(bytes) => {
      Value::Text(String::from_utf8_lossy(bytes).into_owned())
    }
    rusqlite::types::ValueRef::Blob(_) => Value::Null,
  }
}

fn selection_args(selection: &Selection) -> Vec<rusqlite::types::Value> {
  selection.args.iter().map(encode_value).collect()
}

/// Defaults the store assigns on insert, beyond what the caller supplied.
/// The contact id itself is assigned by a schema trigger.
fn with_store_defaults(table: Table, values: RowValues) -> RowValues {
  if table == Table::RawContacts && values.get(columns::LOOKUP_KEY).is_none() {
    return values.with(columns::LOOKUP_KEY, Uuid::new_v4().to_string());
  }
  values
}

fn insert_row(
  conn: &rusqlite::Connection,
  table: Table,
  values: &RowValues,
) -> rusqlite::Result<String> {
  if values.is_empty() {
    let sql = format!("INSERT INTO {} DEFAULT VALUES", table.as_str());
    conn.execute(&sql, [])?;
  } else {
    let mut cols = String::new();
    let mut placeholders = String::new();
    let mut args = Vec::with_capacity(values.len());
    for (i, (column, value)) in values.iter().enumerate() {
      if i > 0 {
        cols.push_str(", ");
        placeholders.push_str(", ");
      }
      cols.push_str(column);
      placeholders.push('?');
      args.push(encode_value(value));
    }
    let sql = format!(
      "INSERT INTO {} ({cols}) VALUES ({placeholders})",
      table.as_str()
    );
    conn.execute(&sql, rusqlite::params_from_iter(args))?;
  }
  Ok(conn.last_insert_rowid().to_string())
}

fn update_rows(
  conn: &rusqlite::Connection,
  table: Table,
  values: &RowValues,
  selection: &Selection,
) -> rusqlite::Result<usize> {
  let mut assignments = String::new();
  let mut args = Vec::with_capacity(values.len() + selection.args.len());
  for (i, (column, value)) in values.iter().enumerate() {
    if i > 0 {
      assignments.push_str(", ");
    }
    assignments.push_str(column);
    assignments.push_str(" = ?");
    args.push(encode_value(value));
  }
  args.extend(selection_args(selection));
  let sql = format!(
    "UPDATE {} SET {assignments} WHERE {}",
    table.as_str(),
    selection.clause
  );
  conn.execute(&sql, rusqlite::params_from_iter(args))
}

fn delete_rows(
  conn: &rusqlite::Connection,
  table: Table,
  selection: &Selection,
) -> rusqlite::Result<usize> {
  let sql =
    format!("DELETE FROM {} WHERE {}", table.as_str(), selection.clause);
  conn.execute(&sql, rusqlite::params_from_iter(selection_args(selection)))
}

// ─── StoreClient impl ────────────────────────────────────────────────────────

impl StoreClient for SqliteClient {
  type Error = Error;

  async fn query(&self, table: Table, params: QueryParams) -> Result<Cursor> {
    if params.projection.is_empty() {
      return Err(Error::EmptyProjection);
    }

    let sql = build_select(table, &params);
    let projection = params.projection.clone();
    let args = params
      .selection
      .as_ref()
      .map(selection_args)
      .unwrap_or_default();

    let rows: Vec<Row> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let mut raw_rows = stmt.query(rusqlite::params_from_iter(args))?;
        let mut out = Vec::new();
        while let Some(raw) = raw_rows.next()? {
          let mut cells = Vec::with_capacity(projection.len());
          for (i, column) in projection.iter().enumerate() {
            cells.push(((*column).to_owned(), decode_value(raw.get_ref(i)?)));
          }
          out.push(Row::new(cells));
        }
        Ok(out)
      })
      .await?;

    Ok(Cursor::from_rows(rows))
  }

  async fn insert(&self, table: Table, values: RowValues) -> Result<String> {
    let values = with_store_defaults(table, values);
    let id = self
      .conn
      .call(move |conn| Ok(insert_row(conn, table, &values)?))
      .await?;
    Ok(id)
  }

  async fn update(
    &self,
    table: Table,
    values: RowValues,
    selection: Selection,
  ) -> Result<usize> {
    if values.is_empty() {
      return Err(Error::EmptyValues);
    }
    let count = self
      .conn
      .call(move |conn| Ok(update_rows(conn, table, &values, &selection)?))
      .await?;
    Ok(count)
  }

  async fn delete(&self, table: Table, selection: Selection) -> Result<usize> {
    let count = self
      .conn
      .call(move |conn| Ok(delete_rows(conn, table, &selection)?))
      .await?;
    Ok(count)
  }

  async fn apply_batch(
    &self,
    ops: Vec<BatchOp>,
  ) -> Result<Vec<BatchResult>> {
    // Back-references are fully checkable before touching the database:
    // each must point at an earlier operation, and that operation must be
    // an insert.
    for (i, op) in ops.iter().enumerate() {
      if let BatchOp::Insert { back_refs, .. } = op {
        for BackRef { op_index, .. } in back_refs {
          let valid = *op_index < i
            && matches!(ops[*op_index], BatchOp::Insert { .. });
          if !valid {
            return Err(Error::InvalidBackRef { op: i, target: *op_index });
          }
        }
      }
    }

    let results = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut results: Vec<BatchResult> = Vec::with_capacity(ops.len());
        for op in ops {
          match op {
            BatchOp::Insert { table, mut values, back_refs } => {
              for BackRef { column, op_index } in back_refs {
                let id = match &results[op_index] {
                  BatchResult::Inserted(id) => id.clone(),
                  // Checked above: back-references only target inserts.
                  BatchResult::Affected(_) => {
                    unreachable!("back-reference target validated")
                  }
                };
                values.set(column, id);
              }
              let values = with_store_defaults(table, values);
              let id = insert_row(&tx, table, &values)?;
              results.push(BatchResult::Inserted(id));
            }
            BatchOp::Update { table, values, selection } => {
              let count = update_rows(&tx, table, &values, &selection)?;
              results.push(BatchResult::Affected(count));
            }
            BatchOp::Delete { table, selection } => {
              let count = delete_rows(&tx, table, &selection)?;
              results.push(BatchResult::Affected(count));
            }
          }
        }
        tx.commit()?;
        Ok(results)
      })
      .await?;

    Ok(results)
  }
}
