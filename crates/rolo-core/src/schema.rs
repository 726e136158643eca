//! Persisted-layout constants shared with the platform row store.
//!
//! The column names and mimetype strings below are a fixed external contract:
//! a mismatch does not raise an error, it silently returns zero rows. They
//! live in exactly one place for that reason.

/// Column names, valid across the three tables where noted.
pub mod columns {
  /// Owning aggregated contact. Present on all three tables.
  pub const CONTACT_ID: &str = "contact_id";
  /// Present on `raw_contacts` and `data`.
  pub const RAW_CONTACT_ID: &str = "raw_contact_id";
  /// Present on `data` only.
  pub const DATA_ID: &str = "data_id";
  /// Kind tag of a `data` row.
  pub const MIMETYPE: &str = "mimetype";

  // ── contacts table ────────────────────────────────────────────────────
  pub const DISPLAY_NAME: &str = "display_name";
  pub const STARRED: &str = "starred";
  pub const LOOKUP_KEY: &str = "lookup_key";

  // ── raw_contacts table ────────────────────────────────────────────────
  pub const ACCOUNT_TYPE: &str = "account_type";
  pub const ACCOUNT_NAME: &str = "account_name";

  // ── generic data columns; meaning depends on the row's mimetype ───────
  pub const DATA1: &str = "data1";
  pub const DATA2: &str = "data2";
  pub const DATA3: &str = "data3";
  pub const DATA4: &str = "data4";
  pub const DATA5: &str = "data5";
  pub const DATA6: &str = "data6";
}

/// Mimetype literals tagging the kind of a `data` row.
pub mod mime {
  /// Structured name. Write-only from the engine's point of view: the store
  /// derives the contacts-table `display_name` from this row.
  pub const NAME: &str = "rolo/name";
  pub const PHONE: &str = "rolo/phone";
  pub const EMAIL: &str = "rolo/email";
  pub const ADDRESS: &str = "rolo/postal-address";
  pub const ORGANIZATION: &str = "rolo/organization";
  pub const EVENT: &str = "rolo/event";
  pub const RELATION: &str = "rolo/relation";
  pub const WEBSITE: &str = "rolo/website";
  pub const NOTE: &str = "rolo/note";
}
