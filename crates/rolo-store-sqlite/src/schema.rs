//! SQL schema for the SQLite row store.
//!
//! Executed once at connection startup. The layout is the platform side of
//! the contract consumed by `rolo_core::schema`: generic `data1`..`data6`
//! columns whose meaning depends on the row's mimetype.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS raw_contacts (
    raw_contact_id INTEGER PRIMARY KEY,
    contact_id     TEXT,                       -- assigned on insert, see trigger
    account_type   TEXT,                       -- NULL for the local account
    account_name   TEXT,
    starred        INTEGER NOT NULL DEFAULT 0,
    display_name   TEXT,                       -- derived from the name data row
    lookup_key     TEXT
);

CREATE TABLE IF NOT EXISTS data (
    data_id        INTEGER PRIMARY KEY,
    raw_contact_id INTEGER NOT NULL
                   REFERENCES raw_contacts(raw_contact_id) ON DELETE CASCADE,
    contact_id     TEXT,                       -- denormalised owner, see trigger
    mimetype       TEXT NOT NULL,
    data1          TEXT,
    data2          TEXT,
    data3          TEXT,
    data4          TEXT,
    data5          TEXT,
    data6          TEXT
);

-- The aggregated contacts table. This store only holds the local account,
-- so aggregation is the identity: one raw contact per contact.
CREATE VIEW IF NOT EXISTS contacts AS
    SELECT contact_id, display_name, starred, lookup_key
    FROM raw_contacts;

CREATE TRIGGER IF NOT EXISTS raw_contacts_assign_contact_id
AFTER INSERT ON raw_contacts
WHEN new.contact_id IS NULL
BEGIN
    UPDATE raw_contacts
    SET contact_id = CAST(new.raw_contact_id AS TEXT)
    WHERE raw_contact_id = new.raw_contact_id;
END;

CREATE TRIGGER IF NOT EXISTS data_assign_contact_id
AFTER INSERT ON data
BEGIN
    UPDATE data
    SET contact_id = (SELECT contact_id FROM raw_contacts
                      WHERE raw_contact_id = new.raw_contact_id)
    WHERE data_id = new.data_id;
END;

CREATE TRIGGER IF NOT EXISTS data_name_insert
AFTER INSERT ON data
WHEN new.mimetype = 'rolo/name'
BEGIN
    UPDATE raw_contacts SET display_name = new.data1
    WHERE raw_contact_id = new.raw_contact_id;
END;

CREATE TRIGGER IF NOT EXISTS data_name_update
AFTER UPDATE OF data1 ON data
WHEN new.mimetype = 'rolo/name'
BEGIN
    UPDATE raw_contacts SET display_name = new.data1
    WHERE raw_contact_id = new.raw_contact_id;
END;

CREATE TRIGGER IF NOT EXISTS data_name_delete
AFTER DELETE ON data
WHEN old.mimetype = 'rolo/name'
BEGIN
    UPDATE raw_contacts SET display_name = NULL
    WHERE raw_contact_id = old.raw_contact_id;
END;

CREATE INDEX IF NOT EXISTS data_raw_contact_idx ON data(raw_contact_id);
CREATE INDEX IF NOT EXISTS data_contact_idx     ON data(contact_id);
CREATE INDEX IF NOT EXISTS data_mimetype_idx    ON data(mimetype);

PRAGMA user_version = 1;
";
