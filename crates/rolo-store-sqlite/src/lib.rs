//! SQLite backend for the rolo contact store.
//!
//! Implements the platform row-store contract (`rolo_core::store`): three
//! URI-addressed tables, selection strings with positional placeholders,
//! and an atomic batch primitive with back-references. Wraps
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.
//!
//! Provider-side derivations the engine relies on (the aggregated
//! `contacts` table, `display_name` from the structured-name row, lookup
//! keys) are emulated here with a view, triggers, and insert defaults.

mod client;
mod schema;

pub mod error;

pub use client::SqliteClient;
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
