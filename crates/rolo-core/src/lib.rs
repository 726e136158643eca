//! Core types and trait definitions for the rolo contact engine.
//!
//! This crate is deliberately free of database and I/O dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod field;
pub mod id;
pub mod label;
pub mod record;
pub mod schema;
pub mod store;
pub mod write;

pub use error::{Error, Result};
