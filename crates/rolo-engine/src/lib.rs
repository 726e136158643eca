//! The contact data-access engine.
//!
//! Turns a caller-specified set of desired fields into store queries, folds
//! the store's multi-row result sets back into typed records, and decomposes
//! typed write intents into atomic store batches. The engine talks to the
//! store exclusively through [`rolo_core::store::StoreClient`].

pub mod aggregate;
pub mod props;
pub mod query;
pub mod repo;
pub mod write;

pub use repo::ContactRepository;
pub use rolo_core::{Error, Result};
