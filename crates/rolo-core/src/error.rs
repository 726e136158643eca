//! Error types for `rolo-core`.

use thiserror::Error;

use crate::id::{ContactId, RawContactId};

#[derive(Debug, Error)]
pub enum Error {
  /// A freshly inserted raw contact did not resolve back to an aggregated
  /// contact id.
  #[error("no contact id resolves for raw contact {0}")]
  ContactIdNotFound(RawContactId),

  /// The contact has no writable raw contact in the local account.
  #[error("no writable raw contact for contact {0}")]
  RawContactIdNotFound(ContactId),

  /// A row decoder asked for a column the cursor does not carry. The
  /// projection and the decoder disagree; this is a bug, not store state.
  #[error("column missing from row: {0}")]
  MissingColumn(&'static str),

  /// A batch returned results whose shape does not match the submitted
  /// operation list.
  #[error("unexpected batch result: {0}")]
  UnexpectedBatchResult(&'static str),

  /// Failure reported by the underlying row store, propagated unchanged.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store-client failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
