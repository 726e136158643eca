//! Error type for `rolo-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A query was submitted with zero projected columns.
  #[error("query with an empty projection")]
  EmptyProjection,

  /// An update was submitted with no values to set.
  #[error("update with no values")]
  EmptyValues,

  /// A batch operation back-references something that is not an earlier
  /// insert in the same batch.
  #[error("operation {op} back-references operation {target}, which is not an earlier insert")]
  InvalidBackRef { op: usize, target: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
