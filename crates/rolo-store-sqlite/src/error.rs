//! Error type for `rolo-store-sqlite`.
//!
//! Internal plumbing errors live here; at the store-trait boundary they are
//! folded into the workspace taxonomy via the `From` impl below.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<Error> for rolo_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Json(e) => rolo_core::Error::Serialization(e),
      other => rolo_core::Error::Unavailable(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
