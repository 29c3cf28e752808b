//! The shared error taxonomy.
//!
//! Every store backend reports through these variants so callers can key
//! behavior off them: the collection controller treats `NotFound` on delete
//! as already-done, and the API maps each variant to a distinct status.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A required contact field is missing or blank.
  #[error("validation failed: {0}")]
  Validation(String),

  /// No owning user could be resolved for the request.
  #[error("no resolvable owner")]
  Unauthorized,

  #[error("contact not found: {0}")]
  NotFound(Uuid),

  /// The backing medium cannot be reached. Cached state must be left alone
  /// when this surfaces.
  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
