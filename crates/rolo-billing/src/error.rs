//! Error type for `rolo-billing`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Webhook payload signature verification failed. Fatal to the single
  /// request; the provider's own retry policy governs redelivery.
  #[error("invalid webhook signature")]
  SignatureInvalid,

  #[error("malformed event payload: {0}")]
  Payload(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("checkout request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("provider returned {status}: {body}")]
  Provider { status: u16, body: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
