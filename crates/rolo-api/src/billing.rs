//! Handlers for `/billing` endpoints: checkout-session creation and the
//! provider webhook.

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
};
use bytes::Bytes;
use chrono::Utc;
use rolo_billing::{BillingEvent, apply_event, decode_event, signature};
use rolo_core::store::{AccountStore, ContactStore};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Checkout session ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
  #[serde(rename = "userId")]
  pub user_id: Option<Uuid>,
  pub email:   String,
}

/// `POST /billing/checkout-session` — body `{userId, email}`; returns
/// `{sessionId, url}` for the hosted checkout redirect.
pub async fn create_checkout_session<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CheckoutBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let user_id = body
    .user_id
    .ok_or_else(|| ApiError::BadRequest("User ID required".to_owned()))?;

  let session = state
    .billing
    .checkout
    .create_session(user_id, &body.email)
    .await?;

  Ok(Json(json!({ "sessionId": session.id, "url": session.url })))
}

// ─── Webhook ─────────────────────────────────────────────────────────────────

/// `POST /billing/webhook` — raw provider event delivery.
///
/// The signature is verified against the shared endpoint secret before the
/// payload is trusted at all; an invalid signature is a 400 with no state
/// change. Recognised events map to account-field updates; everything else
/// is acknowledged untouched.
pub async fn webhook<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let header = headers
    .get("stripe-signature")
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::BadRequest("missing signature header".to_owned()))?;

  signature::verify_signature(
    &body,
    header,
    &state.billing.webhook_secret,
    signature::default_tolerance(),
    Utc::now(),
  )?;

  let event = decode_event(&body)?;
  let updated = apply_event(state.store.as_ref(), &event).await?;

  match &event {
    BillingEvent::Ignored { kind } => {
      tracing::debug!(%kind, "ignoring billing event");
    }
    other if updated == 0 => {
      // Typically an event for a subscription this store has never seen.
      tracing::warn!(?other, "billing event matched no account");
    }
    other => {
      tracing::info!(?other, updated, "applied billing event");
    }
  }

  Ok(Json(json!({ "received": true })))
}
