//! JSON REST API for rolo.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`ContactStore`] and [`AccountStore`]. Transport, TLS, and the
//! authentication mechanism are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, rolo_api::api_router(state)).await?;
//! ```

pub mod account;
pub mod billing;
pub mod contacts;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use rolo_billing::CheckoutClient;
use rolo_core::store::{AccountStore, ContactStore};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Billing collaborators used by the `/billing` handlers.
pub struct BillingContext {
  /// Shared secret for webhook signature verification.
  pub webhook_secret: String,
  pub checkout:       CheckoutClient,
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub billing: Arc<BillingContext>,
}

// Manual impl: `Arc` clones regardless of whether `S` itself does.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store.clone(),
      billing: self.billing.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ContactStore + AccountStore + 'static,
{
  Router::new()
    // Contacts
    .route(
      "/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route(
      "/contacts/{id}",
      put(contacts::update::<S>).delete(contacts::remove::<S>),
    )
    // Accounts
    .route(
      "/account",
      get(account::get_one::<S>).post(account::create::<S>),
    )
    // Billing
    .route(
      "/billing/checkout-session",
      post(billing::create_checkout_session::<S>),
    )
    .route("/billing/webhook", post(billing::webhook::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
