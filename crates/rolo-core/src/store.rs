//! Store abstractions the rest of the workspace depends on.
//!
//! Backends (e.g. `rolo-store-sqlite` server-side, `ApiStore` client-side)
//! implement these traits; higher layers depend on the abstraction, not on
//! any concrete backend. All methods return `Send` futures so the traits can
//! be used in multi-threaded async runtimes (e.g. tokio with `axum`).
//!
//! Errors are the shared taxonomy in [`crate::error`] rather than a
//! per-backend associated type: callers key behavior off specific variants
//! (`NotFound` on delete means already-done; `Unavailable` means leave
//! cached state alone), so the variants must survive the trait boundary.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  account::Account,
  contact::{Contact, NewContact},
};

// ─── Contact store ───────────────────────────────────────────────────────────

/// Abstraction over durable contact storage, keyed by owner.
pub trait ContactStore: Send + Sync {
  /// Return all contacts for `owner`, ordered newest-created first.
  ///
  /// Fails with `Unavailable` if the backing medium cannot be reached and
  /// `Unauthorized` if no owner can be resolved.
  fn list(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Contact>>> + Send + '_;

  /// Persist `draft` with a store-assigned `id` and creation timestamp.
  ///
  /// Fails with `Validation` if required fields are blank; callers run the
  /// same check first as a fast-path rejection.
  fn create(
    &self,
    draft: NewContact,
  ) -> impl Future<Output = Result<Contact>> + Send + '_;

  /// Replace the record at `id` wholesale. There is no field-patch variant;
  /// callers resubmit the full record.
  ///
  /// Fails with `NotFound` if `id` does not exist.
  fn update(
    &self,
    id: Uuid,
    record: Contact,
  ) -> impl Future<Output = Result<Contact>> + Send + '_;

  /// Remove the record at `id`.
  ///
  /// `NotFound` is reported distinctly from `Unavailable` so callers can
  /// treat already-gone as success without masking outages.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── Account store ───────────────────────────────────────────────────────────

/// Abstraction over user-account records, as far as billing needs them.
pub trait AccountStore: Send + Sync {
  fn create_account(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  /// Returns `None` if the account does not exist.
  fn get_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + '_;

  /// First-checkout effect: record both provider identifiers and set the
  /// status to active. Assignment is idempotent under redelivery.
  ///
  /// Returns the number of accounts updated; an unknown user updates zero
  /// records and is not an error.
  fn activate_subscription(
    &self,
    user_id: Uuid,
    customer_id: String,
    subscription_id: String,
  ) -> impl Future<Output = Result<u64>> + Send + '_;

  /// Set the status on whichever account carries `subscription_id`.
  ///
  /// Returns the number of accounts updated. An unmatched id updates zero
  /// records and is not an error.
  fn set_status_by_subscription(
    &self,
    subscription_id: String,
    status: String,
  ) -> impl Future<Output = Result<u64>> + Send + '_;
}
