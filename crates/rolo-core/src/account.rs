//! Account — the auth collaborator's user record, seen here only through the
//! fields billing events touch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record. Credentials and session state live elsewhere; this is the
/// webhook's write target and the subscription gate's read source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  pub user_id:                Uuid,
  pub email:                  String,
  /// Most recently recorded provider status; absent until billing events
  /// arrive. Only the literal `"active"` unlocks the contact collection.
  pub subscription_status:    Option<String>,
  pub stripe_customer_id:     Option<String>,
  pub stripe_subscription_id: Option<String>,
  pub created_at:             DateTime<Utc>,
}
