//! Webhook event decoding and the event-to-account-field mapping.

use serde::Deserialize;
use uuid::Uuid;

use rolo_core::{store::AccountStore, subscription};

use crate::{Error, Result};

// ─── Envelope ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
  #[serde(rename = "type")]
  kind: String,
  data: EnvelopeData,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
  object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionObject {
  customer:     Option<String>,
  subscription: Option<String>,
  metadata:     Option<CheckoutMetadata>,
}

#[derive(Debug, Deserialize)]
struct CheckoutMetadata {
  #[serde(rename = "userId")]
  user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
  id:     String,
  status: Option<String>,
}

// ─── Typed events ────────────────────────────────────────────────────────────

/// The provider events this system reacts to. Everything else decodes to
/// [`BillingEvent::Ignored`] and is acknowledged without effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
  /// First successful checkout: both provider identifiers plus activation.
  CheckoutCompleted {
    user_id:         Uuid,
    customer_id:     String,
    subscription_id: String,
  },
  /// Status change reported for an existing subscription.
  SubscriptionUpdated {
    subscription_id: String,
    status:          String,
  },
  SubscriptionDeleted { subscription_id: String },
  Ignored { kind: String },
}

/// Decode a raw (already signature-verified) webhook body.
pub fn decode_event(payload: &[u8]) -> Result<BillingEvent> {
  let envelope: Envelope = serde_json::from_slice(payload)?;

  match envelope.kind.as_str() {
    "checkout.session.completed" => {
      let session: CheckoutSessionObject =
        serde_json::from_value(envelope.data.object)?;
      let user_id = session
        .metadata
        .and_then(|m| m.user_id)
        .ok_or_else(|| Error::Payload("checkout session carries no userId metadata".into()))?;
      let customer_id = session
        .customer
        .ok_or_else(|| Error::Payload("checkout session carries no customer".into()))?;
      let subscription_id = session
        .subscription
        .ok_or_else(|| Error::Payload("checkout session carries no subscription".into()))?;
      Ok(BillingEvent::CheckoutCompleted {
        user_id,
        customer_id,
        subscription_id,
      })
    }

    "customer.subscription.updated" => {
      let sub: SubscriptionObject = serde_json::from_value(envelope.data.object)?;
      let status = sub
        .status
        .ok_or_else(|| Error::Payload("subscription update carries no status".into()))?;
      Ok(BillingEvent::SubscriptionUpdated {
        subscription_id: sub.id,
        status,
      })
    }

    "customer.subscription.deleted" => {
      let sub: SubscriptionObject = serde_json::from_value(envelope.data.object)?;
      Ok(BillingEvent::SubscriptionDeleted { subscription_id: sub.id })
    }

    other => Ok(BillingEvent::Ignored { kind: other.to_owned() }),
  }
}

// ─── Effects ─────────────────────────────────────────────────────────────────

/// Apply `event` to the account store and return how many accounts changed.
///
/// Every arm is a plain field assignment, so redelivering an event leaves
/// state identical to receiving it once. An event that matches no account
/// changes zero records and is still a success.
pub async fn apply_event<S: AccountStore>(
  store: &S,
  event: &BillingEvent,
) -> rolo_core::Result<u64> {
  match event {
    BillingEvent::CheckoutCompleted {
      user_id,
      customer_id,
      subscription_id,
    } => {
      store
        .activate_subscription(*user_id, customer_id.clone(), subscription_id.clone())
        .await
    }

    BillingEvent::SubscriptionUpdated {
      subscription_id,
      status,
    } => {
      store
        .set_status_by_subscription(subscription_id.clone(), status.clone())
        .await
    }

    BillingEvent::SubscriptionDeleted { subscription_id } => {
      store
        .set_status_by_subscription(
          subscription_id.clone(),
          subscription::CANCELED.to_owned(),
        )
        .await
    }

    BillingEvent::Ignored { .. } => Ok(0),
  }
}

#[cfg(test)]
mod tests {
  use rolo_store_sqlite::SqliteStore;

  use super::*;

  #[test]
  fn decodes_checkout_completed() {
    let user_id = Uuid::new_v4();
    let body = serde_json::json!({
      "id": "evt_1",
      "type": "checkout.session.completed",
      "data": { "object": {
        "customer": "cus_123",
        "subscription": "sub_123",
        "customer_email": "a@example.com",
        "metadata": { "userId": user_id }
      }}
    });

    let event = decode_event(body.to_string().as_bytes()).unwrap();
    assert_eq!(
      event,
      BillingEvent::CheckoutCompleted {
        user_id,
        customer_id:     "cus_123".into(),
        subscription_id: "sub_123".into(),
      }
    );
  }

  #[test]
  fn checkout_without_metadata_is_a_payload_error() {
    let body = serde_json::json!({
      "type": "checkout.session.completed",
      "data": { "object": { "customer": "cus_123", "subscription": "sub_123" } }
    });
    let err = decode_event(body.to_string().as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Payload(_)));
  }

  #[test]
  fn decodes_subscription_updated_and_deleted() {
    let updated = serde_json::json!({
      "type": "customer.subscription.updated",
      "data": { "object": { "id": "sub_123", "status": "past_due" } }
    });
    assert_eq!(
      decode_event(updated.to_string().as_bytes()).unwrap(),
      BillingEvent::SubscriptionUpdated {
        subscription_id: "sub_123".into(),
        status:          "past_due".into(),
      }
    );

    let deleted = serde_json::json!({
      "type": "customer.subscription.deleted",
      "data": { "object": { "id": "sub_123", "status": "canceled" } }
    });
    assert_eq!(
      decode_event(deleted.to_string().as_bytes()).unwrap(),
      BillingEvent::SubscriptionDeleted { subscription_id: "sub_123".into() }
    );
  }

  #[test]
  fn unrecognised_kinds_are_ignored() {
    let body = serde_json::json!({
      "type": "invoice.payment_failed",
      "data": { "object": { "id": "in_1", "subscription": "sub_123" } }
    });
    assert_eq!(
      decode_event(body.to_string().as_bytes()).unwrap(),
      BillingEvent::Ignored { kind: "invoice.payment_failed".into() }
    );
  }

  #[tokio::test]
  async fn checkout_event_activates_the_account() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let account = store.create_account("a@example.com".into()).await.unwrap();

    let event = BillingEvent::CheckoutCompleted {
      user_id:         account.user_id,
      customer_id:     "cus_123".into(),
      subscription_id: "sub_123".into(),
    };
    assert_eq!(apply_event(&store, &event).await.unwrap(), 1);

    let fetched = store.get_account(account.user_id).await.unwrap().unwrap();
    assert_eq!(fetched.subscription_status.as_deref(), Some("active"));
    assert_eq!(fetched.stripe_customer_id.as_deref(), Some("cus_123"));
    assert_eq!(fetched.stripe_subscription_id.as_deref(), Some("sub_123"));

    // Redelivery: same event, same final state.
    assert_eq!(apply_event(&store, &event).await.unwrap(), 1);
    let again = store.get_account(account.user_id).await.unwrap().unwrap();
    assert_eq!(again, fetched);
  }

  #[tokio::test]
  async fn deleted_event_for_unknown_subscription_updates_nothing() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.create_account("a@example.com".into()).await.unwrap();

    let event = BillingEvent::SubscriptionDeleted { subscription_id: "sub_123".into() };
    assert_eq!(apply_event(&store, &event).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn deleted_event_cancels_the_matching_account() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let account = store.create_account("a@example.com".into()).await.unwrap();
    store
      .activate_subscription(account.user_id, "cus_123".into(), "sub_123".into())
      .await
      .unwrap();

    let event = BillingEvent::SubscriptionDeleted { subscription_id: "sub_123".into() };
    assert_eq!(apply_event(&store, &event).await.unwrap(), 1);

    let fetched = store.get_account(account.user_id).await.unwrap().unwrap();
    assert_eq!(fetched.subscription_status.as_deref(), Some("canceled"));
  }
}
