//! Hosted checkout-session creation.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::{Error, Result};

/// Connection settings for the provider's REST API.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
  /// Secret API key (`sk_…`).
  pub secret_key:  String,
  /// Price identifier for the single subscription plan.
  pub price_id:    String,
  pub success_url: String,
  pub cancel_url:  String,
  /// Overridable for tests; the real endpoint otherwise.
  pub api_base:    String,
}

impl CheckoutConfig {
  pub const DEFAULT_API_BASE: &'static str = "https://api.stripe.com";
}

/// A created hosted-checkout session: the caller redirects the browser to
/// `url` and hears the outcome later via webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
  pub id:  String,
  pub url: String,
}

/// Async client for creating checkout sessions.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct CheckoutClient {
  client: Client,
  config: CheckoutConfig,
}

impl CheckoutClient {
  pub fn new(config: CheckoutConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  /// Create a subscription-mode session for one seat of the configured
  /// plan, tagged with `user_id` in metadata so the completion webhook can
  /// resolve the account later.
  pub async fn create_session(
    &self,
    user_id: Uuid,
    email: &str,
  ) -> Result<CheckoutSession> {
    let user_id = user_id.to_string();
    let form: Vec<(&str, &str)> = vec![
      ("mode", "subscription"),
      ("payment_method_types[0]", "card"),
      ("line_items[0][price]", &self.config.price_id),
      ("line_items[0][quantity]", "1"),
      ("success_url", &self.config.success_url),
      ("cancel_url", &self.config.cancel_url),
      ("customer_email", email),
      ("metadata[userId]", &user_id),
    ];

    let resp = self
      .client
      .post(format!(
        "{}/v1/checkout/sessions",
        self.config.api_base.trim_end_matches('/')
      ))
      .basic_auth(&self.config.secret_key, None::<&str>)
      .form(&form)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Provider { status: status.as_u16(), body });
    }

    Ok(resp.json().await?)
  }
}
