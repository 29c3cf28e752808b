//! [`ApiStore`] — the networked [`ContactStore`] implementation.
//!
//! Speaks the server's JSON wire protocol and folds HTTP statuses back into
//! the workspace error taxonomy, so the session layer never sees transport
//! details.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use rolo_core::{
  Error, Result,
  account::Account,
  contact::{Contact, NewContact},
  store::ContactStore,
};
use uuid::Uuid;

/// Connection settings for the rolo API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the rolo JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiStore {
  client: Client,
  config: ApiConfig,
}

impl ApiStore {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| Error::Unavailable(e.to_string()))?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url.trim_end_matches('/'))
  }

  /// Pull the `{"error": "..."}` message out of a failure response.
  async fn error_message(resp: Response) -> String {
    let status = resp.status();
    match resp.json::<serde_json::Value>().await {
      Ok(v) => v
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| status.to_string()),
      Err(_) => status.to_string(),
    }
  }

  /// Fold a failure response into the taxonomy. `id` gives `NotFound` a
  /// subject where the operation has one.
  async fn fail<T>(resp: Response, id: Option<Uuid>) -> Result<T> {
    let status = resp.status();
    let message = Self::error_message(resp).await;
    Err(match (status, id) {
      (StatusCode::BAD_REQUEST, _) => Error::Validation(message),
      (StatusCode::UNAUTHORIZED, _) => Error::Unauthorized,
      (StatusCode::NOT_FOUND, Some(id)) => Error::NotFound(id),
      _ => Error::Unavailable(format!("{status}: {message}")),
    })
  }

  async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
    resp
      .json()
      .await
      .map_err(|e| Error::Unavailable(e.to_string()))
  }

  fn transport(e: reqwest::Error) -> Error { Error::Unavailable(e.to_string()) }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `POST /account`
  pub async fn create_account(&self, email: &str) -> Result<Account> {
    let resp = self
      .client
      .post(self.url("/account"))
      .json(&serde_json::json!({ "email": email }))
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, None).await;
    }
    Self::decode(resp).await
  }

  /// `GET /account?userId=<id>`
  pub async fn fetch_account(&self, user_id: Uuid) -> Result<Account> {
    let resp = self
      .client
      .get(self.url("/account"))
      .query(&[("userId", user_id.to_string())])
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, Some(user_id)).await;
    }
    Self::decode(resp).await
  }

  /// `POST /billing/checkout-session` — returns the hosted checkout URL.
  pub async fn create_checkout_session(
    &self,
    user_id: Uuid,
    email: &str,
  ) -> Result<String> {
    let resp = self
      .client
      .post(self.url("/billing/checkout-session"))
      .json(&serde_json::json!({ "userId": user_id, "email": email }))
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, None).await;
    }
    let body: serde_json::Value = Self::decode(resp).await?;
    body
      .get("url")
      .and_then(|u| u.as_str())
      .map(str::to_owned)
      .ok_or_else(|| Error::Unavailable("checkout response carries no url".into()))
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for ApiStore {
  /// `GET /contacts?userId=<id>`
  async fn list(&self, owner: Uuid) -> Result<Vec<Contact>> {
    let resp = self
      .client
      .get(self.url("/contacts"))
      .query(&[("userId", owner.to_string())])
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, None).await;
    }
    Self::decode(resp).await
  }

  /// `POST /contacts`
  async fn create(&self, draft: NewContact) -> Result<Contact> {
    let resp = self
      .client
      .post(self.url("/contacts"))
      .json(&draft)
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, None).await;
    }
    Self::decode(resp).await
  }

  /// `PUT /contacts/{id}`
  async fn update(&self, id: Uuid, record: Contact) -> Result<Contact> {
    let resp = self
      .client
      .put(self.url(&format!("/contacts/{id}")))
      .json(&record)
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, Some(id)).await;
    }
    Self::decode(resp).await
  }

  /// `DELETE /contacts/{id}`
  async fn delete(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/contacts/{id}")))
      .send()
      .await
      .map_err(Self::transport)?;

    if !resp.status().is_success() {
      return Self::fail(resp, Some(id)).await;
    }
    Ok(())
  }
}
