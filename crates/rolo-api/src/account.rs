//! Handlers for `/account` endpoints.
//!
//! The authentication mechanism lives outside this system; these two
//! endpoints are the minimal surface a webhook target and the subscription
//! gate need.

use axum::{
  Json,
  extract::{Query, State},
};
use rolo_core::{
  account::Account,
  store::{AccountStore, ContactStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct GetParams {
  #[serde(rename = "userId")]
  pub user_id: Option<Uuid>,
}

/// `GET /account?userId=<uuid>`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<GetParams>,
) -> Result<Json<Account>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let user_id = params
    .user_id
    .ok_or_else(|| ApiError::BadRequest("User ID required".to_owned()))?;
  let account = state
    .store
    .get_account(user_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("account {user_id} not found")))?;
  Ok(Json(account))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub email: String,
}

/// `POST /account` — body: `{"email": "..."}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<Json<Account>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let account = state.store.create_account(body.email).await?;
  Ok(Json(account))
}
