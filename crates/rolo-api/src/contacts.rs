//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts?userId=<uuid>` | Newest-first; 400 without `userId` |
//! | `POST`   | `/contacts` | Body: draft with optional sequence fields |
//! | `PUT`    | `/contacts/:id` | Full replace; 404 if missing |
//! | `DELETE` | `/contacts/:id` | Returns `{"success": true}`; 404 if missing |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::NaiveDate;
use rolo_core::{
  contact::{Comment, Contact, ContactChannel, ContactDraft, SocialLink},
  store::{AccountStore, ContactStore},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(rename = "userId")]
  pub user_id: Option<Uuid>,
}

/// `GET /contacts?userId=<uuid>`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let owner = params
    .user_id
    .ok_or_else(|| ApiError::BadRequest("User ID required".to_owned()))?;
  let contacts = state.store.list(owner).await?;
  Ok(Json(contacts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Wire body for `POST /contacts`. Required fields are optional here so
/// their absence surfaces as a 400 with a message, not a decode rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  #[serde(default, rename = "userId")]
  pub user_id:         Option<Uuid>,
  #[serde(default)]
  pub name:            Option<String>,
  #[serde(default)]
  pub date_of_birth:   Option<NaiveDate>,
  #[serde(default)]
  pub when_we_met:     Option<String>,
  #[serde(default)]
  pub school:          Option<String>,
  #[serde(default)]
  pub profession_text: Option<String>,
  #[serde(default)]
  pub professions:     Option<Vec<String>>,
  #[serde(default, rename = "contacts")]
  pub channels:        Option<Vec<ContactChannel>>,
  #[serde(default)]
  pub social_media:    Option<Vec<SocialLink>>,
  #[serde(default)]
  pub comments:        Option<Vec<Comment>>,
}

impl CreateBody {
  fn into_draft(self) -> Result<ContactDraft, ApiError> {
    let owner_id = self
      .user_id
      .ok_or_else(|| ApiError::BadRequest("User ID required".to_owned()))?;
    let missing = |field: &str| ApiError::BadRequest(format!("{field} is required"));

    Ok(ContactDraft {
      owner_id,
      name:            self.name.ok_or_else(|| missing("name"))?,
      date_of_birth:   self.date_of_birth.ok_or_else(|| missing("dateOfBirth"))?,
      when_we_met:     self.when_we_met.ok_or_else(|| missing("whenWeMet"))?,
      school:          self.school,
      profession_text: self.profession_text,
      professions:     self.professions,
      channels:        self.channels,
      social_media:    self.social_media,
      comments:        self.comments,
    })
  }
}

/// `POST /contacts`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let draft = body.into_draft()?;
  draft.validate()?;
  let contact = state.store.create(draft.normalize()).await?;
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/:id` — full replace; there is no partial-patch variant.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(record): Json<Contact>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + AccountStore,
{
  let updated = state.store.update(id, record).await?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore + AccountStore,
{
  state.store.delete(id).await?;
  Ok(Json(json!({ "success": true })))
}
