//! Contact — the sole domain entity — and its wire-input draft form.
//!
//! Records are replaced wholesale on update; there is no field-patch
//! representation anywhere in the workspace. The four sequence fields carry
//! an array-default guarantee: once a value passes through deserialization
//! or [`ContactDraft::normalize`], they are present (possibly empty), never
//! absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Sub-records ─────────────────────────────────────────────────────────────

/// The medium of a reachability entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
  Email,
  Phone,
}

/// One way of reaching the person. Appears as a `contacts` entry on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChannel {
  pub kind:  ChannelKind,
  pub value: String,
}

/// A social-media profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
  pub platform: String,
  pub url:      String,
}

/// A dated note attached to a contact. Individually deletable; otherwise
/// append-only from the user's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id:         Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A stored record for someone the user knows.
///
/// `id` and `created_at` are store-assigned and immutable. A contact is
/// scoped to exactly one owner; cross-owner visibility never happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:              Uuid,
  #[serde(rename = "userId")]
  pub owner_id:        Uuid,
  pub name:            String,
  /// Calendar date; no timezone semantics.
  pub date_of_birth:   NaiveDate,
  pub when_we_met:     String,
  pub school:          Option<String>,
  pub profession_text: Option<String>,
  /// Insertion order preserved for display. Duplicates are not prevented
  /// here; the tag-entry path is the only guard.
  #[serde(default)]
  pub professions:     Vec<String>,
  /// Reachability entries; named `contacts` on the wire.
  #[serde(default, rename = "contacts")]
  pub channels:        Vec<ContactChannel>,
  #[serde(default)]
  pub social_media:    Vec<SocialLink>,
  #[serde(default)]
  pub comments:        Vec<Comment>,
  /// Store-assigned; drives newest-first listing.
  pub created_at:      DateTime<Utc>,
}

// ─── Draft forms ─────────────────────────────────────────────────────────────

/// A contact payload without an assigned identifier, as submitted for
/// creation. The sequence fields are optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
  #[serde(rename = "userId")]
  pub owner_id:        Uuid,
  pub name:            String,
  pub date_of_birth:   NaiveDate,
  pub when_we_met:     String,
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

impl ContactDraft {
  /// Fast-path check run client-side before any network dispatch. Stores
  /// repeat the same check before persisting.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::Validation("name is required".into()));
    }
    if self.when_we_met.trim().is_empty() {
      return Err(Error::Validation("whenWeMet is required".into()));
    }
    Ok(())
  }

  /// Apply the array-default coercion: absent sequences become empty ones.
  /// Pure and total; every other field passes through unchanged.
  pub fn normalize(self) -> NewContact {
    NewContact {
      owner_id:        self.owner_id,
      name:            self.name,
      date_of_birth:   self.date_of_birth,
      when_we_met:     self.when_we_met,
      school:          self.school,
      profession_text: self.profession_text,
      professions:     self.professions.unwrap_or_default(),
      channels:        self.channels.unwrap_or_default(),
      social_media:    self.social_media.unwrap_or_default(),
      comments:        self.comments.unwrap_or_default(),
    }
  }
}

/// A draft with the array-default invariant already applied — the only form
/// stores accept. Input to [`crate::store::ContactStore::create`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
  #[serde(rename = "userId")]
  pub owner_id:        Uuid,
  pub name:            String,
  pub date_of_birth:   NaiveDate,
  pub when_we_met:     String,
  pub school:          Option<String>,
  pub profession_text: Option<String>,
  pub professions:     Vec<String>,
  #[serde(rename = "contacts")]
  pub channels:        Vec<ContactChannel>,
  pub social_media:    Vec<SocialLink>,
  pub comments:        Vec<Comment>,
}

impl NewContact {
  /// Same required-field check as [`ContactDraft::validate`], applied at the
  /// store boundary.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::Validation("name is required".into()));
    }
    if self.when_we_met.trim().is_empty() {
      return Err(Error::Validation("whenWeMet is required".into()));
    }
    Ok(())
  }
}
