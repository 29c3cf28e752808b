//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO dates,
//! sequence-valued fields as compact JSON arrays. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use rolo_core::{
  account::Account,
  contact::{Comment, Contact, ContactChannel, SocialLink},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps and dates ────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| Error::DateParse(format!("bad calendar date: {s:?}")))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json<T: serde::Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id:      String,
  pub user_id:         String,
  pub name:            String,
  pub date_of_birth:   String,
  pub when_we_met:     String,
  pub school:          Option<String>,
  pub profession_text: Option<String>,
  pub professions:     String,
  pub channels:        String,
  pub social_media:    String,
  pub comments:        String,
  pub created_at:      String,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    let professions: Vec<String> = decode_json(&self.professions)?;
    let channels: Vec<ContactChannel> = decode_json(&self.channels)?;
    let social_media: Vec<SocialLink> = decode_json(&self.social_media)?;
    let comments: Vec<Comment> = decode_json(&self.comments)?;

    Ok(Contact {
      id:              decode_uuid(&self.contact_id)?,
      owner_id:        decode_uuid(&self.user_id)?,
      name:            self.name,
      date_of_birth:   decode_date(&self.date_of_birth)?,
      when_we_met:     self.when_we_met,
      school:          self.school,
      profession_text: self.profession_text,
      professions,
      channels,
      social_media,
      comments,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawAccount {
  pub user_id:                String,
  pub email:                  String,
  pub subscription_status:    Option<String>,
  pub stripe_customer_id:     Option<String>,
  pub stripe_subscription_id: Option<String>,
  pub created_at:             String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      user_id:                decode_uuid(&self.user_id)?,
      email:                  self.email,
      subscription_status:    self.subscription_status,
      stripe_customer_id:     self.stripe_customer_id,
      stripe_subscription_id: self.stripe_subscription_id,
      created_at:             decode_dt(&self.created_at)?,
    })
  }
}
