//! [`SqliteStore`] — the SQLite implementation of the store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rolo_core::{
  account::Account,
  contact::{Contact, NewContact},
  store::{AccountStore, ContactStore},
  subscription,
};

use crate::{
  Error, Result,
  encode::{RawAccount, RawContact, encode_date, encode_dt, encode_json, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rolo store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const CONTACT_COLUMNS: &str = "contact_id, user_id, name, date_of_birth, when_we_met, \
   school, profession_text, professions, channels, social_media, comments, created_at";

fn contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContact> {
  Ok(RawContact {
    contact_id:      row.get(0)?,
    user_id:         row.get(1)?,
    name:            row.get(2)?,
    date_of_birth:   row.get(3)?,
    when_we_met:     row.get(4)?,
    school:          row.get(5)?,
    profession_text: row.get(6)?,
    professions:     row.get(7)?,
    channels:        row.get(8)?,
    social_media:    row.get(9)?,
    comments:        row.get(10)?,
    created_at:      row.get(11)?,
  })
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_contact(&self, id: Uuid) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"),
              rusqlite::params![id_str],
              contact_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn insert_contact(&self, contact: &Contact) -> Result<()> {
    let contact_id_str  = encode_uuid(contact.id);
    let user_id_str     = encode_uuid(contact.owner_id);
    let name            = contact.name.clone();
    let dob_str         = encode_date(contact.date_of_birth);
    let when_we_met     = contact.when_we_met.clone();
    let school          = contact.school.clone();
    let profession_text = contact.profession_text.clone();
    let professions     = encode_json(&contact.professions)?;
    let channels        = encode_json(&contact.channels)?;
    let social_media    = encode_json(&contact.social_media)?;
    let comments        = encode_json(&contact.comments)?;
    let created_at_str  = encode_dt(contact.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             contact_id, user_id, name, date_of_birth, when_we_met,
             school, profession_text, professions, channels,
             social_media, comments, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            contact_id_str,
            user_id_str,
            name,
            dob_str,
            when_we_met,
            school,
            profession_text,
            professions,
            channels,
            social_media,
            comments,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  async fn list(&self, owner: Uuid) -> rolo_core::Result<Vec<Contact>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts
           WHERE user_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], contact_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawContact::into_contact)
        .collect::<Result<_>>()?,
    )
  }

  async fn create(&self, draft: NewContact) -> rolo_core::Result<Contact> {
    draft.validate()?;

    let contact = Contact {
      id:              Uuid::new_v4(),
      owner_id:        draft.owner_id,
      name:            draft.name,
      date_of_birth:   draft.date_of_birth,
      when_we_met:     draft.when_we_met,
      school:          draft.school,
      profession_text: draft.profession_text,
      professions:     draft.professions,
      channels:        draft.channels,
      social_media:    draft.social_media,
      comments:        draft.comments,
      created_at:      Utc::now(),
    };

    self.insert_contact(&contact).await?;
    Ok(contact)
  }

  async fn update(&self, id: Uuid, record: Contact) -> rolo_core::Result<Contact> {
    // Full replace of the user-editable columns. `user_id` and `created_at`
    // stay as stored; `id` comes from the caller's key, not the body.
    let id_str          = encode_uuid(id);
    let name            = record.name.clone();
    let dob_str         = encode_date(record.date_of_birth);
    let when_we_met     = record.when_we_met.clone();
    let school          = record.school.clone();
    let profession_text = record.profession_text.clone();
    let professions     = encode_json(&record.professions)?;
    let channels        = encode_json(&record.channels)?;
    let social_media    = encode_json(&record.social_media)?;
    let comments        = encode_json(&record.comments)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contacts SET
             name = ?2, date_of_birth = ?3, when_we_met = ?4, school = ?5,
             profession_text = ?6, professions = ?7, channels = ?8,
             social_media = ?9, comments = ?10
           WHERE contact_id = ?1",
          rusqlite::params![
            id_str,
            name,
            dob_str,
            when_we_met,
            school,
            profession_text,
            professions,
            channels,
            social_media,
            comments,
          ],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if changed == 0 {
      return Err(rolo_core::Error::NotFound(id));
    }

    self
      .fetch_contact(id)
      .await?
      .ok_or(rolo_core::Error::NotFound(id))
  }

  async fn delete(&self, id: Uuid) -> rolo_core::Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if changed == 0 {
      return Err(rolo_core::Error::NotFound(id));
    }
    Ok(())
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  async fn create_account(&self, email: String) -> rolo_core::Result<Account> {
    let account = Account {
      user_id:                Uuid::new_v4(),
      email,
      subscription_status:    None,
      stripe_customer_id:     None,
      stripe_subscription_id: None,
      created_at:             Utc::now(),
    };

    let id_str  = encode_uuid(account.user_id);
    let email   = account.email.clone();
    let at_str  = encode_dt(account.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, email, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(account)
  }

  async fn get_account(&self, user_id: Uuid) -> rolo_core::Result<Option<Account>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, subscription_status, stripe_customer_id,
                      stripe_subscription_id, created_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawAccount {
                  user_id:                row.get(0)?,
                  email:                  row.get(1)?,
                  subscription_status:    row.get(2)?,
                  stripe_customer_id:     row.get(3)?,
                  stripe_subscription_id: row.get(4)?,
                  created_at:             row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawAccount::into_account).transpose()?)
  }

  async fn activate_subscription(
    &self,
    user_id: Uuid,
    customer_id: String,
    subscription_id: String,
  ) -> rolo_core::Result<u64> {
    let id_str = encode_uuid(user_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET
             subscription_status    = ?2,
             stripe_customer_id     = ?3,
             stripe_subscription_id = ?4
           WHERE user_id = ?1",
          rusqlite::params![id_str, subscription::ACTIVE, customer_id, subscription_id],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed as u64)
  }

  async fn set_status_by_subscription(
    &self,
    subscription_id: String,
    status: String,
  ) -> rolo_core::Result<u64> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET subscription_status = ?2 WHERE stripe_subscription_id = ?1",
          rusqlite::params![subscription_id, status],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed as u64)
  }
}
