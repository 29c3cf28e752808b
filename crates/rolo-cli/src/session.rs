//! [`ContactSession`] — the client-held contact collection and its
//! reconciliation with the store.
//!
//! The session caches the owner's full collection (`all_contacts`), derives
//! a filtered view from it, and tracks a currently-open record. The cache is
//! advisory: it is trusted only until the next successful server round trip,
//! and no mutation path ever leaves it inconsistent with the last known-good
//! response. Failures are returned to the caller for display; nothing is
//! retried.

use rolo_core::{
  Error, Result,
  contact::{Contact, ContactDraft},
  filter::{SearchMode, filter},
  store::ContactStore,
};
use uuid::Uuid;

pub struct ContactSession<S: ContactStore> {
  store:        S,
  owner_id:     Uuid,
  all_contacts: Vec<Contact>,
  visible:      Vec<Contact>,
  open:         Option<Contact>,
  mode:         SearchMode,
  query:        String,
}

impl<S: ContactStore> ContactSession<S> {
  /// Establish a session by fetching the owner's full collection.
  pub async fn start(store: S, owner_id: Uuid) -> Result<Self> {
    let all_contacts = store.list(owner_id).await?;
    let visible = all_contacts.clone();
    Ok(Self {
      store,
      owner_id,
      all_contacts,
      visible,
      open: None,
      mode: SearchMode::Name,
      query: String::new(),
    })
  }

  pub fn owner_id(&self) -> Uuid { self.owner_id }

  /// The authoritative cache, newest-created first.
  pub fn contacts(&self) -> &[Contact] { &self.all_contacts }

  /// The filtered view derived from the current mode and query.
  pub fn visible(&self) -> &[Contact] { &self.visible }

  pub fn open(&self) -> Option<&Contact> { self.open.as_ref() }

  /// Mark the record with `id` as the open detail view. Returns the record,
  /// or `None` when it is not in the cache.
  pub fn open_contact(&mut self, id: Uuid) -> Option<&Contact> {
    self.open = self.all_contacts.iter().find(|c| c.id == id).cloned();
    self.open.as_ref()
  }

  pub fn set_filter(&mut self, mode: SearchMode, text: impl Into<String>) {
    self.mode = mode;
    self.query = text.into();
    self.apply_filter();
  }

  fn apply_filter(&mut self) {
    self.visible = filter(&self.all_contacts, self.mode, &self.query);
  }

  /// Re-fetch the full collection and re-derive the filtered view. The open
  /// record follows the fresh copy, or clears if it no longer exists.
  pub async fn refresh(&mut self) -> Result<()> {
    let fresh = self.store.list(self.owner_id).await?;
    self.all_contacts = fresh;
    self.apply_filter();
    if let Some(open) = &self.open {
      let id = open.id;
      self.open = self.all_contacts.iter().find(|c| c.id == id).cloned();
    }
    Ok(())
  }

  /// Create a contact, then re-fetch the whole collection rather than
  /// splicing locally, so the cache matches server-assigned fields exactly.
  ///
  /// Runs the required-field check first as a fast-path rejection. On any
  /// failure the cache is untouched.
  pub async fn add_contact(&mut self, draft: ContactDraft) -> Result<Contact> {
    draft.validate()?;
    let created = self.store.create(draft.normalize()).await?;
    self.refresh().await?;
    Ok(created)
  }

  /// Full-replace update. On success the returned record replaces the cached
  /// copy in both lists, and the open record if it matches, so an open
  /// detail view reflects the change without a re-fetch.
  pub async fn update_contact(&mut self, record: Contact) -> Result<()> {
    let updated = self.store.update(record.id, record).await?;

    if let Some(c) = self.all_contacts.iter_mut().find(|c| c.id == updated.id) {
      *c = updated.clone();
    }
    if let Some(c) = self.visible.iter_mut().find(|c| c.id == updated.id) {
      *c = updated.clone();
    }
    if self.open.as_ref().is_some_and(|c| c.id == updated.id) {
      self.open = Some(updated);
    }
    Ok(())
  }

  /// Delete a contact. Already-gone counts as done — the record leaves local
  /// state either way — but a genuine failure surfaces and leaves the cache
  /// alone, so it never diverges from what the server last confirmed.
  pub async fn delete_contact(&mut self, id: Uuid) -> Result<()> {
    match self.store.delete(id).await {
      Ok(()) | Err(Error::NotFound(_)) => {
        self.all_contacts.retain(|c| c.id != id);
        self.visible.retain(|c| c.id != id);
        if self.open.as_ref().is_some_and(|c| c.id == id) {
          self.open = None;
        }
        Ok(())
      }
      Err(e) => Err(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  };

  use chrono::NaiveDate;
  use rolo_core::{
    contact::NewContact,
    store::AccountStore,
  };
  use rolo_store_sqlite::SqliteStore;

  use super::*;

  /// Wraps the real store and injects an outage on demand — lets tests prove
  /// the cache survives `Unavailable` untouched.
  #[derive(Clone)]
  struct FlakyStore {
    inner: SqliteStore,
    down:  Arc<AtomicBool>,
  }

  impl FlakyStore {
    fn check(&self) -> Result<()> {
      if self.down.load(Ordering::Relaxed) {
        Err(Error::Unavailable("injected outage".into()))
      } else {
        Ok(())
      }
    }
  }

  impl ContactStore for FlakyStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<Contact>> {
      self.check()?;
      self.inner.list(owner).await
    }
    async fn create(&self, draft: NewContact) -> Result<Contact> {
      self.check()?;
      self.inner.create(draft).await
    }
    async fn update(&self, id: Uuid, record: Contact) -> Result<Contact> {
      self.check()?;
      self.inner.update(id, record).await
    }
    async fn delete(&self, id: Uuid) -> Result<()> {
      self.check()?;
      self.inner.delete(id).await
    }
  }

  async fn fixture() -> (FlakyStore, Uuid) {
    let inner = SqliteStore::open_in_memory().await.unwrap();
    let owner = inner
      .create_account("owner@example.com".into())
      .await
      .unwrap()
      .user_id;
    (
      FlakyStore { inner, down: Arc::new(AtomicBool::new(false)) },
      owner,
    )
  }

  fn draft(owner: Uuid, name: &str) -> ContactDraft {
    ContactDraft {
      owner_id:        owner,
      name:            name.into(),
      date_of_birth:   NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
      when_we_met:     "At a conference".into(),
      school:          None,
      profession_text: None,
      professions:     None,
      channels:        None,
      social_media:    None,
      comments:        None,
    }
  }

  #[tokio::test]
  async fn add_refetches_and_cache_matches_store() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store, owner).await.unwrap();

    let created = session.add_contact(draft(owner, "Alice Smith")).await.unwrap();

    assert_eq!(session.contacts().len(), 1);
    assert_eq!(session.contacts()[0], created);
    assert_eq!(session.visible(), session.contacts());
    // Sequence fields were absent in the draft, present-empty in the cache.
    assert!(session.contacts()[0].professions.is_empty());
  }

  #[tokio::test]
  async fn add_with_blank_name_fails_before_dispatch() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store.clone(), owner).await.unwrap();

    let mut d = draft(owner, " ");
    d.professions = Some(vec!["Engineer".into()]);
    let err = session.add_contact(d).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing reached the store and the cache is untouched.
    assert!(session.contacts().is_empty());
    assert!(store.inner.list(owner).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn filter_narrows_visible_and_add_reapplies_it() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store, owner).await.unwrap();

    session.add_contact(draft(owner, "Alice Smith")).await.unwrap();
    session.set_filter(SearchMode::Name, "alice");
    assert_eq!(session.visible().len(), 1);

    session.add_contact(draft(owner, "Bob Jones")).await.unwrap();
    // The filter stays active across mutations.
    assert_eq!(session.contacts().len(), 2);
    assert_eq!(session.visible().len(), 1);
    assert_eq!(session.visible()[0].name, "Alice Smith");
  }

  #[tokio::test]
  async fn update_replaces_in_both_lists_and_open_view() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store, owner).await.unwrap();
    let created = session.add_contact(draft(owner, "Alice Smith")).await.unwrap();
    session.open_contact(created.id);

    let mut edited = created.clone();
    edited.school = Some("MIT".into());
    session.update_contact(edited.clone()).await.unwrap();

    assert_eq!(session.contacts()[0], edited);
    assert_eq!(session.visible()[0], edited);
    assert_eq!(session.open(), Some(&edited));
  }

  #[tokio::test]
  async fn failed_update_leaves_state_untouched() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store.clone(), owner).await.unwrap();
    let created = session.add_contact(draft(owner, "Alice Smith")).await.unwrap();

    store.down.store(true, Ordering::Relaxed);
    let mut edited = created.clone();
    edited.name = "Changed".into();
    let err = session.update_contact(edited).await.unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));

    assert_eq!(session.contacts()[0], created);
    assert_eq!(session.visible()[0], created);
  }

  #[tokio::test]
  async fn delete_removes_from_both_lists_and_clears_open() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store, owner).await.unwrap();
    let created = session.add_contact(draft(owner, "Alice Smith")).await.unwrap();
    session.open_contact(created.id);

    session.delete_contact(created.id).await.unwrap();

    assert!(session.contacts().is_empty());
    assert!(session.visible().is_empty());
    assert!(session.open().is_none());
  }

  #[tokio::test]
  async fn rapid_double_delete_does_not_resurrect_or_corrupt() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store.clone(), owner).await.unwrap();
    let keep = session.add_contact(draft(owner, "Keep Me")).await.unwrap();
    let gone = session.add_contact(draft(owner, "Delete Me")).await.unwrap();

    // Second click before the first resolves: the store sees two independent
    // calls; the second reports the record already gone.
    session.delete_contact(gone.id).await.unwrap();
    session.delete_contact(gone.id).await.unwrap();

    assert_eq!(session.contacts().len(), 1);
    assert_eq!(session.contacts()[0].id, keep.id);
    assert_eq!(session.visible().len(), 1);
  }

  #[tokio::test]
  async fn delete_during_outage_keeps_local_state() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store.clone(), owner).await.unwrap();
    let created = session.add_contact(draft(owner, "Alice Smith")).await.unwrap();

    store.down.store(true, Ordering::Relaxed);
    let err = session.delete_contact(created.id).await.unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));

    // The record must not vanish locally while the server still has it.
    assert_eq!(session.contacts().len(), 1);
    assert_eq!(session.visible().len(), 1);
  }

  #[tokio::test]
  async fn refresh_clears_open_when_record_disappeared() {
    let (store, owner) = fixture().await;
    let mut session = ContactSession::start(store.clone(), owner).await.unwrap();
    let created = session.add_contact(draft(owner, "Alice Smith")).await.unwrap();
    session.open_contact(created.id);

    // Another session of the same user deletes the record out from under us.
    store.inner.delete(created.id).await.unwrap();
    session.refresh().await.unwrap();

    assert!(session.contacts().is_empty());
    assert!(session.open().is_none());
  }
}
