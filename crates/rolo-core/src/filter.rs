//! The search/filter engine: a pure function over an in-memory collection.
//!
//! Filtering never touches the store; it maps (collection, mode, text) to a
//! filtered collection. Output order equals input order.

use serde::{Deserialize, Serialize};

use crate::contact::Contact;

/// The four user-selectable search modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
  Name,
  DateOfBirth,
  School,
  Profession,
}

/// Filter `contacts` by `mode` and `text`.
///
/// Empty `text` is the identity filter for every mode. Matching is
/// case-insensitive substring except `DateOfBirth`, which compares the ISO
/// date string exactly.
pub fn filter(contacts: &[Contact], mode: SearchMode, text: &str) -> Vec<Contact> {
  if text.is_empty() {
    return contacts.to_vec();
  }

  let needle = text.to_lowercase();
  contacts
    .iter()
    .filter(|c| matches(c, mode, &needle, text))
    .cloned()
    .collect()
}

fn matches(contact: &Contact, mode: SearchMode, needle: &str, raw: &str) -> bool {
  match mode {
    SearchMode::Name => contact.name.to_lowercase().contains(needle),
    // Equality against the stored ISO string, not a parsed-date comparison.
    SearchMode::DateOfBirth => contact.date_of_birth.to_string() == raw,
    // A record with no school never matches a non-empty query.
    SearchMode::School => contact
      .school
      .as_deref()
      .is_some_and(|s| s.to_lowercase().contains(needle)),
    SearchMode::Profession => {
      contact
        .professions
        .iter()
        .any(|p| p.to_lowercase().contains(needle))
        || contact
          .profession_text
          .as_deref()
          .is_some_and(|t| t.to_lowercase().contains(needle))
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn contact(name: &str, dob: &str, school: Option<&str>) -> Contact {
    Contact {
      id:              Uuid::new_v4(),
      owner_id:        Uuid::new_v4(),
      name:            name.into(),
      date_of_birth:   dob.parse::<NaiveDate>().unwrap(),
      when_we_met:     "long ago".into(),
      school:          school.map(str::to_owned),
      profession_text: None,
      professions:     Vec::new(),
      channels:        Vec::new(),
      social_media:    Vec::new(),
      comments:        Vec::new(),
      created_at:      Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
  }

  fn sample() -> Vec<Contact> {
    vec![
      contact("Alice Smith", "1990-04-02", Some("MIT")),
      contact("Bob Jones", "1985-07-01", None),
    ]
  }

  #[test]
  fn empty_text_is_identity_for_every_mode() {
    let cs = sample();
    for mode in [
      SearchMode::Name,
      SearchMode::DateOfBirth,
      SearchMode::School,
      SearchMode::Profession,
    ] {
      assert_eq!(filter(&cs, mode, ""), cs);
    }
  }

  #[test]
  fn filter_is_idempotent() {
    let cs = sample();
    let once = filter(&cs, SearchMode::Name, "ali");
    let twice = filter(&once, SearchMode::Name, "ali");
    assert_eq!(once, twice);
  }

  #[test]
  fn name_match_is_case_insensitive_substring() {
    let cs = sample();
    let hits = filter(&cs, SearchMode::Name, "aLiCe");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Alice Smith");
  }

  #[test]
  fn date_of_birth_is_exact_equality() {
    let cs = sample();
    assert_eq!(filter(&cs, SearchMode::DateOfBirth, "1990-04-02").len(), 1);
    // A substring of the date is not a match.
    assert!(filter(&cs, SearchMode::DateOfBirth, "1990-04").is_empty());
  }

  #[test]
  fn school_match_skips_records_without_a_school() {
    let cs = sample();
    let hits = filter(&cs, SearchMode::School, "mit");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Alice Smith");
  }

  #[test]
  fn profession_matches_tags_or_free_text() {
    let mut cs = sample();
    cs[0].professions = vec!["Engineer".into()];
    cs[1].profession_text = Some("freelance engineer".into());

    let hits = filter(&cs, SearchMode::Profession, "engineer");
    assert_eq!(hits.len(), 2);
    // Order is the input order, not relevance.
    assert_eq!(hits[0].name, "Alice Smith");
    assert_eq!(hits[1].name, "Bob Jones");
  }
}
