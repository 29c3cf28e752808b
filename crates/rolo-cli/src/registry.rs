//! Advisory autocomplete registries: the distinct profession tags and school
//! names ever entered, persisted per device as plain JSON.
//!
//! Non-authoritative by design — losing or corrupting a registry file costs
//! nothing but suggestions, so load failures fall back to defaults.

use std::{fs, io, path::PathBuf};

/// Seed suggestions shown before the user has entered any professions.
pub fn default_professions() -> Vec<String> {
  ["Engineer", "Doctor", "Teacher", "Designer", "Developer"]
    .map(String::from)
    .to_vec()
}

pub struct Registry {
  path:    PathBuf,
  entries: Vec<String>,
}

impl Registry {
  /// Load the registry at `path`, falling back to `defaults` when the file
  /// is missing or unreadable.
  pub fn load(path: PathBuf, defaults: Vec<String>) -> Self {
    let entries = fs::read_to_string(&path)
      .ok()
      .and_then(|raw| serde_json::from_str(&raw).ok())
      .unwrap_or(defaults);
    Self { path, entries }
  }

  pub fn entries(&self) -> &[String] { &self.entries }

  pub fn contains(&self, value: &str) -> bool {
    self.entries.iter().any(|e| e == value)
  }

  /// Record `value` if unseen and persist. This entry point is the only
  /// duplicate guard anywhere; the contact store itself stays permissive.
  pub fn note(&mut self, value: &str) -> io::Result<()> {
    if value.is_empty() || self.contains(value) {
      return Ok(());
    }
    self.entries.push(value.to_owned());
    self.save()
  }

  fn save(&self) -> io::Result<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(&self.entries)?;
    fs::write(&self.path, raw)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch_path() -> PathBuf {
    std::env::temp_dir()
      .join("rolo-registry-tests")
      .join(format!("{}.json", uuid::Uuid::new_v4()))
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let registry = Registry::load(scratch_path(), default_professions());
    assert!(registry.contains("Engineer"));
    assert_eq!(registry.entries().len(), 5);
  }

  #[test]
  fn note_persists_and_dedupes_at_entry() {
    let path = scratch_path();
    let mut registry = Registry::load(path.clone(), Vec::new());

    registry.note("MIT").unwrap();
    registry.note("MIT").unwrap();
    registry.note("Oxford").unwrap();
    assert_eq!(registry.entries(), ["MIT", "Oxford"]);

    // A fresh load sees what was persisted.
    let reloaded = Registry::load(path, Vec::new());
    assert_eq!(reloaded.entries(), ["MIT", "Oxford"]);
  }

  #[test]
  fn corrupt_file_falls_back_to_defaults() {
    let path = scratch_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json").unwrap();

    let registry = Registry::load(path, vec!["Fallback".into()]);
    assert_eq!(registry.entries(), ["Fallback"]);
  }
}
