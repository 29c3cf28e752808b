//! The subscription gate: a pure routing decision made once per session.

/// Status value that unlocks the contact collection.
pub const ACTIVE: &str = "active";
/// Status recorded when the provider reports a subscription deleted.
pub const CANCELED: &str = "canceled";

/// Where a freshly-established session lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRoute {
  Contacts,
  PlanSelection,
}

/// Route for the most recently recorded status. Absent or unrecognised
/// values fall through to plan selection. The status is whatever was on the
/// account at session establishment; it is not re-checked per contact
/// operation and there are no retries.
pub fn entry_route(status: Option<&str>) -> EntryRoute {
  match status {
    Some(ACTIVE) => EntryRoute::Contacts,
    _ => EntryRoute::PlanSelection,
  }
}
