//! Write intents — the typed inputs to the repository's mutation paths.
//!
//! Each intent converts to a finite, ordered sequence of primitive store
//! operations (the conversion lives in `rolo-engine`); no partial side
//! effect is visible before the whole sequence commits.

use serde::{Deserialize, Serialize};

use crate::{
  id::ContactId,
  record::{
    AddressEntry, EmailEntry, EventEntry, NoteEntry, OrganizationEntry,
    PhoneEntry, RelationEntry, WebsiteEntry,
  },
};

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to `ContactRepository::insert`. Carries only creatable fields; the
/// store assigns every id and the lookup key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
  pub name:         Option<String>,
  pub starred:      bool,
  pub phones:       Vec<PhoneEntry>,
  pub emails:       Vec<EmailEntry>,
  pub addresses:    Vec<AddressEntry>,
  pub organization: Option<OrganizationEntry>,
  pub events:       Vec<EventEntry>,
  pub relations:    Vec<RelationEntry>,
  pub websites:     Vec<WebsiteEntry>,
  pub note:         Option<NoteEntry>,
}

impl NewContact {
  /// Convenience constructor for the common named-contact case.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Self::default() }
  }
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// A sparse slot in a [`ContactPatch`]: distinguishes "leave unchanged"
/// from "clear" from "set". Absence is never conflated with removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Patch<T> {
  #[default]
  Keep,
  Clear,
  Set(T),
}

impl<T> Patch<T> {
  pub fn is_keep(&self) -> bool { matches!(self, Patch::Keep) }
}

/// Input to `ContactRepository::patch`. Only supplied fields produce
/// mutations.
///
/// List fields use `Option<Vec<_>>`: `None` leaves the list untouched,
/// `Some(vec![])` explicitly clears it. Scalar fields use [`Patch`] for the
/// same three-way distinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPatch {
  pub id:           ContactId,
  pub name:         Patch<String>,
  pub starred:      Option<bool>,
  pub phones:       Option<Vec<PhoneEntry>>,
  pub emails:       Option<Vec<EmailEntry>>,
  pub addresses:    Option<Vec<AddressEntry>>,
  pub organization: Patch<OrganizationEntry>,
  pub events:       Option<Vec<EventEntry>>,
  pub relations:    Option<Vec<RelationEntry>>,
  pub websites:     Option<Vec<WebsiteEntry>>,
  pub note:         Patch<NoteEntry>,
}

impl ContactPatch {
  /// A patch that changes nothing.
  pub fn new(id: ContactId) -> Self {
    Self {
      id,
      name: Patch::Keep,
      starred: None,
      phones: None,
      emails: None,
      addresses: None,
      organization: Patch::Keep,
      events: None,
      relations: None,
      websites: None,
      note: Patch::Keep,
    }
  }

  /// True when no field is supplied and applying the patch would be a
  /// no-op.
  pub fn is_empty(&self) -> bool {
    self.name.is_keep()
      && self.starred.is_none()
      && self.phones.is_none()
      && self.emails.is_none()
      && self.addresses.is_none()
      && self.organization.is_keep()
      && self.events.is_none()
      && self.relations.is_none()
      && self.websites.is_none()
      && self.note.is_keep()
  }
}

// ─── UpdateContact ───────────────────────────────────────────────────────────

/// Input to `ContactRepository::update`: a full replacement. All existing
/// data rows are deleted and replaced by this set, so fields absent here
/// end up absent on the contact — stale rows cannot linger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateContact {
  pub id:           ContactId,
  pub name:         Option<String>,
  pub starred:      bool,
  pub phones:       Vec<PhoneEntry>,
  pub emails:       Vec<EmailEntry>,
  pub addresses:    Vec<AddressEntry>,
  pub organization: Option<OrganizationEntry>,
  pub events:       Vec<EventEntry>,
  pub relations:    Vec<RelationEntry>,
  pub websites:     Vec<WebsiteEntry>,
  pub note:         Option<NoteEntry>,
}

impl From<crate::record::Contact> for UpdateContact {
  /// Start a full-replacement write from a freshly read record.
  fn from(c: crate::record::Contact) -> Self {
    Self {
      id:           c.id,
      name:         c.name,
      starred:      c.starred.unwrap_or(false),
      phones:       c.phones,
      emails:       c.emails,
      addresses:    c.addresses,
      organization: c.organization,
      events:       c.events,
      relations:    c.relations,
      websites:     c.websites,
      note:         c.note,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fresh_patch_is_empty() {
    assert!(ContactPatch::new(ContactId("1".into())).is_empty());
  }

  #[test]
  fn supplying_any_field_makes_patch_non_empty() {
    let mut patch = ContactPatch::new(ContactId("1".into()));
    patch.starred = Some(true);
    assert!(!patch.is_empty());

    let mut patch = ContactPatch::new(ContactId("1".into()));
    patch.phones = Some(vec![]);
    assert!(!patch.is_empty(), "explicit empty list is a supplied change");

    let mut patch = ContactPatch::new(ContactId("1".into()));
    patch.note = Patch::Clear;
    assert!(!patch.is_empty());
  }
}
