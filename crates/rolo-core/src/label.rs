//! Label mappers — bidirectional translation between the store's label
//! strings and typed variants.
//!
//! The store is allowed to contain labels this client does not recognize.
//! Decoding therefore never fails: a blank string maps to the field's
//! default (`Other`), and any other unrecognized string is preserved
//! verbatim through the `Custom` variant so it survives a round trip.

use serde::{Deserialize, Serialize};

// ─── Phone ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneLabel {
  Home,
  Mobile,
  Work,
  Main,
  FaxWork,
  FaxHome,
  Pager,
  Other,
  Custom(String),
}

impl PhoneLabel {
  pub fn from_store(s: &str) -> Self {
    match s {
      "home" => Self::Home,
      "mobile" => Self::Mobile,
      "work" => Self::Work,
      "main" => Self::Main,
      "fax_work" => Self::FaxWork,
      "fax_home" => Self::FaxHome,
      "pager" => Self::Pager,
      "other" => Self::Other,
      raw if raw.trim().is_empty() => Self::Other,
      raw => Self::Custom(raw.to_owned()),
    }
  }

  pub fn as_store(&self) -> &str {
    match self {
      Self::Home => "home",
      Self::Mobile => "mobile",
      Self::Work => "work",
      Self::Main => "main",
      Self::FaxWork => "fax_work",
      Self::FaxHome => "fax_home",
      Self::Pager => "pager",
      Self::Other => "other",
      Self::Custom(raw) => raw,
    }
  }
}

// ─── Email ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailLabel {
  Home,
  Work,
  Mobile,
  Other,
  Custom(String),
}

impl EmailLabel {
  pub fn from_store(s: &str) -> Self {
    match s {
      "home" => Self::Home,
      "work" => Self::Work,
      "mobile" => Self::Mobile,
      "other" => Self::Other,
      raw if raw.trim().is_empty() => Self::Other,
      raw => Self::Custom(raw.to_owned()),
    }
  }

  pub fn as_store(&self) -> &str {
    match self {
      Self::Home => "home",
      Self::Work => "work",
      Self::Mobile => "mobile",
      Self::Other => "other",
      Self::Custom(raw) => raw,
    }
  }
}

// ─── Postal address ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressLabel {
  Home,
  Work,
  Other,
  Custom(String),
}

impl AddressLabel {
  pub fn from_store(s: &str) -> Self {
    match s {
      "home" => Self::Home,
      "work" => Self::Work,
      "other" => Self::Other,
      raw if raw.trim().is_empty() => Self::Other,
      raw => Self::Custom(raw.to_owned()),
    }
  }

  pub fn as_store(&self) -> &str {
    match self {
      Self::Home => "home",
      Self::Work => "work",
      Self::Other => "other",
      Self::Custom(raw) => raw,
    }
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLabel {
  Birthday,
  Anniversary,
  Other,
  Custom(String),
}

impl EventLabel {
  pub fn from_store(s: &str) -> Self {
    match s {
      "birthday" => Self::Birthday,
      "anniversary" => Self::Anniversary,
      "other" => Self::Other,
      raw if raw.trim().is_empty() => Self::Other,
      raw => Self::Custom(raw.to_owned()),
    }
  }

  pub fn as_store(&self) -> &str {
    match self {
      Self::Birthday => "birthday",
      Self::Anniversary => "anniversary",
      Self::Other => "other",
      Self::Custom(raw) => raw,
    }
  }
}

// ─── Relation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationLabel {
  Assistant,
  Brother,
  Child,
  Father,
  Friend,
  Manager,
  Mother,
  Parent,
  Partner,
  Relative,
  Sister,
  Spouse,
  Other,
  Custom(String),
}

impl RelationLabel {
  pub fn from_store(s: &str) -> Self {
    match s {
      "assistant" => Self::Assistant,
      "brother" => Self::Brother,
      "child" => Self::Child,
      "father" => Self::Father,
      "friend" => Self::Friend,
      "manager" => Self::Manager,
      "mother" => Self::Mother,
      "parent" => Self::Parent,
      "partner" => Self::Partner,
      "relative" => Self::Relative,
      "sister" => Self::Sister,
      "spouse" => Self::Spouse,
      "other" => Self::Other,
      raw if raw.trim().is_empty() => Self::Other,
      raw => Self::Custom(raw.to_owned()),
    }
  }

  pub fn as_store(&self) -> &str {
    match self {
      Self::Assistant => "assistant",
      Self::Brother => "brother",
      Self::Child => "child",
      Self::Father => "father",
      Self::Friend => "friend",
      Self::Manager => "manager",
      Self::Mother => "mother",
      Self::Parent => "parent",
      Self::Partner => "partner",
      Self::Relative => "relative",
      Self::Sister => "sister",
      Self::Spouse => "spouse",
      Self::Other => "other",
      Self::Custom(raw) => raw,
    }
  }
}

// ─── Website ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteLabel {
  Homepage,
  Blog,
  Work,
  Profile,
  Other,
  Custom(String),
}

impl WebsiteLabel {
  pub fn from_store(s: &str) -> Self {
    match s {
      "homepage" => Self::Homepage,
      "blog" => Self::Blog,
      "work" => Self::Work,
      "profile" => Self::Profile,
      "other" => Self::Other,
      raw if raw.trim().is_empty() => Self::Other,
      raw => Self::Custom(raw.to_owned()),
    }
  }

  pub fn as_store(&self) -> &str {
    match self {
      Self::Homepage => "homepage",
      Self::Blog => "blog",
      Self::Work => "work",
      Self::Profile => "profile",
      Self::Other => "other",
      Self::Custom(raw) => raw,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn phone_recognized_strings_round_trip() {
    for s in [
      "home", "mobile", "work", "main", "fax_work", "fax_home", "pager",
      "other",
    ] {
      assert_eq!(PhoneLabel::from_store(s).as_store(), s);
    }
  }

  #[test]
  fn unrecognized_string_round_trips_via_custom() {
    let label = PhoneLabel::from_store("walkie-talkie");
    assert_eq!(label, PhoneLabel::Custom("walkie-talkie".into()));
    assert_eq!(label.as_store(), "walkie-talkie");
  }

  #[test]
  fn blank_maps_to_default_not_custom() {
    assert_eq!(PhoneLabel::from_store(""), PhoneLabel::Other);
    assert_eq!(PhoneLabel::from_store("   "), PhoneLabel::Other);
    assert_eq!(EmailLabel::from_store(""), EmailLabel::Other);
    assert_eq!(EventLabel::from_store(""), EventLabel::Other);
  }

  #[test]
  fn event_recognized_strings_round_trip() {
    for s in ["birthday", "anniversary", "other"] {
      assert_eq!(EventLabel::from_store(s).as_store(), s);
    }
  }

  #[test]
  fn relation_recognized_strings_round_trip() {
    for s in [
      "assistant", "brother", "child", "father", "friend", "manager",
      "mother", "parent", "partner", "relative", "sister", "spouse", "other",
    ] {
      assert_eq!(RelationLabel::from_store(s).as_store(), s);
    }
  }

  #[test]
  fn website_and_address_round_trip() {
    for s in ["homepage", "blog", "work", "profile", "other"] {
      assert_eq!(WebsiteLabel::from_store(s).as_store(), s);
    }
    for s in ["home", "work", "other"] {
      assert_eq!(AddressLabel::from_store(s).as_store(), s);
    }
  }
}
