//! Domain entity types
//!
//! Ids are opaque UUID strings generated by callers at creation time and
//! never reused. Timestamps are ISO-8601 strings: they arrive from external
//! sources (device imports, scraped profiles) and may be malformed, so
//! parsing is deferred to the point of use.

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current time as an ISO-8601 string, the wire format for every timestamp.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Error)]
#[error("unrecognized {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Interaction channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Meeting,
    Call,
    Chat,
    Email,
    Other,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Meeting => "meeting",
            Channel::Call => "call",
            Channel::Chat => "chat",
            Channel::Email => "email",
            Channel::Other => "other",
        }
    }
}

impl FromStr for Channel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meeting" => Ok(Channel::Meeting),
            "call" => Ok(Channel::Call),
            "chat" => Ok(Channel::Chat),
            "email" => Ok(Channel::Email),
            "other" => Ok(Channel::Other),
            _ => Err(ParseEnumError {
                kind: "channel",
                value: s.to_string(),
            }),
        }
    }
}

/// Where a social profile was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Linkedin,
    Facebook,
    Telegram,
    Github,
    Website,
    Other,
}

impl ProfileSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSource::Linkedin => "linkedin",
            ProfileSource::Facebook => "facebook",
            ProfileSource::Telegram => "telegram",
            ProfileSource::Github => "github",
            ProfileSource::Website => "website",
            ProfileSource::Other => "other",
        }
    }
}

impl FromStr for ProfileSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(ProfileSource::Linkedin),
            "facebook" => Ok(ProfileSource::Facebook),
            "telegram" => Ok(ProfileSource::Telegram),
            "github" => Ok(ProfileSource::Github),
            "website" => Ok(ProfileSource::Website),
            "other" => Ok(ProfileSource::Other),
            _ => Err(ParseEnumError {
                kind: "profile source",
                value: s.to_string(),
            }),
        }
    }
}

/// Reminder kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderKind {
    Birthday,
    Followup,
    NextStep,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Birthday => "birthday",
            ReminderKind::Followup => "followup",
            ReminderKind::NextStep => "nextStep",
        }
    }
}

impl FromStr for ReminderKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birthday" => Ok(ReminderKind::Birthday),
            "followup" => Ok(ReminderKind::Followup),
            "nextStep" => Ok(ReminderKind::NextStep),
            _ => Err(ParseEnumError {
                kind: "reminder kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Category kind. `Simple` categories hold contacts directly; the other
/// kinds are refined through subcategories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Simple,
    Fixed,
    Org,
    Interest,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Simple => "simple",
            CategoryKind::Fixed => "fixed",
            CategoryKind::Org => "org",
            CategoryKind::Interest => "interest",
        }
    }

    /// Whether contacts in this category are expected to be refined into
    /// subcategories.
    pub fn has_subcategories(&self) -> bool {
        !matches!(self, CategoryKind::Simple)
    }
}

impl FromStr for CategoryKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(CategoryKind::Simple),
            "fixed" => Ok(CategoryKind::Fixed),
            "org" => Ok(CategoryKind::Org),
            "interest" => Ok(CategoryKind::Interest),
            _ => Err(ParseEnumError {
                kind: "category kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A person in the dossier. No uniqueness is enforced on names or phones;
/// duplicate people are possible and left to the user to resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub birthday: Option<String>,
    pub photo_uri: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub last_interaction_at: Option<String>,
}

impl Contact {
    /// Blank contact with only identity and timestamps filled in.
    pub fn new(id: impl Into<String>, now: &str) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            middle_name: None,
            phones: Vec::new(),
            emails: Vec::new(),
            organization: None,
            position: None,
            birthday: None,
            photo_uri: None,
            notes: None,
            tags: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
            last_interaction_at: None,
        }
    }

    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            "(unnamed)".to_string()
        } else {
            name.to_string()
        }
    }
}

/// A social profile linked to a contact. Several per contact are allowed;
/// the store does not deduplicate by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfile {
    pub id: String,
    pub contact_id: String,
    pub source: ProfileSource,
    pub url: String,
    /// Cached JSON of the fields last scraped from the profile page.
    pub fields_json: String,
    pub added_at: String,
    pub last_checked_at: Option<String>,
}

/// A logged touchpoint with a contact. Append-mostly; updates allowed but
/// rare.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub contact_id: String,
    pub date: String,
    pub channel: Channel,
    /// Free-text qualifier when the channel is `Other`.
    pub channel_note: Option<String>,
    pub duration_minutes: Option<i64>,
    pub summary: Option<String>,
    /// Subjective usefulness, 1..=5.
    pub usefulness: Option<i64>,
    pub keep_in_touch: bool,
    pub ally_potential: bool,
    pub next_step: Option<String>,
    pub next_step_due: Option<String>,
    pub next_step_done: bool,
}

/// A dated prompt to act. Optionally tied to a contact, but not
/// foreign-key enforced: reminders outlive the records they reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub contact_id: Option<String>,
    pub title: String,
    pub kind: ReminderKind,
    pub due_at: String,
    pub done: bool,
}

/// Derived and user-set scores, one row per contact.
///
/// `completeness` and `warmth` are recomputed by the scoring services on
/// every relevant mutation; `value_score` is set by the user and never
/// derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub contact_id: String,
    pub completeness: i64,
    pub warmth: i64,
    pub value_score: i64,
}

impl Scores {
    /// Initial scores for a contact that has none yet.
    pub fn initial(contact_id: impl Into<String>, completeness: i64) -> Self {
        Self {
            contact_id: contact_id.into(),
            completeness,
            warmth: 0,
            value_score: 3,
        }
    }
}

/// A taxonomy bucket for contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: String,
    pub updated_at: String,
}

/// A named refinement within a category. Name uniqueness within the
/// category (case-insensitive) is enforced by callers at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub sort_order: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// One edge of the contact↔category relation. At most one per
/// (contact, category) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCategory {
    pub id: String,
    pub contact_id: String,
    pub category_id: String,
    pub created_at: String,
}

/// One edge of the contact↔subcategory relation. At most one per
/// (contact, subcategory) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubcategory {
    pub id: String,
    pub contact_id: String,
    pub subcategory_id: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip() {
        for channel in [
            Channel::Meeting,
            Channel::Call,
            Channel::Chat,
            Channel::Email,
            Channel::Other,
        ] {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        assert!("sms".parse::<Channel>().is_err());
        assert_eq!(
            "nextStep".parse::<ReminderKind>().unwrap(),
            ReminderKind::NextStep
        );
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut c = Contact::new("c1", "2024-01-01T00:00:00Z");
        assert_eq!(c.display_name(), "(unnamed)");
        c.first_name = "Ada".to_string();
        assert_eq!(c.display_name(), "Ada");
        c.last_name = "Lovelace".to_string();
        assert_eq!(c.display_name(), "Ada Lovelace");
    }
}
