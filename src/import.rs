//! Boundary normalization of external records
//!
//! External sources (the device contact list, public-profile scrapes) hand
//! over loosely-shaped data. It is normalized into the strict internal
//! entity shapes here, at the boundary — the core never accepts the raw
//! external form.

use serde::{Deserialize, Serialize};

use crate::model::Contact;

/// A flat record as delivered by a device contact source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceContact {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub organization: Option<String>,
}

/// Normalize a device record into a full contact: the display name splits
/// on the first whitespace run into first/last, the phone becomes a
/// one-element list, everything else starts empty.
pub fn contact_from_device(record: &DeviceContact, now: &str) -> Contact {
    let (first_name, last_name) = split_name(&record.name);

    let mut contact = Contact::new(record.id.clone(), now);
    contact.first_name = first_name;
    contact.last_name = last_name;
    contact.phones = record
        .phone
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| vec![p.to_string()])
        .unwrap_or_default();
    contact.organization = record.organization.clone();
    contact
}

fn split_name(name: &str) -> (String, String) {
    let mut parts = name.trim().split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// A partial contact: every field optional, present fields overwrite on
/// apply. This is also the shape cached in a profile's `fields_json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ContactPatch {
    pub fn apply(&self, contact: &mut Contact) {
        if let Some(v) = &self.first_name {
            contact.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            contact.last_name = v.clone();
        }
        if let Some(v) = &self.middle_name {
            contact.middle_name = Some(v.clone());
        }
        if let Some(v) = &self.phones {
            contact.phones = v.clone();
        }
        if let Some(v) = &self.emails {
            contact.emails = v.clone();
        }
        if let Some(v) = &self.organization {
            contact.organization = Some(v.clone());
        }
        if let Some(v) = &self.position {
            contact.position = Some(v.clone());
        }
        if let Some(v) = &self.birthday {
            contact.birthday = Some(v.clone());
        }
        if let Some(v) = &self.photo_uri {
            contact.photo_uri = Some(v.clone());
        }
        if let Some(v) = &self.notes {
            contact.notes = Some(v.clone());
        }
        if let Some(v) = &self.tags {
            contact.tags = v.clone();
        }
    }
}

/// Best-effort result of a public-profile fetch. Fetch failures never reach
/// the core: the fetcher degrades to an empty patch instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProfile {
    pub fields: ContactPatch,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_record_normalization() {
        let record = DeviceContact {
            id: "c1".to_string(),
            name: "  Ada   King Lovelace ".to_string(),
            phone: Some("+44 20 1234".to_string()),
            organization: Some("Analytical Engines".to_string()),
        };
        let contact = contact_from_device(&record, "2024-03-01T10:00:00.000Z");

        assert_eq!(contact.first_name, "Ada");
        assert_eq!(contact.last_name, "King Lovelace");
        assert_eq!(contact.phones, vec!["+44 20 1234"]);
        assert_eq!(contact.organization.as_deref(), Some("Analytical Engines"));
        assert!(contact.emails.is_empty());
    }

    #[test]
    fn test_device_record_with_bare_name() {
        let record = DeviceContact {
            id: "c1".to_string(),
            name: "Ada".to_string(),
            phone: None,
            organization: None,
        };
        let contact = contact_from_device(&record, "2024-03-01T10:00:00.000Z");
        assert_eq!(contact.first_name, "Ada");
        assert_eq!(contact.last_name, "");
        assert!(contact.phones.is_empty());
    }

    #[test]
    fn test_patch_overwrites_only_present_fields() {
        let mut contact = Contact::new("c1", "2024-03-01T10:00:00.000Z");
        contact.first_name = "Ada".to_string();
        contact.notes = Some("keep".to_string());

        let patch = ContactPatch {
            organization: Some("Analytical Engines".to_string()),
            ..Default::default()
        };
        patch.apply(&mut contact);

        assert_eq!(contact.first_name, "Ada");
        assert_eq!(contact.notes.as_deref(), Some("keep"));
        assert_eq!(contact.organization.as_deref(), Some("Analytical Engines"));
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ContactPatch {
            organization: Some("Analytical Engines".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"organization":"Analytical Engines"}"#);
    }
}
