//! Contact completeness scoring
//!
//! Weighted field-presence model: full name=2 (1 if only first or only
//! last), phone=2, organization=3, birthday=3, email=1, notes=1. The
//! result is round(100 * earned / 12), so a contact with every weighted
//! field filled scores 100 and an empty one scores 0. Extra phone numbers
//! or emails earn no additional credit.

use crate::model::Contact;

const MAX_POINTS: i64 = 2 + 2 + 3 + 3 + 1 + 1;

/// Deterministic 0..=100 score of how completely a contact is filled in.
pub fn score(contact: &Contact) -> i64 {
    let mut earned = 0;

    let name_parts = !contact.first_name.trim().is_empty() as i64
        + !contact.last_name.trim().is_empty() as i64;
    earned += match name_parts {
        2 => 2,
        1 => 1,
        _ => 0,
    };
    if !contact.phones.is_empty() {
        earned += 2;
    }
    if contact.organization.as_deref().is_some_and(|o| !o.is_empty()) {
        earned += 3;
    }
    if contact.birthday.as_deref().is_some_and(|b| !b.is_empty()) {
        earned += 3;
    }
    if !contact.emails.is_empty() {
        earned += 1;
    }
    if contact.notes.as_deref().is_some_and(|n| !n.trim().is_empty()) {
        earned += 1;
    }

    ((earned as f64 / MAX_POINTS as f64) * 100.0)
        .round()
        .clamp(0.0, 100.0) as i64
}
