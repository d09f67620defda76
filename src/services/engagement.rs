//! Multi-store update sequences
//!
//! Logging an interaction or applying a scraped-profile diff touches
//! several tables (the entity, the contact, the score row). Each sequence
//! here runs inside a single SQLite transaction, so a crash mid-sequence
//! can never leave a contact updated without its score refreshed.

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::import::ContactPatch;
use crate::model::{Contact, Interaction, ProfileSource, Scores, SocialProfile};
use crate::services::{completeness, warmth};
use crate::store::DossierStore;

/// Log an interaction and refresh everything derived from it: warmth
/// (decay-then-apply), completeness, and the contact's
/// `last_interaction_at`. Returns the refreshed scores.
pub fn record_interaction(
    store: &DossierStore,
    interaction: &Interaction,
    now_iso: &str,
) -> Result<Scores> {
    let tx = store.conn().unchecked_transaction()?;

    store.create_interaction(interaction)?;

    let contact = store.get_contact(&interaction.contact_id)?;
    let previous = store.get_scores(&interaction.contact_id)?;

    let scores = Scores {
        contact_id: interaction.contact_id.clone(),
        completeness: contact
            .as_ref()
            .map(completeness::score)
            .unwrap_or_default(),
        warmth: warmth::apply_interaction(
            previous.as_ref().map(|s| s.warmth as f64).unwrap_or(0.0),
            interaction,
            now_iso,
        ),
        value_score: previous.map(|s| s.value_score).unwrap_or(3),
    };
    store.upsert_scores(&scores)?;

    if let Some(mut contact) = contact {
        contact.last_interaction_at = Some(interaction.date.clone());
        contact.updated_at = now_iso.to_string();
        store.upsert_contact(&contact)?;
    }

    tx.commit()?;
    Ok(scores)
}

/// Merge scraped fields into a contact, record where they came from as a
/// social profile, and refresh completeness. Warmth and value are
/// untouched. Returns the updated contact.
pub fn apply_profile_diff(
    store: &DossierStore,
    contact_id: &str,
    patch: &ContactPatch,
    url: &str,
    source: ProfileSource,
    now_iso: &str,
) -> Result<Contact> {
    let mut contact = store
        .get_contact(contact_id)?
        .ok_or_else(|| anyhow!("Contact not found: {}", contact_id))?;

    let tx = store.conn().unchecked_transaction()?;

    patch.apply(&mut contact);
    contact.updated_at = now_iso.to_string();
    store.upsert_contact(&contact)?;

    store.upsert_profile(&SocialProfile {
        id: Uuid::new_v4().to_string(),
        contact_id: contact_id.to_string(),
        source,
        url: url.to_string(),
        fields_json: serde_json::to_string(patch)?,
        added_at: now_iso.to_string(),
        last_checked_at: None,
    })?;

    let previous = store.get_scores(contact_id)?;
    store.upsert_scores(&Scores {
        contact_id: contact_id.to_string(),
        completeness: completeness::score(&contact),
        warmth: previous.as_ref().map(|s| s.warmth).unwrap_or(0),
        value_score: previous.map(|s| s.value_score).unwrap_or(3),
    })?;

    tx.commit()?;
    Ok(contact)
}

/// Create the initial score row for a contact iff it has none. Safe to
/// re-run; an existing row is returned untouched.
pub fn ensure_scores(store: &DossierStore, contact: &Contact) -> Result<Scores> {
    if let Some(existing) = store.get_scores(&contact.id)? {
        return Ok(existing);
    }
    let scores = Scores::initial(contact.id.clone(), completeness::score(contact));
    store.upsert_scores(&scores)?;
    Ok(scores)
}

/// Set the user-assigned 1..=5 value rating, preserving the derived
/// fields. Out-of-range input is clamped.
pub fn set_value_score(store: &DossierStore, contact_id: &str, value: i64) -> Result<Scores> {
    let mut scores = match store.get_scores(contact_id)? {
        Some(s) => s,
        None => {
            let completeness = store
                .get_contact(contact_id)?
                .map(|c| completeness::score(&c))
                .unwrap_or_default();
            Scores::initial(contact_id.to_string(), completeness)
        }
    };
    scores.value_score = value.clamp(1, 5);
    store.upsert_scores(&scores)?;
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Channel;
    use crate::store::tests::{sample_contact, test_store};

    const NOW: &str = "2024-03-01T00:00:00.000Z";

    fn interaction(id: &str, contact_id: &str, channel: Channel) -> Interaction {
        Interaction {
            id: id.to_string(),
            contact_id: contact_id.to_string(),
            date: NOW.to_string(),
            channel,
            channel_note: None,
            duration_minutes: None,
            summary: None,
            usefulness: None,
            keep_in_touch: false,
            ally_potential: false,
            next_step: None,
            next_step_due: None,
            next_step_done: false,
        }
    }

    #[test]
    fn test_record_interaction_refreshes_everything() {
        let (_dir, store) = test_store();
        store
            .upsert_contact(&sample_contact("c1", "Ada", "Lovelace"))
            .unwrap();

        let scores =
            record_interaction(&store, &interaction("i1", "c1", Channel::Meeting), NOW).unwrap();

        // cold start: decay(0) + meeting bonus
        assert_eq!(scores.warmth, 25);
        assert_eq!(scores.value_score, 3);
        // first + last name = 2 of 12 points
        assert_eq!(scores.completeness, 17);

        let contact = store.get_contact("c1").unwrap().unwrap();
        assert_eq!(contact.last_interaction_at.as_deref(), Some(NOW));
        assert_eq!(store.list_interactions("c1", 10, 0).unwrap().len(), 1);

        // a second interaction the same instant stacks without decay
        let scores =
            record_interaction(&store, &interaction("i2", "c1", Channel::Call), NOW).unwrap();
        assert_eq!(scores.warmth, 40);
    }

    #[test]
    fn test_record_interaction_preserves_value_score() {
        let (_dir, store) = test_store();
        store
            .upsert_contact(&sample_contact("c1", "Ada", "Lovelace"))
            .unwrap();
        set_value_score(&store, "c1", 5).unwrap();

        let scores =
            record_interaction(&store, &interaction("i1", "c1", Channel::Email), NOW).unwrap();
        assert_eq!(scores.value_score, 5);
    }

    #[test]
    fn test_apply_profile_diff() {
        let (_dir, store) = test_store();
        store
            .upsert_contact(&sample_contact("c1", "Ada", "Lovelace"))
            .unwrap();

        let patch = ContactPatch {
            organization: Some("Analytical Engines".to_string()),
            position: Some("Principal Analyst".to_string()),
            ..Default::default()
        };
        let updated = apply_profile_diff(
            &store,
            "c1",
            &patch,
            "https://example.org/ada",
            ProfileSource::Website,
            NOW,
        )
        .unwrap();

        assert_eq!(updated.organization.as_deref(), Some("Analytical Engines"));

        let profiles = store.list_profiles_by_contact("c1").unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].source, ProfileSource::Website);
        assert!(profiles[0].fields_json.contains("Analytical Engines"));

        // name 2 + organization 3 = 5 of 12 points
        let scores = store.get_scores("c1").unwrap().unwrap();
        assert_eq!(scores.completeness, 42);
    }

    #[test]
    fn test_apply_profile_diff_missing_contact_is_an_error() {
        let (_dir, store) = test_store();
        let result = apply_profile_diff(
            &store,
            "ghost",
            &ContactPatch::default(),
            "https://example.org",
            ProfileSource::Other,
            NOW,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_scores_is_idempotent() {
        let (_dir, store) = test_store();
        let contact = sample_contact("c1", "Ada", "Lovelace");
        store.upsert_contact(&contact).unwrap();

        let first = ensure_scores(&store, &contact).unwrap();
        assert_eq!(first.completeness, 17);

        set_value_score(&store, "c1", 4).unwrap();
        let second = ensure_scores(&store, &contact).unwrap();
        assert_eq!(second.value_score, 4);
    }

    #[test]
    fn test_set_value_score_clamps() {
        let (_dir, store) = test_store();
        store
            .upsert_contact(&sample_contact("c1", "Ada", "Lovelace"))
            .unwrap();

        assert_eq!(set_value_score(&store, "c1", 9).unwrap().value_score, 5);
        assert_eq!(set_value_score(&store, "c1", 0).unwrap().value_score, 1);
    }
}
