//! Contact command implementations

use anyhow::Result;
use uuid::Uuid;

use crate::model::{now_iso, Contact};
use crate::services::engagement;
use crate::store::DossierStore;

use super::resolve_contact;

#[allow(clippy::too_many_arguments)]
pub fn add(
    store: &DossierStore,
    first_name: String,
    last_name: Option<String>,
    phones: Vec<String>,
    emails: Vec<String>,
    organization: Option<String>,
    position: Option<String>,
    birthday: Option<String>,
    notes: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let now = now_iso();
    let mut contact = Contact::new(Uuid::new_v4().to_string(), &now);
    contact.first_name = first_name;
    contact.last_name = last_name.unwrap_or_default();
    contact.phones = phones;
    contact.emails = emails;
    contact.organization = organization;
    contact.position = position;
    contact.birthday = birthday;
    contact.notes = notes;
    contact.tags = tags;

    store.upsert_contact(&contact)?;
    let scores = engagement::ensure_scores(store, &contact)?;

    println!(
        "Contact '{}' created with ID: {} (completeness {}%)",
        contact.display_name(),
        contact.id,
        scores.completeness
    );
    Ok(())
}

pub fn show(store: &DossierStore, query: &str) -> Result<()> {
    let contact = resolve_contact(store, query)?;
    let scores = store.get_scores(&contact.id)?;

    println!("{}", contact.display_name());
    println!("{}", "-".repeat(40));
    println!("ID:           {}", contact.id);
    if let Some(ref org) = contact.organization {
        println!("Organization: {}", org);
    }
    if let Some(ref position) = contact.position {
        println!("Position:     {}", position);
    }
    if !contact.phones.is_empty() {
        println!("Phones:       {}", contact.phones.join(", "));
    }
    if !contact.emails.is_empty() {
        println!("Emails:       {}", contact.emails.join(", "));
    }
    if let Some(ref birthday) = contact.birthday {
        println!("Birthday:     {}", birthday);
    }
    if !contact.tags.is_empty() {
        println!("Tags:         {}", contact.tags.join(", "));
    }
    if let Some(ref notes) = contact.notes {
        println!("Notes:        {}", notes);
    }
    if let Some(ref last) = contact.last_interaction_at {
        println!("Last touch:   {}", last);
    }
    if let Some(scores) = scores {
        println!(
            "Scores:       completeness {}%, warmth {}, value {}/5",
            scores.completeness, scores.warmth, scores.value_score
        );
    }

    let interactions = store.list_interactions(&contact.id, 5, 0)?;
    if !interactions.is_empty() {
        println!("\nRecent interactions:");
        for i in interactions {
            println!(
                "  {}  {:<8} {}",
                i.date,
                i.channel.as_str(),
                i.summary.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

pub fn search(store: &DossierStore, query: &str, limit: usize) -> Result<()> {
    let contacts = store.search_contacts(query, limit)?;

    if contacts.is_empty() {
        println!("No contacts found.");
        return Ok(());
    }

    println!("{:<10} {:<25} {:<25} {}", "ID", "Name", "Organization", "Last touch");
    println!("{}", "-".repeat(80));
    for c in contacts {
        println!(
            "{:<10} {:<25} {:<25} {}",
            &c.id[..8.min(c.id.len())],
            c.display_name(),
            c.organization.as_deref().unwrap_or("-"),
            c.last_interaction_at.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub fn delete(store: &DossierStore, query: &str) -> Result<()> {
    let contact = resolve_contact(store, query)?;
    store.delete_contact(&contact.id)?;
    println!("Deleted contact '{}'", contact.display_name());
    Ok(())
}

pub fn set_value(store: &DossierStore, query: &str, value: i64) -> Result<()> {
    let contact = resolve_contact(store, query)?;
    let scores = engagement::set_value_score(store, &contact.id, value)?;
    println!(
        "Value for '{}' set to {}/5",
        contact.display_name(),
        scores.value_score
    );
    Ok(())
}
