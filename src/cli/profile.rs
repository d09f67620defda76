//! Social profile command implementations

use anyhow::Result;
use uuid::Uuid;

use crate::model::{now_iso, ProfileSource, SocialProfile};
use crate::store::DossierStore;

use super::resolve_contact;

pub fn list(store: &DossierStore, contact_query: &str) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let profiles = store.list_profiles_by_contact(&contact.id)?;

    if profiles.is_empty() {
        println!("No profiles attached to '{}'.", contact.display_name());
        return Ok(());
    }

    println!("{:<10} {:<10} {:<40} {}", "ID", "Source", "URL", "Last checked");
    println!("{}", "-".repeat(85));
    for p in profiles {
        println!(
            "{:<10} {:<10} {:<40} {}",
            &p.id[..8.min(p.id.len())],
            p.source.as_str(),
            p.url,
            p.last_checked_at.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub fn attach(store: &DossierStore, contact_query: &str, url: String, source: &str) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let source: ProfileSource = source.parse()?;

    let profile = SocialProfile {
        id: Uuid::new_v4().to_string(),
        contact_id: contact.id.clone(),
        source,
        url: url.clone(),
        fields_json: "{}".to_string(),
        added_at: now_iso(),
        last_checked_at: None,
    };
    store.upsert_profile(&profile)?;
    println!(
        "Attached {} profile to '{}': {}",
        source.as_str(),
        contact.display_name(),
        url
    );
    Ok(())
}

pub fn detach(store: &DossierStore, id: &str) -> Result<()> {
    store.delete_profile(id)?;
    println!("Removed profile {}", id);
    Ok(())
}
