//! Log command implementation

use anyhow::Result;
use uuid::Uuid;

use crate::model::{now_iso, Channel, Interaction};
use crate::services::engagement;
use crate::store::DossierStore;

use super::resolve_contact;

#[allow(clippy::too_many_arguments)]
pub fn log(
    store: &DossierStore,
    contact_query: &str,
    channel: &str,
    summary: Option<String>,
    date: Option<String>,
    duration_minutes: Option<i64>,
    usefulness: Option<i64>,
    next_step: Option<String>,
    next_step_due: Option<String>,
    next_step_done: bool,
) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let channel: Channel = channel.parse()?;
    let now = now_iso();

    let interaction = Interaction {
        id: Uuid::new_v4().to_string(),
        contact_id: contact.id.clone(),
        date: date.unwrap_or_else(|| now.clone()),
        channel,
        channel_note: None,
        duration_minutes,
        summary,
        usefulness,
        keep_in_touch: false,
        ally_potential: false,
        next_step,
        next_step_due,
        next_step_done,
    };

    let scores = engagement::record_interaction(store, &interaction, &now)?;

    println!(
        "Logged {} with '{}' — warmth now {}",
        channel.as_str(),
        contact.display_name(),
        scores.warmth
    );
    Ok(())
}

pub fn history(store: &DossierStore, contact_query: &str, limit: usize, offset: usize) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let interactions = store.list_interactions(&contact.id, limit, offset)?;

    if interactions.is_empty() {
        println!("No interactions logged for '{}'.", contact.display_name());
        return Ok(());
    }

    println!("{:<26} {:<8} {:<5} {}", "Date", "Channel", "Use", "Summary");
    println!("{}", "-".repeat(70));
    for i in interactions {
        println!(
            "{:<26} {:<8} {:<5} {}",
            i.date,
            i.channel.as_str(),
            i.usefulness.map(|u| u.to_string()).unwrap_or_else(|| "-".to_string()),
            i.summary.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
