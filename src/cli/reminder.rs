//! Reminder command implementations

use anyhow::Result;
use uuid::Uuid;

use crate::model::{now_iso, Reminder, ReminderKind};
use crate::store::DossierStore;

use super::resolve_contact;

pub fn add(
    store: &DossierStore,
    title: String,
    contact_query: Option<String>,
    kind: &str,
    due_at: String,
) -> Result<()> {
    let kind: ReminderKind = kind.parse()?;
    let contact_id = match contact_query {
        Some(q) => Some(resolve_contact(store, &q)?.id),
        None => None,
    };

    let reminder = Reminder {
        id: Uuid::new_v4().to_string(),
        contact_id,
        title: title.clone(),
        kind,
        due_at,
        done: false,
    };
    store.upsert_reminder(&reminder)?;
    println!("Reminder '{}' created with ID: {}", title, reminder.id);
    Ok(())
}

/// With a contact: everything for that contact. Without: open reminders
/// due by now.
pub fn list(store: &DossierStore, contact_query: Option<String>) -> Result<()> {
    let reminders = match contact_query {
        Some(q) => {
            let contact = resolve_contact(store, &q)?;
            store.list_reminders_by_contact(&contact.id)?
        }
        None => store.list_reminders_due(&now_iso())?,
    };

    if reminders.is_empty() {
        println!("No reminders.");
        return Ok(());
    }

    println!("{:<10} {:<26} {:<10} {:<6} {}", "ID", "Due", "Kind", "Done", "Title");
    println!("{}", "-".repeat(75));
    for r in reminders {
        println!(
            "{:<10} {:<26} {:<10} {:<6} {}",
            &r.id[..8.min(r.id.len())],
            r.due_at,
            r.kind.as_str(),
            if r.done { "yes" } else { "no" },
            r.title,
        );
    }
    Ok(())
}

pub fn done(store: &DossierStore, id: &str) -> Result<()> {
    store.mark_reminder_done(id)?;
    println!("Reminder {} marked done", id);
    Ok(())
}
