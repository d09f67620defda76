//! CLI command implementations
//!
//! Thin presentation glue over the store and services. No invariants live
//! here; every command resolves its arguments, calls one library entry
//! point, and prints the result.

pub mod category;
pub mod contact;
pub mod interaction;
pub mod profile;
pub mod reminder;

use anyhow::Result;

use crate::model::{Category, Contact};
use crate::store::DossierStore;

/// Find a contact by exact id, id prefix, or name/organization substring.
pub fn resolve_contact(store: &DossierStore, query: &str) -> Result<Contact> {
    if let Some(contact) = store.get_contact(query)? {
        return Ok(contact);
    }

    if !query.is_empty() {
        if let Some(contact) = store.search_contacts(query, 1)?.into_iter().next() {
            return Ok(contact);
        }
    }

    Err(anyhow::anyhow!("Contact not found: {}", query))
}

/// Find a category by exact id, id prefix, or name.
pub fn resolve_category(store: &DossierStore, query: &str) -> Result<Category> {
    let categories = store.list_categories()?;
    categories
        .into_iter()
        .find(|c| c.id == query || c.id.starts_with(query) || c.name == query)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", query))
}
