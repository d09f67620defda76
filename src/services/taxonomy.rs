//! Derived taxonomy queries
//!
//! Read-only set computations over the relation repositories. Both queries
//! are recomputed from scratch on every call — no caching — and cost is
//! linear in the number of contacts, which is fine at the hundreds-to-
//! low-thousands scale this store targets.

use std::collections::HashSet;

use anyhow::Result;

use crate::store::DossierStore;

/// Cap for the "enumerate everything" scans. Far above any realistic
/// personal contact list.
const SCAN_LIMIT: usize = 100_000;

/// Contacts with no category join at all.
pub fn unsorted_contact_ids(store: &DossierStore) -> Result<Vec<String>> {
    let all = store.search_contacts("", SCAN_LIMIT)?;
    let mut out = Vec::new();
    for contact in all {
        if store.list_categories_for_contact(&contact.id)?.is_empty() {
            out.push(contact.id);
        }
    }
    Ok(out)
}

/// Contacts linked to the category but to none of its subcategories — the
/// set still waiting to be refined one level down.
pub fn contacts_needing_refinement(store: &DossierStore, category_id: &str) -> Result<Vec<String>> {
    let subcategory_ids: HashSet<String> = store
        .list_subcategories(category_id)?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let in_category = store.contacts_in_category(category_id, SCAN_LIMIT, 0)?;

    let mut out = Vec::new();
    for contact_id in in_category {
        let links = store.list_subcategories_for_contact(&contact_id)?;
        let refined = links
            .iter()
            .any(|l| subcategory_ids.contains(&l.subcategory_id));
        if !refined {
            out.push(contact_id);
        }
    }
    Ok(out)
}
