//! Category command implementations

use anyhow::Result;
use uuid::Uuid;

use crate::model::{now_iso, Category, CategoryKind, Subcategory};
use crate::services::taxonomy;
use crate::store::DossierStore;

use super::{resolve_category, resolve_contact};

pub fn list(store: &DossierStore) -> Result<()> {
    let categories = store.list_categories()?;
    if categories.is_empty() {
        println!("No categories found. Run 'dossier init' to seed the defaults.");
        return Ok(());
    }

    println!("{:<10} {:<24} {:<10} {:<9} {}", "ID", "Name", "Kind", "Contacts", "Subcategories");
    println!("{}", "-".repeat(80));
    for c in categories {
        let count = store.count_contacts_in_category(&c.id)?;
        let subcategories = store
            .list_subcategories(&c.id)?
            .into_iter()
            .map(|s| s.name)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<10} {:<24} {:<10} {:<9} {}",
            &c.id[..8.min(c.id.len())],
            c.name,
            c.kind.as_str(),
            count,
            subcategories,
        );
    }
    Ok(())
}

pub fn create(store: &DossierStore, name: String, kind: &str) -> Result<()> {
    let kind: CategoryKind = kind.parse()?;
    let now = now_iso();
    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: name.clone(),
        kind,
        created_at: now.clone(),
        updated_at: now,
    };
    store.upsert_category(&category)?;
    println!("Category '{}' created with ID: {}", name, category.id);
    Ok(())
}

pub fn delete(store: &DossierStore, query: &str) -> Result<()> {
    let category = resolve_category(store, query)?;
    store.delete_category(&category.id)?;
    println!("Deleted category '{}' and its subcategories", category.name);
    Ok(())
}

pub fn add_subcategory(store: &DossierStore, category_query: &str, name: String) -> Result<()> {
    let category = resolve_category(store, category_query)?;
    if !category.kind.has_subcategories() {
        return Err(anyhow::anyhow!(
            "Category '{}' is simple and holds contacts directly",
            category.name
        ));
    }

    // names are unique within the category, case-insensitively
    let clash = store
        .list_subcategories(&category.id)?
        .into_iter()
        .any(|s| s.name.to_lowercase() == name.to_lowercase());
    if clash {
        return Err(anyhow::anyhow!(
            "Subcategory '{}' already exists in '{}'",
            name,
            category.name
        ));
    }

    let now = now_iso();
    let subcategory = Subcategory {
        id: Uuid::new_v4().to_string(),
        category_id: category.id,
        name: name.clone(),
        sort_order: None,
        created_at: now.clone(),
        updated_at: now,
    };
    store.upsert_subcategory(&subcategory)?;
    println!("Subcategory '{}' added to '{}'", name, category.name);
    Ok(())
}

pub fn assign(store: &DossierStore, contact_query: &str, category_query: &str) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let category = resolve_category(store, category_query)?;
    store.link_contact_category(&contact.id, &category.id)?;
    println!(
        "Assigned '{}' to '{}'",
        contact.display_name(),
        category.name
    );
    Ok(())
}

pub fn unassign(store: &DossierStore, contact_query: &str, category_query: &str) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let category = resolve_category(store, category_query)?;
    store.unlink_contact_category(&contact.id, &category.id)?;
    println!(
        "Removed '{}' from '{}'",
        contact.display_name(),
        category.name
    );
    Ok(())
}

pub fn assign_subcategory(
    store: &DossierStore,
    contact_query: &str,
    category_query: &str,
    subcategory_name: &str,
) -> Result<()> {
    let contact = resolve_contact(store, contact_query)?;
    let category = resolve_category(store, category_query)?;
    let subcategory = store
        .list_subcategories(&category.id)?
        .into_iter()
        .find(|s| s.name.to_lowercase() == subcategory_name.to_lowercase())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Subcategory '{}' not found in '{}'",
                subcategory_name,
                category.name
            )
        })?;

    // refining implies membership in the parent category
    store.link_contact_category(&contact.id, &category.id)?;
    store.link_contact_subcategory(&contact.id, &subcategory.id)?;
    println!(
        "Assigned '{}' to '{}' / '{}'",
        contact.display_name(),
        category.name,
        subcategory.name
    );
    Ok(())
}

pub fn unsorted(store: &DossierStore) -> Result<()> {
    let ids = taxonomy::unsorted_contact_ids(store)?;
    if ids.is_empty() {
        println!("Every contact is categorized.");
        return Ok(());
    }

    println!("{} uncategorized contact(s):", ids.len());
    for id in ids {
        if let Some(contact) = store.get_contact(&id)? {
            println!("  {}  {}", &id[..8.min(id.len())], contact.display_name());
        }
    }
    Ok(())
}

pub fn refine(store: &DossierStore, category_query: &str) -> Result<()> {
    let category = resolve_category(store, category_query)?;
    let ids = taxonomy::contacts_needing_refinement(store, &category.id)?;
    if ids.is_empty() {
        println!("Every contact in '{}' is refined.", category.name);
        return Ok(());
    }

    println!(
        "{} contact(s) in '{}' without a subcategory:",
        ids.len(),
        category.name
    );
    for id in ids {
        if let Some(contact) = store.get_contact(&id)? {
            println!("  {}  {}", &id[..8.min(id.len())], contact.display_name());
        }
    }
    Ok(())
}
