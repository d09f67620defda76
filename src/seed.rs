//! Default category taxonomy
//!
//! Seeds the fixture set the app ships with. Idempotent by name: existing
//! categories are left untouched and only missing subcategories are filled
//! in, so re-running against a populated store changes nothing.

use anyhow::Result;
use uuid::Uuid;

use crate::model::{now_iso, Category, CategoryKind, Subcategory};
use crate::store::DossierStore;

struct CategoryDef {
    name: &'static str,
    kind: CategoryKind,
    subcategories: &'static [&'static str],
}

const DEFAULTS: &[CategoryDef] = &[
    CategoryDef {
        name: "Семья",
        kind: CategoryKind::Simple,
        subcategories: &[],
    },
    CategoryDef {
        name: "Друзья",
        kind: CategoryKind::Simple,
        subcategories: &[],
    },
    CategoryDef {
        name: "Близкие",
        kind: CategoryKind::Simple,
        subcategories: &[],
    },
    CategoryDef {
        name: "Знакомые",
        kind: CategoryKind::Simple,
        subcategories: &[],
    },
    CategoryDef {
        name: "Старшие товарищи",
        kind: CategoryKind::Fixed,
        subcategories: &["По бизнесу", "По карьере", "Личностный рост", "Прочее"],
    },
    CategoryDef {
        name: "Коллеги",
        kind: CategoryKind::Fixed,
        subcategories: &["Руководители", "Свой круг", "Параллель", "Подчинённые"],
    },
    CategoryDef {
        name: "Работал раньше",
        kind: CategoryKind::Org,
        subcategories: &[],
    },
    CategoryDef {
        name: "По интересам",
        kind: CategoryKind::Interest,
        subcategories: &[],
    },
];

/// Create any missing default categories and their subcategories. Returns
/// the number of records created.
pub fn default_categories(store: &DossierStore) -> Result<usize> {
    let now = now_iso();
    let existing = store.list_categories()?;
    let mut created = 0;

    for def in DEFAULTS {
        let category = match existing.iter().find(|c| c.name == def.name) {
            Some(c) => c.clone(),
            None => {
                let category = Category {
                    id: Uuid::new_v4().to_string(),
                    name: def.name.to_string(),
                    kind: def.kind,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };
                store.upsert_category(&category)?;
                created += 1;
                category
            }
        };

        if def.subcategories.is_empty() {
            continue;
        }

        let current = store.list_subcategories(&category.id)?;
        for name in def.subcategories {
            // name uniqueness within a category is case-insensitive
            let present = current
                .iter()
                .any(|s| s.name.to_lowercase() == name.to_lowercase());
            if !present {
                store.upsert_subcategory(&Subcategory {
                    id: Uuid::new_v4().to_string(),
                    category_id: category.id.clone(),
                    name: name.to_string(),
                    sort_order: None,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                })?;
                created += 1;
            }
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_store;

    #[test]
    fn test_seed_then_reseed_is_stable() {
        let (_dir, store) = test_store();

        let created = default_categories(&store).unwrap();
        assert_eq!(created, 8 + 8); // 8 categories, 4 + 4 subcategories

        let categories = store.list_categories().unwrap();
        assert_eq!(categories.len(), 8);

        // second run creates nothing
        assert_eq!(default_categories(&store).unwrap(), 0);
        assert_eq!(store.list_categories().unwrap().len(), 8);
    }

    #[test]
    fn test_seed_fills_missing_subcategories_only() {
        let (_dir, store) = test_store();
        default_categories(&store).unwrap();

        let colleagues = store
            .list_categories()
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Коллеги")
            .unwrap();
        let subs = store.list_subcategories(&colleagues.id).unwrap();
        assert_eq!(subs.len(), 4);

        store.delete_subcategory(&subs[0].id).unwrap();
        assert_eq!(default_categories(&store).unwrap(), 1);
    }
}
