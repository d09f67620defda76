//! Category taxonomy storage
//!
//! Categories, subcategories, and the two many-to-many joins linking
//! contacts into them. Join rows are deduplicated by a UNIQUE index on the
//! (contact, other) pair: `link_*` inserts with OR IGNORE, so repeated adds
//! for the same pair collapse to a single row. `unlink_*` still deletes
//! every matching row, which also heals any duplicates predating the index.
//!
//! Deletion cascades consistently on both levels: removing a category
//! removes its subcategories, their joins, and its own contact joins;
//! removing a subcategory removes its joins.

use anyhow::Result;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::model::{
    now_iso, Category, CategoryKind, ContactCategory, ContactSubcategory, Subcategory,
};

use super::DossierStore;

impl DossierStore {
    // ============================================
    // CATEGORIES
    // ============================================

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind, created_at, updated_at FROM categories ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], row_to_category)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_category(&self, id: &str) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name, kind, created_at, updated_at FROM categories WHERE id = ?",
            params![id],
            row_to_category,
        );

        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A blank `updated_at` is stamped with the current time at write.
    pub fn upsert_category(&self, category: &Category) -> Result<()> {
        let updated_at = if category.updated_at.is_empty() {
            now_iso()
        } else {
            category.updated_at.clone()
        };

        self.conn.execute(
            "INSERT INTO categories (id, name, kind, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 kind = excluded.kind,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
            params![
                category.id,
                category.name,
                category.kind.as_str(),
                category.created_at,
                updated_at,
            ],
        )?;
        Ok(())
    }

    /// Removes the category, its subcategories, and every join into either.
    /// Idempotent.
    pub fn delete_category(&self, id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM contact_subcategories WHERE subcategory_id IN
               (SELECT id FROM subcategories WHERE category_id = ?)",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM subcategories WHERE category_id = ?",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM contact_categories WHERE category_id = ?",
            params![id],
        )?;
        tx.execute("DELETE FROM categories WHERE id = ?", params![id])?;
        tx.commit()?;
        Ok(())
    }

    // ============================================
    // SUBCATEGORIES
    // ============================================

    pub fn list_subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, name, sort_order, created_at, updated_at
             FROM subcategories WHERE category_id = ?
             ORDER BY sort_order IS NULL, sort_order, rowid",
        )?;
        let rows = stmt.query_map(params![category_id], row_to_subcategory)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn upsert_subcategory(&self, subcategory: &Subcategory) -> Result<()> {
        let updated_at = if subcategory.updated_at.is_empty() {
            now_iso()
        } else {
            subcategory.updated_at.clone()
        };

        self.conn.execute(
            "INSERT INTO subcategories (id, category_id, name, sort_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 category_id = excluded.category_id,
                 name = excluded.name,
                 sort_order = excluded.sort_order,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
            params![
                subcategory.id,
                subcategory.category_id,
                subcategory.name,
                subcategory.sort_order,
                subcategory.created_at,
                updated_at,
            ],
        )?;
        Ok(())
    }

    /// Removes the subcategory and its contact joins. Idempotent.
    pub fn delete_subcategory(&self, id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM contact_subcategories WHERE subcategory_id = ?",
            params![id],
        )?;
        tx.execute("DELETE FROM subcategories WHERE id = ?", params![id])?;
        tx.commit()?;
        Ok(())
    }

    // ============================================
    // CONTACT <-> CATEGORY
    // ============================================

    /// After this returns, exactly one join row exists for the pair — the
    /// UNIQUE pair index makes repeated adds collapse to one insert.
    pub fn link_contact_category(&self, contact_id: &str, category_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO contact_categories (id, contact_id, category_id, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                Uuid::new_v4().to_string(),
                contact_id,
                category_id,
                now_iso(),
            ],
        )?;
        Ok(())
    }

    /// Deletes every join for the pair; idempotent.
    pub fn unlink_contact_category(&self, contact_id: &str, category_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM contact_categories WHERE contact_id = ? AND category_id = ?",
            params![contact_id, category_id],
        )?;
        Ok(())
    }

    pub fn list_categories_for_contact(&self, contact_id: &str) -> Result<Vec<ContactCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, category_id, created_at
             FROM contact_categories WHERE contact_id = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok(ContactCategory {
                id: row.get(0)?,
                contact_id: row.get(1)?,
                category_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Contact ids in a category, deduplicated, insertion-order stable,
    /// paginated by skip/take.
    pub fn contacts_in_category(
        &self,
        category_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT contact_id FROM contact_categories WHERE category_id = ?
             GROUP BY contact_id ORDER BY MIN(rowid) LIMIT ? OFFSET ?",
        )?;
        let rows = stmt.query_map(
            params![category_id, limit as i64, offset as i64],
            |row| row.get(0),
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Exact count of distinct contacts in the category.
    pub fn count_contacts_in_category(&self, category_id: &str) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(DISTINCT contact_id) FROM contact_categories WHERE category_id = ?",
            params![category_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ============================================
    // CONTACT <-> SUBCATEGORY
    // ============================================

    pub fn link_contact_subcategory(&self, contact_id: &str, subcategory_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO contact_subcategories (id, contact_id, subcategory_id, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                Uuid::new_v4().to_string(),
                contact_id,
                subcategory_id,
                now_iso(),
            ],
        )?;
        Ok(())
    }

    pub fn unlink_contact_subcategory(&self, contact_id: &str, subcategory_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM contact_subcategories WHERE contact_id = ? AND subcategory_id = ?",
            params![contact_id, subcategory_id],
        )?;
        Ok(())
    }

    pub fn list_subcategories_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Vec<ContactSubcategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, subcategory_id, created_at
             FROM contact_subcategories WHERE contact_id = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok(ContactSubcategory {
                id: row.get(0)?,
                contact_id: row.get(1)?,
                subcategory_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn contacts_in_subcategory(
        &self,
        subcategory_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT contact_id FROM contact_subcategories WHERE subcategory_id = ?
             GROUP BY contact_id ORDER BY MIN(rowid) LIMIT ? OFFSET ?",
        )?;
        let rows = stmt.query_map(
            params![subcategory_id, limit as i64, offset as i64],
            |row| row.get(0),
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn count_contacts_in_subcategory(&self, subcategory_id: &str) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(DISTINCT contact_id) FROM contact_subcategories WHERE subcategory_id = ?",
            params![subcategory_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row
            .get::<_, String>(2)?
            .parse()
            .unwrap_or(CategoryKind::Simple),
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn row_to_subcategory(row: &Row) -> rusqlite::Result<Subcategory> {
    Ok(Subcategory {
        id: row.get(0)?,
        category_id: row.get(1)?,
        name: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_store;
    use crate::model::{Category, CategoryKind, Subcategory};

    fn sample_category(id: &str, name: &str, kind: CategoryKind) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            created_at: "2024-03-01T10:00:00.000Z".to_string(),
            updated_at: "2024-03-01T10:00:00.000Z".to_string(),
        }
    }

    fn sample_subcategory(id: &str, category_id: &str, name: &str) -> Subcategory {
        Subcategory {
            id: id.to_string(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            sort_order: None,
            created_at: "2024-03-01T10:00:00.000Z".to_string(),
            updated_at: "2024-03-01T10:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_category_round_trip() {
        let (_dir, store) = test_store();

        assert!(store.get_category("nope").unwrap().is_none());

        store
            .upsert_category(&sample_category("cat1", "Colleagues", CategoryKind::Fixed))
            .unwrap();
        let got = store.get_category("cat1").unwrap().unwrap();
        assert_eq!(got.name, "Colleagues");
        assert_eq!(got.kind, CategoryKind::Fixed);

        assert_eq!(store.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_link_is_idempotent() {
        let (_dir, store) = test_store();

        for _ in 0..3 {
            store.link_contact_category("c1", "cat1").unwrap();
        }

        assert_eq!(store.count_contacts_in_category("cat1").unwrap(), 1);
        assert_eq!(store.list_categories_for_contact("c1").unwrap().len(), 1);
    }

    #[test]
    fn test_unlink_removes_every_match() {
        let (_dir, store) = test_store();

        store.link_contact_category("c1", "cat1").unwrap();
        store.link_contact_category("c1", "cat1").unwrap();
        store.unlink_contact_category("c1", "cat1").unwrap();
        store.unlink_contact_category("c1", "cat1").unwrap(); // no-op

        assert_eq!(store.count_contacts_in_category("cat1").unwrap(), 0);
        assert!(store.list_categories_for_contact("c1").unwrap().is_empty());
    }

    #[test]
    fn test_contacts_in_category_pagination_keeps_insertion_order() {
        let (_dir, store) = test_store();

        for contact in ["a", "b", "c", "d"] {
            store.link_contact_category(contact, "cat1").unwrap();
        }
        // repeated links must not disturb order or duplicate entries
        store.link_contact_category("b", "cat1").unwrap();

        assert_eq!(
            store.contacts_in_category("cat1", 2, 0).unwrap(),
            vec!["a", "b"]
        );
        assert_eq!(
            store.contacts_in_category("cat1", 2, 2).unwrap(),
            vec!["c", "d"]
        );
        assert_eq!(store.count_contacts_in_category("cat1").unwrap(), 4);
    }

    #[test]
    fn test_subcategory_delete_cascades_to_joins() {
        let (_dir, store) = test_store();

        store
            .upsert_subcategory(&sample_subcategory("sub1", "cat1", "Managers"))
            .unwrap();
        store.link_contact_subcategory("c1", "sub1").unwrap();

        store.delete_subcategory("sub1").unwrap();

        assert!(store.list_subcategories("cat1").unwrap().is_empty());
        assert_eq!(store.count_contacts_in_subcategory("sub1").unwrap(), 0);
        assert!(store
            .list_subcategories_for_contact("c1")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_category_delete_cascades_to_subcategories_and_joins() {
        let (_dir, store) = test_store();

        store
            .upsert_category(&sample_category("cat1", "Colleagues", CategoryKind::Fixed))
            .unwrap();
        store
            .upsert_subcategory(&sample_subcategory("sub1", "cat1", "Managers"))
            .unwrap();
        store.link_contact_category("c1", "cat1").unwrap();
        store.link_contact_subcategory("c1", "sub1").unwrap();

        // an unrelated category survives
        store
            .upsert_category(&sample_category("cat2", "Friends", CategoryKind::Simple))
            .unwrap();
        store.link_contact_category("c1", "cat2").unwrap();

        store.delete_category("cat1").unwrap();

        assert!(store.get_category("cat1").unwrap().is_none());
        assert!(store.list_subcategories("cat1").unwrap().is_empty());
        assert_eq!(store.count_contacts_in_category("cat1").unwrap(), 0);
        assert_eq!(store.count_contacts_in_subcategory("sub1").unwrap(), 0);
        assert_eq!(store.count_contacts_in_category("cat2").unwrap(), 1);
    }

    #[test]
    fn test_subcategory_ordering() {
        let (_dir, store) = test_store();

        let mut s1 = sample_subcategory("sub1", "cat1", "Second");
        s1.sort_order = Some(2);
        let mut s2 = sample_subcategory("sub2", "cat1", "First");
        s2.sort_order = Some(1);
        let s3 = sample_subcategory("sub3", "cat1", "Unordered");

        store.upsert_subcategory(&s1).unwrap();
        store.upsert_subcategory(&s2).unwrap();
        store.upsert_subcategory(&s3).unwrap();

        let names: Vec<String> = store
            .list_subcategories("cat1")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Unordered"]);
    }
}
