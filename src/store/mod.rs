//! Entity storage with SQLite
//!
//! One `DossierStore` wraps one connection to the local database and is
//! passed by reference into every caller; there is no global handle. All
//! repositories read and write through it directly — no entity is cached
//! in memory, so staleness is bounded by the store itself.
//!
//! Lookup misses are `Ok(None)`, never errors. Upserts overwrite the row
//! wholesale; there are no partial-patch semantics at this layer.

mod schema;
mod taxonomy;

use anyhow::Result;
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::model::{
    now_iso, Channel, Contact, Interaction, ProfileSource, Reminder, ReminderKind, Scores,
    SocialProfile,
};

pub use schema::SCHEMA;

pub struct DossierStore {
    conn: Connection,
}

impl DossierStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ============================================
    // CONTACTS
    // ============================================

    pub fn get_contact(&self, id: &str) -> Result<Option<Contact>> {
        let result = self.conn.query_row(
            "SELECT id, first_name, last_name, middle_name, phones, emails, organization,
                    position, birthday, photo_uri, notes, tags, created_at, updated_at,
                    last_interaction_at
             FROM contacts WHERE id = ?",
            params![id],
            row_to_contact,
        );

        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Upsert by primary key, overwriting any existing row wholesale.
    /// A blank `updated_at` is stamped with the current time at write.
    pub fn upsert_contact(&self, contact: &Contact) -> Result<()> {
        let updated_at = if contact.updated_at.is_empty() {
            now_iso()
        } else {
            contact.updated_at.clone()
        };

        self.conn.execute(
            "INSERT INTO contacts
               (id, first_name, last_name, middle_name, phones, emails, organization,
                position, birthday, photo_uri, notes, tags, created_at, updated_at,
                last_interaction_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 middle_name = excluded.middle_name,
                 phones = excluded.phones,
                 emails = excluded.emails,
                 organization = excluded.organization,
                 position = excluded.position,
                 birthday = excluded.birthday,
                 photo_uri = excluded.photo_uri,
                 notes = excluded.notes,
                 tags = excluded.tags,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at,
                 last_interaction_at = excluded.last_interaction_at",
            params![
                contact.id,
                contact.first_name,
                contact.last_name,
                contact.middle_name,
                serde_json::to_string(&contact.phones)?,
                serde_json::to_string(&contact.emails)?,
                contact.organization,
                contact.position,
                contact.birthday,
                contact.photo_uri,
                contact.notes,
                serde_json::to_string(&contact.tags)?,
                contact.created_at,
                updated_at,
                contact.last_interaction_at,
            ],
        )?;
        Ok(())
    }

    /// Case-insensitive substring search over "first last organization".
    /// An empty query matches every contact, up to `limit`.
    ///
    /// SQLite's lower() only folds ASCII, so the case folding happens here
    /// and the scan walks the table in insertion order.
    pub fn search_contacts(&self, query: &str, limit: usize) -> Result<Vec<Contact>> {
        let needle = query.to_lowercase();

        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, middle_name, phones, emails, organization,
                    position, birthday, photo_uri, notes, tags, created_at, updated_at,
                    last_interaction_at
             FROM contacts ORDER BY rowid",
        )?;

        let mut out = Vec::new();
        let rows = stmt.query_map([], row_to_contact)?;
        for row in rows {
            let contact = row?;
            let hay = format!(
                "{} {} {}",
                contact.first_name,
                contact.last_name,
                contact.organization.as_deref().unwrap_or("")
            )
            .to_lowercase();
            if needle.is_empty() || hay.contains(&needle) {
                out.push(contact);
            }
            if out.len() >= limit {
                break;
            }
        }

        Ok(out)
    }

    /// Idempotent: deleting a missing contact is a no-op.
    pub fn delete_contact(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM contacts WHERE id = ?", params![id])?;
        Ok(())
    }

    // ============================================
    // SOCIAL PROFILES
    // ============================================

    pub fn list_profiles_by_contact(&self, contact_id: &str) -> Result<Vec<SocialProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, source, url, fields_json, added_at, last_checked_at
             FROM profiles WHERE contact_id = ? ORDER BY added_at",
        )?;

        let rows = stmt.query_map(params![contact_id], row_to_profile)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn upsert_profile(&self, profile: &SocialProfile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (id, contact_id, source, url, fields_json, added_at, last_checked_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 contact_id = excluded.contact_id,
                 source = excluded.source,
                 url = excluded.url,
                 fields_json = excluded.fields_json,
                 added_at = excluded.added_at,
                 last_checked_at = excluded.last_checked_at",
            params![
                profile.id,
                profile.contact_id,
                profile.source.as_str(),
                profile.url,
                profile.fields_json,
                profile.added_at,
                profile.last_checked_at,
            ],
        )?;
        Ok(())
    }

    pub fn delete_profile(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM profiles WHERE id = ?", params![id])?;
        Ok(())
    }

    // ============================================
    // INTERACTIONS
    // ============================================

    /// Interactions for a contact, newest first, paginated by skip/take.
    pub fn list_interactions(
        &self,
        contact_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Interaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, date, channel, channel_note, duration_minutes, summary,
                    usefulness, keep_in_touch, ally_potential, next_step, next_step_due,
                    next_step_done
             FROM interactions WHERE contact_id = ?
             ORDER BY date DESC LIMIT ? OFFSET ?",
        )?;

        let rows = stmt.query_map(
            params![contact_id, limit as i64, offset as i64],
            row_to_interaction,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn create_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO interactions
               (id, contact_id, date, channel, channel_note, duration_minutes, summary,
                usefulness, keep_in_touch, ally_potential, next_step, next_step_due,
                next_step_done)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                interaction.id,
                interaction.contact_id,
                interaction.date,
                interaction.channel.as_str(),
                interaction.channel_note,
                interaction.duration_minutes,
                interaction.summary,
                interaction.usefulness,
                interaction.keep_in_touch,
                interaction.ally_potential,
                interaction.next_step,
                interaction.next_step_due,
                interaction.next_step_done,
            ],
        )?;
        Ok(())
    }

    pub fn update_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO interactions
               (id, contact_id, date, channel, channel_note, duration_minutes, summary,
                usefulness, keep_in_touch, ally_potential, next_step, next_step_due,
                next_step_done)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 contact_id = excluded.contact_id,
                 date = excluded.date,
                 channel = excluded.channel,
                 channel_note = excluded.channel_note,
                 duration_minutes = excluded.duration_minutes,
                 summary = excluded.summary,
                 usefulness = excluded.usefulness,
                 keep_in_touch = excluded.keep_in_touch,
                 ally_potential = excluded.ally_potential,
                 next_step = excluded.next_step,
                 next_step_due = excluded.next_step_due,
                 next_step_done = excluded.next_step_done",
            params![
                interaction.id,
                interaction.contact_id,
                interaction.date,
                interaction.channel.as_str(),
                interaction.channel_note,
                interaction.duration_minutes,
                interaction.summary,
                interaction.usefulness,
                interaction.keep_in_touch,
                interaction.ally_potential,
                interaction.next_step,
                interaction.next_step_due,
                interaction.next_step_done,
            ],
        )?;
        Ok(())
    }

    // ============================================
    // REMINDERS
    // ============================================

    pub fn list_reminders_by_contact(&self, contact_id: &str) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, title, kind, due_at, done
             FROM reminders WHERE contact_id = ? ORDER BY due_at",
        )?;

        let rows = stmt.query_map(params![contact_id], row_to_reminder)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Open reminders due at or before the given instant.
    pub fn list_reminders_due(&self, before: &str) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, title, kind, due_at, done
             FROM reminders WHERE done = 0 AND due_at <= ? ORDER BY due_at",
        )?;

        let rows = stmt.query_map(params![before], row_to_reminder)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn upsert_reminder(&self, reminder: &Reminder) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminders (id, contact_id, title, kind, due_at, done)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 contact_id = excluded.contact_id,
                 title = excluded.title,
                 kind = excluded.kind,
                 due_at = excluded.due_at,
                 done = excluded.done",
            params![
                reminder.id,
                reminder.contact_id,
                reminder.title,
                reminder.kind.as_str(),
                reminder.due_at,
                reminder.done,
            ],
        )?;
        Ok(())
    }

    /// Idempotent: marking a missing or already-done reminder is a no-op.
    pub fn mark_reminder_done(&self, id: &str) -> Result<()> {
        self.conn
            .execute("UPDATE reminders SET done = 1 WHERE id = ?", params![id])?;
        Ok(())
    }

    // ============================================
    // SCORES
    // ============================================

    pub fn get_scores(&self, contact_id: &str) -> Result<Option<Scores>> {
        let result = self.conn.query_row(
            "SELECT contact_id, completeness, warmth, value_score
             FROM scores WHERE contact_id = ?",
            params![contact_id],
            |row| {
                Ok(Scores {
                    contact_id: row.get(0)?,
                    completeness: row.get(1)?,
                    warmth: row.get(2)?,
                    value_score: row.get(3)?,
                })
            },
        );

        match result {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The primary key is the contact id, so a contact can never hold more
    /// than one score row.
    pub fn upsert_scores(&self, scores: &Scores) -> Result<()> {
        self.conn.execute(
            "INSERT INTO scores (contact_id, completeness, warmth, value_score)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(contact_id) DO UPDATE SET
                 completeness = excluded.completeness,
                 warmth = excluded.warmth,
                 value_score = excluded.value_score",
            params![
                scores.contact_id,
                scores.completeness,
                scores.warmth,
                scores.value_score,
            ],
        )?;
        Ok(())
    }
}

// ============================================
// ROW MAPPING
// ============================================

/// List-valued columns hold JSON arrays; a corrupt cell degrades to an
/// empty list rather than failing the whole read.
fn json_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}

fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        middle_name: row.get(3)?,
        phones: json_list(row.get(4)?),
        emails: json_list(row.get(5)?),
        organization: row.get(6)?,
        position: row.get(7)?,
        birthday: row.get(8)?,
        photo_uri: row.get(9)?,
        notes: row.get(10)?,
        tags: json_list(row.get(11)?),
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
        last_interaction_at: row.get(14)?,
    })
}

fn row_to_profile(row: &Row) -> rusqlite::Result<SocialProfile> {
    Ok(SocialProfile {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        source: row
            .get::<_, String>(2)?
            .parse()
            .unwrap_or(ProfileSource::Other),
        url: row.get(3)?,
        fields_json: row.get(4)?,
        added_at: row.get(5)?,
        last_checked_at: row.get(6)?,
    })
}

fn row_to_interaction(row: &Row) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        date: row.get(2)?,
        channel: row.get::<_, String>(3)?.parse().unwrap_or(Channel::Other),
        channel_note: row.get(4)?,
        duration_minutes: row.get(5)?,
        summary: row.get(6)?,
        usefulness: row.get(7)?,
        keep_in_touch: row.get(8)?,
        ally_potential: row.get(9)?,
        next_step: row.get(10)?,
        next_step_due: row.get(11)?,
        next_step_done: row.get(12)?,
    })
}

fn row_to_reminder(row: &Row) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        title: row.get(2)?,
        kind: row
            .get::<_, String>(3)?
            .parse()
            .unwrap_or(ReminderKind::Followup),
        due_at: row.get(4)?,
        done: row.get(5)?,
    })
}
