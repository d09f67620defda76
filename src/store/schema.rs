//! SQLite schema definition
//!
//! Applied idempotently on every open. Schema evolution is additive only:
//! stores and indexes may be added in later versions, never removed or
//! renamed, so databases written by older builds stay readable.

pub const SCHEMA: &str = r#"
-- ============================================
-- CONTACTS
-- ============================================

-- Core contact record. List-valued fields (phones, emails, tags) are
-- stored as JSON arrays in TEXT columns.
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    middle_name TEXT,
    phones TEXT NOT NULL DEFAULT '[]',
    emails TEXT NOT NULL DEFAULT '[]',
    organization TEXT,
    position TEXT,
    birthday TEXT,                         -- ISO date, caller-supplied
    photo_uri TEXT,
    notes TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_interaction_at TEXT               -- set when an interaction is logged
);

-- ============================================
-- SOCIAL PROFILES
-- ============================================

CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL,
    source TEXT NOT NULL,                  -- 'linkedin', 'facebook', 'telegram', ...
    url TEXT NOT NULL,
    fields_json TEXT NOT NULL DEFAULT '{}', -- cached scraped fields
    added_at TEXT NOT NULL,
    last_checked_at TEXT
);

-- ============================================
-- INTERACTIONS
-- ============================================

CREATE TABLE IF NOT EXISTS interactions (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL,
    date TEXT NOT NULL,                    -- ISO timestamp of the touchpoint
    channel TEXT NOT NULL,                 -- 'meeting', 'call', 'chat', 'email', 'other'
    channel_note TEXT,                     -- qualifier when channel = 'other'
    duration_minutes INTEGER,
    summary TEXT,
    usefulness INTEGER,                    -- 1..5
    keep_in_touch INTEGER NOT NULL DEFAULT 0,
    ally_potential INTEGER NOT NULL DEFAULT 0,
    next_step TEXT,
    next_step_due TEXT,
    next_step_done INTEGER NOT NULL DEFAULT 0
);

-- ============================================
-- REMINDERS
-- ============================================

-- contact_id is intentionally not a foreign key: reminders have an
-- independent lifecycle from the records they reference.
CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    contact_id TEXT,
    title TEXT NOT NULL,
    kind TEXT NOT NULL,                    -- 'birthday', 'followup', 'nextStep'
    due_at TEXT NOT NULL,
    done INTEGER NOT NULL DEFAULT 0
);

-- ============================================
-- SCORES
-- ============================================

-- One row per contact. completeness and warmth are derived; value_score
-- is user-set.
CREATE TABLE IF NOT EXISTS scores (
    contact_id TEXT PRIMARY KEY,
    completeness INTEGER NOT NULL DEFAULT 0,
    warmth INTEGER NOT NULL DEFAULT 0,
    value_score INTEGER NOT NULL DEFAULT 3
);

-- ============================================
-- TAXONOMY
-- ============================================

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,                    -- 'simple', 'fixed', 'org', 'interest'
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subcategories (
    id TEXT PRIMARY KEY,
    category_id TEXT NOT NULL,
    name TEXT NOT NULL,
    sort_order INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Join tables. The UNIQUE pair index is the dedup guarantee: link is an
-- INSERT OR IGNORE against it, so repeated adds collapse to one row.
CREATE TABLE IF NOT EXISTS contact_categories (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contact_subcategories (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL,
    subcategory_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- ============================================
-- INDEXES
-- ============================================

-- Contacts
CREATE INDEX IF NOT EXISTS idx_contacts_last_name ON contacts(last_name);
CREATE INDEX IF NOT EXISTS idx_contacts_organization ON contacts(organization);

-- Profiles
CREATE INDEX IF NOT EXISTS idx_profiles_contact ON profiles(contact_id);

-- Interactions
CREATE INDEX IF NOT EXISTS idx_interactions_contact_date ON interactions(contact_id, date);
CREATE INDEX IF NOT EXISTS idx_interactions_date ON interactions(date);

-- Reminders
CREATE INDEX IF NOT EXISTS idx_reminders_contact ON reminders(contact_id);
CREATE INDEX IF NOT EXISTS idx_reminders_due ON reminders(due_at);

-- Taxonomy
CREATE INDEX IF NOT EXISTS idx_subcategories_category ON subcategories(category_id);

CREATE INDEX IF NOT EXISTS idx_contact_categories_category ON contact_categories(category_id);
CREATE INDEX IF NOT EXISTS idx_contact_categories_contact ON contact_categories(contact_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_contact_categories_pair
    ON contact_categories(contact_id, category_id);

CREATE INDEX IF NOT EXISTS idx_contact_subcategories_subcategory ON contact_subcategories(subcategory_id);
CREATE INDEX IF NOT EXISTS idx_contact_subcategories_contact ON contact_subcategories(contact_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_contact_subcategories_pair
    ON contact_subcategories(contact_id, subcategory_id);
"#;
