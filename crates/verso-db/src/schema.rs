//! SQL schema definitions.

/// Complete schema for Verso v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Periods & Profiles
-- ============================================================

CREATE TABLE IF NOT EXISTS periods (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    season TEXT NOT NULL,
    year INTEGER NOT NULL,
    start_date INTEGER NOT NULL,
    end_date INTEGER NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_periods_active ON periods(is_active, end_date DESC);

CREATE TABLE IF NOT EXISTS profiles (
    id INTEGER PRIMARY KEY,
    display_name TEXT NOT NULL,
    city TEXT,
    accepts_communications INTEGER NOT NULL DEFAULT 1
);

-- ============================================================
-- Templates & Period Bindings
-- ============================================================

CREATE TABLE IF NOT EXISTS templates (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    display_text TEXT,
    -- Nullable: legacy rows resolve kind from the name.
    kind TEXT,
    phases INTEGER,
    duration TEXT,
    requirements TEXT,
    connection_rules TEXT,
    internal_reference TEXT
);

CREATE TABLE IF NOT EXISTS period_templates (
    period_id INTEGER NOT NULL REFERENCES periods(id) ON DELETE CASCADE,
    template_id INTEGER NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
    PRIMARY KEY (period_id, template_id)
);

-- ============================================================
-- Collaborations & Memberships
-- ============================================================

CREATE TABLE IF NOT EXISTS collabs (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    kind TEXT NOT NULL,
    -- Strictly derived: 1 iff participation_mode = 'private'.
    is_private INTEGER NOT NULL DEFAULT 0,
    created_by INTEGER NOT NULL REFERENCES profiles(id),
    current_phase INTEGER NOT NULL DEFAULT 1,
    total_phases INTEGER,
    template_id INTEGER REFERENCES templates(id),
    participation_mode TEXT NOT NULL DEFAULT 'community',
    location TEXT,
    requirements TEXT,
    connection_rules TEXT,
    internal_reference TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_collabs_creator_template ON collabs(created_by, template_id);
CREATE INDEX IF NOT EXISTS idx_collabs_mode ON collabs(participation_mode);

-- Append-only except for the hard delete on leave. A profile accumulates
-- one row per join; status is never flipped in place.
CREATE TABLE IF NOT EXISTS memberships (
    id INTEGER PRIMARY KEY,
    profile_id INTEGER NOT NULL REFERENCES profiles(id),
    collab_id INTEGER NOT NULL REFERENCES collabs(id) ON DELETE CASCADE,
    role TEXT NOT NULL,
    status TEXT NOT NULL,
    participation_mode TEXT NOT NULL,
    location TEXT,
    joined_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_memberships_profile ON memberships(profile_id, status);
CREATE INDEX IF NOT EXISTS idx_memberships_collab ON memberships(collab_id, status);

-- ============================================================
-- Curator Selections
-- ============================================================

CREATE TABLE IF NOT EXISTS creator_selections (
    curator_id INTEGER NOT NULL REFERENCES profiles(id),
    period_id INTEGER NOT NULL REFERENCES periods(id),
    target_id INTEGER NOT NULL,
    selected_at INTEGER NOT NULL,
    PRIMARY KEY (curator_id, period_id, target_id)
);

CREATE TABLE IF NOT EXISTS sponsor_selections (
    curator_id INTEGER NOT NULL REFERENCES profiles(id),
    period_id INTEGER NOT NULL REFERENCES periods(id),
    target_id INTEGER NOT NULL,
    selected_at INTEGER NOT NULL,
    PRIMARY KEY (curator_id, period_id, target_id)
);

CREATE TABLE IF NOT EXISTS collab_selections (
    curator_id INTEGER NOT NULL REFERENCES profiles(id),
    period_id INTEGER NOT NULL REFERENCES periods(id),
    target_id INTEGER NOT NULL,
    selected_at INTEGER NOT NULL,
    PRIMARY KEY (curator_id, period_id, target_id)
);

CREATE TABLE IF NOT EXISTS communication_prefs (
    curator_id INTEGER NOT NULL REFERENCES profiles(id),
    period_id INTEGER NOT NULL REFERENCES periods(id),
    include_communications INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (curator_id, period_id)
);

-- ============================================================
-- Curation Inputs
-- ============================================================

CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY,
    period_id INTEGER NOT NULL REFERENCES periods(id),
    creator_id INTEGER NOT NULL REFERENCES profiles(id),
    title TEXT NOT NULL,
    -- Comma-separated; de-duplicated at aggregation time.
    tags TEXT,
    status TEXT NOT NULL DEFAULT 'draft',
    submitted_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_submissions_period ON submissions(period_id, status);

CREATE TABLE IF NOT EXISTS sponsors (
    id INTEGER PRIMARY KEY,
    period_id INTEGER NOT NULL REFERENCES periods(id),
    name TEXT NOT NULL,
    blurb TEXT,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_sponsors_period ON sponsors(period_id, is_active);

CREATE TABLE IF NOT EXISTS communications (
    id INTEGER PRIMARY KEY,
    period_id INTEGER NOT NULL REFERENCES periods(id),
    sender_id INTEGER NOT NULL REFERENCES profiles(id),
    recipient_id INTEGER NOT NULL REFERENCES profiles(id),
    subject TEXT NOT NULL,
    body TEXT,
    status TEXT NOT NULL DEFAULT 'submitted',
    sent_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_communications_recipient ON communications(recipient_id, period_id, status);
"#;
