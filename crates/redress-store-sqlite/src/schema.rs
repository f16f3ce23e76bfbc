//! SQL schema for the Redress SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS complaints (
    complaint_id   TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL,
    category       TEXT,
    department     TEXT NOT NULL,
    status         TEXT NOT NULL,   -- canonical label, e.g. 'In Progress'
    submitted_by   TEXT NOT NULL,
    assigned_to    TEXT,
    recipient_role TEXT,
    recipient_id   TEXT,
    submitted_to   TEXT,
    is_deleted     INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    updated_at     TEXT NOT NULL
);

-- Status history is strictly append-only.
CREATE TABLE IF NOT EXISTS status_changes (
    change_id    TEXT PRIMARY KEY,
    complaint_id TEXT NOT NULL REFERENCES complaints(complaint_id),
    from_status  TEXT NOT NULL,
    to_status    TEXT NOT NULL,
    changed_by   TEXT NOT NULL,
    recorded_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS complaints_department_idx ON complaints(department);
CREATE INDEX IF NOT EXISTS complaints_status_idx     ON complaints(status);
CREATE INDEX IF NOT EXISTS complaints_created_idx    ON complaints(created_at);
CREATE INDEX IF NOT EXISTS status_changes_complaint_idx
    ON status_changes(complaint_id);

PRAGMA user_version = 1;
";
