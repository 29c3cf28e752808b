//! SQL schema for the rolo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id                TEXT PRIMARY KEY,
    email                  TEXT NOT NULL,
    subscription_status    TEXT,            -- NULL until billing events arrive
    stripe_customer_id     TEXT,
    stripe_subscription_id TEXT,
    created_at             TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Contact records are replaced wholesale on update; the sequence-valued
-- fields are stored as JSON arrays and are never NULL.
CREATE TABLE IF NOT EXISTS contacts (
    contact_id      TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    name            TEXT NOT NULL,
    date_of_birth   TEXT NOT NULL,   -- ISO calendar date, no timezone
    when_we_met     TEXT NOT NULL,
    school          TEXT,
    profession_text TEXT,
    professions     TEXT NOT NULL DEFAULT '[]',
    channels        TEXT NOT NULL DEFAULT '[]',
    social_media    TEXT NOT NULL DEFAULT '[]',
    comments        TEXT NOT NULL DEFAULT '[]',
    created_at      TEXT NOT NULL    -- ISO 8601 UTC; drives newest-first listing
);

CREATE INDEX IF NOT EXISTS contacts_user_idx         ON contacts(user_id);
CREATE INDEX IF NOT EXISTS users_subscription_idx    ON users(stripe_subscription_id);

PRAGMA user_version = 1;
";
