//! SQL schema for the Hearth SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    role          TEXT NOT NULL,   -- 'client' | 'provider'
    created_at    TEXT NOT NULL
);

-- One row per job. Mutations are in-place, but every state-changing UPDATE
-- is conditional on the expected pre-state (status, owner) so that racing
-- read-modify-write requests cannot both apply.
CREATE TABLE IF NOT EXISTS jobs (
    job_id       TEXT PRIMARY KEY,
    client_id    TEXT NOT NULL REFERENCES users(user_id),
    provider_id  TEXT REFERENCES users(user_id),  -- NULL until accepted
    category     TEXT NOT NULL,   -- 'home_repair' | 'cleaning' | 'other'
    service_type TEXT NOT NULL,   -- member of the category's fixed set
    description  TEXT,
    status       TEXT NOT NULL DEFAULT 'pending',
    created_at   TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned, immutable
    updated_at   TEXT NOT NULL    -- refreshed on every mutation
);

CREATE INDEX IF NOT EXISTS jobs_client_idx   ON jobs(client_id);
CREATE INDEX IF NOT EXISTS jobs_provider_idx ON jobs(provider_id);
CREATE INDEX IF NOT EXISTS jobs_status_idx   ON jobs(status);
CREATE INDEX IF NOT EXISTS jobs_created_idx  ON jobs(created_at);

PRAGMA user_version = 1;
";
