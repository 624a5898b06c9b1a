//! SQL schema for the Storykeeper SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Emails use the default BINARY collation: unique and case-sensitive.
CREATE TABLE IF NOT EXISTS identities (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS worlds (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id     INTEGER NOT NULL REFERENCES identities(id),
    name         TEXT NOT NULL,
    description  TEXT,
    start_year   INTEGER NOT NULL,
    current_year INTEGER NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS figures (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    world_id    INTEGER NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    kind        TEXT NOT NULL,   -- 'character' | 'place' | 'item'
    description TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    world_id    INTEGER NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    year        INTEGER NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Many-to-many; no identity of its own.
CREATE TABLE IF NOT EXISTS figure_events (
    figure_id INTEGER NOT NULL REFERENCES figures(id) ON DELETE CASCADE,
    event_id  INTEGER NOT NULL REFERENCES events(id)  ON DELETE CASCADE,
    PRIMARY KEY (figure_id, event_id)
);

CREATE INDEX IF NOT EXISTS worlds_owner_idx        ON worlds(owner_id);
CREATE INDEX IF NOT EXISTS figures_world_idx       ON figures(world_id);
CREATE INDEX IF NOT EXISTS events_world_idx        ON events(world_id);
CREATE INDEX IF NOT EXISTS figure_events_event_idx ON figure_events(event_id);

PRAGMA user_version = 1;
";
