//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix). Figure types are stored as lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use storykeeper_core::{
  event::Event,
  figure::{Figure, FigureType},
  identity::Identity,
  world::World,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// `now`, truncated to what survives a round-trip through [`encode_dt`].
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Build a `LIKE` pattern matching `needle` anywhere, case-insensitively.
/// Pair with `ESCAPE '\'` and a column passed through `fold_case`.
pub fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.to_lowercase().chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const IDENTITY_COLUMNS: &str = "id, email, password_hash, created_at";

/// Raw values read directly from an `identities` row.
pub struct RawIdentity {
  pub id:            i64,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawIdentity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      id:            self.id,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const WORLD_COLUMNS: &str =
  "id, owner_id, name, description, start_year, current_year, created_at, updated_at";

pub struct RawWorld {
  pub id:           i64,
  pub owner_id:     i64,
  pub name:         String,
  pub description:  Option<String>,
  pub start_year:   i32,
  pub current_year: i32,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawWorld {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      owner_id:     row.get(1)?,
      name:         row.get(2)?,
      description:  row.get(3)?,
      start_year:   row.get(4)?,
      current_year: row.get(5)?,
      created_at:   row.get(6)?,
      updated_at:   row.get(7)?,
    })
  }

  pub fn into_world(self) -> Result<World> {
    Ok(World {
      id:           self.id,
      owner_id:     self.owner_id,
      name:         self.name,
      description:  self.description,
      start_year:   self.start_year,
      current_year: self.current_year,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub const FIGURE_COLUMNS: &str =
  "id, world_id, name, kind, description, created_at, updated_at";

/// A `figures` row plus the ids of its linked events.
pub struct RawFigure {
  pub id:          i64,
  pub world_id:    i64,
  pub name:        String,
  pub kind:        String,
  pub description: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
  pub event_ids:   Vec<i64>,
}

impl RawFigure {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      world_id:    row.get(1)?,
      name:        row.get(2)?,
      kind:        row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
      event_ids:   Vec::new(),
    })
  }

  pub fn into_figure(self) -> Result<Figure> {
    Ok(Figure {
      id:          self.id,
      world_id:    self.world_id,
      name:        self.name,
      kind:        self.kind.parse::<FigureType>()?,
      description: self.description,
      event_ids:   self.event_ids,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const EVENT_COLUMNS: &str =
  "id, world_id, title, year, description, created_at, updated_at";

/// An `events` row plus the ids of its linked figures.
pub struct RawEvent {
  pub id:          i64,
  pub world_id:    i64,
  pub title:       String,
  pub year:        i32,
  pub description: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
  pub figure_ids:  Vec<i64>,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      world_id:    row.get(1)?,
      title:       row.get(2)?,
      year:        row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
      figure_ids:  Vec::new(),
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          self.id,
      world_id:    self.world_id,
      title:       self.title,
      year:        self.year,
      description: self.description,
      figure_ids:  self.figure_ids,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
