//! [`SqliteStore`]: the SQLite implementation of the Storykeeper store traits.

use std::path::Path;

use rusqlite::{
  ErrorCode, OptionalExtension as _, ffi,
  functions::FunctionFlags,
};
use storykeeper_core::{
  event::{Event, NewEvent},
  figure::{Figure, NewFigure},
  identity::{Identity, NewIdentity},
  store::{CredentialStore, WorldStore},
  world::{NewWorld, World},
};

use crate::{
  Error, Result,
  encode::{
    EVENT_COLUMNS, FIGURE_COLUMNS, IDENTITY_COLUMNS, RawEvent, RawFigure, RawIdentity,
    RawWorld, WORLD_COLUMNS, encode_dt, like_pattern, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Storykeeper store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        // SQLite's LOWER() only folds ASCII; search folds both sides with this.
        conn.create_scalar_function(
          "fold_case",
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers (run on the connection thread) ──────────────────────────────

fn linked_ids(
  conn: &rusqlite::Connection,
  sql: &str,
  id: i64,
) -> rusqlite::Result<Vec<i64>> {
  let mut stmt = conn.prepare_cached(sql)?;
  stmt
    .query_map(rusqlite::params![id], |row| row.get(0))?
    .collect()
}

fn with_event_ids(
  conn: &rusqlite::Connection,
  mut raw: RawFigure,
) -> rusqlite::Result<RawFigure> {
  raw.event_ids = linked_ids(
    conn,
    "SELECT event_id FROM figure_events WHERE figure_id = ?1 ORDER BY event_id",
    raw.id,
  )?;
  Ok(raw)
}

fn with_figure_ids(
  conn: &rusqlite::Connection,
  mut raw: RawEvent,
) -> rusqlite::Result<RawEvent> {
  raw.figure_ids = linked_ids(
    conn,
    "SELECT figure_id FROM figure_events WHERE event_id = ?1 ORDER BY figure_id",
    raw.id,
  )?;
  Ok(raw)
}

fn is_constraint(e: &rusqlite::Error, extended: std::ffi::c_int) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == ErrorCode::ConstraintViolation && err.extended_code == extended
  )
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  is_constraint(e, ffi::SQLITE_CONSTRAINT_UNIQUE)
}

/// The referenced world, figure or event is gone, usually because a delete
/// won the race.
fn is_missing_parent(e: &rusqlite::Error) -> bool {
  is_constraint(e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn identity_exists(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM identities WHERE email = ?1",
              rusqlite::params![email],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    let email = email.to_owned();
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = ?1"),
              rusqlite::params![email],
              RawIdentity::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn insert_identity(&self, input: NewIdentity) -> Result<Option<Identity>> {
    let created_at = now();
    let at_str     = encode_dt(created_at);
    let email      = input.email.clone();
    let hash       = input.password_hash.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO identities (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![email, hash, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(id.map(|id| Identity {
      id,
      email: input.email,
      password_hash: input.password_hash,
      created_at,
    }))
  }
}

// ─── WorldStore impl ─────────────────────────────────────────────────────────

impl WorldStore for SqliteStore {
  type Error = Error;

  // ── Worlds ────────────────────────────────────────────────────────────────

  async fn insert_world(&self, owner_id: i64, input: NewWorld) -> Result<World> {
    let at = now();
    let mut world = World {
      id: 0,
      owner_id,
      name: input.name,
      description: input.description,
      start_year: input.start_year.unwrap_or(0),
      current_year: input.current_year,
      created_at: at,
      updated_at: at,
    };

    let name         = world.name.clone();
    let description  = world.description.clone();
    let start_year   = world.start_year;
    let current_year = world.current_year;
    let at_str       = encode_dt(at);

    world.id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO worlds
             (owner_id, name, description, start_year, current_year, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![owner_id, name, description, start_year, current_year, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(world)
  }

  async fn world_by_id_and_owner(&self, id: i64, owner_id: i64) -> Result<Option<World>> {
    let raw: Option<RawWorld> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {WORLD_COLUMNS} FROM worlds WHERE id = ?1 AND owner_id = ?2"),
              rusqlite::params![id, owner_id],
              RawWorld::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWorld::into_world).transpose()
  }

  async fn worlds_by_owner(&self, owner_id: i64) -> Result<Vec<World>> {
    let raws: Vec<RawWorld> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WORLD_COLUMNS} FROM worlds WHERE owner_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_id], RawWorld::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWorld::into_world).collect()
  }

  async fn save_world(&self, mut world: World) -> Result<Option<World>> {
    world.updated_at = now();

    let id           = world.id;
    let name         = world.name.clone();
    let description  = world.description.clone();
    let start_year   = world.start_year;
    let current_year = world.current_year;
    let at_str       = encode_dt(world.updated_at);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE worlds
             SET name = ?2, description = ?3, start_year = ?4, current_year = ?5,
                 updated_at = ?6
           WHERE id = ?1",
          rusqlite::params![id, name, description, start_year, current_year, at_str],
        )?)
      })
      .await?;

    Ok((updated > 0).then_some(world))
  }

  async fn delete_world(&self, id: i64) -> Result<()> {
    // Figures, events and their links go with it via ON DELETE CASCADE.
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM worlds WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Figures ───────────────────────────────────────────────────────────────

  async fn insert_figure(&self, world_id: i64, input: NewFigure) -> Result<Option<Figure>> {
    let at = now();
    let mut figure = Figure {
      id: 0,
      world_id,
      name: input.name,
      kind: input.kind,
      description: input.description,
      event_ids: Vec::new(),
      created_at: at,
      updated_at: at,
    };

    let name        = figure.name.clone();
    let kind        = figure.kind.as_str();
    let description = figure.description.clone();
    let at_str      = encode_dt(at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO figures (world_id, name, kind, description, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![world_id, name, kind, description, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_missing_parent(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(id.map(|id| {
      figure.id = id;
      figure
    }))
  }

  async fn figure_by_id(&self, id: i64) -> Result<Option<Figure>> {
    let raw: Option<RawFigure> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {FIGURE_COLUMNS} FROM figures WHERE id = ?1"),
            rusqlite::params![id],
            RawFigure::from_row,
          )
          .optional()?;
        Ok(raw.map(|r| with_event_ids(conn, r)).transpose()?)
      })
      .await?;

    raw.map(RawFigure::into_figure).transpose()
  }

  async fn figures_in_world(
    &self,
    world_id: i64,
    search:   Option<String>,
    limit:    u32,
    offset:   u64,
  ) -> Result<(Vec<Figure>, u64)> {
    let pattern = search.as_deref().map(like_pattern);
    let offset  = i64::try_from(offset).unwrap_or(i64::MAX);

    let (raws, total): (Vec<RawFigure>, i64) = self
      .conn
      .call(move |conn| {
        let conn: &rusqlite::Connection = conn;
        // ?2 is NULL when there is no search term.
        let filter = "world_id = ?1 AND (?2 IS NULL
           OR fold_case(name) LIKE ?2 ESCAPE '\\'
           OR fold_case(COALESCE(description, '')) LIKE ?2 ESCAPE '\\')";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM figures WHERE {filter}"),
          rusqlite::params![world_id, pattern.as_deref()],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {FIGURE_COLUMNS} FROM figures WHERE {filter}
           ORDER BY id LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![world_id, pattern.as_deref(), limit, offset],
            RawFigure::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let rows = rows
          .into_iter()
          .map(|r| with_event_ids(conn, r))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((rows, total))
      })
      .await?;

    let figures = raws
      .into_iter()
      .map(RawFigure::into_figure)
      .collect::<Result<Vec<_>>>()?;
    Ok((figures, u64::try_from(total).unwrap_or(0)))
  }

  async fn save_figure(&self, figure: Figure) -> Result<Option<Figure>> {
    let id          = figure.id;
    let name        = figure.name;
    let kind        = figure.kind.as_str();
    let description = figure.description;
    let at_str      = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE figures SET name = ?2, kind = ?3, description = ?4, updated_at = ?5
           WHERE id = ?1",
          rusqlite::params![id, name, kind, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    self.figure_by_id(id).await
  }

  async fn delete_figure(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM figures WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn insert_event(&self, world_id: i64, input: NewEvent) -> Result<Option<Event>> {
    let at = now();
    let mut event = Event {
      id: 0,
      world_id,
      title: input.title,
      year: input.year,
      description: input.description,
      figure_ids: Vec::new(),
      created_at: at,
      updated_at: at,
    };

    let title       = event.title.clone();
    let year        = event.year;
    let description = event.description.clone();
    let at_str      = encode_dt(at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO events (world_id, title, year, description, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![world_id, title, year, description, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_missing_parent(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(id.map(|id| {
      event.id = id;
      event
    }))
  }

  async fn event_by_id(&self, id: i64) -> Result<Option<Event>> {
    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
            rusqlite::params![id],
            RawEvent::from_row,
          )
          .optional()?;
        Ok(raw.map(|r| with_figure_ids(conn, r)).transpose()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn events_in_world(&self, world_id: i64) -> Result<Vec<Event>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let conn: &rusqlite::Connection = conn;
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events WHERE world_id = ?1 ORDER BY year, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![world_id], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let rows = rows
          .into_iter()
          .map(|r| with_figure_ids(conn, r))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn save_event(&self, event: Event) -> Result<Option<Event>> {
    let id          = event.id;
    let title       = event.title;
    let year        = event.year;
    let description = event.description;
    let at_str      = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE events SET title = ?2, year = ?3, description = ?4, updated_at = ?5
           WHERE id = ?1",
          rusqlite::params![id, title, year, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    self.event_by_id(id).await
  }

  async fn delete_event(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM events WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Links ─────────────────────────────────────────────────────────────────

  async fn link(&self, figure_id: i64, event_id: i64) -> Result<bool> {
    let linked = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT OR IGNORE INTO figure_events (figure_id, event_id) VALUES (?1, ?2)",
          rusqlite::params![figure_id, event_id],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_missing_parent(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(linked)
  }

  async fn unlink(&self, figure_id: i64, event_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM figure_events WHERE figure_id = ?1 AND event_id = ?2",
          rusqlite::params![figure_id, event_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
