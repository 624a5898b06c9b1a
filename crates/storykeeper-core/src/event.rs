//! Event: something that happened in a world, at a year inside its timeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  Error, Result,
  text::{check_description, check_name},
};

/// A persisted event, together with the ids of the figures linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub id:          i64,
  pub world_id:    i64,
  pub title:       String,
  pub year:        i32,
  pub description: Option<String>,
  pub figure_ids:  Vec<i64>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

fn check_year_sign(year: i32) -> Result<()> {
  if year < 0 {
    return Err(Error::InvalidInput(
      "year must be greater than or equal to 0".into(),
    ));
  }
  Ok(())
}

/// Input for creating an event. The year is checked against the owning
/// world's bounds by [`EventService`](crate::services::EventService).
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub title:       String,
  pub year:        i32,
  pub description: Option<String>,
}

impl NewEvent {
  pub fn validate(&self) -> Result<()> {
    check_name("title", &self.title)?;
    check_year_sign(self.year)?;
    check_description(self.description.as_deref())
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
  pub title:       Option<String>,
  pub year:        Option<i32>,
  pub description: Option<String>,
}

impl EventPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(title) = &self.title {
      check_name("title", title)?;
    }
    if let Some(year) = self.year {
      check_year_sign(year)?;
    }
    check_description(self.description.as_deref())
  }

  pub fn apply(self, event: &mut Event) {
    if let Some(title) = self.title {
      event.title = title;
    }
    if let Some(year) = self.year {
      event.year = year;
    }
    if let Some(description) = self.description {
      event.description = Some(description);
    }
  }
}
