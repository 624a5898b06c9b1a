//! World: the top-level container owned by a single identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  text::{check_description, check_name},
};

/// A persisted world.
///
/// Invariant: `0 <= start_year <= current_year` and `current_year > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
  pub id:           i64,
  #[serde(skip)]
  pub owner_id:     i64,
  pub name:         String,
  pub description:  Option<String>,
  pub start_year:   i32,
  pub current_year: i32,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl World {
  /// Whether `year` falls inside this world's timeline, bounds inclusive.
  pub fn contains_year(&self, year: i32) -> bool {
    self.start_year <= year && year <= self.current_year
  }

  /// Reject `year` unless it lies within `[start_year, current_year]`.
  pub fn check_year(&self, year: i32) -> Result<()> {
    if self.contains_year(year) {
      Ok(())
    } else {
      Err(Error::InvalidYear {
        year,
        start_year: self.start_year,
        current_year: self.current_year,
      })
    }
  }
}

/// Check the world timeline invariant.
pub fn check_bounds(start_year: i32, current_year: i32) -> Result<()> {
  if start_year < 0 {
    return Err(Error::InvalidWorldBounds(
      "start year must be greater than or equal to 0".into(),
    ));
  }
  if current_year <= 0 {
    return Err(Error::InvalidWorldBounds(
      "current year must be greater than 0".into(),
    ));
  }
  if start_year > current_year {
    return Err(Error::InvalidWorldBounds(format!(
      "start year {start_year} is after current year {current_year}"
    )));
  }
  Ok(())
}

/// Input for creating a world. `start_year` defaults to 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorld {
  pub name:         String,
  pub description:  Option<String>,
  pub start_year:   Option<i32>,
  pub current_year: i32,
}

impl NewWorld {
  pub fn validate(&self) -> Result<()> {
    check_name("name", &self.name)?;
    check_description(self.description.as_deref())?;
    check_bounds(self.start_year.unwrap_or(0), self.current_year)
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldPatch {
  pub name:         Option<String>,
  pub description:  Option<String>,
  pub start_year:   Option<i32>,
  pub current_year: Option<i32>,
}

impl WorldPatch {
  /// Apply the present fields to `world` and validate the merged result.
  ///
  /// Existing events are not re-checked against narrowed bounds.
  pub fn apply(self, world: &mut World) -> Result<()> {
    if let Some(name) = &self.name {
      check_name("name", name)?;
    }
    check_description(self.description.as_deref())?;
    check_bounds(
      self.start_year.unwrap_or(world.start_year),
      self.current_year.unwrap_or(world.current_year),
    )?;

    if let Some(name) = self.name {
      world.name = name;
    }
    if let Some(description) = self.description {
      world.description = Some(description);
    }
    if let Some(start_year) = self.start_year {
      world.start_year = start_year;
    }
    if let Some(current_year) = self.current_year {
      world.current_year = current_year;
    }
    Ok(())
  }
}
