//! Figure: a character, place or item living inside one world.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  text::{check_description, check_name},
};

/// What kind of thing a figure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureType {
  Character,
  Place,
  Item,
}

impl FigureType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Character => "character",
      Self::Place => "place",
      Self::Item => "item",
    }
  }
}

impl fmt::Display for FigureType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Case-insensitive: `"PLACE"`, `"Place"` and `"place"` all parse.
impl FromStr for FigureType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "character" => Ok(Self::Character),
      "place" => Ok(Self::Place),
      "item" => Ok(Self::Item),
      other => Err(Error::InvalidInput(format!("unknown figure type: {other:?}"))),
    }
  }
}

/// A persisted figure, together with the ids of the events it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
  pub id:          i64,
  pub world_id:    i64,
  pub name:        String,
  #[serde(rename = "type")]
  pub kind:        FigureType,
  pub description: Option<String>,
  pub event_ids:   Vec<i64>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input for creating a figure. The target world is supplied separately so
/// that it always goes through the ownership resolver.
#[derive(Debug, Clone)]
pub struct NewFigure {
  pub name:        String,
  pub kind:        FigureType,
  pub description: Option<String>,
}

impl NewFigure {
  pub fn validate(&self) -> Result<()> {
    check_name("name", &self.name)?;
    check_description(self.description.as_deref())
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct FigurePatch {
  pub name:        Option<String>,
  pub kind:        Option<FigureType>,
  pub description: Option<String>,
}

impl FigurePatch {
  pub fn apply(self, figure: &mut Figure) -> Result<()> {
    if let Some(name) = &self.name {
      check_name("name", name)?;
    }
    check_description(self.description.as_deref())?;

    if let Some(name) = self.name {
      figure.name = name;
    }
    if let Some(kind) = self.kind {
      figure.kind = kind;
    }
    if let Some(description) = self.description {
      figure.description = Some(description);
    }
    Ok(())
  }
}

/// Filter and page parameters for figure listing.
#[derive(Debug, Clone, Default)]
pub struct FigureQuery {
  /// Case-insensitive substring matched against name or description.
  pub search: Option<String>,
  pub page:   Option<i64>,
  pub limit:  Option<i64>,
}
