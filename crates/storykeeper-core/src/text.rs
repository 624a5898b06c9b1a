//! Field limits shared by the World, Figure and Event inputs.

use crate::{Error, Result};

pub(crate) const MAX_NAME_LEN: usize = 255;
pub(crate) const MAX_DESCRIPTION_LEN: usize = 1000;

/// A required short text field: non-blank and at most 255 characters.
pub(crate) fn check_name(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::InvalidInput(format!("{field} is required")));
  }
  if value.chars().count() > MAX_NAME_LEN {
    return Err(Error::InvalidInput(format!(
      "{field} must be at most {MAX_NAME_LEN} characters"
    )));
  }
  Ok(())
}

pub(crate) fn check_description(value: Option<&str>) -> Result<()> {
  match value {
    Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(Error::InvalidInput(
      format!("description must be at most {MAX_DESCRIPTION_LEN} characters"),
    )),
    _ => Ok(()),
  }
}
