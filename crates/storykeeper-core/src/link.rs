//! The link integrity guard.

use crate::{Error, Result, event::Event, figure::Figure};

/// Reject a link between a figure and an event from different worlds.
///
/// Only call this with entities that have already been resolved for the
/// caller, so that link validity cannot be probed on foreign resources.
pub fn assert_same_world(figure: &Figure, event: &Event) -> Result<()> {
  if figure.world_id != event.world_id {
    return Err(Error::CrossWorld {
      figure_world: figure.world_id,
      event_world:  event.world_id,
    });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::figure::FigureType;

  fn figure(world_id: i64) -> Figure {
    Figure {
      id: 1,
      world_id,
      name: "Aria".into(),
      kind: FigureType::Character,
      description: None,
      event_ids: vec![],
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  fn event(world_id: i64) -> Event {
    Event {
      id: 2,
      world_id,
      title: "The Flood".into(),
      year: 10,
      description: None,
      figure_ids: vec![],
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn same_world_passes() {
    assert!(assert_same_world(&figure(3), &event(3)).is_ok());
  }

  #[test]
  fn different_worlds_name_both_ids() {
    let err = assert_same_world(&figure(3), &event(4)).unwrap_err();
    assert!(matches!(err, Error::CrossWorld { figure_world: 3, event_world: 4 }));
    let msg = err.to_string();
    assert!(msg.contains("world 3") && msg.contains("world 4"), "{msg}");
  }
}
