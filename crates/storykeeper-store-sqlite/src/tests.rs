//! Integration tests for `SqliteStore` and the scoped services against an
//! in-memory database.

use storykeeper_core::{
  Error as CoreError,
  event::{EventPatch, NewEvent},
  figure::{FigurePatch, FigureQuery, FigureType, NewFigure},
  identity::{Identity, NewIdentity},
  ownership::{OwnershipResolver, Resource, ResourceKind},
  services::{EventService, FigureService, WorldService},
  store::{CredentialStore, WorldStore},
  world::{NewWorld, World, WorldPatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn identity(s: &SqliteStore, email: &str) -> Identity {
  s.insert_identity(NewIdentity {
    email:         email.into(),
    password_hash: "$argon2id$placeholder".into(),
  })
  .await
  .unwrap()
  .expect("fresh email")
}

fn new_world(name: &str, start_year: i32, current_year: i32) -> NewWorld {
  NewWorld {
    name: name.into(),
    description: None,
    start_year: Some(start_year),
    current_year,
  }
}

fn new_figure(name: &str) -> NewFigure {
  NewFigure { name: name.into(), kind: FigureType::Character, description: None }
}

fn new_event(title: &str, year: i32) -> NewEvent {
  NewEvent { title: title.into(), year, description: None }
}

async fn world(s: &SqliteStore, owner: &Identity, name: &str) -> World {
  WorldService::new(s)
    .create(owner, new_world(name, 0, 100))
    .await
    .unwrap()
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_identity() {
  let s = store().await;
  let created = identity(&s, "a@example.com").await;

  assert!(s.identity_exists("a@example.com").await.unwrap());
  let found = s.find_identity_by_email("a@example.com").await.unwrap().unwrap();
  assert_eq!(found, created);
}

#[tokio::test]
async fn duplicate_email_returns_none() {
  let s = store().await;
  identity(&s, "a@example.com").await;

  let again = s
    .insert_identity(NewIdentity {
      email:         "a@example.com".into(),
      password_hash: "other".into(),
    })
    .await
    .unwrap();
  assert!(again.is_none());
}

#[tokio::test]
async fn email_lookup_is_case_sensitive() {
  let s = store().await;
  identity(&s, "a@example.com").await;

  assert!(!s.identity_exists("A@example.com").await.unwrap());
  assert!(s.find_identity_by_email("A@EXAMPLE.COM").await.unwrap().is_none());
  assert!(
    s.insert_identity(NewIdentity {
      email:         "A@example.com".into(),
      password_hash: "h".into(),
    })
    .await
    .unwrap()
    .is_some()
  );
}

// ─── Worlds ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn world_round_trips_through_store() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;

  let created = world(&s, &u, "Eldoria").await;
  let fetched = s.world_by_id_and_owner(created.id, u.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.owner_id, u.id);
}

#[tokio::test]
async fn worlds_of_other_identities_are_not_found() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  let w = world(&s, &u, "Eldoria").await;

  let svc = WorldService::new(&s);
  assert!(matches!(svc.get(&v, w.id).await, Err(CoreError::NotFound)));
  assert!(matches!(svc.get(&v, 9999).await, Err(CoreError::NotFound)));
  assert!(matches!(
    svc.update(&v, w.id, WorldPatch { name: Some("Mine".into()), ..Default::default() })
      .await,
    Err(CoreError::NotFound)
  ));
  assert!(matches!(svc.delete(&v, w.id).await, Err(CoreError::NotFound)));

  // Untouched.
  assert_eq!(svc.get(&u, w.id).await.unwrap().name, "Eldoria");
}

#[tokio::test]
async fn world_list_is_scoped_to_caller() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  world(&s, &u, "One").await;
  world(&s, &u, "Two").await;
  world(&s, &v, "Theirs").await;

  let mine = WorldService::new(&s).list(&u).await.unwrap();
  let names: Vec<_> = mine.iter().map(|w| w.name.as_str()).collect();
  assert_eq!(names, ["One", "Two"]);
}

#[tokio::test]
async fn world_create_rejects_bad_bounds() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;

  let err = WorldService::new(&s)
    .create(&u, new_world("Backwards", 50, 10))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidWorldBounds(_)));
  assert!(s.worlds_by_owner(u.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn world_update_bumps_updated_at() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;

  let updated = WorldService::new(&s)
    .update(&u, w.id, WorldPatch { current_year: Some(300), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(updated.current_year, 300);
  assert_eq!(updated.created_at, w.created_at);
  assert!(updated.updated_at >= w.updated_at);

  let reread = s.world_by_id_and_owner(w.id, u.id).await.unwrap().unwrap();
  assert_eq!(reread.current_year, 300);
}

#[tokio::test]
async fn world_delete_cascades() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w.id, new_event("Battle", 10)).await.unwrap();
  FigureService::new(&s).link_event(&u, f.id, e.id).await.unwrap();

  WorldService::new(&s).delete(&u, w.id).await.unwrap();

  assert!(s.world_by_id_and_owner(w.id, u.id).await.unwrap().is_none());
  assert!(s.figure_by_id(f.id).await.unwrap().is_none());
  assert!(s.event_by_id(e.id).await.unwrap().is_none());
}

// ─── Figures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn figure_create_in_foreign_world_is_not_found() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  let w = world(&s, &u, "Eldoria").await;

  let err = FigureService::new(&s)
    .create(&v, w.id, new_figure("Intruder"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound));
  let (figures, total) = s.figures_in_world(w.id, None, 20, 0).await.unwrap();
  assert!(figures.is_empty());
  assert_eq!(total, 0);
}

#[tokio::test]
async fn figures_of_other_identities_are_not_found() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();

  let svc = FigureService::new(&s);
  assert!(matches!(svc.get(&v, f.id).await, Err(CoreError::NotFound)));
  assert!(matches!(svc.delete(&v, f.id).await, Err(CoreError::NotFound)));
  assert!(matches!(
    svc.list(&v, w.id, FigureQuery::default()).await,
    Err(CoreError::NotFound)
  ));
  assert!(s.figure_by_id(f.id).await.unwrap().is_some());
}

#[tokio::test]
async fn figure_patch_keeps_omitted_fields() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let svc = FigureService::new(&s);
  let f = svc
    .create(&u, w.id, NewFigure {
      name:        "Aria".into(),
      kind:        FigureType::Character,
      description: Some("a bard".into()),
    })
    .await
    .unwrap();

  let updated = svc
    .update(&u, f.id, FigurePatch { name: Some("Aria the Bold".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(updated.name, "Aria the Bold");
  assert_eq!(updated.kind, FigureType::Character);
  assert_eq!(updated.description.as_deref(), Some("a bard"));
  assert_eq!(updated.world_id, w.id);
}

#[tokio::test]
async fn figure_listing_pages_in_creation_order() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let svc = FigureService::new(&s);
  for i in 1..=55 {
    svc.create(&u, w.id, new_figure(&format!("Figure {i}"))).await.unwrap();
  }

  let page = svc
    .list(&u, w.id, FigureQuery { search: None, page: Some(2), limit: Some(20) })
    .await
    .unwrap();
  assert_eq!(page.total, 55);
  assert_eq!(page.total_pages, 3);
  assert_eq!(page.page, 2);
  assert_eq!(page.items.len(), 20);
  assert_eq!(page.items[0].name, "Figure 21");
  assert_eq!(page.items[19].name, "Figure 40");

  let last = svc
    .list(&u, w.id, FigureQuery { search: None, page: Some(3), limit: Some(20) })
    .await
    .unwrap();
  assert_eq!(last.items.len(), 15);
}

#[tokio::test]
async fn figure_search_matches_name_or_description() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let svc = FigureService::new(&s);
  svc.create(&u, w.id, new_figure("Aria")).await.unwrap();
  svc.create(&u, w.id, NewFigure {
    name:        "Castle".into(),
    kind:        FigureType::Place,
    description: Some("Where ARIA was born".into()),
  })
  .await
  .unwrap();
  svc.create(&u, w.id, new_figure("Borin")).await.unwrap();
  svc.create(&u, w.id, new_figure("100% pure")).await.unwrap();

  let query = |search: &str| FigureQuery {
    search: Some(search.into()),
    ..Default::default()
  };

  let hits = svc.list(&u, w.id, query("aria")).await.unwrap();
  let names: Vec<_> = hits.items.iter().map(|f| f.name.as_str()).collect();
  assert_eq!(names, ["Aria", "Castle"]);
  assert_eq!(hits.total, 2);

  // LIKE wildcards in the needle are literal.
  assert_eq!(svc.list(&u, w.id, query("%")).await.unwrap().total, 1);
  // Blank search lists everything.
  assert_eq!(svc.list(&u, w.id, query("  ")).await.unwrap().total, 4);
}

#[tokio::test]
async fn figure_search_folds_non_ascii_case() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Rohan").await;
  let svc = FigureService::new(&s);
  svc.create(&u, w.id, new_figure("Éowyn")).await.unwrap();
  svc.create(&u, w.id, NewFigure {
    name:        "Edoras".into(),
    kind:        FigureType::Place,
    description: Some("Hall of ÉOMER".into()),
  })
  .await
  .unwrap();

  for search in ["Éowyn", "éowyn", "ÉOWYN", "owyn", "éomer"] {
    let query = FigureQuery { search: Some(search.into()), ..Default::default() };
    let hits = svc.list(&u, w.id, query).await.unwrap();
    assert_eq!(hits.total, 1, "search {search:?}");
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_year_must_fit_world_timeline() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  let w1 = world(&s, &u, "w1").await;
  let svc = EventService::new(&s);

  let ok = svc.create(&u, w1.id, new_event("Founding", 50)).await.unwrap();
  assert_eq!(ok.world_id, w1.id);

  let err = svc.create(&u, w1.id, new_event("Too late", 150)).await.unwrap_err();
  assert!(matches!(
    err,
    CoreError::InvalidYear { year: 150, start_year: 0, current_year: 100 }
  ));

  // Ownership is decided before the year.
  let err = svc.create(&v, w1.id, new_event("Not yours", 50)).await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound));
  let err = svc.create(&v, w1.id, new_event("Not yours", 150)).await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound));

  assert_eq!(s.events_in_world(w1.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn event_update_checks_new_year() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let svc = EventService::new(&s);
  let e = svc.create(&u, w.id, new_event("Battle", 10)).await.unwrap();

  let err = svc
    .update(&u, e.id, EventPatch { year: Some(101), ..Default::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidYear { .. }));

  let moved = svc
    .update(&u, e.id, EventPatch { year: Some(100), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(moved.year, 100);
  assert_eq!(moved.title, "Battle");
}

#[tokio::test]
async fn events_are_listed_by_year() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let svc = EventService::new(&s);
  svc.create(&u, w.id, new_event("Late", 90)).await.unwrap();
  svc.create(&u, w.id, new_event("Early", 5)).await.unwrap();
  svc.create(&u, w.id, new_event("Middle", 40)).await.unwrap();

  let titles: Vec<_> = svc
    .list(&u, w.id)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.title)
    .collect();
  assert_eq!(titles, ["Early", "Middle", "Late"]);
}

// ─── Links ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn link_is_visible_from_both_sides_and_idempotent() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w.id, new_event("Battle", 10)).await.unwrap();

  let figures = FigureService::new(&s);
  let linked = figures.link_event(&u, f.id, e.id).await.unwrap();
  assert_eq!(linked.event_ids, [e.id]);
  let again = figures.link_event(&u, f.id, e.id).await.unwrap();
  assert_eq!(again.event_ids, [e.id]);

  let event = EventService::new(&s).get(&u, e.id).await.unwrap();
  assert_eq!(event.figure_ids, [f.id]);

  let unlinked = EventService::new(&s).unlink_figure(&u, e.id, f.id).await.unwrap();
  assert!(unlinked.figure_ids.is_empty());
  assert!(figures.get(&u, f.id).await.unwrap().event_ids.is_empty());
}

#[tokio::test]
async fn cross_world_link_is_rejected_and_persists_nothing() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w1 = world(&s, &u, "w1").await;
  let w2 = world(&s, &u, "w2").await;
  let f = FigureService::new(&s).create(&u, w1.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w2.id, new_event("Elsewhere", 10)).await.unwrap();

  let err = FigureService::new(&s).link_event(&u, f.id, e.id).await.unwrap_err();
  assert!(matches!(
    err,
    CoreError::CrossWorld { figure_world, event_world }
      if figure_world == w1.id && event_world == w2.id
  ));
  let err = EventService::new(&s).link_figure(&u, e.id, f.id).await.unwrap_err();
  assert!(matches!(err, CoreError::CrossWorld { .. }));

  assert!(s.figure_by_id(f.id).await.unwrap().unwrap().event_ids.is_empty());
  assert!(s.event_by_id(e.id).await.unwrap().unwrap().figure_ids.is_empty());

  // Unlinking the never-linked pair is a successful no-op.
  let unlinked = FigureService::new(&s).unlink_event(&u, f.id, e.id).await.unwrap();
  assert!(unlinked.event_ids.is_empty());
}

#[tokio::test]
async fn link_to_foreign_event_is_not_found() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  let wu = world(&s, &u, "mine").await;
  let wv = world(&s, &v, "theirs").await;
  let f = FigureService::new(&s).create(&u, wu.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&v, wv.id, new_event("Secret", 10)).await.unwrap();

  let err = FigureService::new(&s).link_event(&u, f.id, e.id).await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound));
  assert!(s.event_by_id(e.id).await.unwrap().unwrap().figure_ids.is_empty());
}

#[tokio::test]
async fn deleting_a_figure_keeps_linked_events() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w.id, new_event("Battle", 10)).await.unwrap();
  FigureService::new(&s).link_event(&u, f.id, e.id).await.unwrap();

  FigureService::new(&s).delete(&u, f.id).await.unwrap();

  let event = s.event_by_id(e.id).await.unwrap().unwrap();
  assert!(event.figure_ids.is_empty());
}

// ─── Resolver ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolver_scopes_every_kind() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let v = identity(&s, "v@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w.id, new_event("Battle", 10)).await.unwrap();

  let resolver = OwnershipResolver::new(&s);
  match resolver.resolve(&u, ResourceKind::Figure, f.id).await.unwrap() {
    Resource::Figure(owned) => {
      assert_eq!(owned.entity.id, f.id);
      assert_eq!(owned.world.id, w.id);
    }
    other => panic!("unexpected resource: {other:?}"),
  }
  assert!(matches!(
    resolver.resolve(&u, ResourceKind::Event, e.id).await.unwrap(),
    Resource::Event(_)
  ));

  for (kind, id) in [
    (ResourceKind::World, w.id),
    (ResourceKind::Figure, f.id),
    (ResourceKind::Event, e.id),
  ] {
    assert!(matches!(resolver.resolve(&v, kind, id).await, Err(CoreError::NotFound)));
  }
}

// ─── Writes racing a world delete ────────────────────────────────────────────

#[tokio::test]
async fn writes_after_world_delete_report_missing() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w.id, new_event("Battle", 10)).await.unwrap();

  s.delete_world(w.id).await.unwrap();

  assert!(s.save_world(w.clone()).await.unwrap().is_none());
  assert!(s.insert_figure(w.id, new_figure("Late")).await.unwrap().is_none());
  assert!(s.insert_event(w.id, new_event("Late", 20)).await.unwrap().is_none());
  assert!(s.save_figure(f.clone()).await.unwrap().is_none());
  assert!(s.save_event(e.clone()).await.unwrap().is_none());
  assert!(!s.link(f.id, e.id).await.unwrap());

  // Nothing was left behind by the failed writes.
  let (figures, total) = s.figures_in_world(w.id, None, 100, 0).await.unwrap();
  assert!(figures.is_empty());
  assert_eq!(total, 0);
  assert!(s.events_in_world(w.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn link_to_deleted_event_reports_missing() {
  let s = store().await;
  let u = identity(&s, "u@example.com").await;
  let w = world(&s, &u, "Eldoria").await;
  let f = FigureService::new(&s).create(&u, w.id, new_figure("Aria")).await.unwrap();
  let e = EventService::new(&s).create(&u, w.id, new_event("Battle", 10)).await.unwrap();

  s.delete_event(e.id).await.unwrap();

  assert!(!s.link(f.id, e.id).await.unwrap());
  let figure = s.figure_by_id(f.id).await.unwrap().unwrap();
  assert!(figure.event_ids.is_empty());
}
