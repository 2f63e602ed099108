use rusqlite::{params, Connection};
use scoresketch_core::db::{self, open_db_in_memory};
use scoresketch_core::{
    CaptureSession, PitchContour, Point, RepoError, SnapshotRepository, SqliteSnapshotRepository,
    Stroke, EVENTS_KEY,
};

fn seeded_session() -> CaptureSession {
    let mut session = CaptureSession::new();
    let first = session.mark_event(100.0);
    session.mark_event_for_frequency(250.0, 80.0);
    session.start_tap_capture(None);
    session.tap(0.0);
    session.tap(100.0);
    session.tap(150.0);
    session.attach_rhythm(&first);
    session.attach_contour(&first, &[Point::new(0.0, 50.0), Point::new(10.0, 0.0)]);
    session
        .symbols_mut()
        .create_symbol(vec![Stroke::new(vec![Point::new(0.0, 0.0)])], None);
    session
}

#[test]
fn events_and_symbols_roundtrip_deep_equal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    let session = seeded_session();
    session.save_snapshot(&repo).unwrap();

    let mut restored = CaptureSession::new();
    restored.load_snapshot(&repo).unwrap();

    assert_eq!(
        restored.events().get_all_events(),
        session.events().get_all_events()
    );
    assert_eq!(
        restored.symbols().get_all_symbols(),
        session.symbols().get_all_symbols()
    );
    let first = &restored.events().get_all_events()[0];
    assert_eq!(first.rhythm_profile, Some(vec![1.0, 0.5]));
    assert_eq!(first.pitch_profile, Some(PitchContour::Up));
}

#[test]
fn empty_collections_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    repo.save_events(&[]).unwrap();
    repo.save_symbols(&[]).unwrap();
    assert!(repo.load_events().unwrap().is_empty());
    assert!(repo.load_symbols().unwrap().is_empty());
}

#[test]
fn missing_keys_load_as_empty_collections() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    assert!(repo.load_events().unwrap().is_empty());
    assert!(repo.load_symbols().unwrap().is_empty());
}

#[test]
fn load_replaces_state_wholesale_instead_of_merging() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    let saved = seeded_session();
    saved.save_snapshot(&repo).unwrap();

    let mut target = CaptureSession::new();
    target.mark_event(999.0); // would survive a merge, must not survive a load
    target.load_snapshot(&repo).unwrap();

    assert_eq!(
        target.events().get_all_events(),
        saved.events().get_all_events()
    );
}

#[test]
fn corrupt_payload_surfaces_to_the_caller() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO snapshots (key, payload) VALUES (?1, ?2);",
        params![EVENTS_KEY, "{not json"],
    )
    .unwrap();

    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let err = repo.load_events().unwrap_err();
    assert!(matches!(err, RepoError::Corrupt { key, .. } if key == EVENTS_KEY));

    // A failed load leaves the session untouched.
    let mut session = seeded_session();
    let before = session.events().get_all_events();
    assert!(session.load_snapshot(&repo).is_err());
    assert_eq!(session.events().get_all_events(), before);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteSnapshotRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn file_backed_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    let session = seeded_session();
    {
        let conn = db::open_db(&path).unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        session.save_snapshot(&repo).unwrap();
    }

    let conn = db::open_db(&path).unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let mut restored = CaptureSession::new();
    restored.load_snapshot(&repo).unwrap();

    assert_eq!(
        restored.events().get_all_events(),
        session.events().get_all_events()
    );
}
