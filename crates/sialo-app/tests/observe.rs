use std::time::Duration;

use sialo_app::observe::{self, Outcome, Progress};
use sialo_app::session::Session;
use sialo_core::models::evaluation::{INTERVAL_COUNT, SessionKind};
use sialo_storage::store::MemoryStore;
use tokio::sync::mpsc;

fn open() -> Session<MemoryStore> {
    Session::open(MemoryStore::new()).unwrap()
}

#[tokio::test]
async fn countdown_runs_to_the_end_after_marks_close() {
    let mut session = open();
    let (tx, rx) = mpsc::unbounded_channel();
    drop(tx);
    let mut seen = Vec::new();

    let outcome = observe::run(
        &mut session,
        SessionKind::Rest,
        Duration::from_micros(100),
        rx,
        std::future::pending(),
        |p| seen.push(p),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Finished);
    let starts: Vec<Progress> = (1..INTERVAL_COUNT).map(Progress::SlotStarted).collect();
    assert_eq!(seen, starts);
    assert!(!session.timer().is_running());
    assert_eq!(session.timer().slot(), 0);
}

#[tokio::test]
async fn marks_land_in_the_current_slot() {
    let mut session = open();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(()).unwrap();
    tx.send(()).unwrap();
    let mut seen = Vec::new();

    let outcome = observe::run(
        &mut session,
        SessionKind::Activity,
        Duration::from_secs(60),
        rx,
        tokio::time::sleep(Duration::from_millis(50)),
        |p| seen.push(p),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Stopped { slot: 0 });
    assert_eq!(seen, [Progress::Marked(0), Progress::Marked(0)]);
    assert_eq!(session.active().data.activity.intervals[0], 1);
    assert_eq!(session.active().data.rest.intervals[0], 0);
    assert!(session.is_dirty());
    assert!(!session.timer().is_running());
}

#[tokio::test]
async fn stop_returns_while_mark_source_is_still_open() {
    let mut session = open();
    let (_tx, rx) = mpsc::unbounded_channel();

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        observe::run(
            &mut session,
            SessionKind::Activity,
            Duration::from_secs(60),
            rx,
            std::future::ready(()),
            |_| {},
        ),
    )
    .await
    .expect("observation did not stop")
    .unwrap();

    assert_eq!(outcome, Outcome::Stopped { slot: 0 });
    assert!(session.active().data.activity.intervals.iter().all(|&s| s == 0));
}
