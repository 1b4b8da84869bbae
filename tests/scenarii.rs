//! Scenarios and helpers shared by the integration tests: they build dashboards
//! over a populated in-memory server, so that tests can drive realistic sessions

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use diligence::dashboard::Dashboard;
use diligence::glitches::ServerGlitches;
use diligence::memory::{MemoryServer, DEV_PASSWORD};
use diligence::storage::LocalStore;
use diligence::{Swatch, Task, TaskId};

/// A store file that will not collide with any other running test
pub fn scratch_store() -> (LocalStore, PathBuf) {
    let name = format!("diligence-scenario-{}.json", uuid::Uuid::new_v4().to_hyphenated());
    let path = std::env::temp_dir().join(name);
    (LocalStore::new(&path), path)
}

/// A dashboard over a fresh in-memory server, already signed in as the
/// development account
pub async fn signed_in_dashboard() -> (Dashboard<MemoryServer>, PathBuf) {
    let (store, path) = scratch_store();
    let mut dashboard = Dashboard::new_with_store(MemoryServer::new(), store);
    dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();
    (dashboard, path)
}

/// Same, over a server that will misbehave as `glitches` describes.
/// The returned handle tweaks the glitches while the test runs
pub async fn glitched_dashboard(glitches: ServerGlitches)
    -> (Dashboard<MemoryServer>, Arc<Mutex<ServerGlitches>>, PathBuf)
{
    let handle = Arc::new(Mutex::new(glitches));
    let mut server = MemoryServer::new();
    server.set_glitches(Some(Arc::clone(&handle)));
    let (store, path) = scratch_store();
    let mut dashboard = Dashboard::new_with_store(server, store);
    dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();
    (dashboard, handle, path)
}

/// Drag `task` out of the library and drop it on `day` at `hour`
pub async fn schedule(dashboard: &mut Dashboard<MemoryServer>, task: &TaskId, day: NaiveDate, hour: f64) {
    assert!(dashboard.pick_up(task).is_some(), "the task to schedule must be in the library");
    dashboard.drop_on(day, hour).await;
}

/// The week of 2021-10-03 (Sunday) through 2021-10-09, as a busy week looks:
/// * Library: "Deep work" (120 min, Work), "Email triage" (30 min, Work, completed),
///   "Gym" (60 min, Health), "Read" (45 min, Leisure)
/// * Monday 4th:    Deep work at 9:00, Gym at 18:00
/// * Wednesday 6th: Deep work at 9:00, Read at 20:00
/// * Thursday 7th:  Read, four times in a row from 6:00
pub async fn populated_dashboard() -> (Dashboard<MemoryServer>, PathBuf) {
    let (mut dashboard, path) = signed_in_dashboard().await;
    let monday = NaiveDate::from_ymd(2021, 10, 4);
    let wednesday = NaiveDate::from_ymd(2021, 10, 6);
    let thursday = NaiveDate::from_ymd(2021, 10, 7);
    dashboard.select_day(monday).await;

    let mut draft = Task::new("Deep work".to_string(), 120);
    draft.set_category("Work".to_string());
    draft.set_color(Swatch::Purple);
    let deep_work = dashboard.create_task(draft).await;

    let mut draft = Task::new("Email triage".to_string(), 30);
    draft.set_category("Work".to_string());
    draft.set_completed(true);
    dashboard.create_task(draft).await;

    let mut draft = Task::new("Gym".to_string(), 60);
    draft.set_category("Health".to_string());
    draft.set_color(Swatch::Green);
    let gym = dashboard.create_task(draft).await;

    let mut draft = Task::new("Read".to_string(), 45);
    draft.set_category("Leisure".to_string());
    let read = dashboard.create_task(draft).await;

    schedule(&mut dashboard, &deep_work, monday, 9.0).await;
    schedule(&mut dashboard, &gym, monday, 18.0).await;

    schedule(&mut dashboard, &deep_work, wednesday, 9.0).await;
    schedule(&mut dashboard, &read, wednesday, 20.0).await;

    for _ in 0..4 {
        schedule(&mut dashboard, &read, thursday, 6.0).await;
    }

    (dashboard, path)
}
