mod scenarii;

use chrono::NaiveDate;

use diligence::glitches::ServerGlitches;
use diligence::library::{Filter, SortKey, SortOrder};
use diligence::memory::MemoryServer;
use diligence::notify::NoticeLevel;
use diligence::{Dashboard, Priority, Task};

/// The whole life of a task: created in the library, dragged onto the calendar,
/// taken off the calendar again. The library keeps the task through all of it
#[tokio::test]
async fn test_create_schedule_remove() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (mut dashboard, path) = scenarii::signed_in_dashboard().await;

    let id = dashboard.create_task(Task::new("Run".to_string(), 45)).await;
    let task = dashboard.library().get(&id).unwrap();
    assert_eq!(task.priority(), Priority::Low);

    let day = NaiveDate::from_ymd(2021, 10, 4);
    dashboard.select_day(day).await;
    scenarii::schedule(&mut dashboard, &id, day, 9.0).await;

    assert_eq!(dashboard.entries().len(), 1);
    let entry = &dashboard.entries()[0];
    assert_eq!(entry.day(), Some(day));
    assert_eq!(entry.start_hour(), 9.0);
    assert_eq!(entry.end_hour(), 9.75);

    // The entry is on the server too, a reload keeps it
    dashboard.load_window().await;
    assert_eq!(dashboard.entries().len(), 1);

    let entry_id = dashboard.entries()[0].id().clone();
    dashboard.remove_entry(&entry_id).await;
    assert!(dashboard.entries().is_empty());
    assert!(dashboard.library().get(&id).is_some(), "removing an entry must not touch the library");

    dashboard.load_window().await;
    assert!(dashboard.entries().is_empty());

    std::fs::remove_file(&path).unwrap();
}

/// A populated week, looked at through every view the dashboard offers
#[tokio::test]
async fn test_a_busy_week_renders() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (mut dashboard, path) = scenarii::populated_dashboard().await;
    let monday = NaiveDate::from_ymd(2021, 10, 4);
    let wednesday = NaiveDate::from_ymd(2021, 10, 6);
    let thursday = NaiveDate::from_ymd(2021, 10, 7);

    let week = dashboard.week_view();
    assert_eq!(week.days().len(), 7);
    assert_eq!(week.days()[0].date(), NaiveDate::from_ymd(2021, 10, 3), "weeks start on Sunday");

    let titles: Vec<&str> = week.day(monday).unwrap().entries().iter()
        .map(|entry| entry.title())
        .collect();
    assert_eq!(titles, vec!["Deep work", "Gym"]);
    assert_eq!(week.day(wednesday).unwrap().entries().len(), 2);

    // Thursday holds four entries; condensed mode shows three and counts the rest
    let (visible, hidden) = week.day(thursday).unwrap().condensed_preview();
    assert_eq!(visible.len(), 3);
    assert_eq!(hidden, 1);

    dashboard.set_filter(Filter::Completed);
    let completed: Vec<&str> = dashboard.library_view().iter().map(|task| task.title()).collect();
    assert_eq!(completed, vec!["Email triage"]);

    dashboard.set_filter(Filter::All);
    dashboard.set_sort(SortKey::Duration, SortOrder::Ascending);
    let by_duration: Vec<&str> = dashboard.library_view().iter().map(|task| task.title()).collect();
    assert_eq!(by_duration, vec!["Email triage", "Read", "Gym", "Deep work"]);

    let stats = dashboard.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.minutes_blocked, 255);
    assert_eq!(stats.minutes_completed, 30);
    assert_eq!(stats.completion_rate, 25);
    assert_eq!(stats.time_completion_rate, 12);
    assert_eq!(stats.productivity_score, 19);
    assert_eq!(stats.per_category["Work"].total, 2);

    std::fs::remove_file(&path).unwrap();
}

/// Register an account, work, sign out, sign back in: the server remembers
#[tokio::test]
async fn test_accounts_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (store, path) = scenarii::scratch_store();
    let mut dashboard = Dashboard::new_with_store(MemoryServer::new(), store);

    dashboard.register("maria@example.com", "Maria", "s3cret").await.unwrap();
    assert!(dashboard.session().is_authenticated());

    let id = dashboard.create_task(Task::new("Thesis chapter".to_string(), 120)).await;
    assert_eq!(dashboard.library().len(), 1);

    dashboard.logout();
    assert!(dashboard.session().is_authenticated() == false);
    assert!(dashboard.library().is_empty());

    dashboard.login("maria@example.com", "s3cret").await.unwrap();
    assert_eq!(dashboard.library().len(), 1);
    assert!(dashboard.library().get(&id).is_some());

    std::fs::remove_file(&path).unwrap();
}

/// A transient server failure empties the grid for one load and leaves a notice;
/// the next load heals everything
#[tokio::test]
async fn test_flaky_server_recovers() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (mut dashboard, glitches, path) = scenarii::glitched_dashboard(ServerGlitches::new()).await;

    let id = dashboard.create_task(Task::new("Fragile plans".to_string(), 30)).await;
    let today = dashboard.selected_day();
    scenarii::schedule(&mut dashboard, &id, today, 9.0).await;
    assert_eq!(dashboard.entries().len(), 1);

    glitches.lock().unwrap().list_entries_behaviour = (0, 1);
    dashboard.load_window().await;
    assert!(dashboard.entries().is_empty(), "the failed half falls back to empty");
    assert_eq!(dashboard.library().len(), 1, "the successful half still applies");
    assert_eq!(dashboard.notices().latest().unwrap().level(), NoticeLevel::Error);

    dashboard.load_window().await;
    assert_eq!(dashboard.entries().len(), 1);

    std::fs::remove_file(&path).unwrap();
}
