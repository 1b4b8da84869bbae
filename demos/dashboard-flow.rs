//! This is an example of how diligence can be used

use std::path::Path;

use chrono::Duration;

use diligence::memory::{MemoryServer, DEV_PASSWORD};
use diligence::storage::LocalStore;
use diligence::Dashboard;
use diligence::Swatch;
use diligence::Task;
use diligence::TaskId;

const STORE_FILE: &str = "demo_cache/dashboard-flow.json";


#[tokio::main]
async fn main() {
    env_logger::init();

    println!("This example shows a full session: sign in, build a task library, plan a week, review progress.");
    println!("It runs against the in-memory development server, so no real server is required.");
    println!("You can set the RUST_LOG environment variable to display more info about what happens.");
    println!("");

    let store = LocalStore::open(Path::new(STORE_FILE));
    // Note that we could use new_with_feedback_channel() to have every notice forwarded to a UI
    let mut dashboard = Dashboard::new_with_store(MemoryServer::new(), store);

    dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();
    println!("Signed in as {}", dashboard.session().user().unwrap().name());

    populate_the_library(&mut dashboard).await;
    plan_the_week(&mut dashboard).await;
    review_progress(&mut dashboard).await;

    println!("\nDone. You can start this example again to see the session and the library snapshot being restored from {}", STORE_FILE);
}

fn task_id(dashboard: &Dashboard<MemoryServer>, title: &str) -> TaskId {
    dashboard.library().iter()
        .find(|task| task.title() == title)
        .unwrap()
        .id().clone()
}

async fn populate_the_library(dashboard: &mut Dashboard<MemoryServer>) {
    println!("\nNow, we'll add a few tasks to the library.");

    let mut deep_work = Task::new("Deep work".to_string(), 120);
    deep_work.set_category("Work".to_string());
    deep_work.set_color(Swatch::Purple);
    dashboard.create_task(deep_work).await;

    let mut gym = Task::new("Gym".to_string(), 60);
    gym.set_category("Health".to_string());
    gym.set_color(Swatch::Green);
    gym.set_recurring(true);
    dashboard.create_task(gym).await;

    let mut read = Task::new("Read".to_string(), 45);
    read.set_category("Leisure".to_string());
    dashboard.create_task(read).await;

    println!("---- the library -----");
    diligence::utils::print_library(dashboard.library());
}

async fn plan_the_week(dashboard: &mut Dashboard<MemoryServer>) {
    println!("\nNow, we'll drag tasks onto the weekly calendar.");

    let today = dashboard.selected_day();
    let tomorrow = today + Duration::days(1);

    let deep_work = task_id(dashboard, "Deep work");
    dashboard.pick_up(&deep_work);
    dashboard.drop_on(today, 9.0).await;

    // 9 o'clock is taken by now, so this drop slides to the next free slot
    let gym = task_id(dashboard, "Gym");
    dashboard.pick_up(&gym);
    dashboard.drop_on(today, 9.0).await;

    let read = task_id(dashboard, "Read");
    dashboard.pick_up(&read);
    dashboard.drop_on(tomorrow, 20.0).await;

    println!("---- the planned week -----");
    diligence::utils::print_week(&dashboard.week_view());

    println!("Changed our mind about the evening read:");
    let evening = dashboard.entries().iter()
        .find(|entry| entry.title() == "Read")
        .unwrap()
        .id().clone();
    dashboard.remove_entry(&evening).await;
    println!("  {}", dashboard.notices().latest().unwrap().message());
}

async fn review_progress(dashboard: &mut Dashboard<MemoryServer>) {
    println!("\nNow, we'll mark the workout as done, and check the numbers.");

    let gym = task_id(dashboard, "Gym");
    dashboard.toggle_completed(&gym).await;

    let stats = dashboard.stats();
    println!("{} of {} tasks completed ({}% of blocked time)",
        stats.completed, stats.total, stats.time_completion_rate);
    println!("Productivity score: {}%", stats.productivity_score);
    stats.per_category.iter()
        .map(|(category, numbers)| println!("  {}: {}/{} done", category, numbers.completed, numbers.total))
        .collect::<()>();

    // A second variant of the deep-work block, to tweak without touching the original
    let deep_work = task_id(dashboard, "Deep work");
    dashboard.duplicate_task(&deep_work).await;
    println!("---- the library, with the duplicated task -----");
    diligence::utils::print_library(dashboard.library());
}
