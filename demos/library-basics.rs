use std::path::Path;

use diligence::library::{Filter, SortKey, SortOrder};
use diligence::memory::{MemoryServer, DEV_PASSWORD};
use diligence::storage::LocalStore;
use diligence::Dashboard;
use diligence::Task;

const STORE_FILE: &str = "demo_cache/library-basics.json";


#[tokio::main]
async fn main() {
    env_logger::init();

    let store = LocalStore::open(Path::new(STORE_FILE));
    let mut dashboard = Dashboard::new_with_store(MemoryServer::new(), store);
    dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();

    let mut soccer = Task::new("Soccer Practice".to_string(), 120);
    soccer.set_category("Sports".to_string());
    dashboard.create_task(soccer).await;

    let mut study = Task::new("Study Session".to_string(), 90);
    study.set_category("Education".to_string());
    dashboard.create_task(study).await;

    let mut gym = Task::new("Gym Workout".to_string(), 60);
    gym.set_category("Fitness".to_string());
    gym.set_recurring(true);
    let gym_id = dashboard.create_task(gym).await;

    println!("---- the whole library -----");
    diligence::utils::print_library(dashboard.library());

    dashboard.toggle_completed(&gym_id).await;

    println!("---- active tasks, shortest first -----");
    dashboard.set_filter(Filter::Active);
    dashboard.set_sort(SortKey::Duration, SortOrder::Ascending);
    dashboard.library_view().iter()
        .map(|task| diligence::utils::print_task(task))
        .collect::<()>();

    let stats = dashboard.stats();
    println!("Completed {} of {} tasks, productivity score {}%",
        stats.completed, stats.total, stats.productivity_score);
}
