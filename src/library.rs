//! The task library: every reusable block the user owns, plus the derived
//! views (filtering, sorting) and the aggregate numbers of the progress screen

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// Which tasks a library view keeps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Not completed yet
    Active,
    Completed,
    Recurring,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => task.completed() == false,
            Filter::Completed => task.completed(),
            Filter::Recurring => task.is_recurring(),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All
    }
}

/// What a library view is ordered by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Duration,
    Title,
    Category,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Priority
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// The library opens on "most urgent first"
impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Descending
    }
}

/// Compare names the way the library lists them (case-folded)
fn compare_alpha(left: &str, right: &str) -> std::cmp::Ordering {
    Ord::cmp(&left.to_lowercase(), &right.to_lowercase())
}

fn compare_tasks(left: &Task, right: &Task, key: SortKey) -> std::cmp::Ordering {
    match key {
        SortKey::Priority => left.priority().cmp(&right.priority()),
        SortKey::Duration => left.duration_minutes().cmp(&right.duration_minutes()),
        SortKey::Title => compare_alpha(left.title(), right.title()),
        SortKey::Category => compare_alpha(left.category(), right.category()),
    }
}

/// The user's collection of task templates.
///
/// Tasks keep their insertion order; every derived view is computed on demand
/// from that order, so ties in a sort never shuffle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskLibrary {
    tasks: Vec<Task>,
}

impl TaskLibrary {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Replace the whole collection, e.g. with the result of a window load
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Insert `task`, replacing any existing task with the same id
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|existing| existing.id() == task.id()) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == id)?;
        Some(self.tasks.remove(position))
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The tasks matching `filter`, ordered by `key`/`order`.
    ///
    /// Filtering preserves insertion order and sorting is stable, so equal keys
    /// keep their relative positions.
    pub fn view(&self, filter: Filter, key: SortKey, order: SortOrder) -> Vec<&Task> {
        let mut selected: Vec<&Task> = self.tasks.iter()
            .filter(|task| filter.matches(task))
            .collect();
        selected.sort_by(|left, right| {
            let ordering = compare_tasks(left, right, key);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        selected
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::compute(&self.tasks)
    }
}

/// The numbers of the progress screen
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total: usize,
    pub completed: usize,
    /// Share of tasks completed, as a rounded percentage
    pub completion_rate: u32,
    /// Total minutes across all tasks
    pub minutes_blocked: u64,
    /// Minutes belonging to completed tasks
    pub minutes_completed: u64,
    /// Share of blocked time completed, as a rounded percentage
    pub time_completion_rate: u32,
    /// The headline number: the two rates averaged
    pub productivity_score: u32,
    pub per_category: BTreeMap<String, CategoryStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: usize,
    pub completed: usize,
    pub minutes: u64,
}

fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

impl LibraryStats {
    fn compute(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed()).count();
        let minutes_blocked: u64 = tasks.iter().map(|task| u64::from(task.duration_minutes())).sum();
        let minutes_completed: u64 = tasks.iter()
            .filter(|task| task.completed())
            .map(|task| u64::from(task.duration_minutes()))
            .sum();

        let mut per_category: BTreeMap<String, CategoryStats> = BTreeMap::new();
        for task in tasks {
            let slot = per_category.entry(task.category().to_string()).or_default();
            slot.total += 1;
            if task.completed() {
                slot.completed += 1;
            }
            slot.minutes += u64::from(task.duration_minutes());
        }

        let completion_rate = percentage(completed as u64, total as u64);
        let time_completion_rate = percentage(minutes_completed, minutes_blocked);
        let productivity_score = ((completion_rate + time_completion_rate) as f64 / 2.0).round() as u32;

        Self {
            total,
            completed,
            completion_rate,
            minutes_blocked,
            minutes_completed,
            time_completion_rate,
            productivity_score,
            per_category,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample_library() -> TaskLibrary {
        let mut library = TaskLibrary::new();

        let mut soccer = Task::new("Soccer Practice".to_string(), 120);
        soccer.set_category("Sports".to_string());
        soccer.set_recurring(true);
        library.add(soccer);

        let mut study = Task::new("Study Session".to_string(), 90);
        study.set_category("Education".to_string());
        library.add(study);

        let mut gym = Task::new("Gym Workout".to_string(), 60);
        gym.set_category("Fitness".to_string());
        gym.set_recurring(true);
        gym.set_completed(true);
        library.add(gym);

        let mut meeting = Task::new("project meeting".to_string(), 30);
        meeting.set_category("Work".to_string());
        library.add(meeting);

        library
    }

    fn titles(view: &[&Task]) -> Vec<String> {
        view.iter().map(|task| task.title().to_string()).collect()
    }

    #[test]
    fn filters_select_exact_subsets_in_order() {
        let library = sample_library();

        let all = library.view(Filter::All, SortKey::Priority, SortOrder::Descending);
        assert_eq!(all.len(), 4);

        let active = library.view(Filter::Active, SortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&active), vec!["project meeting", "Soccer Practice", "Study Session"]);

        let completed = library.view(Filter::Completed, SortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&completed), vec!["Gym Workout"]);

        let recurring = library.view(Filter::Recurring, SortKey::Duration, SortOrder::Ascending);
        assert_eq!(titles(&recurring), vec!["Gym Workout", "Soccer Practice"]);
    }

    #[test]
    fn duration_sorts_both_ways() {
        let mut library = TaskLibrary::new();
        library.add(Task::new("Ninety".to_string(), 90));
        library.add(Task::new("Thirty".to_string(), 30));
        library.add(Task::new("Sixty".to_string(), 60));

        let ascending = library.view(Filter::All, SortKey::Duration, SortOrder::Ascending);
        assert_eq!(titles(&ascending), vec!["Thirty", "Sixty", "Ninety"]);

        let descending = library.view(Filter::All, SortKey::Duration, SortOrder::Descending);
        assert_eq!(titles(&descending), vec!["Ninety", "Sixty", "Thirty"]);
    }

    #[test]
    fn equal_keys_keep_their_insertion_order() {
        let mut library = TaskLibrary::new();
        library.add(Task::new("First".to_string(), 45));
        library.add(Task::new("Second".to_string(), 45));
        library.add(Task::new("Third".to_string(), 45));

        for order in &[SortOrder::Ascending, SortOrder::Descending] {
            let view = library.view(Filter::All, SortKey::Duration, *order);
            assert_eq!(titles(&view), vec!["First", "Second", "Third"]);
        }
    }

    #[test]
    fn title_sorting_ignores_case() {
        let mut library = TaskLibrary::new();
        library.add(Task::new("banana".to_string(), 10));
        library.add(Task::new("Apple".to_string(), 10));

        let view = library.view(Filter::All, SortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&view), vec!["Apple", "banana"]);
    }

    #[test]
    fn priority_sorting_puts_urgent_first_by_default() {
        let library = sample_library();
        let view = library.view(Filter::All, SortKey::default(), SortOrder::default());
        // 120min is High, 90/60min are Medium (stable between them), 30min is Low
        assert_eq!(titles(&view), vec!["Soccer Practice", "Study Session", "Gym Workout", "project meeting"]);
    }

    #[test]
    fn stats_add_up() {
        let stats = sample_library().stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 25);
        assert_eq!(stats.minutes_blocked, 300);
        assert_eq!(stats.minutes_completed, 60);
        assert_eq!(stats.time_completion_rate, 20);
        assert_eq!(stats.productivity_score, 23);

        let fitness = &stats.per_category["Fitness"];
        assert_eq!(fitness.total, 1);
        assert_eq!(fitness.completed, 1);
        assert_eq!(fitness.minutes, 60);
        assert_eq!(stats.per_category.len(), 4);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut library = sample_library();
        let id = library.iter().next().unwrap().id().clone();

        let mut renamed = library.get(&id).unwrap().clone();
        renamed.set_title("Soccer Match".to_string());
        library.upsert(renamed);

        assert_eq!(library.len(), 4);
        assert_eq!(library.get(&id).unwrap().title(), "Soccer Match");
        // Still in first position
        assert_eq!(library.iter().next().unwrap().title(), "Soccer Match");
    }
}
