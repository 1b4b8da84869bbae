///! Some utility functions

use crate::calendar::hour_label;
use crate::calendar::week_view::WeekView;
use crate::library::TaskLibrary;
use crate::task::Task;

/// Format a duration in minutes the way the app displays it ("1h 30m")
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 && mins > 0 {
        format!("{}h {}m", hours, mins)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", mins)
    }
}

/// A debug utility that pretty-prints a task library
pub fn print_library(library: &TaskLibrary) {
    let stats = library.stats();
    println!("LIBRARY ({} tasks, {} completed)", stats.total, stats.completed);
    for task in library.iter() {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    println!("    {} {} [{}, {}, {}]\t{}",
        completion, task.title(), task.category(),
        format_duration(task.duration_minutes()), task.priority(), task.id());
}

/// A debug utility that pretty-prints a week of the calendar
pub fn print_week(week: &WeekView) {
    for day in week.days() {
        let today = if day.is_today() { "*" } else { " " };
        println!("{}{}", today, day.header());
        for entry in day.entries() {
            println!("    {} - {}\t{}",
                hour_label(entry.start_hour()), hour_label(entry.end_hour()), entry.title());
        }
    }
}
