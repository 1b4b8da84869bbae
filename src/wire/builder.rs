//! A module to build request bodies

use serde_json::{json, Value};

use crate::schedule::ScheduledTask;
use crate::task::Task;

/// The body of `POST /tasks` and `PUT /tasks/{id}`.
/// This endpoint family speaks snake_case.
pub fn task_payload(task: &Task) -> Value {
    json!({
        "title": task.title(),
        "description": task.description(),
        "duration": task.duration_minutes(),
        "category": task.category(),
        "color": task.color().css_class(),
        "is_recurring": task.is_recurring(),
        "completed": task.completed(),
    })
}

/// The body of `POST /scheduled-tasks`.
/// Unlike the task endpoints this one speaks camelCase, and wants the day as a
/// midnight ISO datetime.
pub fn entry_payload(entry: &ScheduledTask) -> Value {
    let day = entry.day().map(|day| day.format("%Y-%m-%dT00:00:00").to_string());
    json!({
        "taskId": entry.task_id(),
        "scheduledDay": day,
        "scheduledTime": entry.start_hour(),
        "endTime": entry.end_hour(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::HourSpan;
    use crate::task::Swatch;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn task_bodies_use_the_snake_case_shape() {
        let mut task = Task::new("Études".to_string(), 90);
        task.set_category("Education".to_string());
        task.set_color(Swatch::Purple);
        task.set_recurring(true);

        let expected = json!({
            "title": "Études",
            "description": null,
            "duration": 90,
            "category": "Education",
            "color": "bg-purple-500",
            "is_recurring": true,
            "completed": false,
        });
        assert_eq!(task_payload(&task), expected);
    }

    #[test]
    fn entry_bodies_use_the_camel_case_shape() {
        let task = Task::new("Run".to_string(), 45);
        let day = NaiveDate::from_ymd(2021, 10, 4);
        let entry = ScheduledTask::place(&task, day, HourSpan::new(9.0, 9.75));

        let body = entry_payload(&entry);
        assert_eq!(body["taskId"], json!(task.id().as_str()));
        assert_eq!(body["scheduledDay"], json!("2021-10-04T00:00:00"));
        assert_eq!(body["scheduledTime"], json!(9.0));
        assert_eq!(body["endTime"], json!(9.75));
    }
}
