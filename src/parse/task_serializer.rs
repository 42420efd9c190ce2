use crate::model::task::{ARCHIVED_TAG, Task};

/// Serialize a task to its checklist line.
///
/// Format: `<indent>- [X] content #tag1 #tag2 #column`. A deleted task
/// serializes to the empty string, which tells the row synchronizer to
/// remove the line.
pub fn serialize_task(task: &Task) -> String {
    serialize_line(task, task.column.as_deref())
}

/// Serialize with `column`'s tag in the column slot instead of the task's
/// own. The task is not modified.
pub fn serialize_with_column(task: &Task, column: &str) -> String {
    serialize_line(task, Some(column))
}

fn serialize_line(task: &Task, column: Option<&str>) -> String {
    if task.is_deleted() {
        return String::new();
    }

    let mut line = format!("{}- [{}] {}", task.indent, task.checkbox_char(), task.content);

    for tag in &task.tags {
        line.push_str(&format!(" #{}", tag));
    }

    match column {
        Some(column) => line.push_str(&format!(" #{}", column)),
        None if task.is_archived() => line.push_str(&format!(" #{}", ARCHIVED_TAG)),
        None => {}
    }

    line
}
