use serde::Serialize;

use crate::model::board::{BoardIndex, Lane, group_lanes};
use crate::model::task::{Lifecycle, Task};
use crate::util::unicode::{display_width, fit_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub document: String,
    pub row: usize,
    pub content: String,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub lifecycle: Lifecycle,
}

#[derive(Serialize)]
pub struct LaneJson {
    pub title: String,
    #[serde(flatten)]
    pub lane: Lane,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub document: String,
    pub column: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(index: &BoardIndex, task: &Task) -> TaskJson {
    let (document, row) = index
        .location(&task.id)
        .map(|loc| (loc.document.to_string(), loc.row))
        .unwrap_or_default();
    TaskJson {
        id: task.id.clone(),
        document,
        row,
        content: task.content.clone(),
        done: task.done,
        column: task.column.clone(),
        tags: task.tags.clone(),
        lifecycle: task.lifecycle,
    }
}

pub fn board_to_json(index: &BoardIndex, columns: &[String]) -> Vec<LaneJson> {
    group_lanes(index, columns)
        .into_iter()
        .map(|(lane, tasks)| LaneJson {
            title: lane.title().to_string(),
            tasks: tasks.iter().map(|t| task_to_json(index, t)).collect(),
            lane,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary, id first
pub fn format_task_line(task: &Task) -> String {
    let mut out = format!("{} [{}] {}", task.id, task.checkbox_char(), task.content);
    for tag in &task.tags {
        out.push_str(&format!(" #{}", tag));
    }
    match (&task.lifecycle, &task.column) {
        (Lifecycle::Archived, _) => out.push_str(" (archived)"),
        (_, Some(column)) => out.push_str(&format!(" -> {}", column)),
        _ => {}
    }
    out
}

/// Render lanes side by side, each `width` cells wide.
///
/// Trailing spaces are trimmed from every row.
pub fn format_board(index: &BoardIndex, columns: &[String], width: usize) -> Vec<String> {
    let width = width.max(4);
    let lanes = group_lanes(index, columns);
    let height = lanes.iter().map(|(_, tasks)| tasks.len()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(height + 2);
    lines.push(join_cells(lanes.iter().map(|(lane, tasks)| {
        fit_to_width(&format!("{} ({})", lane.title(), tasks.len()), width)
    })));
    lines.push(join_cells(lanes.iter().map(|_| "-".repeat(width))));

    for i in 0..height {
        lines.push(join_cells(lanes.iter().map(|(_, tasks)| match tasks.get(i) {
            Some(task) => fit_to_width(&card_text(task), width),
            None => " ".repeat(width),
        })));
    }
    lines
}

fn card_text(task: &Task) -> String {
    if task.content.is_empty() {
        "(empty)".to_string()
    } else {
        task.content.clone()
    }
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    let row = cells.collect::<Vec<_>>().join(" | ");
    row.trim_end().to_string()
}

/// Width the longest task id needs, for aligning `lanes list`
pub fn id_column_width(tasks: &[&Task]) -> usize {
    tasks.iter().map(|t| display_width(&t.id)).max().unwrap_or(0)
}
