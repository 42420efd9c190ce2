use indexmap::IndexMap;
use serde::Serialize;

use super::task::Task;
use crate::io::store::DocPath;

/// Where a task's line lived when the index was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskLocation {
    pub document: DocPath,
    /// Zero-based line offset into `document`
    pub row: usize,
}

/// Identity-keyed side tables built together from one scan.
///
/// Tasks and locations are two separate maps so that a caller holding a
/// stale id can find one and not the other; every action treats either miss
/// as "nothing to do". Both maps keep scan order (document path, then row).
#[derive(Debug, Clone, Default)]
pub struct BoardIndex {
    pub tasks: IndexMap<String, Task>,
    pub locations: IndexMap<String, TaskLocation>,
    /// Columns the lines were parsed against
    pub columns: Vec<String>,
}

impl BoardIndex {
    pub fn insert(&mut self, task: Task, location: TaskLocation) {
        self.locations.insert(task.id.clone(), location);
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn location(&self, id: &str) -> Option<&TaskLocation> {
        self.locations.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A board lane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "lowercase")]
pub enum Lane {
    /// Open tasks without a configured column tag
    Uncategorised,
    Column(String),
    Done,
}

impl Lane {
    pub fn title(&self) -> &str {
        match self {
            Lane::Uncategorised => "Uncategorised",
            Lane::Column(c) => c,
            Lane::Done => "Done",
        }
    }
}

/// The lane a task is shown in, or `None` for archived/deleted tasks
pub fn lane_for(task: &Task, columns: &[String]) -> Option<Lane> {
    if task.is_archived() || task.is_deleted() {
        return None;
    }
    if task.done {
        return Some(Lane::Done);
    }
    match &task.column {
        Some(c) if columns.contains(c) => Some(Lane::Column(c.clone())),
        _ => Some(Lane::Uncategorised),
    }
}

/// Group the index into lanes, in board order. Empty lanes are kept.
pub fn group_lanes<'a>(index: &'a BoardIndex, columns: &[String]) -> Vec<(Lane, Vec<&'a Task>)> {
    let mut lanes: Vec<(Lane, Vec<&Task>)> = Vec::with_capacity(columns.len() + 2);
    lanes.push((Lane::Uncategorised, Vec::new()));
    for c in columns {
        lanes.push((Lane::Column(c.clone()), Vec::new()));
    }
    lanes.push((Lane::Done, Vec::new()));

    for task in index.tasks.values() {
        if let Some(lane) = lane_for(task, columns)
            && let Some((_, tasks)) = lanes.iter_mut().find(|(l, _)| *l == lane)
        {
            tasks.push(task);
        }
    }
    lanes
}
