use serde::{Deserialize, Serialize};

/// Tag that marks an archived task. Occupies the column slot of the line.
pub const ARCHIVED_TAG: &str = "archived";

/// Where a task is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// On the board
    #[default]
    Live,
    /// Kept in the document with the `#archived` tag, hidden from the board
    Archived,
    /// Pending removal: serializes to an empty line
    Deleted,
}

/// One checklist line, e.g. `- [ ] buy milk #errand #todo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identity: `<document>:<row>`. Stable while the line does not move.
    pub id: String,
    /// Column tag (without `#`); `None` when the line has no known column
    pub column: Option<String>,
    /// Checkbox state: `[x]` when true
    pub done: bool,
    /// Free-form text between the checkbox and the trailing tags
    pub content: String,
    /// Trailing tags that are not the column (without `#`)
    pub tags: Vec<String>,
    /// Leading whitespace, preserved so nested checklists keep their shape
    #[serde(skip)]
    pub indent: String,
    pub lifecycle: Lifecycle,
}

impl Task {
    /// A new open task with no content, placed in `column`
    pub fn blank(id: impl Into<String>, column: &str) -> Self {
        Task {
            id: id.into(),
            column: Some(column.to_string()),
            done: false,
            content: String::new(),
            tags: Vec::new(),
            indent: String::new(),
            lifecycle: Lifecycle::Live,
        }
    }

    /// The checkbox character: `x` for done, a space otherwise
    pub fn checkbox_char(&self) -> char {
        if self.done { 'x' } else { ' ' }
    }

    pub fn is_archived(&self) -> bool {
        self.lifecycle == Lifecycle::Archived
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle == Lifecycle::Deleted
    }

    /// Archive transition: the `#archived` tag replaces the column tag.
    pub fn archive(&mut self) {
        self.lifecycle = Lifecycle::Archived;
        self.column = None;
    }

    /// Delete transition: the next serialization is empty, which removes the line.
    pub fn delete(&mut self) {
        self.lifecycle = Lifecycle::Deleted;
    }
}
