use serde::{Deserialize, Serialize};

use super::task::ARCHIVED_TAG;

/// Configuration from .lanes.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanesConfig {
    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// The active board document. Relative default task paths resolve
    /// against its directory.
    #[serde(default = "default_board_file")]
    pub file: String,
    /// Column tags (without `#`), in lane order
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    /// Where `add` appends new tasks. Blank = ask interactively.
    #[serde(default)]
    pub default_task_path: String,
    /// Appended to a default task path that has no extension
    #[serde(default = "default_extension")]
    pub default_extension: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            file: default_board_file(),
            columns: default_columns(),
            default_task_path: String::new(),
            default_extension: default_extension(),
        }
    }
}

/// Default: see INIT_TEMPLATE in cli/handlers/init.rs
fn default_board_file() -> String {
    "board.md".to_string()
}

/// Default: see INIT_TEMPLATE in cli/handlers/init.rs
fn default_columns() -> Vec<String> {
    vec!["todo".to_string(), "doing".to_string()]
}

fn default_extension() -> String {
    "md".to_string()
}

impl BoardConfig {
    /// The configured default task path, or `None` when blank
    pub fn default_task_path(&self) -> Option<&str> {
        let path = self.default_task_path.trim();
        (!path.is_empty()).then_some(path)
    }
}

/// A column name that cannot be written as a single `#tag`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("column cannot be empty")]
    Empty,
    #[error("\"archived\" is reserved for archived tasks")]
    Reserved,
    #[error("invalid column \"{0}\": use lowercase, digits, '-' or '_' (e.g. \"in-review\")")]
    Invalid(String),
}

/// Column tags are single `#tag` words: lowercase letters, digits, `-` and `_`.
pub fn validate_column(column: &str) -> Result<(), ColumnError> {
    if column.is_empty() {
        return Err(ColumnError::Empty);
    }
    if column == ARCHIVED_TAG {
        return Err(ColumnError::Reserved);
    }
    if !column
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ColumnError::Invalid(column.to_string()));
    }
    Ok(())
}
