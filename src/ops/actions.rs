use std::path::PathBuf;

use crate::io::config_io::{ConfigError, SettingsProvider};
use crate::io::recovery;
use crate::io::store::{DocPath, DocumentStore, StoreError};
use crate::model::board::BoardIndex;
use crate::model::config::{ColumnError, validate_column};
use crate::model::task::Task;
use crate::ops::placement::{self, Anchor, Chooser};
use crate::ops::row_sync::{RowOutcome, update_row};
use crate::parse::{parse_task_line, serialize_task};

/// Error type for task actions. Lookups never fail; only collaborators do.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error("could not open editor: {0}")]
    Editor(#[from] std::io::Error),
}

/// The presentation layer's editor view.
pub trait Editor {
    /// Open `doc` in a view
    fn open(&mut self, doc: &DocPath) -> std::io::Result<()>;
    /// Put the cursor on `row` (zero-based) of the active view
    fn set_cursor(&mut self, row: usize) -> std::io::Result<()>;
}

/// One method per user intent over a scanned board.
///
/// Every line edit follows the same steps: look up the task and its
/// location (either missing: silently do nothing), mutate the held task,
/// serialize it and hand the line to [`update_row`]. The held task is then
/// replaced by the parse of the line it wrote, so it matches what the next
/// scan will read.
///
/// `delete_task` takes one id while `archive_tasks` takes a list; the two
/// shapes are kept as they are.
pub struct TaskActions<'a, S: DocumentStore + ?Sized> {
    index: &'a mut BoardIndex,
    store: &'a S,
    board: DocPath,
    recovery_root: Option<PathBuf>,
}

impl<'a, S: DocumentStore + ?Sized> TaskActions<'a, S> {
    pub fn new(index: &'a mut BoardIndex, store: &'a S, board: DocPath) -> Self {
        TaskActions {
            index,
            store,
            board,
            recovery_root: None,
        }
    }

    /// Record removed lines in the recovery log under `root`
    pub fn with_recovery_log(mut self, root: impl Into<PathBuf>) -> Self {
        self.recovery_root = Some(root.into());
        self
    }

    pub fn index(&self) -> &BoardIndex {
        self.index
    }

    /// Move a task to `column`. The column must be writable as one `#tag`;
    /// moving an archived task brings it back onto the board.
    pub fn change_column(&mut self, id: &str, column: &str) -> Result<(), ActionError> {
        validate_column(column)?;
        self.rewrite(id, |task| task.column = Some(column.to_string()))?;
        Ok(())
    }

    pub fn mark_done(&mut self, id: &str) -> Result<(), ActionError> {
        self.rewrite(id, |task| task.done = true)?;
        Ok(())
    }

    /// Replace the task's text. Line breaks collapse to single spaces;
    /// trailing `#tag` words end up as tags.
    pub fn update_content(&mut self, id: &str, content: &str) -> Result<(), ActionError> {
        let content = single_line(content);
        self.rewrite(id, |task| task.content = content)?;
        Ok(())
    }

    /// Archive each task in turn. One read-modify-write finishes before the
    /// next starts. The first store failure stops the batch.
    pub fn archive_tasks<I, T>(&mut self, ids: I) -> Result<(), ActionError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for id in ids {
            self.rewrite(id.as_ref(), Task::archive)?;
        }
        Ok(())
    }

    /// Remove a task's line from its document.
    ///
    /// On success the task leaves the index, so repeating the call is a
    /// no-op rather than a second removal at the same row.
    pub fn delete_task(&mut self, id: &str) -> Result<(), ActionError> {
        let previous = self.index.task(id).map(serialize_task);
        let outcome = self.rewrite(id, Task::delete)?;

        if outcome == Some(RowOutcome::Written) {
            let location = self.index.locations.shift_remove(id);
            self.index.tasks.shift_remove(id);
            if let (Some(root), Some(line), Some(location)) =
                (&self.recovery_root, previous, location)
            {
                recovery::log_task_deletion(root, id, location.document.as_str(), &line);
            }
        }
        Ok(())
    }

    /// Open the task's document in the editor with the cursor on its row.
    /// Does not touch the document.
    pub fn view_file<E: Editor + ?Sized>(&self, id: &str, editor: &mut E) -> Result<(), ActionError> {
        let Some(location) = self.index.location(id) else {
            tracing::debug!(id, "no location for task, nothing to view");
            return Ok(());
        };
        editor.open(&location.document)?;
        editor.set_cursor(location.row)?;
        Ok(())
    }

    /// Create a blank task in `column`. See [`placement::add_new`].
    pub fn add_new<P, C>(
        &self,
        column: &str,
        origin: Anchor,
        settings: &P,
        chooser: &mut C,
    ) -> Result<Option<DocPath>, ActionError>
    where
        P: SettingsProvider + ?Sized,
        C: Chooser + ?Sized,
    {
        placement::add_new(self.store, settings, chooser, &self.board, column, origin)
    }

    /// Shared template for line edits. `None` when the id was not found.
    fn rewrite<F>(&mut self, id: &str, mutate: F) -> Result<Option<RowOutcome>, StoreError>
    where
        F: FnOnce(&mut Task),
    {
        let index = &mut *self.index;
        let (Some(task), Some(location)) = (index.tasks.get_mut(id), index.locations.get(id))
        else {
            tracing::debug!(id, "task not in index, skipping");
            return Ok(None);
        };
        mutate(task);
        let line = serialize_task(task);
        if let Some(settled) = parse_task_line(id, &line, &index.columns) {
            *task = settled;
        }

        update_row(self.store, &location.document, Some(location.row), &line).map(Some)
    }
}

/// `text` on one line: line breaks become single spaces, ends are trimmed.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
