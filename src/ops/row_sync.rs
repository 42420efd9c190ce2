use crate::io::store::{DocPath, DocumentStore, StoreError};
use crate::model::document::Document;

/// What `update_row` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// The document was rewritten
    Written,
    /// The row was past the end of the document; nothing was written
    Stale,
}

/// Rewrite one line of `doc`.
///
/// Reads the document fresh, applies [`Document::patch_row`] and writes the
/// whole content back: one read, at most one write. `row == None` appends;
/// an empty `text` removes the row. A row past the end means the index is
/// stale, so the call is skipped without error. Store failures propagate
/// and are not retried.
pub fn update_row<S: DocumentStore + ?Sized>(
    store: &S,
    doc: &DocPath,
    row: Option<usize>,
    text: &str,
) -> Result<RowOutcome, StoreError> {
    let current = Document::from_text(&store.read(doc)?);
    let line_count = current.len();

    let Some(patched) = current.patch_row(row, text) else {
        tracing::debug!(
            document = %doc,
            row = row.unwrap_or(line_count),
            line_count,
            "row past end of document, skipping stale update"
        );
        return Ok(RowOutcome::Stale);
    };

    store.modify(doc, &patched.to_text())?;
    let action = match (row, text.is_empty()) {
        (_, true) => "remove",
        (None, false) => "append",
        (Some(_), false) => "replace",
    };
    tracing::info!(document = %doc, row = row.unwrap_or(line_count), action, "row updated");
    Ok(RowOutcome::Written)
}
