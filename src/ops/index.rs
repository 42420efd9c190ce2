use crate::io::store::{DocPath, DocumentStore, StoreError};
use crate::model::board::{BoardIndex, TaskLocation};
use crate::model::document::Document;
use crate::parse::parse_task_line;

/// Identity of the task on `row` of `doc`
pub fn task_id(doc: &DocPath, row: usize) -> String {
    format!("{}:{}", doc, row)
}

/// Scan every document in the store and build the task and location maps
/// together. Any read failure aborts the scan.
pub fn build_index<S: DocumentStore + ?Sized>(
    store: &S,
    columns: &[String],
) -> Result<BoardIndex, StoreError> {
    let mut index = BoardIndex {
        columns: columns.to_vec(),
        ..BoardIndex::default()
    };
    for doc in store.list_documents()? {
        index_document(store, &doc, columns, &mut index)?;
    }
    tracing::debug!(tasks = index.len(), "index built");
    Ok(index)
}

/// Add the tasks of one document to `index`.
pub fn index_document<S: DocumentStore + ?Sized>(
    store: &S,
    doc: &DocPath,
    columns: &[String],
    index: &mut BoardIndex,
) -> Result<(), StoreError> {
    let text = store.read(doc)?;
    for (row, line) in Document::from_text(&text).lines().iter().enumerate() {
        if let Some(task) = parse_task_line(&task_id(doc, row), line, columns) {
            index.insert(
                task,
                TaskLocation {
                    document: doc.clone(),
                    row,
                },
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory_store::MemoryStore;

    fn columns() -> Vec<String> {
        vec!["todo".to_string(), "doing".to_string()]
    }

    #[test]
    fn test_build_index_maps_rows() {
        let store = MemoryStore::new()
            .with_document("board.md", "# Board\n\n- [ ] buy milk #todo\n- [x] walk dog #doing\n")
            .with_document("notes.md", "prose\n  - [ ] nested #todo");

        let index = build_index(&store, &columns()).unwrap();
        assert_eq!(index.len(), 3);

        let milk = index.task("board.md:2").unwrap();
        assert_eq!(milk.content, "buy milk");
        assert_eq!(
            index.location("board.md:2"),
            Some(&TaskLocation {
                document: DocPath::new("board.md"),
                row: 2,
            })
        );
        assert!(index.task("board.md:3").unwrap().done);
        assert_eq!(index.location("notes.md:1").unwrap().row, 1);
        assert!(index.task("board.md:0").is_none());
    }

    #[test]
    fn test_index_order_follows_documents_then_rows() {
        let store = MemoryStore::new()
            .with_document("b.md", "- [ ] b0 #todo")
            .with_document("a.md", "- [ ] a0 #todo\n- [ ] a1 #todo");
        let index = build_index(&store, &columns()).unwrap();
        let ids: Vec<&str> = index.tasks.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["a.md:0", "a.md:1", "b.md:0"]);
    }

    #[test]
    fn test_empty_store() {
        let index = build_index(&MemoryStore::new(), &columns()).unwrap();
        assert!(index.is_empty());
    }
}
