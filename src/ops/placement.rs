use indexmap::IndexMap;

use crate::io::config_io::SettingsProvider;
use crate::io::store::{DocPath, DocumentStore, StoreError};
use crate::model::task::Task;
use crate::ops::actions::ActionError;
use crate::ops::row_sync::update_row;
use crate::parse::serialize_task;

/// Horizontal offset of each nested menu from its parent
pub const SUBMENU_OFFSET: i32 = 24;

/// Screen position a menu is anchored at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    /// Anchor of the menu `depth` levels below the one at `self`
    pub fn nested(self, depth: usize) -> Anchor {
        Anchor {
            x: self.x + SUBMENU_OFFSET * depth as i32,
            y: self.y,
        }
    }
}

// ---------------------------------------------------------------------------
// Default path resolution
// ---------------------------------------------------------------------------

/// Resolve a configured default task path against the active board.
///
/// A path starting with `/` is workspace-absolute; anything else is relative
/// to the board document's folder. Repeated separators collapse.
pub fn resolve_task_path(default_path: &str, board: &DocPath) -> DocPath {
    if default_path.starts_with('/') {
        return DocPath::new(default_path);
    }
    DocPath::new(&format!("{}/{}", board.parent(), default_path))
}

/// Full resolution: [`resolve_task_path`], then append `.{extension}` when
/// the result has no extension and is not an existing folder.
pub fn resolve_default_document<S: DocumentStore + ?Sized>(
    store: &S,
    default_path: &str,
    board: &DocPath,
    extension: &str,
) -> Result<DocPath, StoreError> {
    let path = resolve_task_path(default_path, board);
    if path.extension().is_none() && !store.is_folder(&path)? {
        return Ok(path.with_extension(extension));
    }
    Ok(path)
}

/// Make sure `doc` and its folder exist, creating them empty if missing.
pub fn ensure_document<S: DocumentStore + ?Sized>(store: &S, doc: &DocPath) -> Result<(), StoreError> {
    let folder = DocPath::new(doc.parent());
    if !folder.as_str().is_empty() && !store.exists(&folder)? {
        store.create_folder(&folder)?;
    }
    if !store.exists(doc)? {
        store.create(doc, "")?;
    }
    Ok(())
}

/// The line a new task in `column` starts as: `- [ ]  #column`
pub fn new_task_line(column: &str) -> String {
    serialize_task(&Task::blank(String::new(), column))
}

// ---------------------------------------------------------------------------
// Interactive chooser
// ---------------------------------------------------------------------------

/// One node of the document chooser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserNode {
    Folder(ChooserTree),
    Document(DocPath),
}

/// Documents grouped by path segment. Entries keep the order of the sorted
/// document paths they were folded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChooserTree {
    pub entries: IndexMap<String, ChooserNode>,
}

impl ChooserTree {
    /// Fold document paths into a tree keyed by segment.
    pub fn build(docs: &[DocPath]) -> Self {
        let mut sorted: Vec<&DocPath> = docs.iter().collect();
        sorted.sort();

        let mut root = ChooserTree::default();
        for doc in sorted {
            root.insert(doc);
        }
        root
    }

    fn insert(&mut self, doc: &DocPath) {
        let segments: Vec<&str> = doc.segments().collect();
        let Some((leaf, folders)) = segments.split_last() else {
            return;
        };

        let mut node = self;
        for segment in folders {
            let entry = node
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| ChooserNode::Folder(ChooserTree::default()));
            match entry {
                ChooserNode::Folder(tree) => node = tree,
                // A document already holds this label; keep it
                ChooserNode::Document(_) => return,
            }
        }
        node.entries
            .entry(leaf.to_string())
            .or_insert_with(|| ChooserNode::Document(doc.clone()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of a chooser menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry<'a> {
    pub label: &'a str,
    pub is_folder: bool,
}

/// The presentation side of the chooser: shows one menu level.
pub trait Chooser {
    /// Show `entries` anchored at `anchor`, `depth` levels deep. Returns the
    /// picked index, or `None` to close this menu (back out one level).
    fn choose(&mut self, anchor: Anchor, depth: usize, entries: &[MenuEntry<'_>]) -> Option<usize>;
}

/// Walk the tree with a stack of menus until a document is picked.
/// Closing the top-level menu cancels (`None`).
pub fn choose_document<C: Chooser + ?Sized>(
    tree: &ChooserTree,
    origin: Anchor,
    chooser: &mut C,
) -> Option<DocPath> {
    let mut stack: Vec<&ChooserTree> = vec![tree];

    while let Some(current) = stack.last().copied() {
        let depth = stack.len() - 1;
        let entries: Vec<MenuEntry<'_>> = current
            .entries
            .iter()
            .map(|(label, node)| MenuEntry {
                label,
                is_folder: matches!(node, ChooserNode::Folder(_)),
            })
            .collect();

        let picked = chooser
            .choose(origin.nested(depth), depth, &entries)
            .and_then(|i| current.entries.get_index(i));
        match picked {
            Some((_, ChooserNode::Folder(sub))) => stack.push(sub),
            Some((_, ChooserNode::Document(doc))) => return Some(doc.clone()),
            None => {
                stack.pop();
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Task creation
// ---------------------------------------------------------------------------

/// Append a new blank task in `column` to the document the user placed it in.
///
/// With a default task path configured (read now, not cached) the task goes
/// there, creating folder and document as needed. Otherwise the user picks
/// a document from every document in the store. Returns the document
/// written, or `None` if the chooser was cancelled.
pub fn add_new<S, P, C>(
    store: &S,
    settings: &P,
    chooser: &mut C,
    board: &DocPath,
    column: &str,
    origin: Anchor,
) -> Result<Option<DocPath>, ActionError>
where
    S: DocumentStore + ?Sized,
    P: SettingsProvider + ?Sized,
    C: Chooser + ?Sized,
{
    let line = new_task_line(column);

    if let Some(default_path) = settings.default_task_path()? {
        let extension = settings.default_extension()?;
        let doc = resolve_default_document(store, &default_path, board, &extension)?;
        ensure_document(store, &doc)?;
        update_row(store, &doc, None, &line)?;
        return Ok(Some(doc));
    }

    let tree = ChooserTree::build(&store.list_documents()?);
    match choose_document(&tree, origin, chooser) {
        Some(doc) => {
            update_row(store, &doc, None, &line)?;
            Ok(Some(doc))
        }
        None => {
            tracing::debug!(column, "document chooser closed, no task added");
            Ok(None)
        }
    }
}
