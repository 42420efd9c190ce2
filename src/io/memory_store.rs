use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::PathBuf;

use crate::io::store::{DocPath, DocumentStore, StoreError};

/// In-memory store. Counts reads and writes so callers can check the
/// one-read, at-most-one-write contract; can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<BTreeMap<DocPath, String>>,
    folders: RefCell<BTreeSet<DocPath>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document without counting a write
    pub fn with_document(self, path: &str, text: &str) -> Self {
        self.docs
            .borrow_mut()
            .insert(DocPath::new(path), text.to_string());
        self
    }

    pub fn with_folder(self, path: &str) -> Self {
        self.folders.borrow_mut().insert(DocPath::new(path));
        self
    }

    /// Current content of a document
    pub fn text(&self, path: &str) -> Option<String> {
        self.docs.borrow().get(&DocPath::new(path)).cloned()
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.borrow().contains(&DocPath::new(path))
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn not_found(path: &DocPath) -> StoreError {
        StoreError::ReadError {
            path: PathBuf::from(path.as_str()),
            source: io::Error::from(io::ErrorKind::NotFound),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, doc: &DocPath) -> Result<String, StoreError> {
        self.reads.set(self.reads.get() + 1);
        self.docs
            .borrow()
            .get(doc)
            .cloned()
            .ok_or_else(|| Self::not_found(doc))
    }

    fn modify(&self, doc: &DocPath, text: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::WriteError {
                path: PathBuf::from(doc.as_str()),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        let mut docs = self.docs.borrow_mut();
        let slot = docs.get_mut(doc).ok_or_else(|| Self::not_found(doc))?;
        *slot = text.to_string();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn exists(&self, path: &DocPath) -> Result<bool, StoreError> {
        Ok(self.docs.borrow().contains_key(path) || self.folders.borrow().contains(path))
    }

    fn is_folder(&self, path: &DocPath) -> Result<bool, StoreError> {
        Ok(self.folders.borrow().contains(path))
    }

    fn create(&self, path: &DocPath, text: &str) -> Result<DocPath, StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::CreateError {
                path: PathBuf::from(path.as_str()),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        if self.exists(path)? {
            return Err(StoreError::AlreadyExists {
                path: PathBuf::from(path.as_str()),
            });
        }
        self.docs.borrow_mut().insert(path.clone(), text.to_string());
        Ok(path.clone())
    }

    fn create_folder(&self, path: &DocPath) -> Result<(), StoreError> {
        let mut folders = self.folders.borrow_mut();
        let mut prefix = String::new();
        for segment in path.segments() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            folders.insert(DocPath::new(&prefix));
        }
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<DocPath>, StoreError> {
        Ok(self.docs.borrow().keys().cloned().collect())
    }
}
