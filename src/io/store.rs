use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::io::recovery::{self, RecoveryEntry};

/// Workspace-relative, `/`-separated document path. The document handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocPath(String);

impl DocPath {
    /// Build a path, collapsing repeated separators and dropping leading and
    /// trailing ones. `.` segments are dropped and `..` removes the segment
    /// before it, never climbing above the workspace root.
    pub fn new(path: &str) -> Self {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        }
        DocPath(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, e.g. `["projects", "board.md"]`
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The containing folder; empty for top-level documents.
    pub fn parent(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Extension of the last segment, if any. Dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }

    pub fn with_extension(&self, ext: &str) -> Self {
        DocPath(format!("{}.{}", self.0, ext))
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not create {path}: {source}")]
    CreateError { path: PathBuf, source: io::Error },
    #[error("could not create folder {path}: {source}")]
    CreateFolderError { path: PathBuf, source: io::Error },
    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// The store that owns the documents.
///
/// Every call is one round trip; nothing is cached between calls and
/// nothing is retried.
pub trait DocumentStore {
    fn read(&self, doc: &DocPath) -> Result<String, StoreError>;
    /// Replace the whole content of an existing document
    fn modify(&self, doc: &DocPath, text: &str) -> Result<(), StoreError>;
    fn exists(&self, path: &DocPath) -> Result<bool, StoreError>;
    fn is_folder(&self, path: &DocPath) -> Result<bool, StoreError>;
    /// Create a new document. Fails if it already exists.
    fn create(&self, path: &DocPath, text: &str) -> Result<DocPath, StoreError>;
    /// Create a folder and any missing parents. No-op if it exists.
    fn create_folder(&self, path: &DocPath) -> Result<(), StoreError>;
    /// Every document in the workspace, sorted by path
    fn list_documents(&self) -> Result<Vec<DocPath>, StoreError>;
}

/// Filesystem-backed store rooted at the workspace directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute filesystem path of a document
    pub fn full_path(&self, doc: &DocPath) -> PathBuf {
        doc.segments().fold(self.root.clone(), |acc, s| acc.join(s))
    }

    fn collect_documents(&self, dir: &Path, prefix: &str, out: &mut Vec<DocPath>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Skip dotfiles and dot-directories (.git, .lanes.toml, ...)
            if name.starts_with('.') {
                continue;
            }
            let rel = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", prefix, name)
            };
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.collect_documents(&entry.path(), &rel, out)?;
            } else if file_type.is_file() && name.ends_with(".md") {
                out.push(DocPath::new(&rel));
            }
        }
        Ok(())
    }
}

impl DocumentStore for FsStore {
    fn read(&self, doc: &DocPath) -> Result<String, StoreError> {
        let path = self.full_path(doc);
        fs::read_to_string(&path).map_err(|e| StoreError::ReadError { path, source: e })
    }

    fn modify(&self, doc: &DocPath, text: &str) -> Result<(), StoreError> {
        let path = self.full_path(doc);
        if let Err(e) = recovery::atomic_write(&path, text.as_bytes()) {
            recovery::log_recovery(&self.root, RecoveryEntry::failed_write(doc.as_str(), &e, text));
            return Err(StoreError::WriteError { path, source: e });
        }
        tracing::info!(document = %doc, "document written");
        Ok(())
    }

    fn exists(&self, path: &DocPath) -> Result<bool, StoreError> {
        Ok(self.full_path(path).try_exists()?)
    }

    fn is_folder(&self, path: &DocPath) -> Result<bool, StoreError> {
        let full = self.full_path(path);
        match fs::metadata(&full) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::ReadError {
                path: full,
                source: e,
            }),
        }
    }

    fn create(&self, path: &DocPath, text: &str) -> Result<DocPath, StoreError> {
        let full = self.full_path(path);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&full) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists { path: full });
            }
            Err(e) => return Err(StoreError::CreateError { path: full, source: e }),
        };
        file.write_all(text.as_bytes())
            .map_err(|e| StoreError::CreateError {
                path: full.clone(),
                source: e,
            })?;
        tracing::info!(document = %path, "document created");
        Ok(path.clone())
    }

    fn create_folder(&self, path: &DocPath) -> Result<(), StoreError> {
        let full = self.full_path(path);
        fs::create_dir_all(&full).map_err(|e| StoreError::CreateFolderError {
            path: full,
            source: e,
        })?;
        tracing::info!(folder = %path, "folder ensured");
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<DocPath>, StoreError> {
        let mut docs = Vec::new();
        self.collect_documents(&self.root, "", &mut docs)
            .map_err(|e| StoreError::ReadError {
                path: self.root.clone(),
                source: e,
            })?;
        docs.sort();
        Ok(docs)
    }
}
