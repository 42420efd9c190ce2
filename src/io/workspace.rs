use std::path::{Path, PathBuf};

use crate::io::config_io::{self, CONFIG_FILE, ConfigError};
use crate::io::store::{DocPath, FsStore};
use crate::model::config::LanesConfig;

/// Error type for workspace discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a lanes workspace: no .lanes.toml found (run `lanes init`)")]
    NotAWorkspace,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A discovered workspace: its root, parsed config and document store
#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: LanesConfig,
    pub store: FsStore,
}

impl Workspace {
    /// The active board document
    pub fn board_doc(&self) -> DocPath {
        DocPath::new(&self.config.board.file)
    }

    pub fn columns(&self) -> &[String] {
        &self.config.board.columns
    }
}

/// Discover the workspace by walking up from the given directory, looking
/// for a `.lanes.toml` file.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Load the workspace rooted at `root`.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let (config, _) = config_io::read_config(root)?;
    Ok(Workspace {
        root: root.to_path_buf(),
        config,
        store: FsStore::new(root),
    })
}
