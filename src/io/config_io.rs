use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::LanesConfig;

/// Name of the workspace config file
pub const CONFIG_FILE: &str = ".lanes.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse .lanes.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit .lanes.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Read the workspace config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(root: &Path) -> Result<(LanesConfig, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(root);
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: LanesConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(root: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = config_path(root);
    crate::io::recovery::atomic_write(&path, doc.to_string().as_bytes())
        .map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Set `board.default_task_path` in the config document
pub fn set_default_task_path(doc: &mut toml_edit::DocumentMut, value: &str) {
    if !doc.contains_key("board") {
        doc["board"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["board"]["default_task_path"] = toml_edit::value(value);
}

/// Read access to the one setting task creation needs.
pub trait SettingsProvider {
    /// The default task path, or `None` when unset or blank
    fn default_task_path(&self) -> Result<Option<String>, ConfigError>;

    /// Extension appended to an extensionless default task path
    fn default_extension(&self) -> Result<String, ConfigError>;
}

/// Settings read from `.lanes.toml` on every call, never cached, so edits
/// made while a board is open apply to the next task created.
#[derive(Debug, Clone)]
pub struct FileSettings {
    root: PathBuf,
}

impl FileSettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSettings { root: root.into() }
    }
}

impl SettingsProvider for FileSettings {
    fn default_task_path(&self) -> Result<Option<String>, ConfigError> {
        let (config, _) = read_config(&self.root)?;
        Ok(config.board.default_task_path().map(str::to_string))
    }

    fn default_extension(&self) -> Result<String, ConfigError> {
        let (config, _) = read_config(&self.root)?;
        Ok(config.board.default_extension)
    }
}
