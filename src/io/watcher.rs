use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::config_io::CONFIG_FILE;

/// One or more documents (or the config) changed on disk.
#[derive(Debug)]
pub struct Changed(pub Vec<PathBuf>);

/// A file system watcher for the workspace directory.
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Changed>,
}

impl WorkspaceWatcher {
    /// Start watching the workspace rooted at `root`.
    pub fn start(root: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let root_owned = root.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| p.starts_with(&root_owned) && is_relevant(p))
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(WorkspaceWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Block until at least one change arrives, then drain the queue so a
    /// burst of events yields one rescan. `None` if the watcher stopped.
    pub fn wait(&self, debounce: Duration) -> Option<Vec<PathBuf>> {
        let Changed(mut paths) = self.rx.recv().ok()?;
        std::thread::sleep(debounce);
        while let Ok(Changed(more)) = self.rx.try_recv() {
            paths.extend(more);
        }
        Some(paths)
    }
}

/// Markdown documents and the config count; hidden files and the atomic
/// write temp files do not.
fn is_relevant(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == CONFIG_FILE {
        return true;
    }
    !name.starts_with('.') && path.extension().and_then(|e| e.to_str()) == Some("md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("/ws/board.md")));
        assert!(is_relevant(Path::new("/ws/projects/tasks/inbox.md")));
        assert!(is_relevant(Path::new("/ws/.lanes.toml")));
        assert!(!is_relevant(Path::new("/ws/.lanes-recovery.log")));
        assert!(!is_relevant(Path::new("/ws/.tmpA1b2c3")));
        assert!(!is_relevant(Path::new("/ws/notes.txt")));
    }
}
