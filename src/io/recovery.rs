use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use tempfile::NamedTempFile;

/// Past this size the log drops stale entries before appending (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries older than this many days are pruned by default.
pub const PRUNE_AGE_DAYS: i64 = 30;

const LOG_FILE: &str = ".lanes-recovery.log";

const FILE_HEADER: &str = "\
<!-- lanes recovery log: append-only
     Task lines `lanes delete` removed, and document content that could
     not be saved. View with `lanes recovery`, trim with
     `lanes recovery prune`. Safe to delete. -->
";

const ENTRY_END: &str = "---";
const BODY_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryCategory {
    /// A document write failed; the body is the content that was not saved
    Write,
    /// A task line was removed; the body is the removed line
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecoveryCategory::Write => "write",
            RecoveryCategory::Delete => "delete",
        })
    }
}

impl std::str::FromStr for RecoveryCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "write" => Ok(RecoveryCategory::Write),
            "delete" => Ok(RecoveryCategory::Delete),
            _ => Err(()),
        }
    }
}

/// One block of the recovery log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    /// Workspace-relative document the text came from (or was bound for)
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn failed_write(document: &str, error: &io::Error, content: &str) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Write,
            document: document.to_string(),
            task: None,
            error: Some(error.to_string()),
            body: content.to_string(),
        }
    }

    pub fn deleted_line(task_id: &str, document: &str, line: &str) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Delete,
            document: document.to_string(),
            task: Some(task_id.to_string()),
            error: None,
            body: line.to_string(),
        }
    }

    /// The entry as it appears in the log. Body lines are indented four
    /// spaces so no document text can be mistaken for the entry separator.
    ///
    /// ```text
    /// ## 2026-01-02T03:04:05Z delete board.md
    /// task: board.md:2
    ///
    ///     - [ ] buy milk #todo
    /// ---
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {} {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.category,
            self.document
        );
        if let Some(task) = &self.task {
            out.push_str(&format!("task: {}\n", task));
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("error: {}\n", error.replace('\n', " ")));
        }
        out.push('\n');
        for line in self.body.split('\n') {
            out.push_str(BODY_INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(ENTRY_END);
        out.push('\n');
        out
    }

    /// Parse the lines of one block. `None` if the header is unreadable.
    fn parse(block: &[&str]) -> Option<Self> {
        let mut lines = block.iter().copied().skip_while(|l| !l.starts_with("## "));
        let header = lines.next()?.strip_prefix("## ")?;
        let mut parts = header.splitn(3, ' ');
        let timestamp = DateTime::parse_from_rfc3339(parts.next()?)
            .ok()?
            .with_timezone(&Utc);
        let category = parts.next()?.parse().ok()?;
        let document = parts.next().unwrap_or_default().to_string();

        let mut entry = RecoveryEntry {
            timestamp,
            category,
            document,
            task: None,
            error: None,
            body: String::new(),
        };
        let mut body = Vec::new();
        for line in lines {
            if let Some(text) = line.strip_prefix(BODY_INDENT) {
                body.push(text);
            } else if let Some(task) = line.strip_prefix("task: ") {
                entry.task = Some(task.to_string());
            } else if let Some(error) = line.strip_prefix("error: ") {
                entry.error = Some(error.to_string());
            }
        }
        entry.body = body.join("\n");
        Some(entry)
    }
}

/// Path to the recovery log of the workspace at `root`.
pub fn recovery_log_path(root: &Path) -> PathBuf {
    root.join(LOG_FILE)
}

/// Replace `path` with `content` through a temp file in the same folder,
/// so readers see the old content or the new, never a partial write.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append `entry` to the log. Never fails the caller; problems are warned.
pub fn log_recovery(root: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(root, &entry) {
        tracing::warn!(category = %entry.category, document = %entry.document, "could not write to recovery log: {}", e);
    }
}

pub fn log_task_deletion(root: &Path, task_id: &str, document: &str, line: &str) {
    log_recovery(root, RecoveryEntry::deleted_line(task_id, document, line));
}

fn append_entry(root: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(root);
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    if size > MAX_LOG_SIZE {
        let cutoff = Utc::now() - Duration::days(PRUNE_AGE_DAYS);
        let kept: Vec<_> = parse_log(&fs::read_to_string(&path)?)
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect();
        atomic_write(&path, render_log(&kept).as_bytes())?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if size == 0 {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

fn parse_log(content: &str) -> Vec<RecoveryEntry> {
    let lines: Vec<&str> = content.lines().collect();
    lines
        .split(|l| *l == ENTRY_END)
        .filter_map(RecoveryEntry::parse)
        .collect()
}

fn render_log(entries: &[RecoveryEntry]) -> String {
    let mut out = FILE_HEADER.to_string();
    for entry in entries {
        out.push_str(&entry.to_markdown());
    }
    out
}

/// Entries newest first, at most `limit` of them. A missing or unreadable
/// log reads as empty.
pub fn read_recovery_entries(root: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let Ok(content) = fs::read_to_string(recovery_log_path(root)) else {
        return Vec::new();
    };
    let mut entries = parse_log(&content);
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

/// Drop entries older than `before` (default: [`PRUNE_AGE_DAYS`] ago), or
/// every entry with `all`. Returns how many were removed. Blocks that no
/// longer parse are dropped too.
pub fn prune_recovery(root: &Path, before: Option<DateTime<Utc>>, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(root);
    if !path.exists() {
        return Ok(0);
    }

    let entries = parse_log(&fs::read_to_string(&path)?);
    let total = entries.len();
    let cutoff = before.unwrap_or_else(|| Utc::now() - Duration::days(PRUNE_AGE_DAYS));
    let kept: Vec<_> = entries
        .into_iter()
        .filter(|e| !all && e.timestamp >= cutoff)
        .collect();

    atomic_write(&path, render_log(&kept).as_bytes())?;
    Ok(total - kept.len())
}
