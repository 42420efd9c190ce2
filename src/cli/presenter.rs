use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use crate::io::store::DocPath;
use crate::ops::actions::Editor;
use crate::ops::placement::{Anchor, Chooser, MenuEntry};

/// Opens documents in `$VISUAL` / `$EDITOR` (falling back to `vi`).
///
/// `open` only remembers the document; `set_cursor` launches the editor as
/// `<editor> +<line> <path>` and waits for it to exit.
pub struct ExternalEditor {
    root: PathBuf,
    command: String,
    pending: Option<PathBuf>,
}

impl ExternalEditor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let command = std::env::var("VISUAL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_string());
        ExternalEditor {
            root: root.into(),
            command,
            pending: None,
        }
    }
}

impl Editor for ExternalEditor {
    fn open(&mut self, doc: &DocPath) -> io::Result<()> {
        self.pending = Some(self.root.join(doc.as_str()));
        Ok(())
    }

    fn set_cursor(&mut self, row: usize) -> io::Result<()> {
        let path = self
            .pending
            .take()
            .ok_or_else(|| io::Error::other("no document open"))?;
        let mut parts = self.command.split_whitespace();
        let program = parts.next().unwrap_or("vi");

        tracing::debug!(editor = program, path = %path.display(), row, "launching editor");
        let status = Command::new(program)
            .args(parts)
            .arg(format!("+{}", row + 1))
            .arg(&path)
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!("{} exited with {}", program, status)));
        }
        Ok(())
    }
}

/// A numbered menu on a line-oriented terminal.
///
/// Nested menus are indented by their depth. Answer with an entry number,
/// `..` to go back one level, or `q` to cancel the whole chooser.
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
    cancelled: bool,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptChooser {
            input,
            output,
            cancelled: false,
        }
    }

    fn show(&mut self, depth: usize, entries: &[MenuEntry<'_>]) -> io::Result<()> {
        let indent = "  ".repeat(depth);
        for (i, entry) in entries.iter().enumerate() {
            let suffix = if entry.is_folder { "/" } else { "" };
            writeln!(self.output, "{}{:>2}) {}{}", indent, i + 1, entry.label, suffix)?;
        }
        let back = if depth > 0 { ", .. back" } else { "" };
        write!(self.output, "{}document [1-{}{}, q cancel]: ", indent, entries.len(), back)?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Chooser for PromptChooser<R, W> {
    fn choose(&mut self, _anchor: Anchor, depth: usize, entries: &[MenuEntry<'_>]) -> Option<usize> {
        if self.cancelled {
            return None;
        }
        if entries.is_empty() {
            writeln!(self.output, "no documents in this workspace").ok()?;
            return None;
        }

        loop {
            self.show(depth, entries).ok()?;
            let mut line = String::new();
            if self.input.read_line(&mut line).ok()? == 0 {
                self.cancelled = true;
                return None;
            }
            match line.trim() {
                ".." => return None,
                "q" | "" => {
                    self.cancelled = true;
                    return None;
                }
                answer => match answer.parse::<usize>() {
                    Ok(n) if (1..=entries.len()).contains(&n) => return Some(n - 1),
                    _ => {
                        writeln!(self.output, "not a menu entry: {}", answer).ok()?;
                    }
                },
            }
        }
    }
}
