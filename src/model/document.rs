/// A document as an ordered sequence of lines.
///
/// Splitting is on `\n` only and joining is its exact inverse, so a trailing
/// newline shows up as a final empty line and survives a round trip. Row
/// indices are positions in this sequence; nothing here knows about tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        Document {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace line `idx`. Out-of-range indices leave the document unchanged.
    pub fn replace_at(mut self, idx: usize, text: &str) -> Self {
        if let Some(line) = self.lines.get_mut(idx) {
            *line = text.to_string();
        }
        self
    }

    /// Insert a line before `idx` (`idx == len` appends).
    pub fn insert_at(mut self, idx: usize, text: &str) -> Self {
        let idx = idx.min(self.lines.len());
        self.lines.insert(idx, text.to_string());
        self
    }

    /// Remove line `idx`. Out-of-range indices leave the document unchanged.
    pub fn remove_at(mut self, idx: usize) -> Self {
        if idx < self.lines.len() {
            self.lines.remove(idx);
        }
        self
    }

    /// Apply one row edit.
    ///
    /// - `row == None` appends `text` as a new last line.
    /// - `text == ""` removes the target line instead of blanking it.
    /// - otherwise the target line is replaced.
    ///
    /// Returns `None` when `row` is not a line of this document (stale
    /// position): the caller must not write anything.
    pub fn patch_row(self, row: Option<usize>, text: &str) -> Option<Self> {
        match row {
            None if text.is_empty() => Some(self),
            None => {
                let end = self.lines.len();
                Some(self.insert_at(end, text))
            }
            Some(idx) if idx >= self.lines.len() => None,
            Some(idx) if text.is_empty() => Some(self.remove_at(idx)),
            Some(idx) => Some(self.replace_at(idx, text)),
        }
    }
}
