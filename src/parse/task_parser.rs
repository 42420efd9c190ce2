use std::sync::LazyLock;

use regex::Regex;

use crate::model::task::{ARCHIVED_TAG, Lifecycle, Task};

/// `<indent>- [<mark>]` optionally followed by ` <rest>`
static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)- \[(?P<mark>[ xX])\](?: (?P<rest>.*))?$")
        .expect("task line regex is valid")
});

/// Whether `line` is a checklist item
pub fn is_task_line(line: &str) -> bool {
    TASK_LINE.is_match(line)
}

/// Parse one checklist line into a task with the given identity.
///
/// The last trailing tag naming one of `columns` (or `archived`) fills the
/// column slot; the remaining trailing tags stay in `tags`, in order.
/// Returns `None` for lines that are not checklist items.
pub fn parse_task_line(id: &str, line: &str, columns: &[String]) -> Option<Task> {
    let caps = TASK_LINE.captures(line)?;
    let indent = caps.name("indent").map_or("", |m| m.as_str());
    let done = caps.name("mark").is_some_and(|m| m.as_str() != " ");
    let rest = caps.name("rest").map_or("", |m| m.as_str());

    let (content, mut tags) = parse_title_and_tags(rest);

    let column_pos = tags
        .iter()
        .rposition(|t| t == ARCHIVED_TAG || columns.iter().any(|c| c == t));
    let (column, lifecycle) = match column_pos.map(|pos| tags.remove(pos)) {
        Some(tag) if tag == ARCHIVED_TAG => (None, Lifecycle::Archived),
        Some(tag) => (Some(tag), Lifecycle::Live),
        None => (None, Lifecycle::Live),
    };

    Some(Task {
        id: id.to_string(),
        column,
        done,
        content: content.trim_start().to_string(),
        tags,
        indent: indent.to_string(),
        lifecycle,
    })
}

/// Split a string into title and tags. Tags are `#word` tokens at the end.
pub fn parse_title_and_tags(s: &str) -> (String, Vec<String>) {
    let s = s.trim_end();
    if s.is_empty() {
        return (String::new(), Vec::new());
    }

    // Collect tags from the end
    let mut tags = Vec::new();
    let mut remaining = s;

    loop {
        let trimmed = remaining.trim_end();
        if trimmed.is_empty() {
            break;
        }

        let (head, last_word) = match trimmed.rfind(' ') {
            Some(last_space) => (&trimmed[..last_space], &trimmed[last_space + 1..]),
            None => ("", trimmed),
        };
        match last_word.strip_prefix('#') {
            Some(tag) if !tag.is_empty() && !tag.contains('#') => {
                tags.push(tag.to_string());
                remaining = head;
            }
            _ => break,
        }
    }

    tags.reverse();
    (remaining.trim_end().to_string(), tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["todo".to_string(), "doing".to_string()]
    }

    #[test]
    fn test_parse_open_task_with_column() {
        let task = parse_task_line("a.md:0", "- [ ] buy milk #todo", &columns()).unwrap();
        assert_eq!(task.id, "a.md:0");
        assert!(!task.done);
        assert_eq!(task.content, "buy milk");
        assert_eq!(task.column.as_deref(), Some("todo"));
        assert!(task.tags.is_empty());
        assert_eq!(task.lifecycle, Lifecycle::Live);
    }

    #[test]
    fn test_parse_done_marks() {
        for line in ["- [x] ship it #doing", "- [X] ship it #doing"] {
            let task = parse_task_line("id", line, &columns()).unwrap();
            assert!(task.done, "{line}");
        }
    }

    #[test]
    fn test_non_column_tags_are_kept() {
        let task =
            parse_task_line("id", "- [ ] fix login #bug #doing #urgent", &columns()).unwrap();
        assert_eq!(task.content, "fix login");
        assert_eq!(task.column.as_deref(), Some("doing"));
        assert_eq!(task.tags, vec!["bug", "urgent"]);
    }

    #[test]
    fn test_unknown_column_is_uncategorised() {
        let task = parse_task_line("id", "- [ ] idea #someday", &columns()).unwrap();
        assert_eq!(task.column, None);
        assert_eq!(task.tags, vec!["someday"]);
    }

    #[test]
    fn test_archived_tag() {
        let task = parse_task_line("id", "- [x] old #archived", &columns()).unwrap();
        assert_eq!(task.lifecycle, Lifecycle::Archived);
        assert_eq!(task.column, None);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_empty_content_line() {
        let task = parse_task_line("id", "- [ ]  #doing", &columns()).unwrap();
        assert_eq!(task.content, "");
        assert_eq!(task.column.as_deref(), Some("doing"));

        let bare = parse_task_line("id", "- [ ]", &columns()).unwrap();
        assert_eq!(bare.content, "");
        assert_eq!(bare.column, None);
    }

    #[test]
    fn test_indent_is_captured() {
        let task = parse_task_line("id", "    - [ ] nested #todo", &columns()).unwrap();
        assert_eq!(task.indent, "    ");
    }

    #[test]
    fn test_inline_hash_is_content() {
        let task = parse_task_line("id", "- [ ] issue #12 is open #todo", &columns()).unwrap();
        assert_eq!(task.content, "issue #12 is open");
    }

    #[test]
    fn test_non_task_lines() {
        for line in ["# Board", "", "- plain bullet", "-[ ] no space", "- [?] odd mark"] {
            assert!(parse_task_line("id", line, &columns()).is_none(), "{line:?}");
            assert!(!is_task_line(line));
        }
    }

    #[test]
    fn test_parse_title_and_tags() {
        let (title, tags) = parse_title_and_tags("Fix parser #bug #ready");
        assert_eq!(title, "Fix parser");
        assert_eq!(tags, vec!["bug", "ready"]);

        let (title, tags) = parse_title_and_tags("#solo");
        assert_eq!(title, "");
        assert_eq!(tags, vec!["solo"]);

        let (title, tags) = parse_title_and_tags("C# is fine");
        assert_eq!(title, "C# is fine");
        assert!(tags.is_empty());
    }
}
