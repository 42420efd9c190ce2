use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Terminal cells `s` occupies. A tab counts as 4.
pub fn display_width(s: &str) -> usize {
    let tabs = s.matches('\t').count();
    s.split('\t').map(UnicodeWidthStr::width).sum::<usize>() + tabs * 4
}

/// Exactly `cells` wide: cut at a grapheme boundary with a trailing `…`
/// when too long, padded with spaces when too short. A wide grapheme that
/// straddles the cut is dropped, and the gap padded.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = String::with_capacity(cells);
    let mut used = 0;

    if display_width(s) <= cells {
        out.push_str(s);
        used = display_width(s);
    } else if cells > 0 {
        let budget = cells - 1;
        for g in s.graphemes(true) {
            let w = display_width(g);
            if used + w > budget {
                break;
            }
            out.push_str(g);
            used += w;
        }
        out.push(ELLIPSIS);
        used += 1;
    }

    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcd", 4), "abcd");
        assert_eq!(fit_to_width("abcdef", 4), "abc\u{2026}");
        assert_eq!(fit_to_width("abc", 1), "\u{2026}");
        assert_eq!(fit_to_width("abc", 0), "");
    }

    #[test]
    fn test_fit_wide_graphemes() {
        // 日 (2) + … (1) = 3, padded to 4
        assert_eq!(fit_to_width("日本語", 4), "日\u{2026} ");
        assert_eq!(display_width(&fit_to_width("日本語", 5)), 5);
    }
}
