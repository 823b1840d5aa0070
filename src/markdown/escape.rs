//! Pure string utilities for Markdown generation.

/// Escape backticks for use inside an inline code span.
///
/// This is the one content-level escape the transformer performs: a
/// backtick inside inline-code text would otherwise terminate the span.
///
/// # Examples
///
/// ```
/// use chatmark::markdown::escape_backticks;
///
/// assert_eq!(escape_backticks("a `b` c"), "a \\`b\\` c");
/// assert_eq!(escape_backticks("plain"), "plain");
/// ```
pub fn escape_backticks(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '`' {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Collapse runs of three or more newlines to exactly two.
///
/// Applied at every boundary that joins multiple child fragments, and once
/// more over the assembled document, so paragraph spacing is preserved
/// without unbounded blank-line growth.
///
/// # Examples
///
/// ```
/// use chatmark::markdown::collapse_blank_runs;
///
/// assert_eq!(collapse_blank_runs("a\n\n\n\nb"), "a\n\nb");
/// assert_eq!(collapse_blank_runs("a\n\nb"), "a\n\nb");
/// ```
pub fn collapse_blank_runs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                result.push('\n');
            }
        } else {
            run = 0;
            result.push(c);
        }
    }
    result
}

/// Collapse runs of newlines to a single space (for single-line contexts
/// like headings and link labels).
pub(crate) fn newlines_to_spaces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == '\n' {
            if !in_run {
                result.push(' ');
                in_run = true;
            }
        } else {
            in_run = false;
            result.push(c);
        }
    }
    result
}

/// Collapse runs of newlines to a single newline (for list items, where
/// blank lines would break the item apart).
pub(crate) fn squeeze_newlines(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == '\n' {
            if !in_run {
                result.push('\n');
                in_run = true;
            }
        } else {
            in_run = false;
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backticks() {
        assert_eq!(escape_backticks("`"), "\\`");
        assert_eq!(escape_backticks("``"), "\\`\\`");
        assert_eq!(escape_backticks("no ticks"), "no ticks");
    }

    #[test]
    fn test_collapse_blank_runs() {
        assert_eq!(collapse_blank_runs(""), "");
        assert_eq!(collapse_blank_runs("\n"), "\n");
        assert_eq!(collapse_blank_runs("\n\n"), "\n\n");
        assert_eq!(collapse_blank_runs("\n\n\n"), "\n\n");
        assert_eq!(collapse_blank_runs("a\n\n\n\n\nb\n\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_newlines_to_spaces() {
        assert_eq!(newlines_to_spaces("a\nb"), "a b");
        assert_eq!(newlines_to_spaces("a\n\n\nb"), "a b");
    }

    #[test]
    fn test_squeeze_newlines() {
        assert_eq!(squeeze_newlines("a\n\nb\nc"), "a\nb\nc");
    }
}
