//! Indentation handling for generated snippets
//!
//! Snippets are written at column 0 and shifted to the indentation of the
//! place they land in.

/// Prefix every line after the first with `indent`.
///
/// The first line is left alone because it continues wherever the insertion
/// point already is. Lines that are completely empty stay empty.
pub fn indent_continuation(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

/// Indentation unit used by `text`: the smallest step by which a line is
/// indented deeper than the code line before it, or a tab when lines are
/// tab-indented. Block-comment continuation lines (` * ...`) and one-column
/// steps are not indentation. `fallback` when nothing is indented.
pub fn infer_unit(text: &str, fallback: &str) -> String {
    let mut smallest: Option<usize> = None;
    let mut previous = 0usize;
    for line in text.lines() {
        let code = line.trim_start();
        if code.is_empty() || code.starts_with('*') {
            continue;
        }
        if line.starts_with('\t') {
            return "\t".to_string();
        }
        let width = line.len() - line.trim_start_matches(' ').len();
        if width >= previous + 2 {
            let step = width - previous;
            smallest = Some(smallest.map_or(step, |s| s.min(step)));
        }
        previous = width;
    }
    smallest
        .map(|w| " ".repeat(w))
        .unwrap_or_else(|| fallback.to_string())
}
