//! Insertion planning
//!
//! A plan is pure data: the span of the working document to replace, the
//! text to put there and where the cursor should land afterwards. Recipes in
//! `dialects` build one from a `PlanRequest` with the splice helpers below.
//!
//! Snippets are written at column 0 with `CURSOR_MARK` where the cursor
//! should end up; `InsertionPlan::from_splice` strips the mark and derives the
//! cursor position from the text that precedes it.

use crate::collision::DeclarationTarget;
use crate::config::FastVarConfig;
use crate::errors::{CreateError, Result};
use crate::indentation::{indent_continuation, infer_unit};
use crate::kinds::{DeclarationKind, DialectKey, InitialValue};
use crate::resolver::CandidateName;
use fastvar_syntax::regions::{ComponentFunction, ContainerShape, FunctionBody, ObjectRegion};
use fastvar_syntax::{Classified, PatternName, PatternTable, Position, Range, ScriptBlock, SourceDocument};
use serde::Serialize;

/// Placeholder for the cursor inside snippet text
pub const CURSOR_MARK: char = '\u{1}';

/// The sole output of planning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionPlan {
    /// Replaced span, in working document positions
    pub range: Range,
    pub start: usize,
    pub end: usize,
    pub literal_text: String,
    /// Where the cursor goes once the edit is applied
    pub cursor_target: Position,
    pub user_message: String,
}

impl InsertionPlan {
    pub fn from_splice(document: &SourceDocument, splice: Splice, user_message: String) -> Self {
        let origin = document.position_at(splice.start);
        let literal_text = splice.text.replace(CURSOR_MARK, "");
        let cursor_target = match splice.text.find(CURSOR_MARK) {
            Some(idx) => origin.advance(&splice.text[..idx]),
            None => origin.advance(&literal_text),
        };

        Self {
            range: document.range_of(splice.start, splice.end),
            start: splice.start,
            end: splice.end,
            literal_text,
            cursor_target,
            user_message,
        }
    }

    pub fn insert_position(&self) -> Position {
        self.range.start
    }

    /// The working document text with this plan applied
    pub fn apply_to(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.literal_text.len());
        out.push_str(&text[..self.start]);
        out.push_str(&self.literal_text);
        out.push_str(&text[self.end..]);
        out
    }
}

/// Replace `start..end` with `text` (which may hold `CURSOR_MARK`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Splice {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Everything a recipe needs to know
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub classified: &'a Classified,
    pub dialect: DialectKey,
    pub kind: DeclarationKind,
    pub candidate: &'a CandidateName,
    pub target: &'a DeclarationTarget,
    pub value: Option<InitialValue>,
    pub deep: bool,
    /// Enclosing markup attribute of the candidate
    pub prefix: Option<&'a str>,
    /// Cursor offset in the working document
    pub cursor: usize,
    pub config: &'a FastVarConfig,
}

impl<'a> PlanRequest<'a> {
    pub fn document(&self) -> &'a SourceDocument {
        &self.classified.document
    }

    pub fn script(&self) -> Result<&'a ScriptBlock> {
        self.classified
            .classification
            .script()
            .ok_or_else(|| CreateError::missing("<script>"))
    }

    pub fn patterns(&self) -> &'static PatternTable {
        PatternTable::for_language(self.classified.language)
    }

    /// Indentation unit of the script (the whole file when there is none),
    /// `indent_width` when it has no indented code
    pub fn unit(&self) -> String {
        let text = match self.script() {
            Ok(script) if !self.kind.is_style() => script.source(),
            _ => self.document().text(),
        };
        infer_unit(text, &self.config.indent_unit())
    }

    pub fn value(&self) -> &'static str {
        self.value.map(|v| v.literal()).unwrap_or("null")
    }

    /// Type inferred from the initial value, when annotations apply
    pub fn annotation(&self) -> Option<&'static str> {
        let typed = self.config.typescript_annotations
            && self.script().is_ok_and(|s| s.lang.is_typescript());
        self.value.filter(|_| typed).map(|v| v.ts_type())
    }

    /// `<T>` for generic constructors, empty when not annotating
    pub fn type_argument(&self) -> String {
        self.annotation().map(|t| format!("<{}>", t)).unwrap_or_default()
    }

    pub fn message(&self) -> String {
        format!(
            "Created {} `{}` in {}",
            self.kind,
            self.candidate.display(),
            self.target.container()
        )
    }

    pub fn finish(&self, splice: Splice) -> Result<InsertionPlan> {
        Ok(InsertionPlan::from_splice(self.document(), splice, self.message()))
    }
}

/// Offset just past the separator that follows `offset`
fn past_separator(document: &SourceDocument, offset: usize, sep: char) -> usize {
    document.text()[offset..]
        .find(sep)
        .map(|i| offset + i + sep.len_utf8())
        .unwrap_or(offset)
}

/// Add `entry` to an object, array or type literal.
///
/// Empty containers get the entry on its own line inside the braces (arrays
/// stay inline). Block containers copy the first sibling's indentation and
/// keep whatever trailing-separator style they already use. Inline containers
/// get the entry inline.
pub fn entry_splice(
    document: &SourceDocument,
    container: &ObjectRegion,
    entry: &str,
    at_top: bool,
    unit: &str,
) -> Splice {
    let sep = container.separator.as_char();
    let open = container.open;
    let close = container.close;
    let brace_indent = document.indentation_at(open).to_string();

    let (Some(first), Some(last)) = (container.first(), container.last()) else {
        let inner = document.slice(open + 1, close);
        if container.shape == ContainerShape::Array {
            return if inner.trim().is_empty() {
                Splice::replace(open + 1, close, entry)
            } else {
                Splice::insert(open + 1, entry)
            };
        }
        let indent = format!("{}{}", brace_indent, unit);
        let body = indent_continuation(entry, &indent);
        return if inner.trim().is_empty() {
            Splice::replace(open + 1, close, format!("\n{}{}\n{}", indent, body, brace_indent))
        } else {
            Splice::insert(open + 1, format!("\n{}{}", indent, body))
        };
    };

    let block_layout =
        document.line_of(open) != document.line_of(close) && document.starts_line(first.start);
    let indent = if document.starts_line(first.start) {
        document.indentation_at(first.start).to_string()
    } else {
        format!("{}{}", brace_indent, unit)
    };
    let body = indent_continuation(entry, &indent);

    if !block_layout {
        return if at_top {
            Splice::insert(first.start, format!("{}{} ", body, sep))
        } else if container.trailing_separator {
            Splice::insert(past_separator(document, last.end, sep), format!(" {}{}", body, sep))
        } else {
            Splice::insert(last.end, format!("{} {}", sep, body))
        };
    }

    if at_top {
        let line_start = document.line_start(document.line_of(first.start));
        return Splice::insert(line_start, format!("{}{}{}\n", indent, body, sep));
    }

    let after_last = if container.trailing_separator {
        past_separator(document, last.end, sep)
    } else {
        last.end
    };
    let line_end = document.line_end(document.line_of(after_last));

    if close < line_end {
        // closing bracket shares the last entry's line
        return if container.trailing_separator {
            Splice::insert(after_last, format!("\n{}{}{}", indent, body, sep))
        } else {
            Splice::insert(after_last, format!("{}\n{}{}", sep, indent, body))
        };
    }

    if container.trailing_separator {
        Splice::insert(line_end, format!("\n{}{}{}", indent, body, sep))
    } else {
        let rest = document.slice(last.end, line_end);
        Splice::replace(last.end, line_end, format!("{}{}\n{}{}", sep, rest, indent, body))
    }
}

/// Where a statement goes inside a script block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the imports, before the first lifecycle call or function
    BeforeFirstFunction,
    /// On a new line after the last import
    AfterImports,
    /// At the end of the block
    End,
}

fn leading_whitespace(raw: &str) -> &str {
    raw.lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start().len()])
        .unwrap_or("")
}

fn imports_end(raw: &str, patterns: &PatternTable) -> Option<usize> {
    patterns
        .get(PatternName::ImportStatement)?
        .find_iter(raw)
        .map(|m| m.end())
        .max()
}

/// Add a top-level statement to a script block
pub fn script_splice(
    document: &SourceDocument,
    script: &ScriptBlock,
    patterns: &PatternTable,
    statement: &str,
    placement: Placement,
) -> Splice {
    let raw = script.source();
    let base = script.base();
    let indent = leading_whitespace(raw);
    let body = indent_continuation(statement, indent);
    let imports = imports_end(raw, patterns);

    match placement {
        Placement::BeforeFirstFunction => {
            let from = imports.unwrap_or(0);
            let first = [
                PatternName::LifecycleCall,
                PatternName::ArrowFunctionDecl,
                PatternName::FunctionHead,
            ]
            .iter()
            .filter_map(|name| {
                patterns
                    .get(*name)?
                    .find_iter(&raw[from..])
                    .map(|m| base + from + m.start())
                    .find(|at| document.starts_line(*at))
            })
            .min();

            if let Some(at) = first {
                let line_start = document.line_start(document.line_of(at));
                let line_indent = document.indentation_at(at);
                let body = indent_continuation(statement, line_indent);
                return Splice::insert(line_start, format!("{}{}\n", line_indent, body));
            }
            end_splice(document, script, &format!("{}{}", indent, body), false)
        }
        Placement::AfterImports => match imports {
            Some(end) => {
                let line_end = document.line_end(document.line_of(base + end));
                Splice::insert(line_end, format!("\n{}{}", indent, body))
            }
            None => {
                let tail = if raw.starts_with('\n') || raw.starts_with("\r\n") { "" } else { "\n" };
                Splice::insert(base, format!("\n{}{}{}", indent, body, tail))
            }
        },
        Placement::End => end_splice(document, script, &format!("{}{}", indent, body), true),
    }
}

fn end_splice(document: &SourceDocument, script: &ScriptBlock, line: &str, gap: bool) -> Splice {
    let raw = script.source();
    let code_end = script.base() + raw.trim_end().len();
    let separator = if gap && !raw.trim().is_empty() { "\n\n" } else { "\n" };
    let tail = if document.slice(code_end, script.region.end).contains('\n') {
        ""
    } else {
        "\n"
    };
    Splice::insert(code_end, format!("{}{}{}", separator, line, tail))
}

/// Add a statement to a component function: after its last local
/// declaration, else right after the opening brace. Expression bodies are
/// turned into a block that returns the original expression.
pub fn component_splice(
    document: &SourceDocument,
    component: &ComponentFunction,
    statement: &str,
    unit: &str,
) -> Splice {
    match &component.body {
        FunctionBody::Block { open, statements, .. } => {
            let brace_indent = document.indentation_at(*open).to_string();
            let indent = statements
                .first()
                .filter(|s| document.starts_line(s.start))
                .map(|s| document.indentation_at(s.start).to_string())
                .unwrap_or_else(|| format!("{}{}", brace_indent, unit));
            let body = indent_continuation(statement, &indent);

            let at = statements
                .iter()
                .rev()
                .find(|s| s.is_declaration())
                .map(|s| s.end)
                .unwrap_or(open + 1);
            let line_end = document.line_end(document.line_of(at));
            let rest = document.slice(at, line_end);
            let rest_code = rest.trim_start();

            if rest_code.is_empty() || rest_code.starts_with("//") {
                return Splice::insert(line_end, format!("\n{}{}", indent, body));
            }
            let next_indent = if rest_code.starts_with('}') { &brace_indent } else { &indent };
            let whitespace = rest.len() - rest_code.len();
            Splice::replace(
                at,
                at + whitespace,
                format!("\n{}{}\n{}", indent, body, next_indent),
            )
        }
        FunctionBody::Expression { expr } => {
            let outer = document.indentation_at(component.region.start).to_string();
            let indent = format!("{}{}", outer, unit);
            let body = indent_continuation(statement, &indent);
            Splice::replace(
                expr.start,
                expr.end,
                format!(
                    "{{\n{}{}\n{}return {}\n{}}}",
                    indent,
                    body,
                    indent,
                    expr.raw.trim(),
                    outer
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastvar_syntax::regions::container_region;
    use fastvar_syntax::script::parse_script;
    use fastvar_syntax::ScriptLang;

    fn apply(text: &str, splice: Splice) -> (String, Position) {
        let doc = SourceDocument::new(text);
        let plan = InsertionPlan::from_splice(&doc, splice, String::new());
        (plan.apply_to(text), plan.cursor_target)
    }

    /// First object/array literal in `text`
    fn first_container(text: &str) -> ObjectRegion {
        let tree = parse_script(text, ScriptLang::JavaScript).unwrap();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if matches!(node.kind(), "object" | "array") {
                return container_region(&node, "test", text, 0).unwrap();
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        panic!("no container in {}", text);
    }

    fn entry(text: &str, entry: &str, at_top: bool) -> (String, Position) {
        let doc = SourceDocument::new(text);
        let container = first_container(text);
        apply(text, entry_splice(&doc, &container, entry, at_top, "  "))
    }

    #[test]
    fn test_cursor_mark_is_stripped() {
        let (text, cursor) = apply("ab", Splice::insert(1, "x\n  \u{1}y"));
        assert_eq!(text, "ax\n  yb");
        assert_eq!(cursor, Position::new(1, 2));
    }

    #[test]
    fn test_empty_object_gets_entry_on_its_own_line() {
        let (text, cursor) = entry("const a = {}", "count: 0\u{1}", false);
        assert_eq!(text, "const a = {\n  count: 0\n}");
        assert_eq!(cursor, Position::new(1, 10));
    }

    #[test]
    fn test_block_object_bottom_without_trailing_comma() {
        let source = "const a = {\n    x: 1,\n    y: 2 // why\n}";
        let (text, _) = entry(source, "z: 3", false);
        assert_eq!(text, "const a = {\n    x: 1,\n    y: 2, // why\n    z: 3\n}");
    }

    #[test]
    fn test_block_object_bottom_with_trailing_comma() {
        let source = "const a = {\n  x: 1,\n}";
        let (text, _) = entry(source, "go() {\n  \u{1}\n}", false);
        assert_eq!(text, "const a = {\n  x: 1,\n  go() {\n    \n  },\n}");
    }

    #[test]
    fn test_block_object_top() {
        let source = "const a = {\n  x: 1\n}";
        let (text, cursor) = entry(source, "w: 0\u{1}", true);
        assert_eq!(text, "const a = {\n  w: 0,\n  x: 1\n}");
        assert_eq!(cursor, Position::new(1, 6));
    }

    #[test]
    fn test_inline_containers() {
        assert_eq!(entry("f(['a'])", "'b'", false).0, "f(['a', 'b'])");
        assert_eq!(entry("f([])", "'b'", false).0, "f(['b'])");
        assert_eq!(entry("x = { a: 1 }", "b: 2", false).0, "x = { a: 1, b: 2 }");
        assert_eq!(entry("x = { a: 1 }", "b: 2", true).0, "x = { b: 2, a: 1 }");
    }

    #[test]
    fn test_closing_brace_on_last_entry_line() {
        let source = "x = {\n  a: 1 }";
        assert_eq!(entry(source, "b: 2", false).0, "x = {\n  a: 1,\n  b: 2 }");
    }
}
