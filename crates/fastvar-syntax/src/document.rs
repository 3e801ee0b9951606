//! Immutable text snapshot with offset <-> position conversion
//!
//! Offsets are byte offsets into the UTF-8 text. Positions are 0-based
//! `(line, character)` pairs where `character` counts Unicode scalar values,
//! which is what the editor host hands us and expects back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 0-based line/character location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// The position reached after typing `text` starting at `self`
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        for ch in text.chars() {
            if ch == '\n' {
                pos.line += 1;
                pos.character = 0;
            } else {
                pos.character += 1;
            }
        }
        pos
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A half-open span between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One resolution pass works on exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where `line` starts (clamped to the end of the text)
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Byte offset of the end of `line`, excluding the line terminator
    pub fn line_end(&self, line: usize) -> usize {
        let next = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let bytes = self.text.as_bytes();
        let mut end = next;
        if end > self.line_start(line) && bytes.get(end - 1) == Some(&b'\n') {
            end -= 1;
        }
        if end > self.line_start(line) && bytes.get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        end
    }

    pub fn line_text(&self, line: usize) -> &str {
        let start = self.line_start(line);
        let end = self.line_end(line).max(start);
        &self.text[start..end]
    }

    /// 0-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.line_starts.partition_point(|&s| s <= offset) - 1
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = self.clamp_to_char_boundary(offset.min(self.text.len()));
        let line = self.line_of(offset);
        let start = self.line_start(line);
        Position::new(line, self.text[start..offset].chars().count())
    }

    pub fn offset_at(&self, position: Position) -> usize {
        if position.line >= self.line_count() {
            return self.text.len();
        }
        let start = self.line_start(position.line);
        let line = self.line_text(position.line);
        let within = line
            .char_indices()
            .nth(position.character)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        start + within
    }

    pub fn range_of(&self, start: usize, end: usize) -> Range {
        Range::new(self.position_at(start), self.position_at(end))
    }

    /// Leading whitespace of the line containing `offset`
    pub fn indentation_at(&self, offset: usize) -> &str {
        let line = self.line_text(self.line_of(offset));
        let trimmed = line.trim_start();
        &line[..line.len() - trimmed.len()]
    }

    /// True when only whitespace precedes `offset` on its line
    pub fn starts_line(&self, offset: usize) -> bool {
        let start = self.line_start(self.line_of(offset));
        self.text[start..offset].trim().is_empty()
    }

    pub fn slice(&self, start: usize, end: usize) -> &str {
        &self.text[start.min(self.text.len())..end.min(self.text.len())]
    }

    fn clamp_to_char_boundary(&self, mut offset: usize) -> usize {
        while offset > 0 && !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}
