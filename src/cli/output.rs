/// Output formatting for the CLI
///
/// - Text: the user message and the new cursor position, or the patch for a dry run
/// - JSON: the whole report, pretty-printed, for editor integrations
use crate::applier::TextEdit;
use crate::kinds::DeclarationKind;
use crate::plan::InsertionPlan;
use anyhow::Result;
use diff_match_patch_rs::{DiffMatchPatch, Efficient, PatchInput};
use fastvar_syntax::Position;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Outcome of one `create` run
#[derive(Debug, Serialize)]
pub struct CreateReport<'a> {
    pub file: &'a Path,
    pub language: &'a str,
    pub dry_run: bool,
    pub plan: &'a InsertionPlan,
    pub edits: Vec<TextEdit>,
    pub cursor: Option<Position>,
    /// diff-match-patch text of the change
    pub patch: String,
}

/// Menu offered at a position, for `kinds`
#[derive(Debug, Serialize)]
pub struct KindsReport<'a> {
    pub file: &'a Path,
    pub dialect: Option<String>,
    pub candidate: Option<String>,
    pub prefix: Option<String>,
    pub kinds: Vec<DeclarationKind>,
}

pub struct OutputWriter {
    format: OutputFormat,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, Box::new(io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write>) -> Self {
        Self { format, writer }
    }

    pub fn write_create(&mut self, report: &CreateReport<'_>) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                writeln!(self.writer, "{}", serde_json::to_string_pretty(report)?)?;
            }
            OutputFormat::Text if report.dry_run => {
                write!(self.writer, "{}", report.patch)?;
            }
            OutputFormat::Text => {
                writeln!(self.writer, "{}", report.plan.user_message)?;
                if let Some(cursor) = report.cursor {
                    writeln!(self.writer, "{}:{}", report.file.display(), cursor)?;
                }
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_kinds(&mut self, report: &KindsReport<'_>) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                writeln!(self.writer, "{}", serde_json::to_string_pretty(report)?)?;
            }
            OutputFormat::Text => {
                for (i, kind) in report.kinds.iter().enumerate() {
                    writeln!(self.writer, "{}) {}", i + 1, kind)?;
                }
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Patch text turning `before` into `after`
pub fn patch_text(before: &str, after: &str) -> String {
    let dmp = DiffMatchPatch::new();
    let diffs = dmp.diff_main::<Efficient>(before, after).unwrap_or_default();
    let patches = dmp
        .patch_make(PatchInput::new_diffs(&diffs))
        .unwrap_or_default();
    dmp.patch_to_text(&patches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_text_mentions_inserted_line() {
        let patch = patch_text("a\nb\n", "a\nconst x = 1\nb\n");
        assert!(patch.starts_with("@@"));
        assert!(patch.contains("const"));
        assert_eq!(patch_text("same", "same"), "");
    }
}
