//! Edit application
//!
//! Turns a plan (plus the staged setup-block edit, when there is one) into
//! the ordered buffer mutations the host performs, then moves the cursor and
//! shows the message. Each edit's range refers to the buffer as left by the
//! edits before it.

use crate::plan::InsertionPlan;
use crate::session::EditorHost;
use anyhow::{Result, anyhow};
use fastvar_syntax::{Classified, Position, Range, SourceDocument};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One replacement of a buffer range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// The staged edit first, then the plan
pub fn edits_for(classified: &Classified, plan: &InsertionPlan) -> Vec<TextEdit> {
    let mut edits = Vec::with_capacity(2);
    if let Some(staged) = &classified.staged_edit {
        edits.push(TextEdit {
            range: staged.range,
            new_text: staged.text.clone(),
        });
    }
    edits.push(TextEdit {
        range: plan.range,
        new_text: plan.literal_text.clone(),
    });
    edits
}

/// Apply the plan through the host: edits, then cursor jump, then message.
///
/// The jump and the message only happen once every edit went through.
pub async fn apply<H>(host: &mut H, classified: &Classified, plan: &InsertionPlan) -> Result<()>
where
    H: EditorHost + ?Sized,
{
    let edits = edits_for(classified, plan);
    debug!("Applying {} edit(s)", edits.len());
    host.apply_edits(&edits).await?;
    host.jump_to(plan.cursor_target).await?;
    host.show_info(&plan.user_message).await;
    Ok(())
}

/// In-memory buffer used by the CLI host and the tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    document: SourceDocument,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            document: SourceDocument::new(text),
        }
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    /// Apply `edits` in order. The buffer is left untouched if any range does
    /// not resolve.
    pub fn apply(&mut self, edits: &[TextEdit]) -> Result<()> {
        let mut current = self.document.clone();
        for edit in edits {
            let start = resolve(&current, edit.range.start)?;
            let end = resolve(&current, edit.range.end)?;
            if start > end {
                return Err(anyhow!("Edit range {:?} is inverted", edit.range));
            }
            let text = current.text();
            let mut next = String::with_capacity(text.len() + edit.new_text.len());
            next.push_str(&text[..start]);
            next.push_str(&edit.new_text);
            next.push_str(&text[end..]);
            current = SourceDocument::new(next);
        }
        self.document = current;
        Ok(())
    }
}

fn resolve(document: &SourceDocument, position: Position) -> Result<usize> {
    if position.line >= document.line_count() {
        return Err(anyhow!(
            "Position {} is past the end of the buffer ({} lines)",
            position,
            document.line_count()
        ));
    }
    let line = document.line_text(position.line);
    if position.character > line.chars().count() {
        return Err(anyhow!("Position {} is past the end of its line", position));
    }
    Ok(document.offset_at(position))
}
