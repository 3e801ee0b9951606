//! Scripted editor host and a one-call command runner

use crate::applier::{TextBuffer, TextEdit};
use crate::config::FastVarConfig;
use crate::plan::InsertionPlan;
use crate::resolver::EditorSelection;
use crate::session::{CreateRequest, CreateVariable, EditorHost};
use anyhow::Result;
use async_trait::async_trait;
use fastvar_syntax::{LanguageTag, Position, SourceDocument};
use std::collections::VecDeque;

/// Answers pickers from a queue of labels; an exhausted queue dismisses
pub struct ScriptedHost {
    pub buffer: TextBuffer,
    answers: VecDeque<String>,
    pub prompts: Vec<(String, Vec<String>)>,
    pub edit_batches: Vec<Vec<TextEdit>>,
    pub cursor: Option<Position>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl ScriptedHost {
    pub fn new(text: &str, answers: &[&str]) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
            edit_batches: Vec::new(),
            cursor: None,
            infos: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Options shown by the `n`th picker
    pub fn options(&self, n: usize) -> Vec<&str> {
        self.prompts[n].1.iter().map(String::as_str).collect()
    }
}

#[async_trait]
impl EditorHost for ScriptedHost {
    async fn pick(&mut self, title: &str, options: &[String]) -> Option<usize> {
        self.prompts.push((title.to_string(), options.to_vec()));
        let answer = self.answers.pop_front()?;
        let choice = options.iter().position(|o| *o == answer);
        assert!(choice.is_some(), "'{}' not offered by '{}': {:?}", answer, title, options);
        choice
    }

    async fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<()> {
        self.edit_batches.push(edits.to_vec());
        self.buffer.apply(edits)
    }

    async fn jump_to(&mut self, position: Position) -> Result<()> {
        self.cursor = Some(position);
        Ok(())
    }

    async fn show_info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    async fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Cursor `offset` characters into the first occurrence of `needle`
pub fn cursor_in(text: &str, needle: &str, offset: usize) -> Position {
    let at = text
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in source", needle));
    SourceDocument::new(text).position_at(at + offset)
}

/// Run the command with the cursor on `needle`, answering `answers` in order
pub async fn run_with(
    text: &str,
    language: LanguageTag,
    needle: &str,
    answers: &[&str],
    config: &FastVarConfig,
) -> (ScriptedHost, Option<InsertionPlan>) {
    let request = CreateRequest {
        text: text.to_string(),
        language,
        selection: EditorSelection::cursor(cursor_in(text, needle, 1)),
    };
    let mut host = ScriptedHost::new(text, answers);
    let plan = CreateVariable::new(config)
        .run(&mut host, &request)
        .await
        .expect("applying a plan to the scripted buffer should not fail");
    (host, plan)
}

pub async fn run(
    text: &str,
    language: LanguageTag,
    needle: &str,
    answers: &[&str],
) -> (ScriptedHost, Option<InsertionPlan>) {
    run_with(text, language, needle, answers, &FastVarConfig::default()).await
}
