//! Terminal stand-in for an editor host
//!
//! Pickers are numbered menus on stderr answered on the input stream (an
//! empty line or end of input dismisses them); edits land in an in-memory
//! `TextBuffer` the caller commits to disk afterwards.

use crate::applier::{TextBuffer, TextEdit};
use crate::session::EditorHost;
use anyhow::Result;
use async_trait::async_trait;
use fastvar_syntax::Position;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub struct CliHost<R> {
    buffer: TextBuffer,
    input: R,
    prompt: Box<dyn Write + Send>,
    cursor: Option<Position>,
    messages: Vec<String>,
    errors: Vec<String>,
}

impl<R: BufRead + Send> CliHost<R> {
    pub fn new(text: &str, input: R) -> Self {
        Self::with_prompt(text, input, Box::new(std::io::stderr()))
    }

    pub fn with_prompt(text: &str, input: R, prompt: Box<dyn Write + Send>) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            input,
            prompt,
            cursor: None,
            messages: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

/// A 1-based menu number or an exact label
fn parse_choice(answer: &str, options: &[String]) -> Option<usize> {
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    options.iter().position(|o| o == answer)
}

#[async_trait]
impl<R: BufRead + Send> EditorHost for CliHost<R> {
    async fn pick(&mut self, title: &str, options: &[String]) -> Option<usize> {
        let _ = writeln!(self.prompt, "{}", title);
        for (i, option) in options.iter().enumerate() {
            let _ = writeln!(self.prompt, "  {}) {}", i + 1, option);
        }
        let _ = write!(self.prompt, "> ");
        let _ = self.prompt.flush();

        loop {
            let answer = self.read_answer()?;
            if answer.is_empty() {
                return None;
            }
            match parse_choice(&answer, options) {
                Some(choice) => {
                    debug!("Picked '{}' for '{}'", options[choice], title);
                    return Some(choice);
                }
                None => {
                    let _ = write!(self.prompt, "'{}' is not one of the choices\n> ", answer);
                    let _ = self.prompt.flush();
                }
            }
        }
    }

    async fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<()> {
        self.buffer.apply(edits)
    }

    async fn jump_to(&mut self, position: Position) -> Result<()> {
        self.cursor = Some(position);
        Ok(())
    }

    async fn show_info(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    async fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn host(answers: &str) -> CliHost<Cursor<Vec<u8>>> {
        CliHost::with_prompt("", Cursor::new(answers.as_bytes().to_vec()), Box::new(std::io::sink()))
    }

    fn options() -> Vec<String> {
        vec!["ref".to_string(), "computed".to_string()]
    }

    #[tokio::test]
    async fn test_pick_by_number_and_label() {
        let mut host = host("2\ncomputed\n");
        assert_eq!(host.pick("kind", &options()).await, Some(1));
        assert_eq!(host.pick("kind", &options()).await, Some(1));
    }

    #[tokio::test]
    async fn test_empty_line_and_eof_dismiss() {
        let mut host = host("\n");
        assert_eq!(host.pick("kind", &options()).await, None);
        assert_eq!(host.pick("kind", &options()).await, None);
    }

    #[tokio::test]
    async fn test_invalid_answer_is_asked_again() {
        let mut host = host("7\nref\n");
        assert_eq!(host.pick("kind", &options()).await, Some(0));
    }
}
