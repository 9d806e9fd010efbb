//! # Console Prompts
//!
//! [`UserPrompt`] implementations: a line-oriented terminal prompt and a
//! scripted prompt that replays canned answers.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use equip_core::UserPrompt;
use tracing::warn;

/// Answers accepted as "yes" by [`ConsolePrompt::confirm`].
const YES: [&str; 4] = ["y", "yes", "д", "да"];

/// Reads answers line by line and writes prompts and messages.
///
/// End of input cancels the current question.
#[derive(Debug)]
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompt { input, output }
    }

    fn read_line(&mut self, label: &str) -> Option<String> {
        if let Err(err) = write!(self.output, "{label}").and_then(|()| self.output.flush()) {
            warn!(error = %err, "Prompt write failed");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!(error = %err, "Prompt read failed");
                None
            }
        }
    }

    /// Gives the writer back, for tests that inspect the transcript.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> UserPrompt for ConsolePrompt<R, W> {
    fn ask_field(&mut self, name: &str) -> Option<String> {
        self.read_line(&format!("{name}: "))
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.read_line(&format!("{question} [y/n]: "))
            .map(|answer| YES.contains(&answer.trim().to_lowercase().as_str()))
            .unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        if let Err(err) = writeln!(self.output, "{message}") {
            warn!(error = %err, "Prompt write failed");
        }
    }
}

/// Replays queued answers and records every message.
///
/// Running out of answers behaves like end of input: `ask_field` returns
/// `None` and `confirm` returns `false`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    /// Field names asked, in order.
    pub asked: Vec<String>,
    /// Messages shown, in order.
    pub messages: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Queues answers for `confirm`.
    pub fn with_confirmations(mut self, confirmations: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(confirmations);
        self
    }

    /// Every message joined by newlines.
    pub fn transcript(&self) -> String {
        self.messages.join("\n")
    }
}

impl UserPrompt for ScriptedPrompt {
    fn ask_field(&mut self, name: &str) -> Option<String> {
        self.asked.push(name.to_string());
        self.answers.pop_front()
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
