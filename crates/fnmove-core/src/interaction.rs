//! Interaction ports for confirmation prompts and preview output.
//!
//! The ChangeSet never touches standard input or output directly. It talks to:
//!
//! - a [`Prompt`], which returns one line of operator input per question, and
//! - a [`PreviewSink`], which receives one [`FileDiff`] per touched unit.
//!
//! The CLI wires these to the terminal ([`StdioPrompt`], [`WriterSink`]);
//! tests drive them deterministically ([`ScriptedPrompt`], [`CollectingSink`]).

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::diff::FileDiff;

/// Error type for interaction operations
#[derive(Error, Debug)]
pub enum InteractionError {
    /// User cancelled the operation (e.g., pressed Ctrl+C)
    #[error("operation cancelled by user")]
    Cancelled,

    /// Input stream ended before an answer was read
    #[error("end of input")]
    EndOfInput,

    /// IO error during interaction
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl InteractionError {
    /// Create a new IO error
    pub fn io(err: impl fmt::Display) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<io::Error> for InteractionError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for interaction operations
pub type InteractionResult<T> = Result<T, InteractionError>;

// ============================================================================
// Prompt Port
// ============================================================================

/// Source of operator answers.
///
/// The trait is object-safe, allowing it to be used as `&mut dyn Prompt`.
pub trait Prompt {
    /// Display `question` and read one line of input, without its line terminator.
    fn ask_line(&mut self, question: &str) -> InteractionResult<String>;
}

/// Interpret a yes/no answer. Returns `None` for anything unrecognized.
pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask a yes/no question up to `max_attempts` times.
///
/// Unreadable or unrecognized input is retried. Exhausting the attempts is an
/// implicit decline. Cancellation declines immediately.
pub fn confirm(prompt: &mut dyn Prompt, question: &str, max_attempts: u32) -> bool {
    for attempt in 1..=max_attempts {
        match prompt.ask_line(question) {
            Ok(answer) => match parse_answer(&answer) {
                Some(decision) => return decision,
                None => debug!(attempt, answer = %answer, "unrecognized confirmation answer"),
            },
            Err(InteractionError::Cancelled) => return false,
            Err(err) => debug!(attempt, error = %err, "unreadable confirmation input"),
        }
    }
    debug!(max_attempts, "confirmation attempts exhausted, declining");
    false
}

/// Prompt backed by a reader and a writer (typically stdin and stdout).
pub struct StdioPrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StdioPrompt<R, W> {
    /// Create a prompt over the given streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl StdioPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's standard streams.
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for StdioPrompt<R, W> {
    fn ask_line(&mut self, question: &str) -> InteractionResult<String> {
        writeln!(self.writer, "{}", question)?;
        self.writer.flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(InteractionError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Prompt that replays a fixed script of answers.
///
/// Once the script is exhausted every further question yields `EndOfInput`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<InteractionResult<String>>,
    questions: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt answering with `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| Ok(a.into())).collect(),
            questions: Vec::new(),
        }
    }

    /// Queue an input failure at the end of the script.
    pub fn then_fail(mut self, err: InteractionError) -> Self {
        self.answers.push_back(Err(err));
        self
    }

    /// Questions asked so far.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Prompt for ScriptedPrompt {
    fn ask_line(&mut self, question: &str) -> InteractionResult<String> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .unwrap_or(Err(InteractionError::EndOfInput))
    }
}

// ============================================================================
// Preview Sink Port
// ============================================================================

/// Destination for preview diffs.
pub trait PreviewSink {
    /// Receive the diff of one touched unit.
    fn emit(&mut self, diff: &FileDiff) -> io::Result<()>;
}

/// Sink writing unified diffs as plain text.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Create a sink over `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PreviewSink for WriterSink<W> {
    fn emit(&mut self, diff: &FileDiff) -> io::Result<()> {
        self.writer.write_all(diff.to_unified().as_bytes())?;
        self.writer.flush()
    }
}

/// Sink that keeps every diff in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Diffs in emission order.
    pub diffs: Vec<FileDiff>,
}

impl PreviewSink for CollectingSink {
    fn emit(&mut self, diff: &FileDiff) -> io::Result<()> {
        self.diffs.push(diff.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod answers {
        use super::*;

        #[test]
        fn parse_answer_accepts_variants() {
            assert_eq!(parse_answer("y"), Some(true));
            assert_eq!(parse_answer(" YES "), Some(true));
            assert_eq!(parse_answer("n"), Some(false));
            assert_eq!(parse_answer("No"), Some(false));
            assert_eq!(parse_answer(""), None);
            assert_eq!(parse_answer("maybe"), None);
        }
    }

    mod confirm_loop {
        use super::*;

        #[test]
        fn yes_on_first_attempt() {
            let mut prompt = ScriptedPrompt::new(["y"]);
            assert!(confirm(&mut prompt, "apply?", 5));
            assert_eq!(prompt.questions().len(), 1);
        }

        #[test]
        fn retries_unrecognized_then_accepts() {
            let mut prompt = ScriptedPrompt::new(["what", "", "yes"]);
            assert!(confirm(&mut prompt, "apply?", 5));
            assert_eq!(prompt.questions().len(), 3);
        }

        #[test]
        fn exhausting_attempts_declines() {
            let mut prompt = ScriptedPrompt::new(["a", "b", "c", "d", "e", "y"]);
            assert!(!confirm(&mut prompt, "apply?", 5));
            assert_eq!(prompt.questions().len(), 5);
        }

        #[test]
        fn unreadable_input_is_retried() {
            let mut prompt = ScriptedPrompt::default()
                .then_fail(InteractionError::io("broken pipe"));
            // Script ends after the failure: remaining attempts hit EndOfInput.
            assert!(!confirm(&mut prompt, "apply?", 5));
            assert_eq!(prompt.questions().len(), 5);
        }

        #[test]
        fn cancellation_declines_immediately() {
            let mut prompt = ScriptedPrompt::default().then_fail(InteractionError::Cancelled);
            assert!(!confirm(&mut prompt, "apply?", 5));
            assert_eq!(prompt.questions().len(), 1);
        }

        #[test]
        fn explicit_no_declines() {
            let mut prompt = ScriptedPrompt::new(["n"]);
            assert!(!confirm(&mut prompt, "apply?", 5));
        }
    }

    mod stdio_prompt {
        use super::*;

        #[test]
        fn reads_line_and_echoes_question() {
            let input = io::Cursor::new(b"yes\r\nignored\n".to_vec());
            let mut output = Vec::new();
            let answer = {
                let mut prompt = StdioPrompt::new(input, &mut output);
                prompt.ask_line("Do you want to apply changes? [Y/n]").unwrap()
            };
            assert_eq!(answer, "yes");
            assert_eq!(
                String::from_utf8(output).unwrap(),
                "Do you want to apply changes? [Y/n]\n"
            );
        }

        #[test]
        fn empty_stream_is_end_of_input() {
            let mut prompt = StdioPrompt::new(io::Cursor::new(Vec::new()), Vec::new());
            assert!(matches!(
                prompt.ask_line("?"),
                Err(InteractionError::EndOfInput)
            ));
        }
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err: InteractionError = io_err.into();
        match err {
            InteractionError::Io(msg) => assert!(msg.contains("pipe closed")),
            _ => panic!("expected Io variant"),
        }
    }
}
