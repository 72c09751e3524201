use std::io::{BufRead, Write};

use inquire::{InquireError, Text};
use tracing::warn;

/// Source of user input, one line per prompt. Returns `None` once input is
/// exhausted or the user aborts the session.
pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Interactive terminal prompts.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        match Text::new(prompt.trim_end()).prompt() {
            Ok(line) => Some(line.trim().to_string()),
            // Esc skips the current field
            Err(InquireError::OperationCanceled) => Some(String::new()),
            Err(InquireError::OperationInterrupted) => None,
            Err(err) => {
                warn!(error = %err, "prompt failed");
                None
            }
        }
    }
}

/// Plain line reader for piped input: echoes the prompt to `echo` and reads
/// the next line from `input`.
pub struct LinePrompter<R, W> {
    input: R,
    echo: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, echo: W) -> Self {
        Self { input, echo }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.echo, "{}", prompt);
        let _ = self.echo.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(err) => {
                warn!(error = %err, "failed to read input line");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn line_prompter_trims_and_echoes() {
        let mut echo = Vec::new();
        {
            let mut prompter = LinePrompter::new(Cursor::new("  alice \n2026-06-01\n"), &mut echo);
            assert_eq!(prompter.read_line("Enter username: ").as_deref(), Some("alice"));
            assert_eq!(prompter.read_line("Enter date: ").as_deref(), Some("2026-06-01"));
            assert_eq!(prompter.read_line("Enter choice: "), None);
        }
        assert_eq!(
            String::from_utf8(echo).unwrap(),
            "Enter username: Enter date: Enter choice: "
        );
    }

    #[test]
    fn blank_line_is_not_end_of_input() {
        let mut prompter = LinePrompter::new(Cursor::new("\n"), std::io::sink());
        assert_eq!(prompter.read_line("> ").as_deref(), Some(""));
        assert_eq!(prompter.read_line("> "), None);
    }
}
