//! Terminal confirmation prompt

use std::io::{self, BufRead, IsTerminal, Write};

use memos_core::dialog::{ConfirmDialog, ConfirmRequest};

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Clone, Copy)]
pub struct TerminalDialog {
    assume_yes: bool,
}

impl TerminalDialog {
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmDialog for TerminalDialog {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        if self.assume_yes {
            return true;
        }

        if !io::stdin().is_terminal() {
            tracing::warn!("stdin is not a terminal, declining '{}'. Pass --yes to confirm.", request.name);
            return false;
        }

        match prompt(request, &mut io::stdin().lock(), &mut io::stderr()) {
            Ok(answer) => answer,
            Err(error) => {
                tracing::warn!("Failed to read confirmation: {}", error);
                false
            }
        }
    }
}

/// Write the prompt to `output` and read one line from `input`.
pub fn prompt<R: BufRead, W: Write>(
    request: &ConfirmRequest,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    match request.severity.label() {
        Some(label) => writeln!(output, "[{label}] {}", request.title)?,
        None => writeln!(output, "{}", request.title)?,
    }
    write!(output, "{} [y/N] ", request.content)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(is_affirmative(&line))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
