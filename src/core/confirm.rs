//! Interactive approval before destructive terraform operations.

use std::io::{BufRead, Write};

use crate::config::BenchConfig;
use crate::error::{Error, Result};

/// True when no prompt is needed: explicitly skipped, or the command is read-only.
pub fn should_skip(config: &BenchConfig) -> bool {
    config.skip_destroy_confirmation || config.command.is_some_and(|c| c.is_read_only())
}

/// Whether an answer counts as approval: `yes` or `y`, trimmed, any case.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Print the warning, read one line and require an affirmative answer.
pub fn confirm(input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
    let prompt = "\n⚠️  WARNING: About to run destructive terraform operation\n\
                  This will destroy any existing Terraform state.\n\
                  Are you sure you want to continue? (yes/no): ";
    output
        .write_all(prompt.as_bytes())
        .and_then(|_| output.flush())
        .map_err(|e| Error::internal_io(e.to_string(), Some("write prompt".to_string())))?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| Error::confirmation_input_failed(e.to_string()))?;
    if read == 0 {
        return Err(Error::confirmation_input_failed("unexpected end of input"));
    }

    if !is_affirmative(&line) {
        return Err(Error::confirmation_declined(line.trim()));
    }

    let _ = writeln!(output, "✅ Confirmed. Proceeding with operation...");
    Ok(())
}
