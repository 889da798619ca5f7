//! User interaction (confirmation prompts).

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::RealRuntime;

/// Prompts on `output` and reads one answer line from `input`.
///
/// End of input counts as "no".
pub(crate) fn ask_yes_no<I: BufRead, O: Write>(
    prompt: &str,
    input: &mut I,
    output: &mut O,
) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt).context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    if read == 0 {
        return Ok(false);
    }

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        ask_yes_no(prompt, &mut stdin.lock(), &mut stderr)
    }
}
