//! Interactive fallback for the lookback window.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

pub(crate) const DAYS_PROMPT: &str = "Enter DAYS_BACK: ";

/// Prompts once and parses a non-negative whole number of days.
pub(crate) fn read_days<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<u32> {
    write!(output, "{DAYS_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read DAYS_BACK")?;
    if read == 0 {
        bail!("No DAYS_BACK given; pass --days or enter a number when prompted");
    }
    parse_days(&line)
}

fn parse_days(raw: &str) -> Result<u32> {
    let token = raw.trim();
    token
        .parse::<u32>()
        .with_context(|| format!("DAYS_BACK must be a non-negative whole number, got '{token}'"))
}
