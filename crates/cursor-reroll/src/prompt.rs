//! Confirmation prompt before Cursor is closed
//!
//! The only interactive moment in a run. Behind a trait so the flow
//! can be driven by scripted answers in tests and by `--yes` in
//! automation.

use reroll_core::ProcessHandle;
use std::io::{self, BufRead, Write};

use crate::output;

/// Most matching processes shown before eliding the rest
const MAX_LISTED: usize = 5;

/// Decides whether the running editor may be force-closed
pub trait ConfirmGate {
    /// `matches` is the non-empty list of processes about to be killed.
    /// Returns `Ok(false)` to abort the run without touching anything.
    fn confirm_close(&mut self, matches: &[ProcessHandle]) -> io::Result<bool>;
}

/// Interactive stdin prompt, default no
pub struct StdinConfirm;

impl ConfirmGate for StdinConfirm {
    fn confirm_close(&mut self, matches: &[ProcessHandle]) -> io::Result<bool> {
        println!();
        output::warning(&format!(
            "Cursor is running ({} matching process{}):",
            matches.len(),
            if matches.len() == 1 { "" } else { "es" }
        ));
        for handle in matches.iter().take(MAX_LISTED) {
            output::detail(&format!("{} (pid {})", handle.name, handle.pid));
        }
        if matches.len() > MAX_LISTED {
            output::detail(&format!("... and {} more", matches.len() - MAX_LISTED));
        }
        println!();
        print!("Close Cursor now? Unsaved work will be lost. [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(is_affirmative(&input))
    }
}

/// Non-interactive gate for `--yes`
pub struct AssumeYes;

impl ConfirmGate for AssumeYes {
    fn confirm_close(&mut self, matches: &[ProcessHandle]) -> io::Result<bool> {
        output::note(&format!(
            "--yes given; closing {} matching process{} without asking",
            matches.len(),
            if matches.len() == 1 { "" } else { "es" }
        ));
        Ok(true)
    }
}

/// Only an explicit yes counts; empty input and anything else is no
fn is_affirmative(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
