//! Output formatting - clean, ASCII-only terminal output
//!
//! Sysadmin style: no emojis, tagged status lines, dimmed detail.

use owo_colors::OwoColorize;
use reroll_core::{KEY_DEV_DEVICE_ID, KEY_MAC_MACHINE_ID, KEY_MACHINE_ID};

use crate::reset_flow::ResetReport;

/// Separator for the summary block
pub const THIN_SEPARATOR: &str =
    "------------------------------------------------------------";

/// Program banner with embedded version
pub fn banner(version: &str) {
    println!();
    println!("{} v{}", "cursor-reroll".bold(), version);
    println!("{}", "Device identity reset for the Cursor editor".dimmed());
    println!();
}

/// A completed step
pub fn ok(message: &str) {
    println!("{}  {}", "[OK]".bright_green(), message);
}

/// Something noteworthy that does not stop the run
pub fn note(message: &str) {
    println!("{}  {}", "[NOTE]".cyan(), message);
}

/// A degraded but non-fatal outcome
pub fn warning(message: &str) {
    println!("{}  {}", "[WARNING]".yellow(), message);
}

/// Fatal error, printed to stderr
pub fn error(message: &str) {
    eprintln!();
    eprintln!("{} {}", "[ERROR]".red(), message.red());
    eprintln!();
}

/// An indented detail line under a status line
pub fn detail(message: &str) {
    println!("      {}", message.dimmed());
}

/// Section separator
pub fn separator() {
    println!("{}", THIN_SEPARATOR.dimmed());
}

/// Most recent backups shown in the summary before eliding
const MAX_HISTORY_LINES: usize = 5;

/// Summary block after a completed run
pub fn display_report(report: &ResetReport) {
    println!();
    separator();
    println!("{}", "New device identity".bold());
    println!("  {}     {}", KEY_MACHINE_ID, report.identity.machine_id);
    println!("  {}  {}", KEY_MAC_MACHINE_ID, report.identity.mac_machine_id);
    println!("  {}   {}", KEY_DEV_DEVICE_ID, report.identity.dev_device_id);
    println!();

    println!(
        "Resets recorded for this install: {}",
        report.history.len()
    );
    for record in report.history.iter().take(MAX_HISTORY_LINES) {
        println!(
            "  {} ({})",
            record.file_name,
            record.created.format("%Y-%m-%d %H:%M:%S")
        );
    }
    if report.history.len() > MAX_HISTORY_LINES {
        println!("  ... and {} more", report.history.len() - MAX_HISTORY_LINES);
    }

    separator();
    println!();
    println!(
        "{}",
        "Restart Cursor to pick up the new identity.".dimmed()
    );
    println!();
}
