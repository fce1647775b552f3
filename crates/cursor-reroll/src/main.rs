//! cursor-reroll - device identity reset for the Cursor editor
//!
//! Detects the local install, closes the editor after confirmation,
//! backs up and rewrites the identifier fields in storage.json, and
//! replaces the updater directory so the reset sticks.

use clap::Parser;
use tracing::Level;

use cursor_reroll::errors::*;
use cursor_reroll::output;
use cursor_reroll::prompt::{AssumeYes, ConfirmGate, StdinConfirm};
use cursor_reroll::reset_flow::{ResetFlow, ResetOutcome};
use reroll_core::{
    HostEnv, MatchSpec, OsFamily, PlatformProfile, ProcessController, ResetError, SystemLister,
    PROCESS_NEEDLE, SELF_MARKER,
};

// Version is embedded at build time
const VERSION: &str = env!("REROLL_VERSION");

#[derive(Parser)]
#[command(name = "cursor-reroll")]
#[command(about = "Reset the Cursor editor's device identity", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Close a running Cursor without asking
    #[arg(long)]
    yes: bool,

    /// Verbose step-by-step logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).init();

    output::banner(VERSION);

    match run(&cli) {
        Ok(ResetOutcome::Completed(report)) => {
            output::display_report(&report);
            std::process::exit(EXIT_SUCCESS);
        }
        Ok(ResetOutcome::Declined) => {
            output::note("aborted at your request; nothing was changed");
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn run(cli: &Cli) -> Result<ResetOutcome, ResetError> {
    let os = OsFamily::detect()?;
    let env = HostEnv::capture()?;
    let profile = PlatformProfile::resolve(os, &env);
    tracing::debug!(
        "platform {} / storage {}",
        os.as_str(),
        profile.storage_path.display()
    );

    let spec = MatchSpec::for_current_process(PROCESS_NEEDLE, SELF_MARKER);
    let controller = ProcessController::new(SystemLister::new(), spec);
    let gate: Box<dyn ConfirmGate> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    ResetFlow::new(profile, controller, gate).run()
}
