//! Reset flow - sequences one full reset run
//!
//! CheckInstalled -> CheckRunning -> (ConfirmClose -> Terminate)? ->
//! PrepareDirs -> Backup -> GenerateIds -> RewriteConfig ->
//! ReportStats -> SuppressUpdates
//!
//! Nothing on disk changes until the editor is confirmed gone: a
//! declined prompt or a failed kill aborts with the filesystem exactly
//! as it was. Updater suppression is the one non-fatal step; by then
//! the reset already happened.

use reroll_core::{
    backup, storage, updater, BackupRecord, DeviceIdentity, PlatformProfile, ProcessController,
    ProcessLister, ResetError,
};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::output;
use crate::prompt::ConfirmGate;

/// Steps of the flow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    CheckInstalled,
    CheckRunning,
    ConfirmClose,
    Terminate,
    PrepareDirs,
    Backup,
    GenerateIds,
    RewriteConfig,
    ReportStats,
    SuppressUpdates,
}

impl ResetStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetStep::CheckInstalled => "check-installed",
            ResetStep::CheckRunning => "check-running",
            ResetStep::ConfirmClose => "confirm-close",
            ResetStep::Terminate => "terminate",
            ResetStep::PrepareDirs => "prepare-dirs",
            ResetStep::Backup => "backup",
            ResetStep::GenerateIds => "generate-ids",
            ResetStep::RewriteConfig => "rewrite-config",
            ResetStep::ReportStats => "report-stats",
            ResetStep::SuppressUpdates => "suppress-updates",
        }
    }
}

/// What happened to the updater at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdaterOutcome {
    Suppressed,
    /// Suppression failed; the reset itself still counts as complete
    Failed(String),
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct ResetReport {
    pub storage_path: PathBuf,
    /// None when there was no storage file to back up
    pub backup: Option<BackupRecord>,
    pub identity: DeviceIdentity,
    /// Backups next to the storage file after this run, newest first
    pub history: Vec<BackupRecord>,
    pub updater: UpdaterOutcome,
}

/// Outcome of a run that did not error out
#[derive(Debug)]
pub enum ResetOutcome {
    Completed(ResetReport),
    /// User said no at the confirmation prompt; nothing was touched
    Declined,
}

/// Drives one reset run over an injected process lister and gate
pub struct ResetFlow<L: ProcessLister> {
    profile: PlatformProfile,
    controller: ProcessController<L>,
    gate: Box<dyn ConfirmGate>,
}

impl<L: ProcessLister> ResetFlow<L> {
    pub fn new(
        profile: PlatformProfile,
        controller: ProcessController<L>,
        gate: Box<dyn ConfirmGate>,
    ) -> Self {
        Self {
            profile,
            controller,
            gate,
        }
    }

    pub fn run(&mut self) -> Result<ResetOutcome, ResetError> {
        self.step(ResetStep::CheckInstalled);
        if !self
            .profile
            .install_check_paths
            .iter()
            .any(|path| path.exists())
        {
            return Err(ResetError::NotInstalled);
        }

        self.step(ResetStep::CheckRunning);
        let running = self.controller.matches()?;
        if !running.is_empty() {
            self.step(ResetStep::ConfirmClose);
            if !self.gate.confirm_close(&running)? {
                return Ok(ResetOutcome::Declined);
            }

            self.step(ResetStep::Terminate);
            self.controller.terminate()?;
            output::ok("Cursor closed");
        }

        self.step(ResetStep::PrepareDirs);
        storage::ensure_parent(&self.profile.storage_path)?;

        self.step(ResetStep::Backup);
        let backup = if self.profile.storage_path.exists() {
            let record = backup::snapshot(&self.profile.storage_path)?;
            output::ok(&format!("backup created: {}", record.file_name));
            Some(record)
        } else {
            output::note("no storage file yet; nothing to back up");
            None
        };

        self.step(ResetStep::GenerateIds);
        let identity = DeviceIdentity::generate();

        self.step(ResetStep::RewriteConfig);
        let doc = storage::load_or_empty(&self.profile.storage_path);
        let doc = storage::merge_identity(doc, &identity);
        storage::persist(&self.profile.storage_path, &doc)?;
        output::ok("storage.json rewritten with a fresh identity");

        self.step(ResetStep::ReportStats);
        let history = match backup::list_backups(&self.profile.storage_path) {
            Ok(history) => history,
            Err(e) => {
                // the reset already happened; a broken listing only
                // costs the statistics line
                warn!("could not enumerate backups: {}", e);
                Vec::new()
            }
        };

        self.step(ResetStep::SuppressUpdates);
        let updater = match updater::suppress(&self.profile.updater_path) {
            Ok(()) => {
                output::ok("auto-update disabled (placeholder file in place)");
                UpdaterOutcome::Suppressed
            }
            Err(e) => {
                output::warning(&format!("{} (continuing)", e));
                UpdaterOutcome::Failed(e.to_string())
            }
        };

        Ok(ResetOutcome::Completed(ResetReport {
            storage_path: self.profile.storage_path.clone(),
            backup,
            identity,
            history,
            updater,
        }))
    }

    fn step(&self, step: ResetStep) {
        debug!("step: {}", step.as_str());
    }
}
