//! Target process detection and termination
//!
//! Matching is by case-insensitive substring over process names, with
//! two exclusions: our own PID and anything whose name carries the
//! self marker (the tool's binary name contains the product needle).
//!
//! v0.4.0: process enumeration moved behind [`ProcessLister`] so the
//! kill-and-verify logic is testable without spawning editors.

use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{debug, warn};

use crate::error::ResetError;

/// How long to wait between the kill pass and the verification pass
///
/// Editors this size tear down helpers and GPU processes on the order
/// of a second; 1.5s keeps the re-check from racing them.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1500);

/// A live process as far as matching is concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHandle {
    pub pid: u32,
    pub name: String,
}

/// Why a process table could not be read
pub type QueryError = String;

/// Source of process snapshots and kill calls
///
/// `snapshot` must enumerate afresh on every call; the verification
/// pass depends on not being served a stale table. An empty `Ok` means
/// nothing is running, an `Err` means the query itself failed, and the
/// two are never conflated.
pub trait ProcessLister {
    fn snapshot(&mut self) -> Result<Vec<ProcessHandle>, QueryError>;

    /// Forceful kill. The return value reports whether the call was
    /// issued, not whether the process died; callers re-check via
    /// `snapshot`.
    fn kill(&mut self, pid: u32) -> bool;
}

/// The real lister, backed by the OS process table
pub struct SystemLister {
    system: System,
}

impl SystemLister {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl Default for SystemLister {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLister for SystemLister {
    fn snapshot(&mut self) -> Result<Vec<ProcessHandle>, QueryError> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        Ok(self
            .system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessHandle {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().to_string(),
            })
            .filter(|handle| !handle.name.is_empty())
            .collect())
    }

    fn kill(&mut self, pid: u32) -> bool {
        match self.system.process(Pid::from_u32(pid)) {
            Some(process) => process.kill(),
            None => false,
        }
    }
}

/// What counts as a target process
#[derive(Debug, Clone)]
pub struct MatchSpec {
    needle: String,
    self_pid: u32,
    self_marker: String,
}

impl MatchSpec {
    /// Build a spec with explicit exclusions; substrings are compared
    /// lowercase
    pub fn new(needle: &str, self_pid: u32, self_marker: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
            self_pid,
            self_marker: self_marker.to_lowercase(),
        }
    }

    /// Spec that excludes the current process by its real PID
    pub fn for_current_process(needle: &str, self_marker: &str) -> Self {
        let self_pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid.as_u32(),
            Err(e) => {
                // PID 0 never names a user process, so the exclusion
                // simply has no effect.
                warn!("could not determine own PID ({}); relying on the name marker", e);
                0
            }
        };
        Self::new(needle, self_pid, self_marker)
    }

    pub fn matches(&self, handle: &ProcessHandle) -> bool {
        if handle.pid == self.self_pid {
            return false;
        }
        let name = handle.name.to_lowercase();
        name.contains(&self.needle) && !name.contains(&self.self_marker)
    }
}

/// Kill-and-verify driver over a lister
pub struct ProcessController<L: ProcessLister> {
    lister: L,
    spec: MatchSpec,
    settle: Duration,
}

impl<L: ProcessLister> ProcessController<L> {
    pub fn new(lister: L, spec: MatchSpec) -> Self {
        Self {
            lister,
            spec,
            settle: SETTLE_DELAY,
        }
    }

    /// Override the settle delay (tests use `Duration::ZERO`)
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Fresh snapshot filtered down to matching processes
    pub fn matches(&mut self) -> Result<Vec<ProcessHandle>, ResetError> {
        let all = self
            .lister
            .snapshot()
            .map_err(ResetError::ProcessQueryFailed)?;
        Ok(all
            .into_iter()
            .filter(|handle| self.spec.matches(handle))
            .collect())
    }

    /// Whether any matching process is alive right now
    pub fn is_target_running(&mut self) -> Result<bool, ResetError> {
        Ok(!self.matches()?.is_empty())
    }

    /// Kill every match, wait out the settle delay, then verify against
    /// a fresh snapshot
    ///
    /// The verification is not optional: a kill call can report success
    /// while the process lingers, and only the re-check decides whether
    /// the run may touch files.
    pub fn terminate(&mut self) -> Result<(), ResetError> {
        let targets = self.matches()?;
        for target in &targets {
            if self.lister.kill(target.pid) {
                debug!("kill sent to {} (pid {})", target.name, target.pid);
            } else {
                warn!(
                    "kill call failed for {} (pid {}); verification will decide",
                    target.name, target.pid
                );
            }
        }

        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }

        let remaining = self.matches()?;
        if remaining.is_empty() {
            Ok(())
        } else {
            Err(ResetError::StillRunning {
                remaining: remaining.len(),
            })
        }
    }
}
