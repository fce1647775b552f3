//! Core library for cursor-reroll
//!
//! Everything the reset pipeline needs, minus the terminal: platform
//! path lookup, process detection and kill, identity generation, the
//! storage document, timestamped backups, and updater suppression.
//! The CLI crate sequences these into the actual reset flow.

pub mod backup;
pub mod error;
pub mod identity;
pub mod platform;
pub mod process;
pub mod storage;
pub mod updater;

pub use backup::{list_backups, snapshot, BackupRecord, BACKUP_SUFFIX};
pub use error::ResetError;
pub use identity::{
    DeviceIdentity, KEY_DEV_DEVICE_ID, KEY_MAC_MACHINE_ID, KEY_MACHINE_ID,
};
pub use platform::{
    HostEnv, OsFamily, PlatformProfile, PROCESS_NEEDLE, PRODUCT_NAME, SELF_MARKER,
};
pub use process::{
    MatchSpec, ProcessController, ProcessHandle, ProcessLister, QueryError, SystemLister,
    SETTLE_DELAY,
};
pub use storage::{ensure_parent, load_or_empty, merge_identity, persist, StorageDoc};
pub use updater::suppress;
