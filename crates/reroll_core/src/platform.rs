//! Platform lookup table
//!
//! Maps an OS family to the concrete paths the reset touches: install
//! markers, the identifier storage file, and the updater directory.
//! Resolution is a pure computation over [`HostEnv`] so tests can build
//! profiles for any OS without being on it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ResetError;

/// Product name used in user-facing messages
pub const PRODUCT_NAME: &str = "Cursor";

/// Lowercase substring that marks a process as the target editor
pub const PROCESS_NEEDLE: &str = "cursor";

/// Lowercase substring that marks a process as this tool itself
///
/// The binary is named `cursor-reroll`, which contains the needle, so
/// matching excludes anything carrying this marker.
pub const SELF_MARKER: &str = "reroll";

/// Storage file location relative to the per-user product directory
const STORAGE_SUBPATH: [&str; 3] = ["User", "globalStorage", "storage.json"];

/// Name of the updater directory that gets replaced by a placeholder
const UPDATER_DIR_NAME: &str = "cursor-updater";

/// Supported operating system families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsFamily {
    Linux,
    MacOs,
    Windows,
}

impl OsFamily {
    /// Detect the family of the running OS
    pub fn detect() -> Result<Self, ResetError> {
        Self::from_os_str(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` string to a family
    ///
    /// Anything outside the three supported families is rejected up
    /// front rather than guessed at.
    pub fn from_os_str(os: &str) -> Result<Self, ResetError> {
        match os {
            "linux" => Ok(OsFamily::Linux),
            "macos" => Ok(OsFamily::MacOs),
            "windows" => Ok(OsFamily::Windows),
            other => Err(ResetError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "macos",
            OsFamily::Windows => "windows",
        }
    }
}

/// Environment facts the path table depends on
///
/// Captured once at startup; profile resolution never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct HostEnv {
    /// Home directory of the invoking user
    pub home: PathBuf,
    /// `%APPDATA%` if set (Windows roaming profile)
    pub appdata: Option<PathBuf>,
    /// `%LOCALAPPDATA%` if set
    pub local_appdata: Option<PathBuf>,
}

impl HostEnv {
    /// Capture the environment of the current process
    pub fn capture() -> Result<Self, ResetError> {
        let home = dirs::home_dir().ok_or_else(|| {
            ResetError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "home directory could not be determined",
            ))
        })?;

        Ok(Self {
            home,
            appdata: std::env::var_os("APPDATA").map(PathBuf::from),
            local_appdata: std::env::var_os("LOCALAPPDATA").map(PathBuf::from),
        })
    }

    /// `%APPDATA%` or the conventional `<home>\AppData\Roaming` fallback
    fn roaming(&self) -> PathBuf {
        self.appdata
            .clone()
            .unwrap_or_else(|| self.home.join("AppData").join("Roaming"))
    }

    /// `%LOCALAPPDATA%` or the conventional `<home>\AppData\Local` fallback
    fn local(&self) -> PathBuf {
        self.local_appdata
            .clone()
            .unwrap_or_else(|| self.home.join("AppData").join("Local"))
    }
}

/// Concrete paths for one OS family
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub os: OsFamily,
    /// Paths whose existence counts as "Cursor is installed"
    pub install_check_paths: Vec<PathBuf>,
    /// The identifier storage file
    pub storage_path: PathBuf,
    /// The auto-updater directory
    pub updater_path: PathBuf,
}

impl PlatformProfile {
    /// Resolve the path table for an OS family
    ///
    /// Pure lookup: no filesystem probing happens here. Existence checks
    /// are the caller's job.
    pub fn resolve(os: OsFamily, env: &HostEnv) -> Self {
        match os {
            OsFamily::Linux => Self {
                os,
                install_check_paths: vec![
                    PathBuf::from("/opt/Cursor"),
                    PathBuf::from("/usr/share/cursor"),
                    env.home.join(".local").join("share").join("cursor"),
                ],
                storage_path: storage_file(env.home.join(".config").join("Cursor")),
                updater_path: env.home.join(".config").join(UPDATER_DIR_NAME),
            },
            OsFamily::MacOs => {
                let app_support = env.home.join("Library").join("Application Support");
                Self {
                    os,
                    install_check_paths: vec![PathBuf::from("/Applications/Cursor.app")],
                    storage_path: storage_file(app_support.join("Cursor")),
                    updater_path: app_support.join("Caches").join(UPDATER_DIR_NAME),
                }
            }
            OsFamily::Windows => {
                let local = env.local();
                Self {
                    os,
                    // Installer casing has varied between releases, so both
                    // spellings are probed.
                    install_check_paths: vec![
                        local.join("Programs").join("Cursor").join("Cursor.exe"),
                        local.join("Programs").join("cursor").join("Cursor.exe"),
                    ],
                    storage_path: storage_file(env.roaming().join("Cursor")),
                    updater_path: local.join(UPDATER_DIR_NAME),
                }
            }
        }
    }
}

fn storage_file(product_dir: PathBuf) -> PathBuf {
    STORAGE_SUBPATH
        .iter()
        .fold(product_dir, |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fake_env() -> HostEnv {
        HostEnv {
            home: PathBuf::from("/home/tester"),
            appdata: None,
            local_appdata: None,
        }
    }

    #[test]
    fn test_from_os_str_supported_families() {
        assert_eq!(OsFamily::from_os_str("linux").unwrap(), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_str("macos").unwrap(), OsFamily::MacOs);
        assert_eq!(OsFamily::from_os_str("windows").unwrap(), OsFamily::Windows);
    }

    #[test]
    fn test_from_os_str_rejects_unknown() {
        let err = OsFamily::from_os_str("freebsd").unwrap_err();
        match err {
            ResetError::UnsupportedPlatform(name) => assert_eq!(name, "freebsd"),
            other => panic!("expected UnsupportedPlatform, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_is_total_for_supported_families() {
        let env = fake_env();
        for os in [OsFamily::Linux, OsFamily::MacOs, OsFamily::Windows] {
            let profile = PlatformProfile::resolve(os, &env);
            assert!(!profile.install_check_paths.is_empty());
            assert!(profile
                .storage_path
                .ends_with(Path::new("User/globalStorage/storage.json")));
            assert!(profile
                .updater_path
                .to_string_lossy()
                .contains(UPDATER_DIR_NAME));
        }
    }

    #[test]
    fn test_linux_paths_rooted_in_home_and_system() {
        let profile = PlatformProfile::resolve(OsFamily::Linux, &fake_env());
        assert!(profile
            .install_check_paths
            .contains(&PathBuf::from("/opt/Cursor")));
        assert!(profile.storage_path.starts_with("/home/tester/.config"));
        assert_eq!(
            profile.updater_path,
            PathBuf::from("/home/tester/.config/cursor-updater")
        );
    }

    #[test]
    fn test_windows_env_overrides_take_precedence() {
        let env = HostEnv {
            home: PathBuf::from("/home/tester"),
            appdata: Some(PathBuf::from("/roam")),
            local_appdata: Some(PathBuf::from("/loc")),
        };
        let profile = PlatformProfile::resolve(OsFamily::Windows, &env);
        assert!(profile.storage_path.starts_with("/roam"));
        assert!(profile.updater_path.starts_with("/loc"));
        assert!(profile.install_check_paths[0].starts_with("/loc"));
    }

    #[test]
    fn test_windows_falls_back_to_home_appdata() {
        let profile = PlatformProfile::resolve(OsFamily::Windows, &fake_env());
        assert!(profile
            .storage_path
            .starts_with("/home/tester/AppData/Roaming"));
        assert!(profile
            .updater_path
            .starts_with("/home/tester/AppData/Local"));
    }

    #[test]
    fn test_self_marker_is_contained_in_binary_name() {
        // The exclusion rule only works if the marker actually appears
        // in our own process name.
        assert!("cursor-reroll".contains(SELF_MARKER));
        assert!("cursor-reroll".contains(PROCESS_NEEDLE));
    }
}
