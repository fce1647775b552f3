//! Exit codes for cursor-reroll
//!
//! A declined confirmation is a normal outcome, not a failure, and
//! exits 0. Everything that stops the reset before files are touched
//! gets its own code so scripts can tell the cases apart.

use reroll_core::ResetError;

/// Exit code for success, including the user declining to close Cursor
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (I/O, serialization, internal)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the running OS is not in the platform table
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 64;

/// Exit code when no Cursor installation was found
pub const EXIT_NOT_INSTALLED: i32 = 66;

/// Exit code when the process table could not be read
pub const EXIT_PROCESS_QUERY_FAILED: i32 = 70;

/// Exit code when Cursor survived the kill pass
pub const EXIT_STILL_RUNNING: i32 = 75;

/// Map a pipeline error to its exit code
pub fn exit_code_for(error: &ResetError) -> i32 {
    match error {
        ResetError::NotInstalled => EXIT_NOT_INSTALLED,
        ResetError::UnsupportedPlatform(_) => EXIT_UNSUPPORTED_PLATFORM,
        ResetError::ProcessQueryFailed(_) => EXIT_PROCESS_QUERY_FAILED,
        ResetError::StillRunning { .. } => EXIT_STILL_RUNNING,
        ResetError::SourceMissing(_)
        | ResetError::SuppressFailed(_)
        | ResetError::Io(_)
        | ResetError::Json(_) => EXIT_GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_codes_for_distinct_aborts() {
        let codes = [
            exit_code_for(&ResetError::NotInstalled),
            exit_code_for(&ResetError::UnsupportedPlatform("plan9".into())),
            exit_code_for(&ResetError::ProcessQueryFailed("x".into())),
            exit_code_for(&ResetError::StillRunning { remaining: 1 }),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, EXIT_SUCCESS);
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_io_errors_are_general() {
        let err = ResetError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(exit_code_for(&err), EXIT_GENERAL_ERROR);
    }
}
