//! Error conversion utilities

use super::types::{CacheError, RecoveryHint};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl CacheError {
    /// Build an I/O error for `operation` on `path`, picking the recovery
    /// hint from the error kind.
    pub fn io(path: impl AsRef<Path>, operation: &'static str, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        let recovery_hint = hint_for_kind(source.kind(), &path);
        Self::Io {
            path,
            operation,
            source,
            recovery_hint,
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            key: key.into(),
            recovery_hint: RecoveryHint::Ignore,
        }
    }

    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            key: key.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Erase the entry or write with overwrite enabled".to_string(),
            },
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check cache configuration".to_string(),
            },
        }
    }
}

fn hint_for_kind(kind: ErrorKind, path: &Path) -> RecoveryHint {
    match kind {
        ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions {
            path: path.to_path_buf(),
        },
        ErrorKind::NotFound => RecoveryHint::Recreate,
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            RecoveryHint::Retry {
                after: Duration::from_millis(100),
            }
        }
        ErrorKind::WriteZero | ErrorKind::OutOfMemory => RecoveryHint::CheckDiskSpace,
        _ => RecoveryHint::Manual {
            instructions: "Inspect the underlying I/O error".to_string(),
        },
    }
}

impl From<std::io::Error> for CacheError {
    fn from(error: std::io::Error) -> Self {
        Self::io(PathBuf::from("."), "unknown", error)
    }
}
