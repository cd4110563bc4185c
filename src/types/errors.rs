/*!
 * Access-Layer Errors
 * Typed failures that keep the underlying OS error number observable
 */

use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a filesystem access operation
#[must_use = "filesystem operations can fail and must be handled"]
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem access errors.
///
/// OS primitive failures are represented without translation: the variant
/// names the condition and [`FsError::raw_os_error`] recovers the errno, so
/// callers that speak in OS status codes lose nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FsError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("name too long: {0}")]
    NameTooLong(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("read-only: {0}")]
    ReadOnly(String),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        errno: Option<i32>,
    },
}

impl FsError {
    /// Classify an `io::Error`, keeping its raw OS error number.
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;

        let context = context.into();
        match e.kind() {
            ErrorKind::NotFound => FsError::NotFound(context),
            ErrorKind::PermissionDenied => FsError::PermissionDenied(context),
            ErrorKind::AlreadyExists => FsError::AlreadyExists(context),
            _ => match e.raw_os_error() {
                Some(code) if code == Errno::ENAMETOOLONG as i32 => FsError::NameTooLong(context),
                Some(code) if code == Errno::ENOTDIR as i32 => FsError::NotADirectory(context),
                Some(code) if code == Errno::EISDIR as i32 => FsError::IsADirectory(context),
                raw => FsError::Io {
                    context: format!("{}: {}", context, e),
                    errno: raw,
                },
            },
        }
    }

    /// Classify a raw errno returned by an OS primitive.
    pub fn from_errno(errno: Errno, context: impl Into<String>) -> Self {
        Self::from_io(std::io::Error::from_raw_os_error(errno as i32), context)
    }

    /// The OS error number for this condition, when one applies.
    pub fn raw_os_error(&self) -> Option<i32> {
        let errno = match self {
            FsError::NotFound(_) => Errno::ENOENT,
            FsError::AlreadyExists(_) => Errno::EEXIST,
            FsError::PermissionDenied(_) => Errno::EACCES,
            FsError::NameTooLong(_) => Errno::ENAMETOOLONG,
            FsError::NotADirectory(_) => Errno::ENOTDIR,
            FsError::IsADirectory(_) => Errno::EISDIR,
            FsError::InvalidPath(_) => Errno::EINVAL,
            FsError::ReadOnly(_) => Errno::EROFS,
            FsError::Io { errno, .. } => return *errno,
        };
        Some(errno as i32)
    }
}
