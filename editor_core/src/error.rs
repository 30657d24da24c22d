//! Error types for the text storage core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::workspace::BufferId;

/// Errors returned by zipper, line, buffer and workspace operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A position, offset or count reached past the end of a sequence.
    #[error("offset {offset} out of range (length {len})")]
    OutOfRange { offset: usize, len: usize },

    /// The backing file was absent and could not be created.
    #[error("cannot create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file exists but could not be read or mapped.
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing, syncing or renaming the replacement file failed.
    #[error("cannot persist {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no file path set")]
    NoFilePath,

    #[error("no buffer with id {0}")]
    NoSuchBuffer(BufferId),

    #[error("no active buffer")]
    NoActiveBuffer,
}

impl Error {
    pub(crate) fn out_of_range(offset: usize, len: usize) -> Self {
        Error::OutOfRange { offset, len }
    }

    /// Returns true for index errors made by the caller, as opposed to I/O
    /// failures.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }

    /// Returns the OS error code behind an I/O failure, if there is one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Create { source, .. }
            | Error::Unreadable { source, .. }
            | Error::Persist { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
