use std::fmt::Display;
use std::path::Path;

use msb_core::Uuid;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("io error: {message}")]
    Io { message: String },
    #[error("filesystem error: {path}: {message}")]
    Filesystem { path: String, message: String },
    #[error("persistence error: {message}")]
    Persistence { message: String },
    #[error("playback error: {message}")]
    Playback { message: String },

    #[error("{uuid} not found")]
    NotFound { uuid: Uuid },
    #[error("playable {uuid} already has a parent")]
    AlreadyParented { uuid: Uuid },
    #[error("playable {uuid} is not a child of {container}")]
    InvalidContainerMembership { uuid: Uuid, container: Uuid },
    #[error("group {uuid} is empty")]
    EmptyGroup { uuid: Uuid },
    #[error("soundboard {uuid} is linked to a folder")]
    LinkedSoundboardViolation { uuid: Uuid },
    #[error("a group cannot contain itself")]
    RecursiveGroup,
    #[error("unknown key recording session")]
    UnknownRecording,
    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("key combination is already bound to another action")]
    DuplicateBinding,
    #[error("volume must be between 0 and 100")]
    InvalidVolume,
}

impl Error {
    #[cold]
    pub fn new_internal<E: Display>(error: E) -> Error {
        Error::Internal {
            message: error.to_string(),
        }
    }

    #[cold]
    pub fn new_io<E: Display>(error: E) -> Error {
        Error::Io {
            message: error.to_string(),
        }
    }

    #[cold]
    pub fn new_filesystem<P: AsRef<Path>, E: Display>(path: P, error: E) -> Error {
        Error::Filesystem {
            path: path.as_ref().to_string_lossy().into_owned(),
            message: error.to_string(),
        }
    }

    #[cold]
    pub fn new_persistence<E: Display>(error: E) -> Error {
        Error::Persistence {
            message: error.to_string(),
        }
    }

    #[cold]
    pub fn new_playback<E: Display>(error: E) -> Error {
        Error::Playback {
            message: error.to_string(),
        }
    }

    /// Expected conditions that callers treat as a silent no-op.
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::EmptyGroup { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
