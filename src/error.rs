//! Error type shared by the deflate engine and the stream controller.
//!
//! Every variant has a stable `error_name()` string and belongs to one coarse
//! [`ErrorKind`]. Configuration errors are reported before a stream exists,
//! state errors leave the stream untouched, and encoding-invariant errors put
//! the stream into its terminal `Error` state.

use std::fmt;

/// Coarse classification of a [`DeflateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    State,
    EncodingInvariant,
    Environment,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Config => "config",
            ErrorKind::State => "state",
            ErrorKind::EncodingInvariant => "encoding invariant",
            ErrorKind::Environment => "environment",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeflateError {
    /// Level outside `-1..=9`.
    LevelInvalid(i32),
    /// Window bits outside `8..=15` (or `-15..=-8` for raw framing).
    WindowBitsInvalid(i32),
    /// Memory level outside `1..=9`.
    MemLevelInvalid(i32),
    /// A preset dictionary was requested with gzip framing.
    DictionaryUnsupported,
    /// A gzip header field cannot be encoded (embedded NUL, oversized extra).
    HeaderFieldInvalid(&'static str),
    /// The stream already emitted its trailer.
    StreamFinished,
    /// The stream hit a fatal error earlier.
    StreamFailed,
    /// The caller supplied no room for output.
    NoProgress,
    /// A code length exceeded the alphabet's limit after tree construction.
    CodeLengthOverflow { len: u8, max: u8 },
    /// Code lengths over-subscribe the code space.
    KraftViolated,
    /// A stream buffer could not be reserved.
    AllocationFailed,
}

impl DeflateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeflateError::LevelInvalid(_)
            | DeflateError::WindowBitsInvalid(_)
            | DeflateError::MemLevelInvalid(_)
            | DeflateError::DictionaryUnsupported
            | DeflateError::HeaderFieldInvalid(_) => ErrorKind::Config,
            DeflateError::StreamFinished
            | DeflateError::StreamFailed
            | DeflateError::NoProgress => ErrorKind::State,
            DeflateError::CodeLengthOverflow { .. } | DeflateError::KraftViolated => {
                ErrorKind::EncodingInvariant
            }
            DeflateError::AllocationFailed => ErrorKind::Environment,
        }
    }

    /// Stable identifier, suitable for logs and CLI diagnostics.
    pub fn error_name(&self) -> &'static str {
        match self {
            DeflateError::LevelInvalid(_) => "ERROR_levelInvalid",
            DeflateError::WindowBitsInvalid(_) => "ERROR_windowBitsInvalid",
            DeflateError::MemLevelInvalid(_) => "ERROR_memLevelInvalid",
            DeflateError::DictionaryUnsupported => "ERROR_dictionaryUnsupported",
            DeflateError::HeaderFieldInvalid(_) => "ERROR_headerFieldInvalid",
            DeflateError::StreamFinished => "ERROR_streamFinished",
            DeflateError::StreamFailed => "ERROR_streamFailed",
            DeflateError::NoProgress => "ERROR_noProgress",
            DeflateError::CodeLengthOverflow { .. } => "ERROR_codeLengthOverflow",
            DeflateError::KraftViolated => "ERROR_kraftViolated",
            DeflateError::AllocationFailed => "ERROR_allocationFailed",
        }
    }

    /// True when the error leaves the stream in its terminal `Error` state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::EncodingInvariant | ErrorKind::Environment
        )
    }
}

impl fmt::Display for DeflateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeflateError::LevelInvalid(l) => {
                write!(f, "{}: compression level {} not in -1..=9", self.error_name(), l)
            }
            DeflateError::WindowBitsInvalid(w) => {
                write!(f, "{}: window bits {} not in 8..=15", self.error_name(), w)
            }
            DeflateError::MemLevelInvalid(m) => {
                write!(f, "{}: memory level {} not in 1..=9", self.error_name(), m)
            }
            DeflateError::HeaderFieldInvalid(field) => {
                write!(f, "{}: gzip header field `{}`", self.error_name(), field)
            }
            DeflateError::CodeLengthOverflow { len, max } => {
                write!(f, "{}: code length {} exceeds {}", self.error_name(), len, max)
            }
            _ => f.write_str(self.error_name()),
        }
    }
}

impl std::error::Error for DeflateError {}

impl From<std::collections::TryReserveError> for DeflateError {
    fn from(_: std::collections::TryReserveError) -> Self {
        DeflateError::AllocationFailed
    }
}
