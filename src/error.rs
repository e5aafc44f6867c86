//! Crate-level error types.

use std::fmt;

/// Errors produced by the flexcam crate.
#[derive(Debug)]
pub enum CameraError {
    /// A state update supplied both an explicit rotation and an explicit
    /// target. Exactly one of them may be authoritative.
    RotationAndTarget,
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RotationAndTarget => write!(
                f,
                "rotation and target cannot both be set in one camera state \
                 update"
            ),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for CameraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CameraError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
