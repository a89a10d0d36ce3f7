use std::fmt;

use crate::parameter::ParameterName;

/// Errors raised by the wave engine.
///
/// Configuration errors carry a message naming the constraint that failed so
/// the input layer can show it to the user unchanged.
#[derive(Debug)]
pub enum WaveError {
    /// Sample count, vector count or fragmentation lengths are out of range.
    InvalidConfig(String),
    /// No preset is registered under this name.
    UnknownPreset(String),
    /// No parameter has this display name.
    UnknownParameter(String),
    /// A ring or buffer index beyond its logical size.
    IndexOutOfRange { index: usize, len: usize },
    /// The parameter is locked or fixed by the active preset.
    ReadOnlyParameter(ParameterName),
    /// Export could not be started (e.g. unsupported file extension).
    Export(String),
    /// I/O failure while writing an export.
    Io(std::io::Error),
}

impl fmt::Display for WaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            WaveError::UnknownPreset(name) => write!(f, "unknown preset: {}", name),
            WaveError::UnknownParameter(name) => write!(f, "unknown parameter: {}", name),
            WaveError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            WaveError::ReadOnlyParameter(name) => {
                write!(f, "parameter '{}' is locked by the active preset", name.name())
            }
            WaveError::Export(msg) => write!(f, "export failed: {}", msg),
            WaveError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for WaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WaveError {
    fn from(e: std::io::Error) -> Self {
        WaveError::Io(e)
    }
}

/// Result type for wave engine operations.
pub type WaveResult<T> = Result<T, WaveError>;
