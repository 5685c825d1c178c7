use std::fmt;

/// Error types for TAS run log parsing
#[derive(Debug)]
pub enum TasError {
    /// I/O errors
    Io(std::io::Error),
    /// A required header section marker was never found
    MissingSection(String),
    /// File contents do not have the shape required by the requested operation
    InvalidFileFormat(String),
    /// Per-sensor line pattern failed to compile
    Pattern(regex::Error),
    /// Export format error
    Export(String),
}

impl fmt::Display for TasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TasError::Io(err) => write!(f, "I/O error: {}", err),
            TasError::MissingSection(name) => write!(f, "Missing section: {}", name),
            TasError::InvalidFileFormat(msg) => write!(f, "Invalid file format: {}", msg),
            TasError::Pattern(err) => write!(f, "Pattern error: {}", err),
            TasError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TasError::Io(err) => Some(err),
            TasError::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TasError {
    fn from(err: std::io::Error) -> Self {
        TasError::Io(err)
    }
}

impl From<regex::Error> for TasError {
    fn from(err: regex::Error) -> Self {
        TasError::Pattern(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for TasError {
    fn from(err: csv::Error) -> Self {
        TasError::Export(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for TasError {
    fn from(err: serde_json::Error) -> Self {
        TasError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TasError>;
