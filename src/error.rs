//! Error types for tempo profiling

use std::fmt;

/// Errors that can occur while building a tempo profile
#[derive(Debug, Clone, PartialEq)]
pub enum TempoError {
    /// Malformed or empty timeline input, or invalid configuration
    InvalidInput(String),

    /// No tempo class matched, or a label not present in the class table
    UnknownLabel(String),

    /// Tempo class table failed validation (e.g. duplicate labels)
    Configuration(String),

    /// Standard MIDI File could not be read
    MidiParse(String),

    /// File system error while reading input
    Io(String),
}

impl fmt::Display for TempoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempoError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TempoError::UnknownLabel(msg) => write!(f, "Unknown tempo label: {}", msg),
            TempoError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            TempoError::MidiParse(msg) => write!(f, "MIDI parse error: {}", msg),
            TempoError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TempoError {}

impl From<std::io::Error> for TempoError {
    fn from(err: std::io::Error) -> Self {
        TempoError::Io(err.to_string())
    }
}
