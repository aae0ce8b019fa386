use std::error::Error;
use std::fmt;

use crate::engine::EngineError;

/// Errors produced by scoring operations.
///
/// The taxonomy is deliberately small: configuration problems are caller
/// mistakes, engine failures come from the delegated model fit, and the I/O
/// variants cover unreadable paths and malformed table cells. None of these
/// are retried; a failed operation writes no output.
#[derive(Debug)]
pub enum ScoringError {
    /// Missing or invalid caller-supplied configuration, or a malformed
    /// design/expression table.
    Configuration(String),
    /// The delegated differential-expression fit failed.
    Engine(EngineError),
    /// Underlying file I/O failed.
    Io(std::io::Error),
    /// A table cell, header, or gene-set line could not be parsed.
    Parse(String),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            ScoringError::Engine(err) => write!(f, "contrast engine failed: {}", err),
            ScoringError::Io(err) => write!(f, "I/O error: {}", err),
            ScoringError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl Error for ScoringError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScoringError::Engine(err) => Some(err),
            ScoringError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for ScoringError {
    fn from(err: EngineError) -> Self {
        ScoringError::Engine(err)
    }
}

impl From<std::io::Error> for ScoringError {
    fn from(err: std::io::Error) -> Self {
        ScoringError::Io(err)
    }
}

impl From<csv::Error> for ScoringError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return ScoringError::Parse(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => ScoringError::Io(io_err),
            _ => unreachable!("is_io_error guarantees an Io kind"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
