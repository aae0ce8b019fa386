use std::error::Error;
use std::fmt;

/// Errors produced by dataset loading, model training, and reporting.
#[derive(Debug)]
pub enum ClassifierError {
    /// Invalid caller-supplied configuration or a malformed dataset.
    Configuration(String),
    /// The underlying model backend failed to fit or predict.
    Model(String),
    /// Underlying file I/O failed.
    Io(std::io::Error),
    /// A table cell, header, or config file could not be parsed.
    Parse(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            ClassifierError::Model(msg) => write!(f, "model error: {}", msg),
            ClassifierError::Io(err) => write!(f, "I/O error: {}", err),
            ClassifierError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl Error for ClassifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClassifierError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClassifierError {
    fn from(err: std::io::Error) -> Self {
        ClassifierError::Io(err)
    }
}

impl From<csv::Error> for ClassifierError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return ClassifierError::Parse(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => ClassifierError::Io(io_err),
            _ => unreachable!("is_io_error guarantees an Io kind"),
        }
    }
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
