use std::fmt;
use std::path::PathBuf;

/// Where a parameter value (or an offending key) came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideSource {
    /// Value read from an answer file
    AnswerFile(PathBuf),

    /// Value supplied directly by the caller (e.g. `-P KEY=VALUE`)
    Explicit,
}

impl fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideSource::AnswerFile(path) => write!(f, "answer file {}", path.display()),
            OverrideSource::Explicit => write!(f, "explicit override"),
        }
    }
}

/// Error types for parameter resolution
#[derive(Debug)]
pub enum ParameterError {
    /// A parameter handed to the collection cannot be keyed (empty name)
    InvalidParameterType(String),

    /// A write referenced a name the template does not declare
    UnknownParameter {
        name: String,
        source: Option<OverrideSource>,
    },

    /// A read referenced a name the template does not declare
    NotFound(String),

    /// The resolver configuration cannot be used
    InvalidConfigType(String),

    /// The answer file is not a flat name/value mapping
    InvalidAnswerFile { path: PathBuf, message: String },

    /// An override value is a sequence or mapping instead of a scalar
    NonScalarValue {
        name: String,
        source: OverrideSource,
    },

    /// Reading an override source failed
    Io { path: PathBuf, message: String },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::InvalidParameterType(msg) => {
                write!(f, "Invalid stack parameter: {}", msg)
            }
            ParameterError::UnknownParameter { name, source } => {
                write!(f, "Invalid stack parameter '{}'", name)?;

                if let Some(source) = source {
                    write!(f, " (from {})", source)?;
                }

                write!(f, ": not declared by the template")
            }
            ParameterError::NotFound(name) => {
                write!(f, "Stack parameter not found: {}", name)
            }
            ParameterError::InvalidConfigType(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            ParameterError::InvalidAnswerFile { path, message } => {
                write!(f, "Invalid answer file {}: {}", path.display(), message)
            }
            ParameterError::NonScalarValue { name, source } => {
                write!(
                    f,
                    "Value for stack parameter '{}' (from {}) must be a scalar",
                    name, source
                )
            }
            ParameterError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// Result type for parameter operations
pub type ParameterResult<T> = Result<T, ParameterError>;
