//! Error Types
//!
//! Every fallible operation in the crate returns [`StepError`]. Errors are
//! never swallowed: they surface to the immediate caller.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StepError>;

/// Errors raised while building step command lines or locating reports.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step type does not provide a script path.
    #[error("The Sarek workflow step definition for {step} has not been defined")]
    UndefinedStep { step: &'static str },

    /// A report file could not be unambiguously located.
    #[error("{step}: {message}")]
    Parser { step: &'static str, message: String },

    /// A command-line template referenced a name with no value.
    #[error("No value for placeholder '{key}' in command template")]
    MissingPlaceholder { key: String },

    /// A `$` in a command-line template was not followed by a valid name.
    #[error("Invalid placeholder in command template at position {position}")]
    InvalidPlaceholder { position: usize },

    /// An argument uses a name the command-line builder reserves for itself.
    #[error("Argument '{name}' clashes with a reserved command-line name")]
    ReservedArgument { name: String },

    /// An argument name cannot be written as a placeholder.
    #[error("Argument name '{name}' cannot be used on the command line")]
    InvalidArgumentName { name: String },

    /// A step definition file could not be interpreted.
    #[error("Invalid step definition '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
