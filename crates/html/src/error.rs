use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that stop a run before any output can be produced.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("input exceeds the {limit} byte limit")]
    InputTooLarge { limit: usize },
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<tools::buffer::BufferError> for FatalError {
    fn from(err: tools::buffer::BufferError) -> Self {
        match err {
            tools::buffer::BufferError::LimitExceeded { limit } => {
                FatalError::InputTooLarge { limit }
            }
            tools::buffer::BufferError::Io(err) => FatalError::Read(err),
        }
    }
}

/// A rejected configuration setting; the previous value is retained.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("\"{value}\" is not a valid value for option \"{option}\"")]
    BadValue { option: String, value: String },
}
