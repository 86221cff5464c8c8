use std::path::PathBuf;
use thiserror::Error;

/// Conditions that stop response-file expansion outright.
///
/// Neither is recoverable within the call: scanning stops at the element that
/// triggered it and no partial result is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("{program}: error: @-file refers to a directory: {}", .path.display())]
    Directory { program: String, path: PathBuf },

    #[error("{program}: error: too many @-files encountered")]
    TooManyResponseFiles { program: String },
}

/// Errors that can occur when reading configuration from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected a positive integer")]
    InvalidLimit { var: &'static str, value: String },
}
