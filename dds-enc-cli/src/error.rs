//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a uniform failure exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use dds_enc::dds::DdsError;
use dds_enc::RasterError;

use crate::USAGE;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Wrong arity or malformed flags; holds the rendered parser message
    Usage(String),
    /// Format argument is not dxt1-dxt5
    UnknownFormat(DdsError),
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Failed to load the input image
    Decode(RasterError),
    /// Failed to create the output file
    OutputOpen { path: PathBuf, error: io::Error },
    /// Failed while writing the container
    Encode { path: PathBuf, error: DdsError },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        match self {
            CliError::Usage(rendered) => eprint!("{}", rendered),
            CliError::UnknownFormat(_) => {
                eprintln!("Error: {}", self);
                eprintln!();
                eprintln!("usage: {}", USAGE);
            }
            _ => eprintln!("Error: {}", self),
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(rendered) => write!(f, "{}", rendered.trim_end()),
            CliError::UnknownFormat(e) => write!(f, "{}", e),
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Decode(e) => write!(f, "{}", e),
            CliError::OutputOpen { path, error } => {
                write!(f, "Failed to create '{}': {}", path.display(), error)
            }
            CliError::Encode { path, error } => {
                write!(f, "Failed to encode '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::UnknownFormat(e) => Some(e),
            CliError::LoggingInit(e) => Some(e),
            CliError::Decode(e) => Some(e),
            CliError::OutputOpen { error, .. } => Some(error),
            CliError::Encode { error, .. } => Some(error),
            CliError::Usage(_) => None,
        }
    }
}
