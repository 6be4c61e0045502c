use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the document was generated and written
    Success = 0,
    /// Application error (archive error, registry error, file I/O error, etc.)
    ApplicationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ApplicationError => write!(f, "Application Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
///
/// Fatal failures are raised as one of these variants and wrapped with
/// `anyhow::Context` by the caller, so `downcast_ref::<SbomError>()` keeps
/// working through the context chain.
#[derive(Debug, Error)]
pub enum SbomError {
    /// Validation error for options, identifiers and configuration
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to extract archive: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is a valid docker-archive or tar file")]
    Extraction { path: PathBuf, details: String },

    #[error("Duplicate SPDX identifier '{id}' in {container}")]
    DuplicateIdentifier { id: String, container: String },

    #[error("Failed to render {entity}: {details}")]
    Render { entity: String, details: String },

    #[error("Failed to parse SPDX document {path} at line {line}: {details}")]
    Parse {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("Failed to pull image: {reference}\nDetails: {details}\n\n💡 Hint: Only anonymous registry access is supported")]
    Registry { reference: String, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl SbomError {
    /// Shorthand for building a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        SbomError::Validation {
            message: message.into(),
        }
    }
}
