//! Error handling for the Sprout application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for Sprout operations.
///
/// Every variant is fatal to a generation run. User cancellation is not an
/// error and never travels through this type.
#[derive(Error, Debug)]
pub enum SproutError {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during descriptor loading or CLI resolution
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The template root has no `template` subdirectory to copy
    #[error("No `template` directory found in '{template_dir}'.")]
    TemplateDirectoryMissing { template_dir: String },

    /// Represents errors that occur while substituting tokens in a file
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Descriptor evaluation failures
    #[error("Failed to evaluate template descriptor: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Invalid glob pattern: {0}.")]
    GlobError(#[from] globset::Error),

    #[error("Failed to walk directory: {0}.")]
    WalkError(#[from] walkdir::Error),

    /// Represents errors that occur during hook script execution
    #[error("Hook execution error: {0}.")]
    HookError(String),

    /// Represents failures of the interactive terminal
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

/// Convenience type alias for results with SproutError as the error type.
pub type SproutResult<T> = Result<T, SproutError>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The SproutError to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: SproutError) {
    eprintln!("{err}");
    std::process::exit(1);
}
