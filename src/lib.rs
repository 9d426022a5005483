//! Sprout bootstraps new projects from reusable templates.
//! It copies a template's file tree into a destination, asks the questions
//! the template declares and substitutes the answers into selected files.

/// Prompt sequencing and preloaded answers
pub mod answers;

/// Command-line interface module for the Sprout application
pub mod cli;

/// Template descriptor loading
/// Supports JSON and YAML formats (config.json, config.yml, config.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Render context assembly
pub mod context;

/// Error types and handling for the Sprout application
pub mod error;

/// End-to-end generation workflow
pub mod generator;

/// Lifecycle hooks
/// Handles execution of the scripts declared under `hooks` in the descriptor
pub mod hooks;

/// Output tree materialization, file selection and in-place rendering
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Descriptor evaluation and token substitution
pub mod renderer;

pub use generator::{generate, GenerationRequest, Generator};
