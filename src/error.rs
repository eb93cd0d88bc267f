//! Error types for trellis.
//!
//! Every failure a command can report maps onto one [`TrellisError`] variant.
//! The CLI turns the variant into an exit status with [`TrellisError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for trellis operations
#[derive(Error, Debug)]
pub enum TrellisError {
    // =========================================================================
    // Usage and configuration
    // =========================================================================
    /// Bad or missing command-line arguments
    #[error("{0}")]
    Usage(String),

    /// Invalid configuration value or unreadable config source
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A stage role key or label that is not registered
    #[error("Unknown stage: '{0}'")]
    UnknownRole(String),

    // =========================================================================
    // Project lookup
    // =========================================================================
    /// No project matches the requested id
    #[error("Project id not found: {id}")]
    NotFound { id: String },

    /// More than one project matches the requested id
    #[error("Multiple projects found for id {id}: {}", format_paths(.matches))]
    AmbiguousProject { id: String, matches: Vec<PathBuf> },

    /// The project directory has no metadata record
    #[error("Missing project.yaml in {}", .path.display())]
    MissingMetadata { path: PathBuf },

    // =========================================================================
    // Promotion
    // =========================================================================
    /// A later-stage promotion needs a category that was never assigned
    #[error("Missing category for promotion; run `trellis describe` first.")]
    MissingCategory,

    /// The requested stage change is not in the transition table
    #[error("Cannot promote from {from} to {to}: {hint}")]
    InvalidTransition {
        from: String,
        to: String,
        hint: String,
    },

    /// Archived projects cannot move anywhere
    #[error("{stage} projects cannot be promoted.")]
    TerminalStage { stage: String },

    /// The computed destination directory is already occupied
    #[error("Destination already exists: {}", .path.display())]
    DestinationExists { path: PathBuf },

    /// A required external binary is not on PATH
    #[error("{tool} not found on PATH; {hint}")]
    ExternalToolMissing { tool: String, hint: String },

    /// A spawned process exited unsuccessfully
    #[error("`{command}` failed: {message}")]
    Command { command: String, message: String },

    /// The project was moved but a later step failed; nothing was rolled back
    #[error("Promotion incomplete at {}: {cause}", .destination.display())]
    Incomplete {
        destination: PathBuf,
        completed: Vec<String>,
        cause: Box<TrellisError>,
    },

    // =========================================================================
    // Metadata generation
    // =========================================================================
    /// The generator backend could not be reached after all retries
    #[error("AI request failed: {provider} request failed: {message}")]
    Generator { provider: String, message: String },

    /// The generator answered with something that is not a JSON object
    #[error("AI response was not valid JSON: {message}")]
    MalformedResponse { message: String },

    /// The generated draft did not pass schema validation
    #[error("AI response missing required fields or types.")]
    InvalidMetadata,

    // =========================================================================
    // Wrapped errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TrellisError {
    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing-tool error with an installation hint
    pub fn tool_missing(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ExternalToolMissing {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    /// Create a failed-command error
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Exit status for the CLI: 2 for usage errors, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Type alias for trellis results
pub type Result<T> = std::result::Result<T, TrellisError>;
