//! services/result_admin/src/error.rs
//!
//! Defines the primary error type for the administration CLI.

use crate::config::ConfigError;
use result_admin_core::ports::PortError;
use result_admin_core::table::PageSizeError;
use result_admin_core::WorkflowError;

/// The primary error type for the `result_admin` service.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A screen workflow rejected the operation or failed to complete it.
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    PageSize(#[from] PageSizeError),

    /// No record with this id was loaded for the screen.
    #[error("No {what} record with id {id}")]
    NotFound { what: &'static str, id: String },

    /// A `--data` argument or a file could not be parsed as JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., reading the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The command needs a signed-in session and none is available.
    #[error("Not logged in. Run `result-admin login` first.")]
    NotAuthenticated,

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl AdminError {
    /// The line printed to the operator, preferring the backend's own wording.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Port(e) => e.user_message(),
            AdminError::Workflow(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
