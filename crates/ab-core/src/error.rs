//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where a config failure can surface.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `ab-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ab-core`.
pub type CoreResult<T> = Result<T, CoreError>;
