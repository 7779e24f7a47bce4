use ab_behavior::RegistryError;
use ab_core::{AgentId, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("scheduler configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agent {0} is not managed by this scheduler")]
    UnknownAgent(AgentId),

    #[error("definition registry error: {0}")]
    Registry(#[from] RegistryError),
}

pub type SchedResult<T> = Result<T, SchedError>;
