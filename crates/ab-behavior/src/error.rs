use ab_core::DefinitionId;
use thiserror::Error;

/// Registry-construction errors.  All are programmer errors: surface them at
/// load time, never retry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("definition {0} is already registered")]
    DuplicateDefinition(DefinitionId),

    #[error("definition {0} is a core definition and cannot be overlaid")]
    ProtectedDefinition(DefinitionId),

    #[error("unknown definition {0}")]
    UnknownDefinition(DefinitionId),

    #[error("invalid definition {id}: {reason}")]
    InvalidDefinition { id: DefinitionId, reason: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
