use super::ContextId;

/// Indicates that an insert failed because the identifier is already tracked.
#[derive(Debug, thiserror::Error)]
#[error("the provided context id ({context_id}) is already present")]
pub struct ContextAlreadyPresent {
    pub context_id: ContextId,
}

/// Indicates that a lookup or removal failed because the identifier is not
/// tracked.
#[derive(Debug, thiserror::Error)]
#[error("the provided context id ({context_id}) could not be found")]
pub struct ContextNotFound {
    pub context_id: ContextId,
}
