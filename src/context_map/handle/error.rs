use super::ContextId;

/// Indicates that a view of a weakly held context cell failed because the
/// owning map has dropped it.
#[derive(Debug, thiserror::Error)]
#[error("the context ({context_id}) is no longer live")]
pub struct ContextGone {
    pub context_id: ContextId,
}
