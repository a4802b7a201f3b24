use std::fmt;

/// Construction-time failures of a [`StateRegistry`](super::StateRegistry).
///
/// Both variants indicate a wiring mistake at the registry's construction
/// site, caught before any context can be built on the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryBuildError<S: fmt::Debug> {
    /// An identifier was registered more than once.
    #[error("state {0:?} is registered more than once")]
    DuplicateState(S),

    /// Identifiers from the closed set were never registered.
    #[error("registry is missing states for {0:?}")]
    MissingStates(Vec<S>),
}
