pub mod error;

use std::collections::HashMap;

use crate::machine::{MachineSpec, State, StateId};

use self::error::RegistryBuildError;

/// Owner and resolver of every state instance for one machine kind.
///
/// A registry is built eagerly (one instance per identifier, all of them at
/// construction time) and is immutable afterwards. Resolution always hands
/// back the same instance for the same identifier, so the state objects are
/// referentially stable across contexts and across time. One registry may
/// back any number of simultaneously-live contexts; states are behavior-only
/// (see [`MachineSpec`]), so no locking is involved.
///
/// This is the replacement for the per-state-type singleton: an explicitly
/// constructed, explicitly owned mapping that can exist as many times per
/// process as callers care to build it.
pub struct StateRegistry<M: MachineSpec> {
    states: HashMap<M::StateId, Box<dyn State<M>>, ahash::RandomState>,
}

impl<M: MachineSpec> std::fmt::Debug for StateRegistry<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRegistry")
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<M: MachineSpec> StateRegistry<M> {
    /// Start building a registry for machine kind `M`.
    pub fn builder() -> RegistryBuilder<M> {
        RegistryBuilder::new()
    }

    /// Resolve `id` to a non-owning handle on the matching state instance.
    ///
    /// # Panics
    /// Panics if `id` has no entry. [`RegistryBuilder::build`] guarantees
    /// total coverage of the closed identifier set, so this is unreachable
    /// for any registry that was actually built. A hole here means a
    /// construction-time invariant was violated, and the machine is not safe
    /// to keep running.
    pub fn resolve(&self, id: M::StateId) -> &dyn State<M> {
        self.states
            .get(&id)
            .map(Box::as_ref)
            .unwrap_or_else(|| panic!("no state registered for {id:?}"))
    }

    /// Number of registered states (always `M::StateId::ALL.len()`).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Builder collecting one state instance per identifier.
///
/// Registration is infallible; [`build`](RegistryBuilder::build) performs the
/// validation in one place so construction sites can stay a flat chain of
/// `register` calls.
pub struct RegistryBuilder<M: MachineSpec> {
    states: HashMap<M::StateId, Box<dyn State<M>>, ahash::RandomState>,
    duplicate: Option<M::StateId>,
}

impl<M: MachineSpec> RegistryBuilder<M> {
    pub fn new() -> Self {
        Self {
            states: HashMap::default(),
            duplicate: None,
        }
    }

    /// Associate `id` with `state`. Registering an identifier twice is
    /// remembered and reported by [`build`](RegistryBuilder::build).
    pub fn register(mut self, id: M::StateId, state: impl State<M> + 'static) -> Self {
        if self.states.insert(id, Box::new(state)).is_some() {
            self.duplicate.get_or_insert(id);
        }
        self
    }

    /// Validate total coverage and produce the registry.
    ///
    /// Fails if any identifier was registered more than once, or if any
    /// identifier in [`StateId::ALL`] has no instance.
    pub fn build(self) -> Result<StateRegistry<M>, RegistryBuildError<M::StateId>> {
        if let Some(id) = self.duplicate {
            return Err(RegistryBuildError::DuplicateState(id));
        }

        let missing: Vec<M::StateId> = <M::StateId as StateId>::ALL
            .iter()
            .copied()
            .filter(|id| !self.states.contains_key(id))
            .collect();

        if !missing.is_empty() {
            return Err(RegistryBuildError::MissingStates(missing));
        }

        Ok(StateRegistry {
            states: self.states,
        })
    }
}

impl<M: MachineSpec> Default for RegistryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
