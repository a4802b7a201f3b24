pub mod error;
pub mod handle;

use std::sync::Arc;

use dashmap::{DashMap, Entry};

pub use crate::context_id::ContextId;

use self::error::{ContextAlreadyPresent, ContextNotFound};
use self::handle::ContextHandle;

/// A map of live context cells keyed by [`ContextId`].
///
/// Holds one family of contexts, typically `Mutex<Context<M>>` cells all
/// built on the same registry. Once inserted, a cell becomes a shared
/// resource that callers reach only through the weak [`ContextHandle`]
/// interface; the strong reference never leaves the map, so removal reliably
/// ends a context's life even while handles to it are still floating around.
#[derive(Debug)]
pub struct ContextMap<T> {
    cells: DashMap<ContextId, Arc<T>, ahash::RandomState>,
}

impl<T> ContextMap<T> {
    /// Construct a new empty [`ContextMap`].
    pub fn new() -> ContextMap<T> {
        Self::default()
    }

    /// Track `cell` under `context_id`.
    pub fn insert(&self, context_id: ContextId, cell: T) -> Result<(), ContextAlreadyPresent> {
        match self.cells.entry(context_id) {
            Entry::Occupied(entry) => Err(ContextAlreadyPresent {
                context_id: entry.key().clone(),
            }),

            Entry::Vacant(slot) => {
                slot.insert(Arc::new(cell));
                Ok(())
            }
        }
    }

    /// Drop the cell tracked under `context_id`.
    ///
    /// Outstanding handles to the cell go stale once the map's strong
    /// reference is gone.
    pub fn remove(&self, context_id: &ContextId) -> Result<(), ContextNotFound> {
        self.cells
            .remove(context_id)
            .ok_or_else(|| ContextNotFound {
                context_id: context_id.clone(),
            })?;

        Ok(())
    }

    /// Lend the cell tracked under `context_id`.
    pub fn get(&self, context_id: &ContextId) -> Result<ContextHandle<T>, ContextNotFound> {
        self.cells
            .view(context_id, |_, cell| {
                ContextHandle::new(context_id.clone(), Arc::downgrade(cell))
            })
            .ok_or_else(|| ContextNotFound {
                context_id: context_id.clone(),
            })
    }

    /// Whether a cell is currently tracked under `context_id`.
    pub fn contains(&self, context_id: &ContextId) -> bool {
        self.cells.contains_key(context_id)
    }

    /// Number of live contexts.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<T> Default for ContextMap<T> {
    fn default() -> Self {
        Self {
            cells: DashMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::connection::{ConnectionEvent, ConnectionInfo, ConnectionMachine, ConnectionStateId};
    use crate::context::Context;

    fn cell(id: &str, registry: &Arc<crate::registry::StateRegistry<ConnectionMachine>>) -> Mutex<Context<ConnectionMachine>> {
        Mutex::new(Context::new(
            ContextId::from(id),
            Arc::clone(registry),
            ConnectionInfo::default(),
        ))
    }

    #[test]
    fn insert_then_get() {
        let registry = Arc::new(crate::connection::registry());
        let map = ContextMap::new();
        let id = ContextId::from("client");

        map.insert(id.clone(), cell("client", &registry)).unwrap();
        assert!(map.contains(&id));
        assert_eq!(map.len(), 1);

        let handle = map.get(&id).unwrap();
        let current = handle
            .view(|cell| cell.lock().expect("context lock poisoned").current())
            .unwrap();
        assert_eq!(current, ConnectionStateId::Closed);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let registry = Arc::new(crate::connection::registry());
        let map = ContextMap::new();
        let id = ContextId::from("client");

        map.insert(id.clone(), cell("client", &registry)).unwrap();
        let err = map
            .insert(id.clone(), cell("client", &registry))
            .unwrap_err();
        assert_eq!(err.context_id, id);
    }

    #[test]
    fn remove_unknown_id_fails() {
        let map: ContextMap<Mutex<Context<ConnectionMachine>>> = ContextMap::new();
        assert!(map.remove(&ContextId::from("ghost")).is_err());
    }

    #[test]
    fn handles_go_stale_after_removal() {
        let registry = Arc::new(crate::connection::registry());
        let map = ContextMap::new();
        let id = ContextId::from("client");

        map.insert(id.clone(), cell("client", &registry)).unwrap();
        let handle = map.get(&id).unwrap();

        map.remove(&id).unwrap();
        assert!(map.is_empty());

        let result = handle.view(|_| ());
        assert!(result.is_err());
    }

    #[test]
    fn contexts_in_one_map_progress_independently() {
        let registry = Arc::new(crate::connection::registry());
        let map = ContextMap::new();
        let client = ContextId::from("client");
        let server = ContextId::from("server");

        map.insert(client.clone(), cell("client", &registry)).unwrap();
        map.insert(server.clone(), cell("server", &registry)).unwrap();

        map.get(&client)
            .unwrap()
            .view(|cell| {
                cell.lock()
                    .expect("context lock poisoned")
                    .dispatch(ConnectionEvent::ActiveOpen);
            })
            .unwrap();

        let client_state = map
            .get(&client)
            .unwrap()
            .view(|cell| cell.lock().expect("context lock poisoned").current())
            .unwrap();
        let server_state = map
            .get(&server)
            .unwrap()
            .view(|cell| cell.lock().expect("context lock poisoned").current())
            .unwrap();

        assert_eq!(client_state, ConnectionStateId::Established);
        assert_eq!(server_state, ConnectionStateId::Closed);
    }
}
