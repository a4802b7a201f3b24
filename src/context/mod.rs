use std::sync::Arc;

use tracing::debug;

use crate::context_id::ContextId;
use crate::machine::MachineSpec;
use crate::machine::scope::Scope;
use crate::registry::StateRegistry;

/// The object whose behavior varies by current state.
///
/// A context owns three things: a shared handle on the registry it resolves
/// states through, its current state identifier (always valid after
/// construction), and its private payload. Its public surface is
/// deliberately narrow: [`dispatch`](Context::dispatch) to feed it events,
/// [`snapshot`](Context::snapshot) to read the accumulated payload, and
/// [`is_terminal`](Context::is_terminal) as the driving loop's stop
/// condition. Transitions and payload mutation happen only inside dispatch,
/// through the [`Scope`] handed to the current state.
///
/// `dispatch` takes `&mut self`, so a context can never be reentered while a
/// handler is running, and two contexts on the same registry can never
/// observe each other's state or payload.
pub struct Context<M: MachineSpec> {
    id: ContextId,
    registry: Arc<StateRegistry<M>>,
    current: M::StateId,
    payload: M::Payload,
}

impl<M: MachineSpec> std::fmt::Debug for Context<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("payload", &"<payload>")
            .finish()
    }
}

/// What one [`Context::dispatch`] call did.
///
/// `handled` is false when the event fell through to the unhandled-event
/// default; in that case `from == to` and the payload is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome<S> {
    /// State before the event.
    pub from: S,
    /// State after the event.
    pub to: S,
    /// Whether the state handled the event.
    pub handled: bool,
}

impl<S: PartialEq> DispatchOutcome<S> {
    /// Whether the dispatch moved the context to a different state.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl<M: MachineSpec> Context<M> {
    /// Create a context starting in [`MachineSpec::INITIAL`] with the given
    /// payload.
    ///
    /// The registry is shared, not owned; it must outlive every context built
    /// on it, which `Arc` guarantees here.
    pub fn new(id: ContextId, registry: Arc<StateRegistry<M>>, payload: M::Payload) -> Self {
        // Surfaces an incomplete registry at construction rather than on the
        // first event.
        registry.resolve(M::INITIAL);

        Self {
            id,
            registry,
            current: M::INITIAL,
            payload,
        }
    }

    /// This context's identifier.
    pub fn id(&self) -> &ContextId {
        &self.id
    }

    /// The current state identifier.
    pub fn current(&self) -> M::StateId {
        self.current
    }

    /// Read-only view of the accumulated payload, for display and
    /// inspection. Mutation is not reachable from here.
    pub fn snapshot(&self) -> &M::Payload {
        &self.payload
    }

    /// Whether the context has reached the machine kind's designated
    /// terminal state.
    pub fn is_terminal(&self) -> bool {
        M::TERMINAL == Some(self.current)
    }

    /// Forward one event to the current state and apply whatever it
    /// requested.
    ///
    /// The handler runs to completion before anything is applied: at most
    /// one transition (the last one requested), validated through the
    /// registry before the current-state identifier is swapped.
    pub fn dispatch(&mut self, event: M::Event) -> DispatchOutcome<M::StateId> {
        let from = self.current;

        let mut scope = Scope::new(&self.id, from, &mut self.payload);
        self.registry.resolve(from).handle(event, &mut scope);
        let (requested, handled) = scope.finish();

        if let Some(next) = requested {
            // A target outside the registry is a construction bug; resolve
            // panics rather than leaving the context half-moved.
            self.registry.resolve(next);
            self.current = next;
            debug!(context = %self.id, from = ?from, to = ?next, "transition applied");
        }

        DispatchOutcome {
            from,
            to: self.current,
            handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionEvent, ConnectionInfo, ConnectionStateId};
    use crate::intake::{IntakeEvent, IntakeStateId, Patient};

    #[test]
    fn context_starts_in_the_initial_state() {
        let registry = Arc::new(crate::connection::registry());
        let context = Context::new(
            ContextId::from("c"),
            registry,
            ConnectionInfo::default(),
        );

        assert_eq!(context.current(), ConnectionStateId::Closed);
        assert!(!context.is_terminal());
    }

    #[test]
    fn unhandled_event_changes_nothing() {
        let registry = Arc::new(crate::connection::registry());
        let mut context = Context::new(
            ContextId::from("c"),
            registry,
            ConnectionInfo::default(),
        );

        let before = context.snapshot().clone();
        let outcome = context.dispatch(ConnectionEvent::Acknowledge);

        assert!(!outcome.handled);
        assert!(!outcome.changed());
        assert_eq!(context.current(), ConnectionStateId::Closed);
        assert_eq!(context.snapshot(), &before);
    }

    #[test]
    fn handled_transition_is_reported() {
        let registry = Arc::new(crate::connection::registry());
        let mut context = Context::new(
            ContextId::from("c"),
            registry,
            ConnectionInfo::default(),
        );

        let outcome = context.dispatch(ConnectionEvent::PassiveOpen);

        assert!(outcome.handled);
        assert!(outcome.changed());
        assert_eq!(outcome.from, ConnectionStateId::Closed);
        assert_eq!(outcome.to, ConnectionStateId::Listen);
    }

    #[test]
    fn contexts_on_one_registry_are_isolated() {
        let registry = Arc::new(crate::intake::registry());
        let mut first = Context::new(
            ContextId::from("first"),
            Arc::clone(&registry),
            Patient::default(),
        );
        let mut second = Context::new(
            ContextId::from("second"),
            Arc::clone(&registry),
            Patient::default(),
        );

        first.dispatch(IntakeEvent::Line("hello".into()));
        first.dispatch(IntakeEvent::Selection(1));
        first.dispatch(IntakeEvent::Line("Ada".into()));

        second.dispatch(IntakeEvent::Line("hi".into()));

        assert_eq!(first.current(), IntakeStateId::CollectAddress);
        assert_eq!(first.snapshot().name, "Ada");

        assert_eq!(second.current(), IntakeStateId::MainMenu);
        assert_eq!(second.snapshot().name, "");
    }
}
