use tracing::warn;

use super::MachineSpec;
use crate::context_id::ContextId;

/// The privileged capability a context lends to the state handling one of its
/// events.
///
/// A [`Scope`] is constructed by [`Context::dispatch`] for the extent of a
/// single [`State::handle`] call and collected again when the handler
/// returns. Transition requests and payload mutation exist *only* here,
/// not on the context's public surface, so payload data can only evolve
/// through the machine's own transition logic, never out-of-band.
///
/// [`Context::dispatch`]: crate::context::Context::dispatch
/// [`State::handle`]: crate::machine::State::handle
pub struct Scope<'a, M: MachineSpec> {
    context_id: &'a ContextId,
    current: M::StateId,
    payload: &'a mut M::Payload,
    requested: Option<M::StateId>,
    handled: bool,
}

impl<'a, M: MachineSpec> Scope<'a, M> {
    pub(crate) fn new(
        context_id: &'a ContextId,
        current: M::StateId,
        payload: &'a mut M::Payload,
    ) -> Scope<'a, M> {
        Self {
            context_id,
            current,
            payload,
            requested: None,
            handled: true,
        }
    }

    /// The identifier of the state currently handling the event.
    pub fn current(&self) -> M::StateId {
        self.current
    }

    /// Read access to the context's payload.
    pub fn payload(&self) -> &M::Payload {
        self.payload
    }

    /// Field-level mutation access to the context's payload.
    pub fn payload_mut(&mut self) -> &mut M::Payload {
        self.payload
    }

    /// Request that the context move to `next` once this handler returns.
    ///
    /// The request is applied by the context after `handle` completes; if a
    /// handler requests more than one transition the last request wins. The
    /// target is validated against the registry at application time.
    pub fn transition(&mut self, next: M::StateId) {
        self.requested = Some(next);
    }

    /// Record that the current state does not handle `event`.
    ///
    /// This is the documented fallback, not a fault: it emits the diagnostic
    /// and leaves both the current state and the payload untouched. Concrete
    /// states call this from their catch-all match arm; the provided
    /// [`State::handle`](crate::machine::State::handle) body calls it for
    /// every event.
    pub fn unhandled(&mut self, event: &M::Event) {
        self.handled = false;
        warn!(
            context = %self.context_id,
            state = ?self.current,
            event = ?event,
            "state does not handle event"
        );
    }

    pub(crate) fn finish(self) -> (Option<M::StateId>, bool) {
        (self.requested, self.handled)
    }
}
