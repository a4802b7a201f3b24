pub mod scope;

use std::fmt;
use std::hash::Hash;

use self::scope::Scope;

/// An identifier naming one state within a fixed, closed set.
///
/// Identifiers are plain values, not types: a state that wants to hand control
/// to a sibling names that sibling's identifier and lets the registry resolve
/// it to a live instance. This is what keeps concrete states decoupled from
/// one another: adding or removing a state never touches the states around
/// it, only the enumeration and the registry construction.
///
/// [`ALL`](StateId::ALL) enumerates the full set and is the source of truth
/// for the registry's total-coverage check.
pub trait StateId: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every identifier in the closed set, each exactly once.
    const ALL: &'static [Self];
}

/// The [`MachineSpec`] trait describes one *kind* of state machine: the
/// closed set of state identifiers, the closed set of events its contexts
/// accept, and the payload record a context owns privately.
///
/// # Functionality
/// A machine kind is a grouping, not a runtime object. The runtime pieces are
/// built from it: a [`StateRegistry`](crate::registry::StateRegistry) owns one
/// [`State`] instance per [`StateId`](MachineSpec::StateId), and any number of
/// [`Context`](crate::context::Context)s share that registry while each owns
/// its own payload and current-state identifier.
///
/// Grouping the associated types here rather than on the context keeps the
/// dispatch plumbing generic: the context, registry, scope, and driver are
/// written once and instantiated per machine kind.
///
/// # Invariants
/// Implementations of [`State`] for a machine kind *must* be behavior-only.
/// All mutable data lives in the context's payload; a state instance holds at
/// most fixed configuration set at registry construction time (for example,
/// which payload field it collects and which identifier it hands control to
/// next). This is the invariant that makes a single registry safely shareable
/// across any number of independently-progressing contexts without locking:
/// `handle` never mutates anything reachable from another context.
///
/// ## No interior mutability in states
/// A state must not smuggle machine data into itself through `Cell`,
/// `Mutex`, atomics, or similar. If a future state genuinely needs its own
/// mutable fields the sharing invariant above breaks, and either a lock per
/// state or per-context state cloning has to be introduced. The design here
/// avoids that by construction.
///
/// ## No dispatch from inside `handle`
/// Cross-state effects flow through the [`Scope`] only: a handler may request
/// one transition and may mutate the payload, and nothing else. Control never
/// flows state to state directly, and a context never accepts a second event
/// while a handler is running (dispatch takes `&mut self`).
pub trait MachineSpec: Sized + 'static {
    /// The closed identifier set for this machine kind.
    type StateId: StateId;

    /// The closed set of request types a context of this kind accepts.
    ///
    /// This is an enum in practice; variants may carry event payload (a
    /// transmitted segment, a typed line, a menu selection).
    type Event: fmt::Debug;

    /// The context-owned mutable record this machine kind accumulates.
    ///
    /// Only reachable for mutation through a [`Scope`], never through the
    /// context's public API.
    type Payload;

    /// The identifier every fresh context of this kind starts in.
    const INITIAL: Self::StateId;

    /// The designated terminal identifier, if this kind has one.
    ///
    /// [`Context::is_terminal`](crate::context::Context::is_terminal) is
    /// equality against this value; kinds without a terminal state (the
    /// connection graph) use `None` and never report terminal.
    const TERMINAL: Option<Self::StateId>;
}

/// A polymorphic handler for one mode of operation.
///
/// The provided [`handle`](State::handle) body is the fail-soft default:
/// report the unhandled-event diagnostic through the scope and change
/// nothing. Concrete states override `handle`, match the event variants
/// relevant to their mode, and route every other variant back through
/// [`Scope::unhandled`] so the contract stays uniform. Unhandled events are
/// an expected steady-state condition, not a fault; `acknowledge` arriving
/// while closed is normal traffic.
///
/// Side effects a handler may request, only through the scope it is given:
/// a transition to another identifier, and field-level payload mutation.
pub trait State<M: MachineSpec>: Send + Sync {
    /// Handle one event on behalf of the context that owns `scope`.
    fn handle(&self, event: M::Event, scope: &mut Scope<'_, M>) {
        scope.unhandled(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_id::ContextId;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum ToggleId {
        Off,
        On,
    }

    impl StateId for ToggleId {
        const ALL: &'static [Self] = &[ToggleId::Off, ToggleId::On];
    }

    #[derive(Debug)]
    enum ToggleEvent {
        Flip,
    }

    struct ToggleMachine;

    impl MachineSpec for ToggleMachine {
        type StateId = ToggleId;
        type Event = ToggleEvent;
        type Payload = u32;

        const INITIAL: ToggleId = ToggleId::Off;
        const TERMINAL: Option<ToggleId> = None;
    }

    struct Inert;

    impl State<ToggleMachine> for Inert {}

    #[test]
    fn default_handle_reports_unhandled_and_requests_nothing() {
        let id = ContextId::from("test");
        let mut payload = 0u32;
        let mut scope = Scope::new(&id, ToggleId::Off, &mut payload);

        Inert.handle(ToggleEvent::Flip, &mut scope);

        let (requested, handled) = scope.finish();
        assert_eq!(requested, None);
        assert!(!handled);
        assert_eq!(payload, 0);
    }
}
