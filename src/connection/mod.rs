//! The connection state graph: the protocol example machine.
//!
//! Nine-plus states, several event kinds, and a default-handler fallback for
//! every (state, event) pair the graph leaves undeclared. The graph follows
//! the classic textbook sketch: the three-way handshake is collapsed into a
//! single hop (`Closed --active_open--> Established`,
//! `Listen --send--> Established`), and the intermediate protocol states
//! exist only as registered pass-through identifiers with no behavior. That
//! collapse is a preserved simplification of the source material, not a gap
//! to fill in; none of the timer, retransmission, or sequencing machinery
//! of a real transport belongs at this layer.

mod states;

use crate::machine::{MachineSpec, StateId};
use crate::registry::StateRegistry;

/// The closed identifier set of the connection graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStateId {
    Closed,
    Listen,
    SynSent,
    SynReceived,
    Established,
    FinWait1,
    FinWait2,
    CloseWait,
    Closing,
    LastAck,
    TimeWait,
}

impl StateId for ConnectionStateId {
    const ALL: &'static [Self] = &[
        ConnectionStateId::Closed,
        ConnectionStateId::Listen,
        ConnectionStateId::SynSent,
        ConnectionStateId::SynReceived,
        ConnectionStateId::Established,
        ConnectionStateId::FinWait1,
        ConnectionStateId::FinWait2,
        ConnectionStateId::CloseWait,
        ConnectionStateId::Closing,
        ConnectionStateId::LastAck,
        ConnectionStateId::TimeWait,
    ];
}

/// Requests a connection context accepts.
///
/// Not every state handles every event meaningfully; the rest fall through
/// to the unhandled-event default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    ActiveOpen,
    PassiveOpen,
    Close,
    Synchronize,
    Acknowledge,
    Send,
    /// Carry one segment of application data.
    Transmit(String),
}

/// Context-owned payload of a connection: its role, plus bookkeeping for
/// transmitted segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub is_server: bool,
    pub segments_sent: u32,
    pub last_segment: Option<String>,
}

impl ConnectionInfo {
    pub fn with_role(is_server: bool) -> Self {
        Self {
            is_server,
            ..Self::default()
        }
    }
}

/// The connection machine kind.
///
/// No terminal identifier: a connection can always be reopened, so the
/// driving loop decides for itself when to stop feeding events.
pub struct ConnectionMachine;

impl MachineSpec for ConnectionMachine {
    type StateId = ConnectionStateId;
    type Event = ConnectionEvent;
    type Payload = ConnectionInfo;

    const INITIAL: ConnectionStateId = ConnectionStateId::Closed;
    const TERMINAL: Option<ConnectionStateId> = None;
}

/// Build the canonical connection registry: one instance per identifier,
/// with the eight inert protocol states sharing the pass-through behavior.
pub fn registry() -> StateRegistry<ConnectionMachine> {
    StateRegistry::builder()
        .register(ConnectionStateId::Closed, states::Closed)
        .register(ConnectionStateId::Listen, states::Listen)
        .register(ConnectionStateId::Established, states::Established)
        .register(ConnectionStateId::SynSent, states::PassThrough)
        .register(ConnectionStateId::SynReceived, states::PassThrough)
        .register(ConnectionStateId::FinWait1, states::PassThrough)
        .register(ConnectionStateId::FinWait2, states::PassThrough)
        .register(ConnectionStateId::CloseWait, states::PassThrough)
        .register(ConnectionStateId::Closing, states::PassThrough)
        .register(ConnectionStateId::LastAck, states::PassThrough)
        .register(ConnectionStateId::TimeWait, states::PassThrough)
        .build()
        .expect("connection registry covers every identifier")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Context;
    use crate::context_id::ContextId;

    fn context(is_server: bool) -> Context<ConnectionMachine> {
        Context::new(
            ContextId::from("conn"),
            Arc::new(registry()),
            ConnectionInfo::with_role(is_server),
        )
    }

    #[test]
    fn passive_open_then_send_reaches_established() {
        let mut conn = context(true);

        let opened = conn.dispatch(ConnectionEvent::PassiveOpen);
        assert_eq!(opened.to, ConnectionStateId::Listen);

        let sent = conn.dispatch(ConnectionEvent::Send);
        assert_eq!(sent.to, ConnectionStateId::Established);

        let closed = conn.dispatch(ConnectionEvent::Close);
        assert_eq!(closed.to, ConnectionStateId::Listen);
    }

    #[test]
    fn active_open_collapses_the_handshake() {
        let mut conn = context(false);

        let outcome = conn.dispatch(ConnectionEvent::ActiveOpen);

        // Single hop, no SynSent in between.
        assert_eq!(outcome.from, ConnectionStateId::Closed);
        assert_eq!(outcome.to, ConnectionStateId::Established);
    }

    #[test]
    fn transmit_records_the_segment_and_stays_established() {
        let mut conn = context(false);
        conn.dispatch(ConnectionEvent::ActiveOpen);

        let outcome = conn.dispatch(ConnectionEvent::Transmit("ping".into()));

        assert!(outcome.handled);
        assert!(!outcome.changed());
        assert_eq!(conn.snapshot().segments_sent, 1);
        assert_eq!(conn.snapshot().last_segment.as_deref(), Some("ping"));
    }

    #[test]
    fn transmit_outside_established_is_unhandled() {
        let mut conn = context(false);

        let outcome = conn.dispatch(ConnectionEvent::Transmit("early".into()));

        assert!(!outcome.handled);
        assert_eq!(conn.snapshot().segments_sent, 0);
        assert_eq!(conn.snapshot().last_segment, None);
    }

    #[test]
    fn pass_through_states_handle_nothing() {
        let registry = Arc::new(registry());
        // Force a context into an inert state via a handler-free probe: the
        // registry resolves it, and every event falls through.
        let state = registry.resolve(ConnectionStateId::SynSent);

        let id = ContextId::from("probe");
        let mut payload = ConnectionInfo::default();
        let mut scope =
            crate::machine::scope::Scope::new(&id, ConnectionStateId::SynSent, &mut payload);
        state.handle(ConnectionEvent::Send, &mut scope);
        let (requested, handled) = scope.finish();

        assert_eq!(requested, None);
        assert!(!handled);
    }
}
