use crate::machine::State;
use crate::machine::scope::Scope;

use super::{ConnectionEvent, ConnectionMachine, ConnectionStateId};

/// No connection exists. Opening is the only meaningful traffic.
pub(super) struct Closed;

impl State<ConnectionMachine> for Closed {
    fn handle(&self, event: ConnectionEvent, scope: &mut Scope<'_, ConnectionMachine>) {
        match event {
            // Collapsed handshake: one hop straight to Established.
            ConnectionEvent::ActiveOpen => scope.transition(ConnectionStateId::Established),
            ConnectionEvent::PassiveOpen => scope.transition(ConnectionStateId::Listen),
            other => scope.unhandled(&other),
        }
    }
}

/// Waiting for a peer to open the connection.
pub(super) struct Listen;

impl State<ConnectionMachine> for Listen {
    fn handle(&self, event: ConnectionEvent, scope: &mut Scope<'_, ConnectionMachine>) {
        match event {
            // Collapsed handshake, same as the active-open hop.
            ConnectionEvent::Send => scope.transition(ConnectionStateId::Established),
            other => scope.unhandled(&other),
        }
    }
}

/// Connection is up; data may flow.
pub(super) struct Established;

impl State<ConnectionMachine> for Established {
    fn handle(&self, event: ConnectionEvent, scope: &mut Scope<'_, ConnectionMachine>) {
        match event {
            ConnectionEvent::Transmit(segment) => {
                let info = scope.payload_mut();
                info.segments_sent += 1;
                info.last_segment = Some(segment);
            }
            ConnectionEvent::Close => scope.transition(ConnectionStateId::Listen),
            other => scope.unhandled(&other),
        }
    }
}

/// Declared protocol states with no behavior at this layer. Every event
/// falls through to the unhandled-event default.
pub(super) struct PassThrough;

impl State<ConnectionMachine> for PassThrough {}
