use crate::machine::State;
use crate::machine::scope::Scope;

use super::{IntakeEvent, IntakeMachine, IntakeStateId};

/// Which patient field a [`CollectField`] instance stores.
#[derive(Debug, Clone, Copy)]
pub(super) enum Field {
    Name,
    Address,
    Age,
    Height,
}

/// Greeting screen; any line of input moves on to the menu.
pub(super) struct Start;

impl State<IntakeMachine> for Start {
    fn handle(&self, event: IntakeEvent, scope: &mut Scope<'_, IntakeMachine>) {
        match event {
            IntakeEvent::Line(_) => scope.transition(IntakeStateId::MainMenu),
            other => scope.unhandled(&other),
        }
    }
}

/// Top-level menu: add a patient or exit.
pub(super) struct MainMenu;

impl State<IntakeMachine> for MainMenu {
    fn handle(&self, event: IntakeEvent, scope: &mut Scope<'_, IntakeMachine>) {
        match event {
            IntakeEvent::Selection(1) => scope.transition(IntakeStateId::CollectName),
            IntakeEvent::Selection(2) => scope.transition(IntakeStateId::Finished),
            // Out-of-range choices are ignored; the menu just repeats.
            IntakeEvent::Selection(_) => {}
            other => scope.unhandled(&other),
        }
    }
}

/// Stores one patient field, then hands control to `next`.
///
/// One instance per collect/edit identifier; the instances differ only in
/// their construction-time configuration, so states stay behavior-only.
pub(super) struct CollectField {
    field: Field,
    next: IntakeStateId,
}

impl CollectField {
    pub(super) fn new(field: Field, next: IntakeStateId) -> Self {
        Self { field, next }
    }
}

impl State<IntakeMachine> for CollectField {
    fn handle(&self, event: IntakeEvent, scope: &mut Scope<'_, IntakeMachine>) {
        match (self.field, event) {
            (Field::Name, IntakeEvent::Line(name)) => {
                scope.payload_mut().name = name;
                scope.transition(self.next);
            }
            (Field::Address, IntakeEvent::Line(address)) => {
                scope.payload_mut().address = address;
                scope.transition(self.next);
            }
            (Field::Age, IntakeEvent::Number(age)) => {
                scope.payload_mut().age = age;
                scope.transition(self.next);
            }
            (Field::Height, IntakeEvent::Number(height)) => {
                scope.payload_mut().height = height;
                scope.transition(self.next);
            }
            (_, other) => scope.unhandled(&other),
        }
    }
}

/// Shows the collected record and offers to edit or save.
pub(super) struct ConfirmInfo;

impl State<IntakeMachine> for ConfirmInfo {
    fn handle(&self, event: IntakeEvent, scope: &mut Scope<'_, IntakeMachine>) {
        match event {
            IntakeEvent::Selection(1) => scope.transition(IntakeStateId::EditOptions),
            IntakeEvent::Selection(2) => scope.transition(IntakeStateId::MainMenu),
            IntakeEvent::Selection(_) => {}
            other => scope.unhandled(&other),
        }
    }
}

/// Per-field edit menu.
pub(super) struct EditOptions;

impl State<IntakeMachine> for EditOptions {
    fn handle(&self, event: IntakeEvent, scope: &mut Scope<'_, IntakeMachine>) {
        match event {
            IntakeEvent::Selection(1) => scope.transition(IntakeStateId::EditName),
            IntakeEvent::Selection(2) => scope.transition(IntakeStateId::EditAddress),
            IntakeEvent::Selection(3) => scope.transition(IntakeStateId::EditAge),
            IntakeEvent::Selection(4) => scope.transition(IntakeStateId::EditHeight),
            IntakeEvent::Selection(5) => scope.transition(IntakeStateId::ConfirmInfo),
            IntakeEvent::Selection(_) => {}
            other => scope.unhandled(&other),
        }
    }
}

/// Terminal state: every event is an explicit no-op, without the
/// unhandled-event diagnostic. The driving loop stops on reaching it.
pub(super) struct Finished;

impl State<IntakeMachine> for Finished {
    fn handle(&self, _event: IntakeEvent, _scope: &mut Scope<'_, IntakeMachine>) {}
}
