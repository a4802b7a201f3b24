//! The patient-intake machine: the menu-driven example.
//!
//! A context of this kind walks a visitor through collecting four patient
//! fields, confirming them, and optionally editing individual fields before
//! saving. The four collect states and four edit states share one configured
//! state type: they differ only in which field they store and where they
//! hand control next, so the registry holds eight configured instances of
//! [`states::CollectField`] rather than eight near-identical types.
//!
//! `Finished` is the designated terminal identifier: its handlers are
//! explicit no-ops for every event (not the unhandled diagnostic), and the
//! driving loop's only termination condition is reaching it.

mod states;

use crate::machine::{MachineSpec, StateId};
use crate::registry::StateRegistry;

use self::states::Field;

/// The closed identifier set of the intake machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeStateId {
    Start,
    MainMenu,
    CollectName,
    CollectAddress,
    CollectAge,
    CollectHeight,
    EditName,
    EditAddress,
    EditAge,
    EditHeight,
    ConfirmInfo,
    EditOptions,
    Finished,
}

impl StateId for IntakeStateId {
    const ALL: &'static [Self] = &[
        IntakeStateId::Start,
        IntakeStateId::MainMenu,
        IntakeStateId::CollectName,
        IntakeStateId::CollectAddress,
        IntakeStateId::CollectAge,
        IntakeStateId::CollectHeight,
        IntakeStateId::EditName,
        IntakeStateId::EditAddress,
        IntakeStateId::EditAge,
        IntakeStateId::EditHeight,
        IntakeStateId::ConfirmInfo,
        IntakeStateId::EditOptions,
        IntakeStateId::Finished,
    ];
}

/// Parsed input a context of this kind accepts. The collaborator that reads
/// and parses raw console input decides which kind each line is; the machine
/// only sees the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    /// Free-form text (names, addresses, the "press enter" line).
    Line(String),
    /// A menu choice.
    Selection(u32),
    /// A numeric field value.
    Number(i64),
}

/// Information learned about the patient. Grows one field at a time through
/// the collect and edit states; never replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patient {
    pub name: String,
    pub address: String,
    pub age: i64,
    pub height: i64,
}

/// The intake machine kind.
pub struct IntakeMachine;

impl MachineSpec for IntakeMachine {
    type StateId = IntakeStateId;
    type Event = IntakeEvent;
    type Payload = Patient;

    const INITIAL: IntakeStateId = IntakeStateId::Start;
    const TERMINAL: Option<IntakeStateId> = Some(IntakeStateId::Finished);
}

/// Build the canonical intake registry.
pub fn registry() -> StateRegistry<IntakeMachine> {
    use IntakeStateId::*;

    StateRegistry::builder()
        .register(Start, states::Start)
        .register(MainMenu, states::MainMenu)
        .register(CollectName, states::CollectField::new(Field::Name, CollectAddress))
        .register(CollectAddress, states::CollectField::new(Field::Address, CollectAge))
        .register(CollectAge, states::CollectField::new(Field::Age, CollectHeight))
        .register(CollectHeight, states::CollectField::new(Field::Height, ConfirmInfo))
        .register(EditName, states::CollectField::new(Field::Name, EditOptions))
        .register(EditAddress, states::CollectField::new(Field::Address, EditOptions))
        .register(EditAge, states::CollectField::new(Field::Age, EditOptions))
        .register(EditHeight, states::CollectField::new(Field::Height, EditOptions))
        .register(ConfirmInfo, states::ConfirmInfo)
        .register(EditOptions, states::EditOptions)
        .register(Finished, states::Finished)
        .build()
        .expect("intake registry covers every identifier")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Context;
    use crate::context_id::ContextId;

    fn fresh() -> Context<IntakeMachine> {
        Context::new(
            ContextId::from("intake"),
            Arc::new(registry()),
            Patient::default(),
        )
    }

    /// Drive a fresh context through the full collection flow for Ada.
    fn collected() -> Context<IntakeMachine> {
        let mut bot = fresh();
        bot.dispatch(IntakeEvent::Line("".into()));
        bot.dispatch(IntakeEvent::Selection(1));
        bot.dispatch(IntakeEvent::Line("Ada".into()));
        bot.dispatch(IntakeEvent::Line("1 Main St".into()));
        bot.dispatch(IntakeEvent::Number(30));
        bot.dispatch(IntakeEvent::Number(170));
        bot
    }

    #[test]
    fn collection_flow_reaches_confirm_with_all_fields() {
        let bot = collected();

        assert_eq!(bot.current(), IntakeStateId::ConfirmInfo);
        assert_eq!(
            bot.snapshot(),
            &Patient {
                name: "Ada".into(),
                address: "1 Main St".into(),
                age: 30,
                height: 170,
            }
        );
    }

    #[test]
    fn confirm_save_returns_to_main_menu() {
        let mut bot = collected();

        let outcome = bot.dispatch(IntakeEvent::Selection(2));

        assert_eq!(outcome.to, IntakeStateId::MainMenu);
    }

    #[test]
    fn editing_age_changes_only_the_age() {
        let mut bot = collected();

        bot.dispatch(IntakeEvent::Selection(1)); // edit
        assert_eq!(bot.current(), IntakeStateId::EditOptions);

        bot.dispatch(IntakeEvent::Selection(3)); // edit age
        assert_eq!(bot.current(), IntakeStateId::EditAge);

        bot.dispatch(IntakeEvent::Number(31));
        assert_eq!(bot.current(), IntakeStateId::EditOptions);

        bot.dispatch(IntakeEvent::Selection(5)); // save and continue
        assert_eq!(bot.current(), IntakeStateId::ConfirmInfo);

        assert_eq!(
            bot.snapshot(),
            &Patient {
                name: "Ada".into(),
                address: "1 Main St".into(),
                age: 31,
                height: 170,
            }
        );
    }

    #[test]
    fn exit_reaches_the_terminal_state() {
        let mut bot = fresh();
        bot.dispatch(IntakeEvent::Line("".into()));

        let outcome = bot.dispatch(IntakeEvent::Selection(2));

        assert_eq!(outcome.to, IntakeStateId::Finished);
        assert!(bot.is_terminal());
    }

    #[test]
    fn terminal_state_ignores_everything_silently() {
        let mut bot = fresh();
        bot.dispatch(IntakeEvent::Line("".into()));
        bot.dispatch(IntakeEvent::Selection(2));

        let outcome = bot.dispatch(IntakeEvent::Line("anyone there?".into()));

        // Explicit no-op, not the unhandled fallback.
        assert!(outcome.handled);
        assert!(!outcome.changed());
        assert!(bot.is_terminal());
    }

    #[test]
    fn unknown_menu_selection_is_ignored() {
        let mut bot = fresh();
        bot.dispatch(IntakeEvent::Line("".into()));

        let outcome = bot.dispatch(IntakeEvent::Selection(9));

        assert!(outcome.handled);
        assert_eq!(bot.current(), IntakeStateId::MainMenu);
    }

    #[test]
    fn wrong_event_kind_is_unhandled() {
        let mut bot = fresh();
        bot.dispatch(IntakeEvent::Line("".into()));
        bot.dispatch(IntakeEvent::Selection(1));
        assert_eq!(bot.current(), IntakeStateId::CollectName);

        // A menu selection while collecting a name falls through.
        let outcome = bot.dispatch(IntakeEvent::Selection(1));

        assert!(!outcome.handled);
        assert_eq!(bot.current(), IntakeStateId::CollectName);
        assert_eq!(bot.snapshot().name, "");
    }
}
