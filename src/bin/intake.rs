use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use state_dispatch::context::Context;
use state_dispatch::context_id::ContextId;
use state_dispatch::intake::{self, IntakeEvent, IntakeMachine, IntakeStateId, Patient};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let registry = Arc::new(intake::registry());
    let mut bot = Context::new(ContextId::from("intake"), registry, Patient::default());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !bot.is_terminal() {
        prompt(&bot);

        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse_input(bot.current(), &line) {
            Some(event) => {
                bot.dispatch(event);
            }
            None => println!("Please enter a number.\n"),
        }
    }

    let patient = bot.snapshot();
    println!("Saved patient: {} ({}), age {}, height {}", patient.name, patient.address, patient.age, patient.height);

    Ok(())
}

/// Render the prompt for the current state. Pure presentation; the machine
/// itself never prints.
fn prompt(bot: &Context<IntakeMachine>) {
    clear_screen();

    match bot.current() {
        IntakeStateId::Start => {
            println!("Welcome\n\n\n\n\nPress enter to start");
        }
        IntakeStateId::MainMenu => {
            println!("Main Menu\n\n\n\n");
            println!("1. Add Patient\n2. Exit\n\n");
            println!("Type a number according to your selection and press enter\n");
        }
        IntakeStateId::CollectName | IntakeStateId::EditName => {
            println!("Patient Name\n\n\n\n\n");
            println!("Type your name and press enter\n");
        }
        IntakeStateId::CollectAddress | IntakeStateId::EditAddress => {
            println!("Patient Address\n\n\n\n\n");
            println!("Type your address and press enter\n");
        }
        IntakeStateId::CollectAge | IntakeStateId::EditAge => {
            println!("Patient Age\n\n\n\n\n");
            println!("Type your age and press enter\n");
        }
        IntakeStateId::CollectHeight | IntakeStateId::EditHeight => {
            println!("Patient Height\n\n\n\n\n");
            println!("Type your height and press enter\n");
        }
        IntakeStateId::ConfirmInfo => {
            let patient = bot.snapshot();
            println!("Confirm Info is Correct\n\n");
            println!("Patient Name: {}", patient.name);
            println!("Patient Address: {}", patient.address);
            println!("Patient Age: {}", patient.age);
            println!("Patient Height: {}\n\n", patient.height);
            println!("1. Edit Patient Info\n2. Save and Return to Menu\n\n");
            println!("Type a number according to your selection and press enter\n");
        }
        IntakeStateId::EditOptions => {
            println!("Edit Patient Info\n\n\n\n");
            println!("1. Edit Name\n2. Edit Address\n3. Edit Age\n4. Edit Height\n5. Save and Continue\n\n");
            println!("Type a number according to your selection and press enter\n");
        }
        IntakeStateId::Finished => {}
    }

    let _ = io::stdout().flush();
}

/// Parse one raw line into the event kind the current state expects.
/// Returns `None` when the line can't be parsed; the caller re-prompts.
fn parse_input(current: IntakeStateId, line: &str) -> Option<IntakeEvent> {
    match current {
        IntakeStateId::Start
        | IntakeStateId::CollectName
        | IntakeStateId::CollectAddress
        | IntakeStateId::EditName
        | IntakeStateId::EditAddress => Some(IntakeEvent::Line(line.to_string())),

        IntakeStateId::MainMenu | IntakeStateId::ConfirmInfo | IntakeStateId::EditOptions => {
            line.trim().parse::<u32>().ok().map(IntakeEvent::Selection)
        }

        IntakeStateId::CollectAge
        | IntakeStateId::CollectHeight
        | IntakeStateId::EditAge
        | IntakeStateId::EditHeight => line.trim().parse::<i64>().ok().map(IntakeEvent::Number),

        IntakeStateId::Finished => None,
    }
}

/// "Clear" the console window the portable way.
fn clear_screen() {
    for _ in 0..50 {
        println!();
    }
}
