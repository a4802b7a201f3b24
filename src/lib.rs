//! A state-dispatch engine built on the State pattern: a [`Context`] whose
//! behavior varies by its current state, a family of behavior-only state
//! handlers owned by a [`StateRegistry`], and a transition protocol mediated
//! entirely by the context.
//!
//! States never name each other's types (cross-state coupling is
//! [`StateId`](machine::StateId) values resolved through the registry) and
//! never hold machine data, so one registry safely backs any number of
//! independently-progressing contexts. Two example machine kinds ship with
//! the crate: the [`connection`] protocol graph and the menu-driven
//! [`intake`] chatbot.
//!
//! [`Context`]: context::Context
//! [`StateRegistry`]: registry::StateRegistry

pub mod connection;
pub mod context;
pub mod context_id;
pub mod context_map;
pub mod driver;
pub mod intake;
pub mod machine;
pub mod registry;

// Re-export commonly used types.
pub use context::{Context, DispatchOutcome};
pub use context_id::ContextId;
pub use machine::scope::Scope;
pub use machine::{MachineSpec, State, StateId};
pub use registry::{RegistryBuilder, StateRegistry};
