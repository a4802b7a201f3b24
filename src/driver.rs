//! The external loop that pumps events into a context.
//!
//! The core makes no assumption about where events come from: a parsed menu
//! selection, a scripted sequence, a test vector. [`EventSource`] is the
//! seam, and [`run`] is the loop: dispatch until the machine's terminal
//! state is reached, the source runs dry, or the configured step cap trips.

use bon::Builder;
use tracing::debug;

use crate::context::Context;
use crate::machine::MachineSpec;

/// A supplier of events for one machine kind.
pub trait EventSource<M: MachineSpec> {
    /// The next event, or `None` when the source is exhausted.
    fn next_event(&mut self) -> Option<M::Event>;
}

/// Adapter treating any iterator of events as a source.
pub struct IterSource<I>(pub I);

impl<M, I> EventSource<M> for IterSource<I>
where
    M: MachineSpec,
    I: Iterator<Item = M::Event>,
{
    fn next_event(&mut self) -> Option<M::Event> {
        self.0.next()
    }
}

/// Configuration for the driving loop.
#[derive(Debug, Clone, Builder)]
pub struct DriverConfig {
    /// Hard cap on dispatched events, guarding against a source that never
    /// ends feeding a machine that never terminates.
    #[builder(default = 10_000)]
    pub max_steps: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Why [`run`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The context reached its designated terminal state.
    Terminal,
    /// The event source was exhausted.
    SourceExhausted,
    /// The [`DriverConfig::max_steps`] cap tripped.
    StepLimit,
}

/// Summary of one driving run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverReport {
    /// Events dispatched.
    pub steps: usize,
    /// How many of those fell through to the unhandled default.
    pub unhandled: usize,
    pub stop: StopReason,
}

/// Pump events from `source` into `context` until a stop condition holds.
pub fn run<M, S>(context: &mut Context<M>, source: &mut S, config: &DriverConfig) -> DriverReport
where
    M: MachineSpec,
    S: EventSource<M>,
{
    let mut steps = 0;
    let mut unhandled = 0;

    let stop = loop {
        if context.is_terminal() {
            break StopReason::Terminal;
        }
        if steps >= config.max_steps {
            break StopReason::StepLimit;
        }

        let Some(event) = source.next_event() else {
            break StopReason::SourceExhausted;
        };

        let outcome = context.dispatch(event);
        steps += 1;
        if !outcome.handled {
            unhandled += 1;
        }
    };

    debug!(
        context = %context.id(),
        steps,
        unhandled,
        stop = ?stop,
        "driver finished"
    );

    DriverReport {
        steps,
        unhandled,
        stop,
    }
}
