//! Scheduler observer trait for lifecycle reporting and data collection.

use ab_behavior::{RunOutcome, StopReason};
use ab_core::{AgentId, DefinitionId, Tick};

/// Counts gathered over one [`Scheduler::step`][crate::Scheduler::step].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick:    Tick,
    pub started: usize,
    pub stopped: usize,
    /// Instances still active once the step finished.
    pub active:  usize,
}

/// Callbacks invoked by the [`Scheduler`][crate::Scheduler] as instances
/// change state.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — run logger
///
/// ```rust,ignore
/// struct RunLogger;
///
/// impl SchedulerObserver for RunLogger {
///     fn on_stopped(
///         &mut self,
///         tick: Tick,
///         agent: AgentId,
///         definition: &DefinitionId,
///         reason: StopReason,
///         outcome: &RunOutcome,
///     ) {
///         println!("{tick}: {agent} left {definition} ({}) after {} ticks",
///                  reason.as_str(), outcome.active_ticks);
///     }
/// }
/// ```
pub trait SchedulerObserver {
    /// An instance was admitted and started this tick.
    fn on_started(&mut self, _tick: Tick, _agent: AgentId, _definition: &DefinitionId) {}

    /// An active run ended.  `outcome` carries satisfaction and the cooldown.
    fn on_stopped(
        &mut self,
        _tick:       Tick,
        _agent:      AgentId,
        _definition: &DefinitionId,
        _reason:     StopReason,
        _outcome:    &RunOutcome,
    ) {}

    /// Called once at the end of every step, before the clock advances.
    fn on_tick_end(&mut self, _report: &StepReport) {}
}

/// A [`SchedulerObserver`] that does nothing.
pub struct NoopObserver;

impl SchedulerObserver for NoopObserver {}
