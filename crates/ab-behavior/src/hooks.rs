//! The `Behavior` trait: per-definition logic the lifecycle calls into.

use ab_agent::{CapabilityProfile, EnergyReading};
use ab_core::{AgentId, Tick};

use crate::Senses;

/// What a hook may look at.  Built fresh for every hook call.
pub struct HookView<'a> {
    pub agent:              AgentId,
    pub tick:               Tick,
    /// Ticks since the last start; 0 before the first tick.
    pub active_ticks:       u32,
    pub committed_duration: u32,
    /// Engagement as of the previous tick (the neutral prior right after start).
    pub engagement:         f32,
    pub senses:             &'a Senses<'a>,
}

impl HookView<'_> {
    /// Ask the host's inspector for the agent's capabilities.
    pub fn capabilities(&self) -> CapabilityProfile {
        self.senses.capabilities.analyze(self.agent)
    }

    /// Ask the host's energy source for the agent's current energy.
    pub fn energy(&self) -> Option<EnergyReading> {
        self.senses.energy.capture(self.agent)
    }

    /// `true` once the run has reached its committed duration.
    #[inline]
    pub fn is_overdue(&self) -> bool {
        self.active_ticks >= self.committed_duration
    }
}

/// Definition-specific behavior logic bound to one agent.
///
/// Produced by a definition's factory, one per instance.  The scheduler never
/// inspects the concrete type; it only calls through this trait.
///
/// Only [`engagement`][Self::engagement] is required.  Every hook runs
/// synchronously on the simulation thread and must not block.
pub trait Behavior: Send + 'static {
    /// Extra start predicate, consulted only after every generic gate passed.
    fn can_start(&mut self, _view: &HookView<'_>) -> bool {
        true
    }

    fn on_start(&mut self, _view: &HookView<'_>) {}

    /// How worthwhile continuing is right now, in `[0, 1]`.  Called once per
    /// tick before [`on_tick`][Self::on_tick]; out-of-range values are clamped.
    fn engagement(&mut self, view: &HookView<'_>) -> f32;

    fn on_tick(&mut self, _view: &HookView<'_>) {}

    /// Extra continuation predicate, consulted after the duration caps.
    fn should_continue(&mut self, _view: &HookView<'_>) -> bool {
        true
    }

    fn on_stop(&mut self, _view: &HookView<'_>) {}
}

/// A [`Behavior`] with constant engagement and no side effects.
///
/// Useful as a placeholder and for hosts whose behaviors live entirely in
/// the animation layer.
#[derive(Copy, Clone, Debug)]
pub struct SteadyBehavior {
    pub engagement: f32,
}

impl SteadyBehavior {
    pub fn new(engagement: f32) -> Self {
        Self { engagement }
    }
}

impl Behavior for SteadyBehavior {
    #[inline]
    fn engagement(&mut self, _view: &HookView<'_>) -> f32 {
        self.engagement
    }
}
