//! Everything a lifecycle call may read or write, bundled per tick.

use ab_agent::{
    CapabilityInspector, DurableStateStore, EnergySource, LifeStage, LifeStageSource,
    SurvivalOracle,
};
use ab_core::{AgentId, SchedulerConfig, Tick};

use crate::{Arbiter, CooldownStore, MemorySink, MoodSink};

/// The host's read-only sensing interfaces.
#[derive(Copy, Clone)]
pub struct Senses<'a> {
    pub capabilities: &'a dyn CapabilityInspector,
    pub energy:       &'a dyn EnergySource,
    pub survival:     &'a dyn SurvivalOracle,
    /// `None` defers to the stage stored in durable state, if any.
    pub life_stage:   Option<&'a dyn LifeStageSource>,
}

impl<'a> Senses<'a> {
    pub fn new(
        capabilities: &'a dyn CapabilityInspector,
        energy:       &'a dyn EnergySource,
        survival:     &'a dyn SurvivalOracle,
    ) -> Self {
        Self { capabilities, energy, survival, life_stage: None }
    }

    pub fn with_life_stage(mut self, source: &'a dyn LifeStageSource) -> Self {
        self.life_stage = Some(source);
        self
    }
}

/// Optional report targets.  `Sinks::default()` discards every report.
#[derive(Default)]
pub struct Sinks<'a> {
    pub mood:   Option<&'a mut dyn MoodSink>,
    pub memory: Option<&'a mut dyn MemorySink>,
}

impl<'a> Sinks<'a> {
    pub fn new(mood: &'a mut dyn MoodSink, memory: &'a mut dyn MemorySink) -> Self {
        Self { mood: Some(mood), memory: Some(memory) }
    }
}

/// Per-tick state shared by every lifecycle call on the simulation thread.
///
/// `durable` is the host's persistence layer; leave it `None` and every
/// cooldown goes to the fallback arena in `cooldowns`.
pub struct TickContext<'a> {
    pub tick:      Tick,
    pub config:    &'a SchedulerConfig,
    pub senses:    Senses<'a>,
    pub sinks:     Sinks<'a>,
    pub durable:   Option<&'a mut dyn DurableStateStore>,
    pub arbiter:   &'a mut Arbiter,
    pub cooldowns: &'a mut CooldownStore,
}

impl<'a> TickContext<'a> {
    pub fn new(
        tick:      Tick,
        config:    &'a SchedulerConfig,
        senses:    Senses<'a>,
        arbiter:   &'a mut Arbiter,
        cooldowns: &'a mut CooldownStore,
    ) -> Self {
        Self {
            tick,
            config,
            senses,
            sinks: Sinks::default(),
            durable: None,
            arbiter,
            cooldowns,
        }
    }

    pub fn with_sinks(mut self, sinks: Sinks<'a>) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn with_durable(mut self, durable: &'a mut dyn DurableStateStore) -> Self {
        self.durable = Some(durable);
        self
    }

    /// The agent's life stage from the host's senses, else from durable
    /// state.  `None` when neither knows it; the agent then counts as adult.
    pub fn life_stage(&self, agent: AgentId) -> Option<LifeStage> {
        self.senses
            .life_stage
            .and_then(|source| source.life_stage(agent))
            .or_else(|| self.durable.as_deref().and_then(|d| d.stored_life_stage(agent)))
    }
}
