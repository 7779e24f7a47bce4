//! Fluent builder for constructing a [`Scheduler`].

use ab_agent::{AgentRngs, AgentStore};
use ab_behavior::{CooldownStore, DefinitionRegistry};
use ab_core::{AgentId, DefinitionId, SchedulerConfig, TickClock};

use crate::scheduler::bind;
use crate::{SchedError, SchedResult, Scheduler};

/// Fluent builder for [`Scheduler`].
///
/// # Required inputs
///
/// - [`SchedulerConfig`]: durations, thresholds, fallback capacity, …
/// - [`DefinitionRegistry`]: the core (and optionally overlay) definitions
/// - [`AgentStore`] + [`AgentRngs`]: from [`ab_agent::AgentStoreBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                   |
/// |-------------------|-------------------------------------------|
/// | `.loadouts(v)`    | No instances; use `spawn_instances` later |
/// | `.clock(c)`       | `TickClock::new()` (tick 0)               |
/// | `.cooldowns(s)`   | `CooldownStore::from_config(&config)`     |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(n, seed).build();
/// let mut sched = SchedulerBuilder::new(config, registry, store, rngs)
///     .loadouts(vec![vec!["play:fetch".into()]; n])
///     .build()?;
/// sched.step(senses, Sinks::default(), &mut NoopObserver);
/// ```
pub struct SchedulerBuilder {
    config:    SchedulerConfig,
    registry:  DefinitionRegistry,
    agents:    AgentStore,
    rngs:      AgentRngs,
    loadouts:  Option<Vec<Vec<DefinitionId>>>,
    clock:     Option<TickClock>,
    cooldowns: Option<CooldownStore>,
}

impl SchedulerBuilder {
    /// Create a builder with all required inputs.
    pub fn new(
        config:   SchedulerConfig,
        registry: DefinitionRegistry,
        agents:   AgentStore,
        rngs:     AgentRngs,
    ) -> Self {
        Self {
            config,
            registry,
            agents,
            rngs,
            loadouts:  None,
            clock:     None,
            cooldowns: None,
        }
    }

    /// Supply the definition ids each agent starts with (must be length
    /// `agent_count`).
    pub fn loadouts(mut self, loadouts: Vec<Vec<DefinitionId>>) -> Self {
        self.loadouts = Some(loadouts);
        self
    }

    /// Resume from a saved tick instead of tick 0.
    pub fn clock(mut self, clock: TickClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Supply a pre-populated or differently sized fallback cooldown store.
    pub fn cooldowns(mut self, cooldowns: CooldownStore) -> Self {
        self.cooldowns = Some(cooldowns);
        self
    }

    /// Validate inputs, resolve loadouts against the registry, and return a
    /// ready-to-step [`Scheduler`].
    ///
    /// # Errors
    ///
    /// - [`SchedError::Config`] if the config fails validation.
    /// - [`SchedError::AgentCountMismatch`] if the RNGs or loadouts do not
    ///   cover exactly the agents in the store.
    /// - [`SchedError::Registry`] if a loadout names an unknown definition.
    pub fn build(self) -> SchedResult<Scheduler> {
        self.config.validate()?;
        let agent_count = self.agents.count;

        // ── Validate per-agent inputs ─────────────────────────────────────
        if self.rngs.len() != agent_count {
            return Err(SchedError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent rngs",
            });
        }

        let loadouts = match self.loadouts {
            Some(l) => {
                if l.len() != agent_count {
                    return Err(SchedError::AgentCountMismatch {
                        expected: agent_count,
                        got:      l.len(),
                        what:     "loadouts",
                    });
                }
                l
            }
            None => vec![Vec::new(); agent_count],
        };

        // ── Resolve loadouts into instance tables ─────────────────────────
        let mut instances = Vec::with_capacity(agent_count);
        for (index, ids) in loadouts.iter().enumerate() {
            let agent = AgentId(index as u32);
            let definitions = ids
                .iter()
                .map(|id| self.registry.require(id.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            let mut slot = Vec::with_capacity(definitions.len());
            bind(&mut slot, agent, definitions);
            instances.push(slot);
        }

        let cooldowns = self
            .cooldowns
            .unwrap_or_else(|| CooldownStore::from_config(&self.config));

        Ok(Scheduler::from_parts(
            self.config,
            self.clock.unwrap_or_default(),
            self.registry,
            self.agents,
            self.rngs,
            instances,
            cooldowns,
        ))
    }
}
