//! The `Scheduler` struct and its per-tick passes.

use std::sync::Arc;

use tracing::{debug, warn};

use ab_agent::{AgentRngs, AgentStore};
use ab_behavior::{
    Arbiter, BehaviorDefinition, BehaviorInstance, CooldownStore, DefinitionRegistry, RunOutcome,
    Senses, Sinks, StopReason, TickContext,
};
use ab_core::{AgentId, AgentRng, SchedulerConfig, Tick, TickClock};

use crate::{SchedError, SchedResult, SchedulerObserver, StepReport};

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The reference host driver.
///
/// `Scheduler` owns every piece of scheduling state and runs three passes per
/// agent on each [`step`][Self::step]:
///
/// 1. **Stop**: active instances whose continuation check fails are stopped
///    (satisfaction, mood pulse, cooldown, claim release).
/// 2. **Start**: inactive instances are offered a start in priority order,
///    most important first, so a higher-priority admission blocks the rest.
///    An instance stopped in pass 1 waits for the next step.
/// 3. **Tick**: every active instance advances one tick, including the ones
///    started in pass 2.
///
/// Agents are processed in ascending `AgentId` order, which together with the
/// per-agent RNGs makes a run fully reproducible from its seed.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler {
    /// Tuning constants shared by every lifecycle call.
    pub config: SchedulerConfig,

    /// Tick counter; advanced once at the end of every step.
    pub clock: TickClock,

    /// Core and overlay definitions.  Instances keep the `Arc` they were
    /// spawned with; call [`sync_registry`][Self::sync_registry] after
    /// editing the overlay.
    pub registry: DefinitionRegistry,

    /// Durable per-agent state.  Attached agents keep their cooldowns here;
    /// attach through [`attach_agent`][Self::attach_agent] so pending
    /// fallback cooldowns move along.
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Per-agent instance tables, each sorted by ascending priority value.
    instances: Vec<Vec<BehaviorInstance>>,

    /// Agents removed with `release_agent`; skipped by `step` until attached
    /// or readmitted.
    released: Vec<bool>,

    arbiter: Arbiter,

    cooldowns: CooldownStore,
}

impl Scheduler {
    pub(crate) fn from_parts(
        config:    SchedulerConfig,
        clock:     TickClock,
        registry:  DefinitionRegistry,
        agents:    AgentStore,
        rngs:      AgentRngs,
        instances: Vec<Vec<BehaviorInstance>>,
        cooldowns: CooldownStore,
    ) -> Self {
        let released = vec![false; instances.len()];
        Self {
            config,
            clock,
            registry,
            agents,
            rngs,
            instances,
            released,
            arbiter: Arbiter::new(),
            cooldowns,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current()
    }

    /// Number of agents managed.
    #[inline]
    pub fn agent_count(&self) -> usize {
        self.instances.len()
    }

    /// The agent's instances, most important first.  Empty for unknown ids.
    pub fn instances(&self, agent: AgentId) -> &[BehaviorInstance] {
        self.instances.get(agent.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn cooldowns(&self) -> &CooldownStore {
        &self.cooldowns
    }

    /// Total active instances across all agents.
    pub fn active_count(&self) -> usize {
        self.arbiter.active_count()
    }

    /// `true` between `release_agent` and the next attach or readmission.
    pub fn is_released(&self, agent: AgentId) -> bool {
        self.released.get(agent.index()).copied().unwrap_or(false)
    }

    // ── Agent management ──────────────────────────────────────────────────

    /// Append a new agent with no instances.  It starts detached, so its
    /// cooldowns go to the fallback arena until the host attaches it.
    pub fn add_agent(&mut self) -> AgentId {
        let id = self.agents.push_agent();
        self.rngs.push_agent();
        self.instances.push(Vec::new());
        self.released.push(false);
        id
    }

    /// Attach the agent's durable state and move its pending fallback
    /// cooldowns there.  A released agent is scheduled again.  Returns how
    /// many cooldowns were moved.
    pub fn attach_agent(&mut self, agent: AgentId) -> usize {
        self.agents.attach(agent);
        self.readmit_agent(agent);
        let now = self.clock.current();
        let moved = self.cooldowns.migrate(&mut self.agents, agent, now);
        debug!(%agent, moved, "agent attached");
        moved
    }

    /// Schedule a released agent again without attaching durable state; its
    /// cooldowns keep going to the fallback arena.
    pub fn readmit_agent(&mut self, agent: AgentId) {
        if let Some(flag) = self.released.get_mut(agent.index()) {
            *flag = false;
        }
    }

    /// Bind the named definitions to `agent`.  Ids the agent already has are
    /// skipped.  Returns how many instances were added.
    ///
    /// Resolution is all-or-nothing: if any id is unknown, nothing is added.
    ///
    /// # Errors
    ///
    /// - [`SchedError::UnknownAgent`] if `agent` is out of range.
    /// - [`SchedError::Registry`] if an id resolves in neither registry layer.
    pub fn spawn_instances<I, S>(&mut self, agent: AgentId, ids: I) -> SchedResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if agent.index() >= self.instances.len() {
            return Err(SchedError::UnknownAgent(agent));
        }
        let definitions = ids
            .into_iter()
            .map(|id| self.registry.require(id.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let slot = &mut self.instances[agent.index()];
        let added = bind(slot, agent, definitions);
        debug!(%agent, added, total = slot.len(), "instances spawned");
        Ok(added)
    }

    /// Remove the agent from scheduling: running instances are aborted
    /// without reports, claims and fallback cooldowns are dropped, and the
    /// durable state is detached.  `step` skips the agent until
    /// [`attach_agent`][Self::attach_agent] or
    /// [`readmit_agent`][Self::readmit_agent]; the instance table is kept so
    /// it resumes with the same loadout.  Returns how many runs were aborted.
    pub fn release_agent(&mut self, agent: AgentId) -> usize {
        let mut aborted = 0;
        if let Some(slot) = self.instances.get_mut(agent.index()) {
            for instance in slot.iter_mut().filter(|i| i.is_active()) {
                instance.abort();
                aborted += 1;
            }
        }
        let claims = self.arbiter.release_agent(agent);
        let cooldowns = self.cooldowns.release_agent(agent);
        self.agents.detach(agent);
        if let Some(flag) = self.released.get_mut(agent.index()) {
            *flag = true;
        }
        debug!(%agent, aborted, claims, cooldowns, "agent released");
        aborted
    }

    /// Drop instances whose definition was removed from or replaced in the
    /// registry since they were spawned.  Running ones are aborted and their
    /// claims released.  Returns how many instances were dropped.
    pub fn sync_registry(&mut self) -> usize {
        let mut dropped = 0;
        for (index, slot) in self.instances.iter_mut().enumerate() {
            let agent = AgentId(index as u32);
            slot.retain_mut(|instance| {
                let current = self.registry.get(instance.definition().id.as_str());
                if current.is_some_and(|def| Arc::ptr_eq(&def, instance.definition())) {
                    return true;
                }
                if instance.is_active() {
                    instance.abort();
                    self.arbiter.release(agent, &instance.definition().id);
                }
                warn!(
                    %agent,
                    definition = %instance.definition().id,
                    "instance dropped: definition no longer registered"
                );
                dropped += 1;
                false
            });
        }
        dropped
    }

    /// Drop expired cooldowns from both the durable store and the fallback
    /// arena.  Returns how many entries were removed.
    pub fn prune_cooldowns(&mut self) -> usize {
        let now = self.clock.current();
        let durable: usize = (0..self.agents.count as u32)
            .map(|i| self.agents.prune_cooldowns(AgentId(i), now))
            .sum();
        durable + self.cooldowns.prune(now)
    }

    // ── Tick processing ───────────────────────────────────────────────────

    /// Run the stop, start, and tick passes for every agent, then advance the
    /// clock.
    ///
    /// `senses` is the host's view of the world for this tick.  Life stages
    /// come from [`Senses::with_life_stage`] when supplied, else from the
    /// stages kept in [`agents`][Self::agents].  Released agents are skipped.
    pub fn step<'a, O: SchedulerObserver>(
        &'a mut self,
        senses:   Senses<'a>,
        sinks:    Sinks<'a>,
        observer: &mut O,
    ) -> StepReport {
        let now = self.clock.current();
        let mut report = StepReport { tick: now, ..StepReport::default() };

        // Explicit field borrows so the borrow checker sees disjoint access.
        let instances = &mut self.instances;
        let released = &self.released;
        let rngs = &mut self.rngs;
        let mut ctx =
            TickContext::new(now, &self.config, senses, &mut self.arbiter, &mut self.cooldowns)
                .with_sinks(sinks)
                .with_durable(&mut self.agents);

        for (index, slot) in instances.iter_mut().enumerate() {
            let agent = AgentId(index as u32);
            if released.get(index).copied().unwrap_or(false) {
                continue;
            }
            let Some(rng) = rngs.get_mut(agent) else {
                warn!(%agent, "no rng for agent; skipped");
                continue;
            };
            step_agent(agent, slot, rng, &mut ctx, observer, &mut report);
        }

        observer.on_tick_end(&report);
        self.clock.advance();
        report
    }

    /// Step `n` times with the same senses and no sinks.
    pub fn run_ticks<O: SchedulerObserver>(
        &mut self,
        n:        u64,
        senses:   Senses<'_>,
        observer: &mut O,
    ) {
        for _ in 0..n {
            self.step(senses, Sinks::default(), observer);
        }
    }

    /// Stop one running instance outside the regular passes, with the usual
    /// reports and cooldown.  Returns `None` if the agent has no active
    /// instance of `definition`.
    pub fn interrupt<'a, O: SchedulerObserver>(
        &'a mut self,
        agent:      AgentId,
        definition: &str,
        senses:     Senses<'a>,
        sinks:      Sinks<'a>,
        observer:   &mut O,
    ) -> Option<RunOutcome> {
        let now = self.clock.current();
        let instance = self
            .instances
            .get_mut(agent.index())?
            .iter_mut()
            .find(|i| i.is_active() && i.definition().id.as_str() == definition)?;
        let rng = self.rngs.get_mut(agent)?;
        let mut ctx =
            TickContext::new(now, &self.config, senses, &mut self.arbiter, &mut self.cooldowns)
                .with_sinks(sinks)
                .with_durable(&mut self.agents);

        let outcome = instance.stop(&mut ctx, rng)?;
        observer.on_stopped(
            now,
            agent,
            &instance.definition().id,
            StopReason::Interrupted,
            &outcome,
        );
        Some(outcome)
    }
}

// ── Per-agent passes ──────────────────────────────────────────────────────────

/// Add one instance per new definition and restore priority order.
pub(crate) fn bind(
    slot:        &mut Vec<BehaviorInstance>,
    agent:       AgentId,
    definitions: Vec<Arc<BehaviorDefinition>>,
) -> usize {
    let mut added = 0;
    for definition in definitions {
        if slot.iter().any(|i| i.definition().id == definition.id) {
            continue;
        }
        slot.push(BehaviorInstance::new(definition, agent));
        added += 1;
    }
    // Stable: equal priorities keep spawn order.
    slot.sort_by_key(|i| i.definition().priority);
    added
}

fn step_agent<O: SchedulerObserver>(
    agent:    AgentId,
    slot:     &mut [BehaviorInstance],
    rng:      &mut AgentRng,
    ctx:      &mut TickContext<'_>,
    observer: &mut O,
    report:   &mut StepReport,
) {
    // ── Pass 1: stop ──────────────────────────────────────────────────────
    let mut ended: Vec<usize> = Vec::new();
    for (i, instance) in slot.iter_mut().enumerate() {
        if !instance.is_active() {
            continue;
        }
        let Some(reason) = instance.check_continue(ctx) else {
            continue;
        };
        if let Some(outcome) = instance.stop(ctx, rng) {
            observer.on_stopped(ctx.tick, agent, &instance.definition().id, reason, &outcome);
            report.stopped += 1;
            ended.push(i);
        }
    }

    // ── Pass 2: start, most important first ───────────────────────────────
    for (i, instance) in slot.iter_mut().enumerate() {
        if instance.is_active() || ended.contains(&i) {
            continue;
        }
        if instance.can_start(ctx) && instance.start(ctx) {
            observer.on_started(ctx.tick, agent, &instance.definition().id);
            report.started += 1;
        }
    }

    // ── Pass 3: tick ──────────────────────────────────────────────────────
    for instance in slot.iter_mut() {
        instance.tick(ctx);
        if instance.is_active() {
            report.active += 1;
        }
    }
}
