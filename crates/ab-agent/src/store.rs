//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! A lifecycle call needs `&mut AgentRng` (cooldown draws) and `&mut dyn
//! DurableStateStore` (cooldown writes) for the same agent at once.  Keeping
//! RNGs in a separate `AgentRngs` struct lets the driver borrow both fields
//! disjointly without fighting the borrow checker.
//!
//! # Attachment
//!
//! An agent is *attached* once the host's persistence layer has created its
//! per-agent state.  Until then [`DurableStateStore::is_attached`] is `false`
//! and cooldowns are routed to the scheduler's in-memory fallback.

use rustc_hash::FxHashMap;

use ab_core::{AgentId, AgentRng, DefinitionId, Tick};

use crate::{LifeStage, LifeStageSource};

// ── Durable state interface ───────────────────────────────────────────────────

/// The host's durable per-agent state: cooldowns and stored metadata.
pub trait DurableStateStore {
    /// `true` once per-agent state exists and cooldown writes will persist.
    fn is_attached(&self, agent: AgentId) -> bool;

    /// Tick at which `definition` becomes eligible again for `agent`.
    fn get_cooldown(&self, agent: AgentId, definition: &DefinitionId) -> Option<Tick>;

    /// Record a cooldown of `duration_ticks` starting at `now`.
    fn set_cooldown(
        &mut self,
        agent:          AgentId,
        definition:     &DefinitionId,
        now:            Tick,
        duration_ticks: u64,
    );

    /// Life stage kept with the agent's state, if the host stores one.
    fn stored_life_stage(&self, _agent: AgentId) -> Option<LifeStage> {
        None
    }
}

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] to enable
/// simultaneous `&mut AgentRngs` + `&mut AgentStore` borrows.
pub struct AgentRngs {
    seed:      u64,
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { seed: global_seed, inner }
    }

    /// Mutable reference to one agent's RNG, or `None` if out of range.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentRng> {
        self.inner.get_mut(agent.index())
    }

    /// Append an RNG for the next agent id.
    pub fn push_agent(&mut self) -> AgentId {
        let id = AgentId(self.inner.len() as u32);
        self.inner.push(AgentRng::new(self.seed, id));
        id
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for the per-agent state the scheduler owns.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them.  Out-of-range ids are tolerated everywhere (they
/// read as detached / unknown) so a stale handle can never panic a tick.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Whether the host's persistence layer holds state for the agent.
    pub attached: Vec<bool>,

    /// Life-stage metadata, when the host supplies it.
    pub life_stage: Vec<Option<LifeStage>>,

    /// Durable cooldowns: definition → ready-at tick.
    cooldowns: Vec<FxHashMap<DefinitionId, Tick>>,
}

impl AgentStore {
    pub(crate) fn new(count: usize, attached: bool) -> Self {
        Self {
            count,
            attached:   vec![attached; count],
            life_stage: vec![None; count],
            cooldowns:  (0..count).map(|_| FxHashMap::default()).collect(),
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Append a new, detached agent and return its id.
    pub fn push_agent(&mut self) -> AgentId {
        let id = AgentId(self.count as u32);
        self.attached.push(false);
        self.life_stage.push(None);
        self.cooldowns.push(FxHashMap::default());
        self.count += 1;
        id
    }

    /// Mark the agent's durable state as available.  No-op for unknown ids.
    pub fn attach(&mut self, agent: AgentId) {
        if let Some(flag) = self.attached.get_mut(agent.index()) {
            *flag = true;
        }
    }

    /// Drop the agent's durable state (e.g. despawn).  Cooldowns are cleared.
    pub fn detach(&mut self, agent: AgentId) {
        let i = agent.index();
        if let Some(flag) = self.attached.get_mut(i) {
            *flag = false;
        }
        if let Some(map) = self.cooldowns.get_mut(i) {
            map.clear();
        }
    }

    pub fn set_life_stage(&mut self, agent: AgentId, stage: LifeStage) {
        if let Some(slot) = self.life_stage.get_mut(agent.index()) {
            *slot = Some(stage);
        }
    }

    /// Drop cooldown entries that have expired at `now`.  Returns how many
    /// were removed.
    pub fn prune_cooldowns(&mut self, agent: AgentId, now: Tick) -> usize {
        match self.cooldowns.get_mut(agent.index()) {
            None => 0,
            Some(map) => {
                let before = map.len();
                map.retain(|_, ready_at| *ready_at > now);
                before - map.len()
            }
        }
    }

    /// Number of durable cooldown entries held for `agent`.
    pub fn cooldown_count(&self, agent: AgentId) -> usize {
        self.cooldowns.get(agent.index()).map_or(0, |m| m.len())
    }
}

impl DurableStateStore for AgentStore {
    fn is_attached(&self, agent: AgentId) -> bool {
        self.attached.get(agent.index()).copied().unwrap_or(false)
    }

    fn get_cooldown(&self, agent: AgentId, definition: &DefinitionId) -> Option<Tick> {
        self.cooldowns.get(agent.index())?.get(definition).copied()
    }

    fn set_cooldown(
        &mut self,
        agent:          AgentId,
        definition:     &DefinitionId,
        now:            Tick,
        duration_ticks: u64,
    ) {
        if let Some(map) = self.cooldowns.get_mut(agent.index()) {
            map.insert(definition.clone(), now + duration_ticks);
        }
    }

    fn stored_life_stage(&self, agent: AgentId) -> Option<LifeStage> {
        self.life_stage.get(agent.index()).copied().flatten()
    }
}

impl LifeStageSource for AgentStore {
    fn life_stage(&self, agent: AgentId) -> Option<LifeStage> {
        self.life_stage.get(agent.index()).copied().flatten()
    }
}
