//! `CooldownStore` — routes cooldown reads and writes to durable state, with
//! a bounded in-memory fallback for agents that are not attached yet.
//!
//! # Routing
//!
//! If the host supplies a [`DurableStateStore`] and reports the agent as
//! attached, every read and write goes there.  Otherwise the entry lives in
//! the fallback arena, keyed by agent then definition.
//!
//! # Fallback arena
//!
//! - Entries are pruned lazily: a stale entry (`now ≥ ready_at`) reads as
//!   ready and is dropped on the agent's next commit.
//! - [`release_agent`][CooldownStore::release_agent] drops an agent's entries
//!   outright; the host calls it when the agent is removed.
//! - [`migrate`][CooldownStore::migrate] moves an agent's pending entries into
//!   durable state once it is attached.  Until then an attached agent reads
//!   the later of its durable and fallback `ready_at`, so a cooldown committed
//!   while detached is never skipped.
//! - At most `capacity` agents are tracked.  Admitting a new agent into a
//!   full arena first prunes stale entries everywhere, then evicts the agent
//!   whose latest `ready_at` is earliest.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use ab_agent::DurableStateStore;
use ab_core::{AgentId, DefinitionId, SchedulerConfig, Tick};

/// One cooldown, as reported by [`CooldownStore::snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CooldownEntry {
    pub agent:      AgentId,
    pub definition: DefinitionId,
    pub ready_at:   Tick,
}

pub struct CooldownStore {
    fallback: FxHashMap<AgentId, FxHashMap<DefinitionId, Tick>>,
    capacity: usize,
}

impl CooldownStore {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        Self { fallback: FxHashMap::default(), capacity: capacity.max(1) }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.fallback_agent_capacity)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tick at which `definition` is eligible again for `agent`, if any
    /// cooldown was recorded.  May be in the past.
    pub fn ready_at(
        &self,
        durable:    Option<&(dyn DurableStateStore + '_)>,
        agent:      AgentId,
        definition: &DefinitionId,
    ) -> Option<Tick> {
        let fallback = self.fallback.get(&agent).and_then(|e| e.get(definition).copied());
        match durable {
            Some(store) if store.is_attached(agent) => {
                store.get_cooldown(agent, definition).max(fallback)
            }
            _ => fallback,
        }
    }

    /// `true` unless a recorded cooldown has `now < ready_at`.
    pub fn is_ready(
        &self,
        durable:    Option<&(dyn DurableStateStore + '_)>,
        agent:      AgentId,
        definition: &DefinitionId,
        now:        Tick,
    ) -> bool {
        self.ready_at(durable, agent, definition).is_none_or(|ready| now >= ready)
    }

    /// Ticks left before `definition` is eligible again; 0 when ready.
    pub fn remaining(
        &self,
        durable:    Option<&(dyn DurableStateStore + '_)>,
        agent:      AgentId,
        definition: &DefinitionId,
        now:        Tick,
    ) -> u64 {
        self.ready_at(durable, agent, definition)
            .map_or(0, |ready| ready.saturating_since(now))
    }

    /// Record a cooldown of `duration_ticks` from `now`.  Returns `ready_at`.
    pub fn commit(
        &mut self,
        durable:        Option<&mut (dyn DurableStateStore + '_)>,
        agent:          AgentId,
        definition:     &DefinitionId,
        now:            Tick,
        duration_ticks: u64,
    ) -> Tick {
        let ready_at = now + duration_ticks;
        match durable {
            Some(store) if store.is_attached(agent) => {
                store.set_cooldown(agent, definition, now, duration_ticks);
                debug!(%agent, %definition, %ready_at, "cooldown committed");
            }
            _ => {
                self.commit_fallback(agent, definition, now, ready_at);
                debug!(%agent, %definition, %ready_at, "cooldown committed to fallback");
            }
        }
        ready_at
    }

    fn commit_fallback(
        &mut self,
        agent:      AgentId,
        definition: &DefinitionId,
        now:        Tick,
        ready_at:   Tick,
    ) {
        if !self.fallback.contains_key(&agent) && self.fallback.len() >= self.capacity {
            self.make_room(now);
        }
        let entries = self.fallback.entry(agent).or_default();
        entries.retain(|_, ready| *ready > now);
        entries.insert(definition.clone(), ready_at);
    }

    fn make_room(&mut self, now: Tick) {
        let pruned = self.prune(now);
        if self.fallback.len() < self.capacity {
            debug!(pruned, "fallback cooldowns pruned under capacity pressure");
            return;
        }
        let victim = self
            .fallback
            .iter()
            .map(|(agent, entries)| {
                (*agent, entries.values().copied().max().unwrap_or(Tick::ZERO))
            })
            .min_by_key(|(agent, latest)| (*latest, *agent))
            .map(|(agent, _)| agent);
        if let Some(agent) = victim {
            let dropped = self.release_agent(agent);
            warn!(%agent, dropped, capacity = self.capacity, "fallback cooldowns evicted");
        }
    }

    /// Move `agent`'s fallback entries that are still pending at `now` into
    /// `durable`, dropping the stale ones.  Does nothing while the agent is
    /// detached.  Returns how many entries were moved.
    pub fn migrate(
        &mut self,
        durable: &mut (dyn DurableStateStore + '_),
        agent:   AgentId,
        now:     Tick,
    ) -> usize {
        if !durable.is_attached(agent) {
            return 0;
        }
        let Some(entries) = self.fallback.remove(&agent) else {
            return 0;
        };
        let mut moved = 0;
        for (definition, ready_at) in entries.into_iter().filter(|(_, ready)| *ready > now) {
            let ready_at = durable
                .get_cooldown(agent, &definition)
                .map_or(ready_at, |stored| stored.max(ready_at));
            durable.set_cooldown(agent, &definition, now, ready_at.saturating_since(now));
            moved += 1;
        }
        debug!(%agent, moved, "fallback cooldowns migrated to durable state");
        moved
    }

    /// Drop every stale fallback entry and any agent left empty.  Returns the
    /// number of entries removed.
    pub fn prune(&mut self, now: Tick) -> usize {
        let mut removed = 0;
        self.fallback.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|_, ready| *ready > now);
            removed += before - entries.len();
            !entries.is_empty()
        });
        removed
    }

    /// Forget every fallback cooldown of `agent`.  Returns how many were held.
    pub fn release_agent(&mut self, agent: AgentId) -> usize {
        self.fallback.remove(&agent).map_or(0, |e| e.len())
    }

    /// Number of agents with fallback entries.
    pub fn fallback_agents(&self) -> usize {
        self.fallback.len()
    }

    /// Number of fallback entries held for `agent`.
    pub fn fallback_len(&self, agent: AgentId) -> usize {
        self.fallback.get(&agent).map_or(0, |e| e.len())
    }

    /// Owned copy of every fallback entry, sorted by agent then definition.
    pub fn snapshot(&self) -> Vec<CooldownEntry> {
        let mut out: Vec<_> = self
            .fallback
            .iter()
            .flat_map(|(agent, entries)| {
                entries.iter().map(move |(definition, ready_at)| CooldownEntry {
                    agent:      *agent,
                    definition: definition.clone(),
                    ready_at:   *ready_at,
                })
            })
            .collect();
        out.sort_by(|a, b| a.agent.cmp(&b.agent).then_with(|| a.definition.cmp(&b.definition)));
        out
    }
}

impl Default for CooldownStore {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}
