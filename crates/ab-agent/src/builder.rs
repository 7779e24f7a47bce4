//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use ab_agent::{AgentStoreBuilder, LifeStage};
//!
//! let (store, rngs) = AgentStoreBuilder::new(16, /*seed=*/ 42)
//!     .young(&[0, 3])
//!     .build();
//!
//! assert_eq!(store.count, 16);
//! assert_eq!(rngs.len(),  16);
//! assert_eq!(store.life_stage[3], Some(LifeStage::Young));
//! ```

use ab_core::AgentId;

use crate::{AgentRngs, AgentStore, LifeStage};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// All arrays are pre-allocated at construction time so later field writes
/// are simple indexed assignments, not pushes.
pub struct AgentStoreBuilder {
    count:    usize,
    seed:     u64,
    attached: bool,
    stages:   Vec<(AgentId, LifeStage)>,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents using `seed` as the global RNG seed.
    ///
    /// Agents start attached to the durable store; call
    /// [`detached`](Self::detached) to model a host whose persistence layer
    /// comes up later.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            attached: true,
            stages:   Vec::new(),
        }
    }

    /// Start every agent detached (cooldowns go to the in-memory fallback).
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    /// Assign a life stage to one agent.  Out-of-range ids are ignored.
    pub fn life_stage(mut self, agent: AgentId, stage: LifeStage) -> Self {
        self.stages.push((agent, stage));
        self
    }

    /// Mark the agents at `indices` as young.
    pub fn young(mut self, indices: &[u32]) -> Self {
        self.stages
            .extend(indices.iter().map(|&i| (AgentId(i), LifeStage::Young)));
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let mut store = AgentStore::new(self.count, self.attached);
        for (agent, stage) in self.stages {
            store.set_life_stage(agent, stage);
        }
        let rngs = AgentRngs::new(self.count, self.seed);
        (store, rngs)
    }
}
