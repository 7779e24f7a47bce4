//! `Arbiter` — per-agent table of active claims.
//!
//! An instance claims its definition's priority and control resources when
//! it starts and releases them when it stops.  Admission and continuation
//! checks read the claims of *other* instances on the same agent:
//!
//! - **priority safety**: blocked while another claim has a strictly lower
//!   priority value.  Equal priorities never block each other.
//! - **resource exclusivity**: blocked while another claim overlaps.

use rustc_hash::FxHashMap;

use ab_core::{AgentId, DefinitionId};

use crate::ControlResources;

/// One active instance's hold on its agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Claim {
    pub definition: DefinitionId,
    pub priority:   i32,
    pub resources:  ControlResources,
}

#[derive(Default, Debug)]
pub struct Arbiter {
    claims: FxHashMap<AgentId, Vec<Claim>>,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active claims on `agent`, in claim order.
    pub fn claims(&self, agent: AgentId) -> &[Claim] {
        self.claims.get(&agent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_active(&self, agent: AgentId, definition: &DefinitionId) -> bool {
        self.claims(agent).iter().any(|c| c.definition == *definition)
    }

    /// Another claim on `agent` with strictly higher precedence than `priority`.
    pub fn outranked_by(
        &self,
        agent:      AgentId,
        definition: &DefinitionId,
        priority:   i32,
    ) -> Option<&Claim> {
        self.claims(agent)
            .iter()
            .find(|c| c.definition != *definition && c.priority < priority)
    }

    /// Another claim on `agent` holding any of `resources`.
    pub fn conflicting(
        &self,
        agent:      AgentId,
        definition: &DefinitionId,
        resources:  ControlResources,
    ) -> Option<&Claim> {
        self.claims(agent)
            .iter()
            .find(|c| c.definition != *definition && c.resources.overlaps(resources))
    }

    /// Union of every resource held on `agent`.
    pub fn held(&self, agent: AgentId) -> ControlResources {
        self.claims(agent)
            .iter()
            .fold(ControlResources::NONE, |acc, c| acc | c.resources)
    }

    /// Record `claim`, replacing any existing claim for the same definition.
    pub fn claim(&mut self, agent: AgentId, claim: Claim) {
        let slot = self.claims.entry(agent).or_default();
        slot.retain(|c| c.definition != claim.definition);
        slot.push(claim);
    }

    /// Drop the claim for `definition`.  Returns `false` if there was none.
    pub fn release(&mut self, agent: AgentId, definition: &DefinitionId) -> bool {
        let Some(slot) = self.claims.get_mut(&agent) else {
            return false;
        };
        let before = slot.len();
        slot.retain(|c| c.definition != *definition);
        let released = slot.len() != before;
        if slot.is_empty() {
            self.claims.remove(&agent);
        }
        released
    }

    /// Drop every claim on `agent`.  Returns how many were dropped.
    pub fn release_agent(&mut self, agent: AgentId) -> usize {
        self.claims.remove(&agent).map_or(0, |v| v.len())
    }

    /// Total active claims across all agents.
    pub fn active_count(&self) -> usize {
        self.claims.values().map(Vec::len).sum()
    }

    /// Owned copy of every claim, sorted by agent.
    pub fn snapshot(&self) -> Vec<(AgentId, Claim)> {
        let mut out: Vec<_> = self
            .claims
            .iter()
            .flat_map(|(agent, claims)| claims.iter().map(move |c| (*agent, c.clone())))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.definition.cmp(&b.1.definition)));
        out
    }
}
