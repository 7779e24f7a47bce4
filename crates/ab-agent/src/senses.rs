//! Read-only collaborator interfaces the scheduler consumes.
//!
//! The host implements these over its own world state.  All methods are
//! pure queries; none may block or mutate world state.

use ab_core::AgentId;

use crate::{CapabilityProfile, EnergyReading, LifeStage};

/// Computes an agent's [`CapabilityProfile`].
pub trait CapabilityInspector {
    fn analyze(&self, agent: AgentId) -> CapabilityProfile;
}

/// Captures an agent's current energy.
///
/// `None` means the host has no energy data for the agent this tick; the
/// energy gate is then skipped rather than failing closed.
pub trait EnergySource {
    fn capture(&self, agent: AgentId) -> Option<EnergyReading>;
}

/// Survival-critical signals that pre-empt all behavior scheduling.
pub trait SurvivalOracle {
    /// The agent is being threatened or attacked.
    fn has_aggressor(&self, agent: AgentId) -> bool;

    /// The agent is locked onto a combat or hunting target.
    fn has_active_target(&self, agent: AgentId) -> bool;

    /// Either signal is raised.
    fn is_survival_critical(&self, agent: AgentId) -> bool {
        self.has_aggressor(agent) || self.has_active_target(agent)
    }
}

/// Optional life-stage metadata.
pub trait LifeStageSource {
    fn life_stage(&self, agent: AgentId) -> Option<LifeStage>;
}

/// A [`SurvivalOracle`] for hosts without combat: never critical.
pub struct PeacefulWorld;

impl SurvivalOracle for PeacefulWorld {
    #[inline]
    fn has_aggressor(&self, _agent: AgentId) -> bool {
        false
    }

    #[inline]
    fn has_active_target(&self, _agent: AgentId) -> bool {
        false
    }
}
