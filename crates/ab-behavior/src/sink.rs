//! Fire-and-forget collaborators the lifecycle reports into.
//!
//! Nothing returned by these is ever consumed.  Both are optional in
//! [`TickContext`][crate::TickContext]; a missing sink turns the report into
//! a no-op.

use ab_bias::Category;
use ab_core::AgentId;

/// The host's mood/stimulus engine.
pub trait MoodSink {
    /// An activity pulse of `intensity` lasting `duration_ticks`.
    fn record_activity(
        &mut self,
        agent:          AgentId,
        intensity:      f32,
        duration_ticks: u32,
        category:       Category,
    );

    fn push_emotion(&mut self, agent: AgentId, name: &str, intensity: f32);

    /// Flush pushed emotions into the agent's mood.
    fn dispatch(&mut self, agent: AgentId);

    /// Offer an emotion to the other members of the agent's party.
    ///
    /// Default: ignored.
    fn spread_to_party(&mut self, _agent: AgentId, _name: &str, _intensity: f32) {}
}

/// The host's long-term memory of how activities went.
pub trait MemorySink {
    /// `satisfaction` is in `[0, 1]`.
    fn record_experience(&mut self, agent: AgentId, satisfaction: f32);
}
