//! `BehaviorInstance` — the lifecycle state machine for one (agent, definition).
//!
//! # States
//!
//! ```text
//! Inactive ──start──▶ Starting ──▶ Active ──stop──▶ Stopping ──▶ Inactive
//! ```
//!
//! `Starting` and `Stopping` are only observable from inside the start and
//! stop hooks.  The host drives the machine once per tick:
//!
//! 1. `should_continue` on active instances; `stop` the ones that answer `false`.
//! 2. `can_start` then `start` on inactive ones.
//! 3. `tick` on active ones.
//!
//! # Commitment
//!
//! A run is seeded with the midpoint of the configured duration window (70%
//! of that for young agents).  Every tick with engagement above the extension
//! threshold adds `extension_step` ticks, never past the window's maximum.
//! Overdue runs end once engagement drops below the boredom threshold, and
//! every run ends past `hard_cap_multiplier × committed_duration`.
//!
//! Every method is total: a missing collaborator turns its report into a
//! no-op, and calls in the wrong phase are ignored.

use std::sync::Arc;

use tracing::{debug, trace};

use ab_agent::LifeStage;
use ab_core::{AgentId, AgentRng, Tick};

use crate::{Admission, Behavior, BehaviorDefinition, Claim, HookView, StopReason, TickContext};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Phase {
    #[default]
    Inactive,
    Starting,
    Active,
    Stopping,
}

/// What a completed run reported.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RunOutcome {
    pub active_ticks:       u32,
    pub committed_duration: u32,
    pub satisfaction:       f32,
    /// Set when the definition declares a cooldown.
    pub ready_at:           Option<Tick>,
}

pub struct BehaviorInstance {
    agent:              AgentId,
    definition:         Arc<BehaviorDefinition>,
    behavior:           Box<dyn Behavior>,
    phase:              Phase,
    active_ticks:       u32,
    committed_duration: u32,
    engagement:         f32,
}

impl BehaviorInstance {
    /// Bind `definition` to `agent` through the definition's factory.
    pub fn new(definition: Arc<BehaviorDefinition>, agent: AgentId) -> Self {
        let behavior = definition.instantiate(agent);
        Self {
            agent,
            definition,
            behavior,
            phase: Phase::Inactive,
            active_ticks: 0,
            committed_duration: 0,
            engagement: 0.0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn definition(&self) -> &Arc<BehaviorDefinition> {
        &self.definition
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    #[inline]
    pub fn active_ticks(&self) -> u32 {
        self.active_ticks
    }

    #[inline]
    pub fn committed_duration(&self) -> u32 {
        self.committed_duration
    }

    #[inline]
    pub fn engagement(&self) -> f32 {
        self.engagement
    }

    fn view<'c>(&self, ctx: &'c TickContext<'_>) -> HookView<'c> {
        HookView {
            agent:              self.agent,
            tick:               ctx.tick,
            active_ticks:       self.active_ticks,
            committed_duration: self.committed_duration,
            engagement:         self.engagement,
            senses:             &ctx.senses,
        }
    }

    // ── Arbitration ───────────────────────────────────────────────────────

    /// Priority and resource gates shared by start and continue.
    fn contention(&self, ctx: &TickContext<'_>) -> Option<Admission> {
        let def = &self.definition;
        if let Some(claim) = ctx.arbiter.outranked_by(self.agent, &def.id, def.priority) {
            return Some(Admission::Outranked { by_priority: claim.priority });
        }
        if let Some(claim) = ctx.arbiter.conflicting(self.agent, &def.id, def.control_resources) {
            return Some(Admission::ResourceBusy { held: claim.resources });
        }
        None
    }

    /// Evaluate every start gate and report the first that fails.
    ///
    /// Order: phase, survival, capability, priority, resources, cooldown,
    /// energy, then the definition's own predicate.
    pub fn check_start(&mut self, ctx: &TickContext<'_>) -> Admission {
        let admission = self.evaluate_start(ctx);
        if !matches!(admission, Admission::Admitted | Admission::Busy) {
            trace!(
                agent = %self.agent,
                definition = %self.definition.id,
                reason = admission.as_str(),
                "start refused"
            );
        }
        admission
    }

    fn evaluate_start(&mut self, ctx: &TickContext<'_>) -> Admission {
        if self.phase != Phase::Inactive {
            return Admission::Busy;
        }
        let def = Arc::clone(&self.definition);
        if ctx.senses.survival.is_survival_critical(self.agent) {
            return Admission::SurvivalCritical;
        }
        let profile = ctx.senses.capabilities.analyze(self.agent);
        if !def.is_compatible(&profile) {
            return Admission::Incapable;
        }
        if let Some(blocked) = self.contention(ctx) {
            return blocked;
        }
        let durable = ctx.durable.as_deref();
        if let Some(ready_at) = ctx.cooldowns.ready_at(durable, self.agent, &def.id) {
            if ctx.tick < ready_at {
                return Admission::CoolingDown { ready_at };
            }
        }
        if let Some(reading) = ctx.senses.energy.capture(self.agent) {
            let threshold = if reading.is_full_profile() {
                ctx.config.profile_admission_threshold
            } else {
                ctx.config.scalar_admission_threshold
            };
            let bias = def.energy_bias(&reading);
            if bias <= threshold {
                return Admission::LowEnergy { bias };
            }
        }
        let view = self.view(ctx);
        if !self.behavior.can_start(&view) {
            return Admission::Declined;
        }
        Admission::Admitted
    }

    #[inline]
    pub fn can_start(&mut self, ctx: &TickContext<'_>) -> bool {
        self.check_start(ctx).is_admitted()
    }

    /// Why the current run must end, or `None` while it should go on.
    pub fn check_continue(&mut self, ctx: &TickContext<'_>) -> Option<StopReason> {
        if self.phase != Phase::Active {
            return Some(StopReason::Inactive);
        }
        if ctx.senses.survival.is_survival_critical(self.agent) {
            return Some(StopReason::SurvivalCritical);
        }
        match self.contention(ctx) {
            Some(Admission::Outranked { .. }) => return Some(StopReason::Outranked),
            Some(_) => return Some(StopReason::ResourceBusy),
            None => {}
        }
        let cfg = ctx.config;
        if self.active_ticks > self.committed_duration && self.engagement < cfg.boredom_engagement {
            return Some(StopReason::Bored);
        }
        let hard_cap = self.committed_duration.saturating_mul(cfg.hard_cap_multiplier);
        if self.active_ticks > hard_cap {
            return Some(StopReason::HardCap);
        }
        let view = self.view(ctx);
        if !self.behavior.should_continue(&view) {
            return Some(StopReason::Finished);
        }
        None
    }

    #[inline]
    pub fn should_continue(&mut self, ctx: &TickContext<'_>) -> bool {
        self.check_continue(ctx).is_none()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Begin a run.  Call only after `can_start` answered `true` this tick.
    /// Returns `false` (and does nothing) unless the instance is `Inactive`.
    pub fn start(&mut self, ctx: &mut TickContext<'_>) -> bool {
        if self.phase != Phase::Inactive {
            return false;
        }
        let def = Arc::clone(&self.definition);
        let cfg = ctx.config;

        self.phase = Phase::Starting;
        self.active_ticks = 0;
        self.engagement = cfg.neutral_engagement;
        self.committed_duration = cfg.seeded_duration();
        let young = ctx.life_stage(self.agent).is_some_and(LifeStage::is_young);
        if young {
            let scaled = (self.committed_duration as f32 * cfg.young_duration_factor).round();
            self.committed_duration = (scaled as u32).max(1);
        }

        let view = self.view(ctx);
        self.behavior.on_start(&view);

        ctx.arbiter.claim(self.agent, Claim {
            definition: def.id.clone(),
            priority:   def.priority,
            resources:  def.control_resources,
        });
        if let Some(mood) = ctx.sinks.mood.as_deref_mut() {
            mood.record_activity(
                self.agent,
                def.intensity * cfg.start_pulse_scale,
                cfg.start_pulse_ticks,
                def.category,
            );
        }

        self.phase = Phase::Active;
        debug!(
            agent = %self.agent,
            definition = %def.id,
            committed = self.committed_duration,
            young,
            "behavior started"
        );
        true
    }

    /// Advance an active run by one tick.  No-op in any other phase.
    pub fn tick(&mut self, ctx: &TickContext<'_>) {
        if self.phase != Phase::Active {
            return;
        }
        let cfg = ctx.config;
        self.active_ticks = self.active_ticks.saturating_add(1);

        let view = self.view(ctx);
        let raw = self.behavior.engagement(&view);
        if !raw.is_nan() {
            self.engagement = raw.clamp(0.0, 1.0);
        }

        if self.engagement > cfg.extension_engagement
            && self.committed_duration < cfg.base_max_duration
        {
            self.committed_duration = self
                .committed_duration
                .saturating_add(cfg.extension_step)
                .min(cfg.base_max_duration);
        }

        let view = self.view(ctx);
        self.behavior.on_tick(&view);
    }

    /// End the run: report satisfaction and mood, commit the cooldown, and
    /// release the claim.  Returns `None` unless the instance was `Active`.
    pub fn stop(&mut self, ctx: &mut TickContext<'_>, rng: &mut AgentRng) -> Option<RunOutcome> {
        if self.phase != Phase::Active {
            return None;
        }
        let def = Arc::clone(&self.definition);
        let cfg = ctx.config;
        self.phase = Phase::Stopping;

        let completed = self.active_ticks >= self.committed_duration;
        let bonus = if completed { cfg.completion_bonus } else { 0.0 };
        let satisfaction = (self.engagement + bonus).min(1.0);
        if let Some(memory) = ctx.sinks.memory.as_deref_mut() {
            memory.record_experience(self.agent, satisfaction);
        }

        let ready_at = def.has_cooldown().then(|| {
            let (min, max) = def.cooldown_range;
            let draw = if min == max { min } else { rng.draw_inclusive(min, max) };
            ctx.cooldowns
                .commit(ctx.durable.as_deref_mut(), self.agent, &def.id, ctx.tick, draw)
        });

        if let Some(mood) = ctx.sinks.mood.as_deref_mut() {
            mood.record_activity(
                self.agent,
                def.intensity,
                self.active_ticks.min(cfg.completion_pulse_cap),
                def.category,
            );
            let feedback = &def.feedback;
            for (name, intensity) in &feedback.emotions {
                mood.push_emotion(self.agent, name, *intensity);
                if let Some(strength) = feedback.contagion {
                    mood.spread_to_party(self.agent, name, intensity * strength);
                }
            }
            if !feedback.is_empty() {
                mood.dispatch(self.agent);
            }
        }

        let view = self.view(ctx);
        self.behavior.on_stop(&view);
        ctx.arbiter.release(self.agent, &def.id);

        let outcome = RunOutcome {
            active_ticks: self.active_ticks,
            committed_duration: self.committed_duration,
            satisfaction,
            ready_at,
        };
        debug!(
            agent = %self.agent,
            definition = %def.id,
            active_ticks = self.active_ticks,
            satisfaction,
            "behavior stopped"
        );
        self.active_ticks = 0;
        self.phase = Phase::Inactive;
        Some(outcome)
    }

    /// Drop the run without reports or cooldown, e.g. when the agent is
    /// removed.  The caller is responsible for releasing arbiter claims.
    pub fn abort(&mut self) {
        self.phase = Phase::Inactive;
        self.active_ticks = 0;
    }
}
