//! Immutable behavior definitions and their builder.
//!
//! A [`BehaviorDefinition`] is created once at registry load and shared by
//! `Arc` from then on; nothing mutates it.  The only constructor is
//! [`DefinitionBuilder::build`], which validates every invariant so the
//! lifecycle can rely on them without checks.

use std::fmt;
use std::sync::Arc;

use ab_agent::{CapabilityProfile, EnergyReading};
use ab_bias::{BiasSpec, Category, EnergyRange, IdleStaminaBias, energy_bias};
use ab_core::{AgentId, DefinitionId};

use crate::{
    Behavior, CapabilityRequirement, ControlResources, EmotionFeedback, RegistryError,
    RegistryResult,
};

/// Builds a fresh [`Behavior`] bound to one agent.
pub type BehaviorFactory = Arc<dyn Fn(AgentId) -> Box<dyn Behavior> + Send + Sync>;

/// Intensity used for mood pulses when a definition declares none.
pub const DEFAULT_INTENSITY: f32 = 0.5;

// ── BehaviorDefinition ────────────────────────────────────────────────────────

pub struct BehaviorDefinition {
    pub id:                DefinitionId,
    pub category:          Category,
    /// Lower value = higher precedence.
    pub priority:          i32,
    /// `(min, max)` ticks; `(0, 0)` means no cooldown.
    pub cooldown_range:    (u64, u64),
    pub requirement:       CapabilityRequirement,
    pub energy_range:      EnergyRange,
    pub idle_stamina_bias: IdleStaminaBias,
    pub social_idle_bias:  bool,
    pub control_resources: ControlResources,
    /// Activity intensity in `[0, 1]` reported to the mood sink.
    pub intensity:         f32,
    pub feedback:          EmotionFeedback,
    factory:               BehaviorFactory,
}

impl BehaviorDefinition {
    /// Build the per-agent hook object for a new instance.
    pub fn instantiate(&self, agent: AgentId) -> Box<dyn Behavior> {
        (self.factory)(agent)
    }

    /// Hard capability gate.
    #[inline]
    pub fn is_compatible(&self, profile: &CapabilityProfile) -> bool {
        self.requirement.test(profile)
    }

    pub fn bias_spec(&self) -> BiasSpec {
        BiasSpec::new(self.category)
            .with_range(self.energy_range)
            .with_idle_stamina(self.idle_stamina_bias)
            .with_social_idle(self.social_idle_bias)
    }

    /// Soft energy gate weight in `[0.05, 1.0]`.
    #[inline]
    pub fn energy_bias(&self, reading: &EnergyReading) -> f32 {
        energy_bias(reading, &self.bias_spec())
    }

    #[inline]
    pub fn has_cooldown(&self) -> bool {
        self.cooldown_range.1 > 0
    }
}

impl fmt::Debug for BehaviorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorDefinition")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("cooldown_range", &self.cooldown_range)
            .field("requirement", &self.requirement)
            .field("energy_range", &self.energy_range)
            .field("idle_stamina_bias", &self.idle_stamina_bias)
            .field("social_idle_bias", &self.social_idle_bias)
            .field("control_resources", &self.control_resources)
            .field("intensity", &self.intensity)
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}

// ── DefinitionBuilder ─────────────────────────────────────────────────────────

/// Fluent construction of a [`BehaviorDefinition`].
///
/// ```rust
/// use ab_behavior::{ControlResources, DefinitionBuilder, SteadyBehavior};
/// use ab_bias::Category;
///
/// let def = DefinitionBuilder::new("zoomies", Category::Play, |_| {
///         Box::new(SteadyBehavior::new(0.6))
///     })
///     .priority(20)
///     .cooldown(100, 300)
///     .energy_range(0.5, 1.0)
///     .resources(ControlResources::MOVE | ControlResources::JUMP)
///     .build()
///     .unwrap();
///
/// assert_eq!(def.id.as_str(), "zoomies");
/// assert!(def.has_cooldown());
/// ```
pub struct DefinitionBuilder {
    id:                DefinitionId,
    category:          Category,
    priority:          i32,
    cooldown_range:    (u64, u64),
    requirement:       CapabilityRequirement,
    energy_range:      Option<(f32, f32)>,
    idle_stamina_bias: IdleStaminaBias,
    social_idle_bias:  bool,
    control_resources: ControlResources,
    intensity:         f32,
    feedback:          EmotionFeedback,
    factory:           BehaviorFactory,
}

impl DefinitionBuilder {
    pub fn new<F>(id: impl Into<DefinitionId>, category: Category, factory: F) -> Self
    where
        F: Fn(AgentId) -> Box<dyn Behavior> + Send + Sync + 'static,
    {
        Self {
            id:                id.into(),
            category,
            priority:          0,
            cooldown_range:    (0, 0),
            requirement:       CapabilityRequirement::any(),
            energy_range:      None,
            idle_stamina_bias: IdleStaminaBias::None,
            social_idle_bias:  false,
            control_resources: ControlResources::NONE,
            intensity:         DEFAULT_INTENSITY,
            feedback:          EmotionFeedback::default(),
            factory:           Arc::new(factory),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn cooldown(mut self, min_ticks: u64, max_ticks: u64) -> Self {
        self.cooldown_range = (min_ticks, max_ticks);
        self
    }

    pub fn requires(mut self, requirement: CapabilityRequirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn energy_range(mut self, low: f32, high: f32) -> Self {
        self.energy_range = Some((low, high));
        self
    }

    pub fn idle_stamina(mut self, bias: IdleStaminaBias) -> Self {
        self.idle_stamina_bias = bias;
        self
    }

    pub fn social_idle(mut self, social: bool) -> Self {
        self.social_idle_bias = social;
        self
    }

    pub fn resources(mut self, resources: ControlResources) -> Self {
        self.control_resources = resources;
        self
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn feedback(mut self, feedback: EmotionFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidDefinition`] if the id is empty, the energy
    /// range is not `0 ≤ low ≤ high ≤ 1`, the cooldown range is inverted, or
    /// the intensity is outside `[0, 1]`.
    pub fn build(self) -> RegistryResult<BehaviorDefinition> {
        let invalid = |reason: String| RegistryError::InvalidDefinition {
            id: self.id.clone(),
            reason,
        };

        if self.id.as_str().is_empty() {
            return Err(invalid("empty id".into()));
        }
        let energy_range = match self.energy_range {
            None => EnergyRange::FULL,
            Some((low, high)) => EnergyRange::new(low, high).ok_or_else(|| {
                invalid(format!("energy range [{low}, {high}] must satisfy 0 ≤ low ≤ high ≤ 1"))
            })?,
        };
        let (min, max) = self.cooldown_range;
        if min > max {
            return Err(invalid(format!("cooldown range ({min}, {max}) is inverted")));
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(invalid(format!("intensity {} outside [0, 1]", self.intensity)));
        }

        Ok(BehaviorDefinition {
            id: self.id,
            category: self.category,
            priority: self.priority,
            cooldown_range: self.cooldown_range,
            requirement: self.requirement,
            energy_range,
            idle_stamina_bias: self.idle_stamina_bias,
            social_idle_bias: self.social_idle_bias,
            control_resources: self.control_resources,
            intensity: self.intensity,
            feedback: self.feedback,
            factory: self.factory,
        })
    }
}
