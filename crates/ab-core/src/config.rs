//! Scheduler tuning constants.
//!
//! Every number the admission and lifecycle rules depend on lives in
//! [`SchedulerConfig`].  The defaults reproduce the reference tuning exactly;
//! hosts typically deserialize a partial config (with the `serde` feature)
//! and let the rest fall back to `Default`.

use crate::{CoreError, CoreResult};

/// Tunable constants for admission, commitment, and reporting.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Lower bound of the commitment window in ticks.  Default: 40.
    pub base_min_duration: u32,

    /// Upper bound of the commitment window; the engagement extension never
    /// pushes `committed_duration` above it.  Default: 200.
    pub base_max_duration: u32,

    /// Multiplier applied to the seeded duration for young agents.  Default: 0.7.
    pub young_duration_factor: f32,

    /// Ticks added to `committed_duration` per highly-engaged tick.  Default: 2.
    pub extension_step: u32,

    /// Engagement strictly above this extends the commitment.  Default: 0.7.
    pub extension_engagement: f32,

    /// Engagement strictly below this ends an overdue run early.  Default: 0.2.
    pub boredom_engagement: f32,

    /// A run is force-stopped once `active_ticks > hard_cap_multiplier *
    /// committed_duration`.  Default: 2.
    pub hard_cap_multiplier: u32,

    /// Engagement prior assigned at start.  Default: 0.5.
    pub neutral_engagement: f32,

    /// Satisfaction bonus for running at least the committed duration.
    /// Default: 0.2.
    pub completion_bonus: f32,

    /// Scale applied to a definition's intensity for the "activity started"
    /// mood pulse.  Default: 0.3.
    pub start_pulse_scale: f32,

    /// Window of the "activity started" mood pulse in ticks.  Default: 10.
    pub start_pulse_ticks: u32,

    /// Cap on the "activity completed" mood pulse window.  Default: 400.
    pub completion_pulse_cap: u32,

    /// Admission threshold when only scalar momentum is known.  Default: 0.05.
    pub scalar_admission_threshold: f32,

    /// Admission threshold for a full energy profile.  Default: 0.12.
    pub profile_admission_threshold: f32,

    /// Maximum number of agents tracked by the in-memory fallback cooldown
    /// arena before eviction kicks in.  Default: 4096.
    pub fallback_agent_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_min_duration:           40,
            base_max_duration:           200,
            young_duration_factor:       0.7,
            extension_step:              2,
            extension_engagement:        0.7,
            boredom_engagement:          0.2,
            hard_cap_multiplier:         2,
            neutral_engagement:          0.5,
            completion_bonus:            0.2,
            start_pulse_scale:           0.3,
            start_pulse_ticks:           10,
            completion_pulse_cap:        400,
            scalar_admission_threshold:  0.05,
            profile_admission_threshold: 0.12,
            fallback_agent_capacity:     4096,
        }
    }
}

impl SchedulerConfig {
    /// Seeded commitment window: the midpoint of the duration bounds.
    #[inline]
    pub fn seeded_duration(&self) -> u32 {
        (self.base_min_duration + self.base_max_duration) / 2
    }

    /// Reject configurations that would break lifecycle invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.base_max_duration == 0 {
            return Err(CoreError::Config("base_max_duration must be > 0".into()));
        }
        if self.base_min_duration > self.base_max_duration {
            return Err(CoreError::Config(format!(
                "base_min_duration {} exceeds base_max_duration {}",
                self.base_min_duration, self.base_max_duration
            )));
        }
        if self.hard_cap_multiplier == 0 {
            return Err(CoreError::Config("hard_cap_multiplier must be >= 1".into()));
        }
        if self.fallback_agent_capacity == 0 {
            return Err(CoreError::Config("fallback_agent_capacity must be > 0".into()));
        }

        let unit_fields = [
            ("young_duration_factor",       self.young_duration_factor),
            ("extension_engagement",        self.extension_engagement),
            ("boredom_engagement",          self.boredom_engagement),
            ("neutral_engagement",          self.neutral_engagement),
            ("completion_bonus",            self.completion_bonus),
            ("start_pulse_scale",           self.start_pulse_scale),
            ("scalar_admission_threshold",  self.scalar_admission_threshold),
            ("profile_admission_threshold", self.profile_admission_threshold),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
