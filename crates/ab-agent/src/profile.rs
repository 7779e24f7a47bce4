//! Per-agent snapshots consumed by admission checks.
//!
//! Both profiles are plain `Copy` data produced by external collaborators
//! (see [`crate::senses`]).  The scheduler only reads them.

use std::fmt;

// ── Capability profile ────────────────────────────────────────────────────────

/// The medium an agent prefers to move through.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Medium {
    #[default]
    Ground,
    Air,
    Water,
}

impl Medium {
    pub fn as_str(self) -> &'static str {
        match self {
            Medium::Ground => "ground",
            Medium::Air    => "air",
            Medium::Water  => "water",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What physical actions an agent can perform this tick.
///
/// Stable for the duration of one tick; recomputed by the host's capability
/// inspector at most once per admission check.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilityProfile {
    pub can_fly:          bool,
    pub can_swim:         bool,
    pub can_jump:         bool,
    pub can_sit:          bool,
    pub can_carry_items:  bool,
    /// The agent is bonded to an owner.
    pub has_owner:        bool,
    pub preferred_medium: Medium,
}

impl CapabilityProfile {
    /// A ground-dwelling agent that can jump and sit but not fly, swim, or carry.
    pub fn grounded() -> Self {
        Self {
            can_jump: true,
            can_sit:  true,
            ..Self::default()
        }
    }
}

// ── Energy profile ────────────────────────────────────────────────────────────

/// Short-term behavioral readiness.  Every dimension is in `[0, 1]`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyProfile {
    /// Overall drive to do *something*; the dimension every definition's
    /// energy range is expressed in.
    pub momentum:       f32,
    /// Physical battery: gates play and wandering.
    pub stamina:        f32,
    /// Appetite for interaction: gates social behaviors.
    pub social_charge:  f32,
    /// Focus: gates special behaviors.
    pub mental_focus:   f32,
}

impl EnergyProfile {
    /// Build a profile, clamping every dimension into `[0, 1]`.
    ///
    /// `NaN` inputs become `0.0` so downstream bias math stays finite.
    pub fn new(momentum: f32, stamina: f32, social_charge: f32, mental_focus: f32) -> Self {
        Self {
            momentum:      unit(momentum),
            stamina:       unit(stamina),
            social_charge: unit(social_charge),
            mental_focus:  unit(mental_focus),
        }
    }

    /// Every dimension set to `v`.
    pub fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }
}

impl Default for EnergyProfile {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

/// What an energy source could tell us about an agent this tick.
///
/// Hosts without a full energy model report only scalar momentum; admission
/// then uses the generic tent curve and the looser scalar threshold.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum EnergyReading {
    Momentum(f32),
    Profile(EnergyProfile),
}

impl EnergyReading {
    /// The momentum dimension, whichever form was supplied.
    pub fn momentum(&self) -> f32 {
        match self {
            EnergyReading::Momentum(m) => unit(*m),
            EnergyReading::Profile(p)  => p.momentum,
        }
    }

    pub fn is_full_profile(&self) -> bool {
        matches!(self, EnergyReading::Profile(_))
    }
}

// ── Life stage ────────────────────────────────────────────────────────────────

/// Life-stage metadata.  Young agents commit to shorter runs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeStage {
    Young,
    #[default]
    Adult,
    Elder,
}

impl LifeStage {
    #[inline]
    pub fn is_young(self) -> bool {
        matches!(self, LifeStage::Young)
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
