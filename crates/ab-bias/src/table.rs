//! Category → bias blend lookup tables.
//!
//! Adding a category means adding a row to [`CATEGORY_TABLE`]; adding an idle
//! stamina tag means adding a row to [`IDLE_STAMINA_TABLE`].  Nothing else
//! dispatches on category.

use ab_agent::{EnergyProfile, EnergyReading};

use crate::curves::{
    battery_bias, clamp_bias, favour_centered_battery, favour_high_battery, favour_low_battery,
    scalar_bias,
};
use crate::{BiasSpec, Category, IdleStaminaBias};

/// Blends the scalar momentum bias with category-specific energy terms.
pub type BlendFn = fn(scalar: f32, energy: &EnergyProfile, spec: &BiasSpec) -> f32;

/// A stamina curve with its tuning.
#[derive(Copy, Clone, Debug)]
pub struct StaminaCurve {
    pub curve:     fn(value: f32, midpoint: f32, tolerance: f32) -> f32,
    pub midpoint:  f32,
    pub tolerance: f32,
}

impl StaminaCurve {
    #[inline]
    pub fn eval(&self, value: f32) -> f32 {
        (self.curve)(value, self.midpoint, self.tolerance)
    }
}

pub struct CategoryBlend {
    pub category: Category,
    pub blend:    BlendFn,
}

/// One row per category, at [`Category::index`].
pub const CATEGORY_TABLE: [CategoryBlend; 5] = [
    CategoryBlend { category: Category::IdleQuirk, blend: idle_quirk_blend },
    CategoryBlend { category: Category::Wander,    blend: physical_blend },
    CategoryBlend { category: Category::Play,      blend: physical_blend },
    CategoryBlend { category: Category::Social,    blend: social_blend },
    CategoryBlend { category: Category::Special,   blend: special_blend },
];

/// `None` rows fall back to the scalar term alone.
pub const IDLE_STAMINA_TABLE: [(IdleStaminaBias, Option<StaminaCurve>); 4] = [
    (IdleStaminaBias::None, None),
    (
        IdleStaminaBias::Low,
        Some(StaminaCurve { curve: favour_low_battery, midpoint: 0.35, tolerance: 0.15 }),
    ),
    (
        IdleStaminaBias::High,
        Some(StaminaCurve { curve: favour_high_battery, midpoint: 0.65, tolerance: 0.15 }),
    ),
    (
        IdleStaminaBias::Centered,
        Some(StaminaCurve { curve: favour_centered_battery, midpoint: 0.5, tolerance: 0.2 }),
    ),
];

// ── Blend weights ─────────────────────────────────────────────────────────────

const IDLE_MOMENTUM_WEIGHT:    f32 = 0.55;
const IDLE_SOCIAL_WEIGHT:      f32 = 0.25;
const IDLE_SOCIAL_MIDPOINT:    f32 = 0.45;
const IDLE_SOCIAL_TOLERANCE:   f32 = 0.28;

const PHYSICAL_MOMENTUM_WEIGHT: f32 = 0.5;
const PHYSICAL_BASELINE:        f32 = 0.65;
const PHYSICAL_SLACK:           f32 = 0.22;

const SOCIAL_MOMENTUM_WEIGHT:  f32 = 0.4;
const SOCIAL_BASELINE:         f32 = 0.45;
const SOCIAL_SLACK:            f32 = 0.25;

const SPECIAL_MOMENTUM_WEIGHT: f32 = 0.45;
const SPECIAL_BASELINE:        f32 = 0.6;
const SPECIAL_SLACK:           f32 = 0.25;

#[inline]
fn mix(scalar: f32, scalar_weight: f32, term: f32) -> f32 {
    scalar_weight * scalar + (1.0 - scalar_weight) * term
}

fn idle_quirk_blend(scalar: f32, energy: &EnergyProfile, spec: &BiasSpec) -> f32 {
    let base = match stamina_curve(spec.idle_stamina) {
        Some(curve) => mix(scalar, IDLE_MOMENTUM_WEIGHT, curve.eval(energy.stamina)),
        None        => scalar,
    };
    if !spec.social_idle {
        return base;
    }
    let social = favour_centered_battery(
        energy.social_charge,
        IDLE_SOCIAL_MIDPOINT,
        IDLE_SOCIAL_TOLERANCE,
    );
    mix(base, 1.0 - IDLE_SOCIAL_WEIGHT, social)
}

fn physical_blend(scalar: f32, energy: &EnergyProfile, _spec: &BiasSpec) -> f32 {
    let term = battery_bias(energy.stamina, PHYSICAL_BASELINE, PHYSICAL_SLACK);
    mix(scalar, PHYSICAL_MOMENTUM_WEIGHT, term)
}

fn social_blend(scalar: f32, energy: &EnergyProfile, _spec: &BiasSpec) -> f32 {
    let term = battery_bias(energy.social_charge, SOCIAL_BASELINE, SOCIAL_SLACK);
    mix(scalar, SOCIAL_MOMENTUM_WEIGHT, term)
}

fn special_blend(scalar: f32, energy: &EnergyProfile, _spec: &BiasSpec) -> f32 {
    let term = battery_bias(energy.mental_focus, SPECIAL_BASELINE, SPECIAL_SLACK);
    mix(scalar, SPECIAL_MOMENTUM_WEIGHT, term)
}

// ── Lookups ───────────────────────────────────────────────────────────────────

/// The blend row for `category`.
pub fn blend_for(category: Category) -> BlendFn {
    let row = &CATEGORY_TABLE[category.index()];
    debug_assert_eq!(row.category, category, "category table out of order");
    row.blend
}

/// The stamina curve for an idle stamina tag, if it has one.
pub fn stamina_curve(tag: IdleStaminaBias) -> Option<StaminaCurve> {
    IDLE_STAMINA_TABLE
        .iter()
        .find(|(t, _)| *t == tag)
        .and_then(|(_, curve)| *curve)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Bias from a full energy profile, clamped to `[0.05, 1.0]`.
pub fn profile_bias(energy: &EnergyProfile, spec: &BiasSpec) -> f32 {
    let scalar = scalar_bias(energy.momentum, spec.energy_range);
    clamp_bias(blend_for(spec.category)(scalar, energy, spec))
}

/// Bias from whichever energy reading the host supplied.
pub fn energy_bias(reading: &EnergyReading, spec: &BiasSpec) -> f32 {
    match reading {
        EnergyReading::Momentum(m) => clamp_bias(scalar_bias(*m, spec.energy_range)),
        EnergyReading::Profile(p)  => profile_bias(p, spec),
    }
}
