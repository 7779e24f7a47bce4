//! Definition-side inputs to the bias functions.

use std::fmt;

/// Broad behavior family.  Selects which energy sub-dimension matters.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    IdleQuirk,
    Wander,
    Play,
    Social,
    Special,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::IdleQuirk,
        Category::Wander,
        Category::Play,
        Category::Social,
        Category::Special,
    ];

    /// Position in [`Category::ALL`] and in the category lookup table.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Category::IdleQuirk => 0,
            Category::Wander    => 1,
            Category::Play      => 2,
            Category::Social    => 3,
            Category::Special   => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::IdleQuirk => "idle_quirk",
            Category::Wander    => "wander",
            Category::Play      => "play",
            Category::Social    => "social",
            Category::Special   => "special",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stamina curve an idle quirk prefers.  Ignored for other categories.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdleStaminaBias {
    #[default]
    None,
    Centered,
    Low,
    High,
}

/// Momentum bounds in which a definition feels natural.
///
/// Invariant: `0 ≤ low ≤ high ≤ 1`.  Construct through [`EnergyRange::new`],
/// which rejects anything else.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyRange {
    low:  f32,
    high: f32,
}

impl EnergyRange {
    /// The whole `[0, 1]` span; the default when a definition declares none.
    pub const FULL: EnergyRange = EnergyRange { low: 0.0, high: 1.0 };

    /// `None` unless `0 ≤ low ≤ high ≤ 1` (NaN is rejected too).
    pub fn new(low: f32, high: f32) -> Option<Self> {
        let ordered = low <= high;
        let in_unit = (0.0..=1.0).contains(&low) && (0.0..=1.0).contains(&high);
        (ordered && in_unit).then_some(Self { low, high })
    }

    #[inline]
    pub fn low(&self) -> f32 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> f32 {
        self.high
    }

    #[inline]
    pub fn center(&self) -> f32 {
        (self.low + self.high) * 0.5
    }

    #[inline]
    pub fn contains(&self, momentum: f32) -> bool {
        (self.low..=self.high).contains(&momentum)
    }
}

impl Default for EnergyRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Everything the bias functions need to know about a definition.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BiasSpec {
    pub category:     Category,
    pub energy_range: EnergyRange,
    pub idle_stamina: IdleStaminaBias,
    pub social_idle:  bool,
}

impl BiasSpec {
    /// A spec with the full energy range and no idle modifiers.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            energy_range: EnergyRange::FULL,
            idle_stamina: IdleStaminaBias::None,
            social_idle:  false,
        }
    }

    pub fn with_range(mut self, range: EnergyRange) -> Self {
        self.energy_range = range;
        self
    }

    pub fn with_idle_stamina(mut self, bias: IdleStaminaBias) -> Self {
        self.idle_stamina = bias;
        self
    }

    pub fn with_social_idle(mut self, social: bool) -> Self {
        self.social_idle = social;
        self
    }
}
