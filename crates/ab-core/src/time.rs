//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter advanced once per host
//! simulation step.  Every duration in the scheduler (commitment windows,
//! cooldowns, mood pulse windows) is an integer tick count, so arithmetic is
//! exact and comparisons are O(1).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.saturating_since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// The host's tick counter.
///
/// `TickClock` is cheap to copy and holds no heap data.  The reference
/// driver in `ab-sched` advances it once per `step`.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    current: Tick,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock resuming at `tick` (e.g. after the host restores a save).
    pub fn starting_at(tick: Tick) -> Self {
        Self { current: tick }
    }

    #[inline]
    pub fn current(&self) -> Tick {
        self.current
    }

    /// Advance the clock by one tick and return the new current tick.
    #[inline]
    pub fn advance(&mut self) -> Tick {
        self.current = self.current.offset(1);
        self.current
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock@{}", self.current)
    }
}
