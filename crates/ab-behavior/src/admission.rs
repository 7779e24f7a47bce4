//! Why an instance may not start, or must stop.

use ab_core::Tick;

use crate::ControlResources;

/// Result of [`BehaviorInstance::check_start`][crate::BehaviorInstance::check_start].
///
/// Gates are evaluated in declaration order; the first failing gate wins.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Admission {
    /// The instance is not `Inactive`.
    Busy,
    SurvivalCritical,
    Incapable,
    /// Another active instance has a strictly lower priority value.
    Outranked { by_priority: i32 },
    /// Another active instance holds an overlapping resource.
    ResourceBusy { held: ControlResources },
    CoolingDown { ready_at: Tick },
    /// Bias at or below the admission threshold.
    LowEnergy { bias: f32 },
    /// The definition's own predicate said no.
    Declined,
    Admitted,
}

impl Admission {
    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::Busy                => "busy",
            Admission::SurvivalCritical    => "survival_critical",
            Admission::Incapable           => "incapable",
            Admission::Outranked { .. }    => "outranked",
            Admission::ResourceBusy { .. } => "resource_busy",
            Admission::CoolingDown { .. }  => "cooling_down",
            Admission::LowEnergy { .. }    => "low_energy",
            Admission::Declined            => "declined",
            Admission::Admitted            => "admitted",
        }
    }
}

/// Why an active run ended.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StopReason {
    /// The instance was not running.
    Inactive,
    SurvivalCritical,
    Outranked,
    ResourceBusy,
    /// Past the committed duration with engagement below the boredom threshold.
    Bored,
    /// Past `hard_cap_multiplier × committed_duration`.
    HardCap,
    /// The definition's own continuation predicate said no.
    Finished,
    /// The host stopped the run directly.
    Interrupted,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Inactive         => "inactive",
            StopReason::SurvivalCritical => "survival_critical",
            StopReason::Outranked        => "outranked",
            StopReason::ResourceBusy     => "resource_busy",
            StopReason::Bored            => "bored",
            StopReason::HardCap          => "hard_cap",
            StopReason::Finished         => "finished",
            StopReason::Interrupted      => "interrupted",
        }
    }
}
