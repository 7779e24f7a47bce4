//! Capability requirements: the hard gate in front of the energy bias.

use std::fmt;
use std::sync::Arc;

use ab_agent::{CapabilityProfile, Medium};

/// Extra, definition-specific capability test.
pub type CapabilityPredicate = Arc<dyn Fn(&CapabilityProfile) -> bool + Send + Sync>;

/// A predicate over [`CapabilityProfile`].
///
/// Each `true` flag demands the matching capability; `false` flags are
/// ignored.  An optional medium and custom predicate are checked last.
/// `CapabilityRequirement::default()` accepts every agent.
#[derive(Clone, Default)]
pub struct CapabilityRequirement {
    pub fly:         bool,
    pub swim:        bool,
    pub jump:        bool,
    pub sit:         bool,
    pub carry_items: bool,
    pub owner:       bool,
    pub medium:      Option<Medium>,
    custom:          Option<CapabilityPredicate>,
}

impl CapabilityRequirement {
    /// Accepts every agent.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn flying(mut self) -> Self {
        self.fly = true;
        self
    }

    pub fn swimming(mut self) -> Self {
        self.swim = true;
        self
    }

    pub fn jumping(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn sitting(mut self) -> Self {
        self.sit = true;
        self
    }

    pub fn carrying(mut self) -> Self {
        self.carry_items = true;
        self
    }

    pub fn owned(mut self) -> Self {
        self.owner = true;
        self
    }

    /// Require the agent's preferred medium to be `medium`.
    pub fn in_medium(mut self, medium: Medium) -> Self {
        self.medium = Some(medium);
        self
    }

    /// Add a custom predicate, evaluated after the flag checks.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CapabilityProfile) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(predicate));
        self
    }

    /// `true` if `profile` satisfies every declared demand.
    pub fn test(&self, profile: &CapabilityProfile) -> bool {
        let flags_ok = (!self.fly || profile.can_fly)
            && (!self.swim || profile.can_swim)
            && (!self.jump || profile.can_jump)
            && (!self.sit || profile.can_sit)
            && (!self.carry_items || profile.can_carry_items)
            && (!self.owner || profile.has_owner);
        if !flags_ok {
            return false;
        }
        if let Some(medium) = self.medium {
            if profile.preferred_medium != medium {
                return false;
            }
        }
        self.custom.as_ref().is_none_or(|f| f(profile))
    }
}

impl fmt::Debug for CapabilityRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRequirement")
            .field("fly", &self.fly)
            .field("swim", &self.swim)
            .field("jump", &self.jump)
            .field("sit", &self.sit)
            .field("carry_items", &self.carry_items)
            .field("owner", &self.owner)
            .field("medium", &self.medium)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
