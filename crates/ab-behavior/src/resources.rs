//! Control resources: the actuators a running behavior takes exclusive hold of.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of mutually-exclusive actuator categories.
///
/// At most one active instance per agent may hold any given resource.  Stored
/// as a bitmask so overlap checks are a single `&`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlResources(u8);

impl ControlResources {
    pub const NONE:   ControlResources = ControlResources(0);
    pub const MOVE:   ControlResources = ControlResources(1 << 0);
    pub const LOOK:   ControlResources = ControlResources(1 << 1);
    pub const TARGET: ControlResources = ControlResources(1 << 2);
    pub const JUMP:   ControlResources = ControlResources(1 << 3);

    const NAMED: [(ControlResources, &'static str); 4] = [
        (Self::MOVE, "move"),
        (Self::LOOK, "look"),
        (Self::TARGET, "target"),
        (Self::JUMP, "jump"),
    ];

    #[inline]
    pub const fn union(self, other: ControlResources) -> ControlResources {
        ControlResources(self.0 | other.0)
    }

    #[inline]
    pub const fn overlaps(self, other: ControlResources) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn contains(self, other: ControlResources) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Names of the held resources in declaration order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for ControlResources {
    type Output = ControlResources;

    #[inline]
    fn bitor(self, rhs: ControlResources) -> ControlResources {
        self.union(rhs)
    }
}

impl BitOrAssign for ControlResources {
    #[inline]
    fn bitor_assign(&mut self, rhs: ControlResources) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for ControlResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ControlResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlResources({self})")
    }
}
