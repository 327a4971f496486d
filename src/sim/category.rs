//! Category bitmasks for contact filtering
//!
//! Every physics body carries three masks:
//! - category: what the body is
//! - notify: which categories should raise a contact when overlapping
//! - collide: which categories should physically obstruct (always `NONE` here)

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use serde::{Deserialize, Serialize};

/// A set of category bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMask(u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const MONSTER: Self = Self(0b1);
    pub const PROJECTILE: Self = Self(0b10);
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit is shared
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set in `self`
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CategoryMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CategoryMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for CategoryMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Masks attached to a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFilter {
    pub category: CategoryMask,
    pub notify: CategoryMask,
    pub collide: CategoryMask,
}

impl ContactFilter {
    /// Monsters report projectiles and never obstruct
    pub const MONSTER: Self = Self {
        category: CategoryMask::MONSTER,
        notify: CategoryMask::PROJECTILE,
        collide: CategoryMask::NONE,
    };

    /// Projectiles report monsters and never obstruct
    pub const PROJECTILE: Self = Self {
        category: CategoryMask::PROJECTILE,
        notify: CategoryMask::MONSTER,
        collide: CategoryMask::NONE,
    };

    /// Whether an overlap between these two bodies raises a contact.
    ///
    /// Either side's notify mask naming the other's category is enough.
    pub fn should_notify(&self, other: &ContactFilter) -> bool {
        self.notify.intersects(other.category) || other.notify.intersects(self.category)
    }
}
