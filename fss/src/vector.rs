//! Positional touch bit-sets.
//!
//! Bit `i` of a [`TouchVector`] corresponds to the sensor with index `i` in the
//! enumeration order produced by [`crate::codec::collect`].

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};

/// Maximum number of sensors a [`TouchVector`] can represent
pub const CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchVector(pub u64);

impl TouchVector {
    pub const EMPTY: Self = Self(0);

    /// A mask with the lowest `n` bits set. Saturates at [`CAPACITY`].
    pub const fn low_bits(n: usize) -> Self {
        if n >= CAPACITY {
            Self(u64::MAX)
        } else {
            Self((1u64 << n) - 1)
        }
    }

    pub const fn bit(&self, index: usize) -> bool {
        index < CAPACITY && (self.0 >> index) & 1 != 0
    }

    /// Return a copy with bit `index` set. Indices past [`CAPACITY`] are ignored.
    pub const fn with(self, index: usize) -> Self {
        if index < CAPACITY {
            Self(self.0 | (1 << index))
        } else {
            self
        }
    }

    /// The lowest set bit, alone, or empty if no bit is set
    pub const fn lowest(&self) -> Self {
        Self(self.0 & self.0.wrapping_neg())
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Index of the highest set bit
    pub const fn highest_index(&self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(CAPACITY - 1 - self.0.leading_zeros() as usize)
        }
    }
}

impl BitAnd for TouchVector {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for TouchVector {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for TouchVector {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Display for TouchVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

/// Selects which sensor indices take part in flank arbitration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnableMask {
    /// Every enumerated sensor is in the group
    All,
    /// Only the given indices are in the group; the rest pass through
    Custom(TouchVector),
}

impl EnableMask {
    /// The effective mask for a cycle with `sensors` enumerated sensors
    pub const fn resolve(&self, sensors: usize) -> TouchVector {
        match self {
            Self::All => TouchVector::low_bits(sensors),
            Self::Custom(mask) => *mask,
        }
    }
}
