//! Basis points (1/100 of a percent).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{TypeError, Weight};

/// 100% expressed in basis points.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// A fraction on the 0..=10000 scale.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct BasisPoints(u32);

impl BasisPoints {
    pub const MAX: Self = Self(BPS_DENOMINATOR);

    pub fn new(raw: u32) -> Result<Self, TypeError> {
        if raw > BPS_DENOMINATOR {
            return Err(TypeError::BasisPointsOutOfRange(raw));
        }
        Ok(Self(raw))
    }

    /// Build from `raw`, clamping anything above 10000 to 10000.
    pub const fn saturating(raw: u32) -> Self {
        if raw > BPS_DENOMINATOR {
            Self(BPS_DENOMINATOR)
        } else {
            Self(raw)
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// `part * 10000 / whole`, truncated toward zero.
    ///
    /// The result is not clamped: a part larger than the whole yields more
    /// than 10000. Returns `None` when `whole` is zero or the product overflows.
    pub fn ratio_floor(part: Weight, whole: Weight) -> Option<u128> {
        if whole.is_zero() {
            return None;
        }
        part.raw()
            .checked_mul(BPS_DENOMINATOR as u128)
            .map(|scaled| scaled / whole.raw())
    }
}

impl TryFrom<u32> for BasisPoints {
    type Error = TypeError;
    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<BasisPoints> for u32 {
    fn from(bps: BasisPoints) -> Self {
        bps.0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
