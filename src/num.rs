//! Wide integer arithmetic for the exact predicates.
//!
//! Coordinates are `i64`s bounded by [`MAX_COORD`], so differences fit in 63
//! bits and products of two differences fit comfortably in an `i128`. Anything
//! that multiplies three coordinate-sized quantities together (intersection
//! points, mostly) can still overflow, and goes through the checked methods.

/// The largest coordinate magnitude we accept.
///
/// With this bound, a cross product of two coordinate differences (and the sum
/// of two of them) can't overflow an `i128`.
pub const MAX_COORD: i64 = i64::MAX >> 2;

/// An `i128` that only supports the operations the predicates need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wide(i128);

impl std::ops::Add<Wide> for Wide {
    type Output = Self;

    fn add(self, rhs: Wide) -> Self::Output {
        Wide(self.0 + rhs.0)
    }
}

impl std::ops::Sub<Wide> for Wide {
    type Output = Self;

    fn sub(self, rhs: Wide) -> Self::Output {
        Wide(self.0 - rhs.0)
    }
}

impl std::ops::Mul<Wide> for Wide {
    type Output = Self;

    fn mul(self, rhs: Wide) -> Self::Output {
        Wide(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Wide {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Wide(-self.0)
    }
}

impl From<i64> for Wide {
    fn from(x: i64) -> Self {
        Wide(x.into())
    }
}

impl Wide {
    /// Zero.
    pub const ZERO: Wide = Wide(0);

    /// Retrieve the inner `i128`.
    pub fn into_inner(self) -> i128 {
        self.0
    }

    /// Multiplication that reports overflow instead of wrapping.
    pub fn checked_mul(self, rhs: Wide) -> Option<Wide> {
        self.0.checked_mul(rhs.0).map(Wide)
    }

    /// Addition that reports overflow instead of wrapping.
    pub fn checked_add(self, rhs: Wide) -> Option<Wide> {
        self.0.checked_add(rhs.0).map(Wide)
    }

    /// Divides, rounding to the nearest integer (and halves away from zero).
    ///
    /// Returns `None` if `rhs` is zero.
    pub fn div_round(self, rhs: Wide) -> Option<Wide> {
        if rhs.0 == 0 {
            return None;
        }
        let q = self.0 / rhs.0;
        let r = (self.0 % rhs.0).unsigned_abs();
        let d = rhs.0.unsigned_abs();
        if r >= d - r {
            let sign = if (self.0 < 0) == (rhs.0 < 0) { 1 } else { -1 };
            Some(Wide(q + sign))
        } else {
            Some(Wide(q))
        }
    }

    /// Converts back to an `i64`, if it fits in our coordinate range.
    pub fn to_coord(self) -> Option<i64> {
        i64::try_from(self.0)
            .ok()
            .filter(|c| c.unsigned_abs() <= MAX_COORD as u64)
    }

    /// Sign of the value: -1, 0 or 1.
    pub fn signum(self) -> i32 {
        self.0.signum() as i32
    }

    /// Is this exactly zero?
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The nearest `f64`.
    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }
}

/// Is this coordinate small enough for the exact predicates?
pub fn coord_in_range(c: i64) -> bool {
    c.unsigned_abs() <= MAX_COORD as u64
}

/// Rounds a float to the nearest coordinate (halves away from zero).
///
/// Returns `None` for non-finite values and for values outside of our
/// coordinate range.
pub fn round_coord(x: f64) -> Option<i64> {
    let r = x.round();
    if !r.is_finite() {
        return None;
    }
    // `as` saturates, and saturated values are out of range.
    let c = r as i64;
    coord_in_range(c).then_some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(Wide(7).div_round(Wide(2)), Some(Wide(4)));
        assert_eq!(Wide(-7).div_round(Wide(2)), Some(Wide(-4)));
        assert_eq!(Wide(7).div_round(Wide(-2)), Some(Wide(-4)));
        assert_eq!(Wide(5).div_round(Wide(3)), Some(Wide(2)));
        assert_eq!(Wide(4).div_round(Wide(3)), Some(Wide(1)));
        assert_eq!(Wide(-4).div_round(Wide(3)), Some(Wide(-1)));
        assert_eq!(Wide(1).div_round(Wide(0)), None);
    }

    #[test]
    fn coordinate_range() {
        assert!(coord_in_range(MAX_COORD));
        assert!(coord_in_range(-MAX_COORD));
        assert!(!coord_in_range(MAX_COORD + 1));
        assert!(!coord_in_range(i64::MIN));
        assert_eq!(round_coord(2.5), Some(3));
        assert_eq!(round_coord(-2.5), Some(-3));
        assert_eq!(round_coord(f64::NAN), None);
        assert_eq!(round_coord(1e300), None);
        assert_eq!(round_coord(MAX_COORD as f64 + 1e4), None);
        assert_eq!(Wide(i128::from(MAX_COORD) + 1).to_coord(), None);
    }
}
