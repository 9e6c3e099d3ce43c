use std::ops::{Add, Div, Mul, Sub};

/// 2D point / vector in normalized image space.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Value type a filter can operate on: scalars or 2D vectors.
pub trait Signal:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    fn zero() -> Self;

    /// Infinity carrying the sign of each component.
    fn saturated(self) -> Self;
}

impl Signal for f64 {
    fn zero() -> Self {
        0.0
    }

    fn saturated(self) -> Self {
        f64::INFINITY.copysign(self)
    }
}

impl Signal for Vec2 {
    fn zero() -> Self {
        Vec2::zeros()
    }

    fn saturated(self) -> Self {
        self.map(|v| f64::INFINITY.copysign(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturated_sign() {
        assert_eq!(2.0_f64.saturated(), f64::INFINITY);
        assert_eq!((-0.5_f64).saturated(), f64::NEG_INFINITY);

        let v = Vec2::new(1.0, -1.0).saturated();
        assert_eq!(v.x, f64::INFINITY);
        assert_eq!(v.y, f64::NEG_INFINITY);
    }
}
