//! Vector-space algebra required by the basis evaluators.

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

use nalgebra::SVector;

/// Anything a polynomial basis can blend: closed under addition and scaling.
///
/// Implemented by plain points and by [`Homogeneous`](crate::Homogeneous)
/// points, so the same Bernstein/B-spline evaluator runs in `D` or in the
/// lifted `D + 1` space.
pub trait ControlPoint:
    Copy + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self>
{
    fn zero() -> Self;
}

impl<const D: usize> ControlPoint for SVector<f64, D> {
    fn zero() -> Self {
        Self::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point2;

    fn midpoint<P: ControlPoint>(a: P, b: P) -> P {
        a + (b - a) * 0.5
    }

    #[test]
    fn test_point_blend() {
        let m = midpoint(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0));
        assert_eq!(m, Point2::new(1.0, 2.0));
        assert_eq!(<Point2 as ControlPoint>::zero(), Point2::zeros());
    }
}
