//! Homogeneous lift of weighted control data and quotient-rule projection.
//!
//! A rational entity with control points `P_i` and weights `w_i` is evaluated
//! as a polynomial entity over the lifted points `(w_i * P_i, w_i)`. Writing
//! the lifted curve as `(A(t), w(t))`, the rational curve is `C = A / w` and
//! its derivatives follow from differentiating `A = w * C`:
//!
//! * `C'  = (A'  - C w') / w`
//! * `C'' = (A'' - 2 C' w' - C w'') / w`
//!
//! Each order reuses the lower-order results, so the quotient rule is applied
//! once per derivative order rather than by differencing lower derivatives.

use std::ops::{Add, Mul, Sub};

use curvix_core::{CurvixError, Result};
use serde::{Deserialize, Serialize};

use crate::{ControlPoint, Point};

/// A lifted point `(w * P, w)` in `D + 1` dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homogeneous<const D: usize> {
    /// The weighted coordinates `w * P`
    pub point: Point<D>,
    /// The homogeneous coordinate `w`
    pub weight: f64,
}

impl<const D: usize> Homogeneous<D> {
    /// Build from already-weighted coordinates.
    pub fn new(point: Point<D>, weight: f64) -> Self {
        Self { point, weight }
    }

    /// Lift a Cartesian point with its weight.
    pub fn lift(point: &Point<D>, weight: f64) -> Self {
        Self {
            point: *point * weight,
            weight,
        }
    }

    /// Divide out the homogeneous coordinate.
    pub fn project(&self) -> Point<D> {
        self.point / self.weight
    }
}

impl<const D: usize> Add for Homogeneous<D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.point + rhs.point, self.weight + rhs.weight)
    }
}

impl<const D: usize> Sub for Homogeneous<D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.point - rhs.point, self.weight - rhs.weight)
    }
}

impl<const D: usize> Mul<f64> for Homogeneous<D> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.point * rhs, self.weight * rhs)
    }
}

impl<const D: usize> ControlPoint for Homogeneous<D> {
    fn zero() -> Self {
        Self::new(Point::<D>::zeros(), 0.0)
    }
}

/// Lift control points with their weights.
///
/// Fails if the lengths differ or any weight is not strictly positive.
pub fn lift_all<const D: usize>(
    points: &[Point<D>],
    weights: &[f64],
) -> Result<Vec<Homogeneous<D>>> {
    if points.len() != weights.len() {
        return Err(CurvixError::configuration(format!(
            "Weights and control points mismatch: {} weights for {} control points",
            weights.len(),
            points.len()
        )));
    }
    if let Some(w) = weights.iter().find(|&&w| w.is_nan() || w <= 0.0) {
        return Err(CurvixError::configuration(format!(
            "Weights must be positive, got {}",
            w
        )));
    }
    Ok(points
        .iter()
        .zip(weights)
        .map(|(p, &w)| Homogeneous::lift(p, w))
        .collect())
}

/// Split lifted points back into Cartesian control points and weights.
pub fn project_all<const D: usize>(lifted: &[Homogeneous<D>]) -> (Vec<Point<D>>, Vec<f64>) {
    lifted.iter().map(|h| (h.project(), h.weight)).unzip()
}

/// Rational position `A / w`.
pub fn dehomogenize<const D: usize>(p: &Homogeneous<D>) -> Point<D> {
    p.project()
}

/// Rational first derivative from the lifted position and first derivative.
pub fn dehomogenize_derivative<const D: usize>(
    p: &Homogeneous<D>,
    d1: &Homogeneous<D>,
) -> Point<D> {
    (d1.point - p.point * (d1.weight / p.weight)) / p.weight
}

/// Rational second derivative from the lifted position and first two derivatives.
pub fn dehomogenize_2nd_derivative<const D: usize>(
    p: &Homogeneous<D>,
    d1: &Homogeneous<D>,
    d2: &Homogeneous<D>,
) -> Point<D> {
    let c = p.project();
    let c1 = dehomogenize_derivative(p, d1);
    (d2.point - c1 * (2.0 * d1.weight) - c * d2.weight) / p.weight
}

/// Rational partials `(S_u, S_v)` of a lifted surface.
pub fn dehomogenize_partials<const D: usize>(
    s: &Homogeneous<D>,
    su: &Homogeneous<D>,
    sv: &Homogeneous<D>,
) -> (Point<D>, Point<D>) {
    (dehomogenize_derivative(s, su), dehomogenize_derivative(s, sv))
}

/// Rational second partials `[S_uu, S_uv, S_vv]` of a lifted surface.
pub fn dehomogenize_2nd_partials<const D: usize>(
    s: &Homogeneous<D>,
    su: &Homogeneous<D>,
    sv: &Homogeneous<D>,
    suu: &Homogeneous<D>,
    suv: &Homogeneous<D>,
    svv: &Homogeneous<D>,
) -> [Point<D>; 3] {
    let w = s.weight;
    let c = s.project();
    let (cu, cv) = dehomogenize_partials(s, su, sv);

    let cuu = (suu.point - cu * (2.0 * su.weight) - c * suu.weight) / w;
    let cvv = (svv.point - cv * (2.0 * sv.weight) - c * svv.weight) / w;
    let cuv = (suv.point - cu * sv.weight - cv * su.weight - c * suv.weight) / w;
    [cuu, cuv, cvv]
}
