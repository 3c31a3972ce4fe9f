//! Curve traits and implementations.

mod any;
mod bezier;
mod bspline;
mod nurbs;
mod rational_bezier;

pub mod differential;
pub mod inversion;

use curvix_core::{CurvixError, Result, Tolerance};
use curvix_math::Point;

pub use any::AnyCurve;
pub use bezier::BezierCurve;
pub use bspline::BSplineCurve;
pub use nurbs::NurbsCurve;
pub use rational_bezier::RationalBezierCurve;

/// Evaluation contract shared by every curve variant in `D`-dimensional space.
///
/// Queries take `&self` and never mutate, so an initialized curve can be
/// shared across threads for evaluation and inversion.
pub trait Curve<const D: usize> {
    /// Evaluate the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Result<Point<D>>;

    /// Evaluate the first derivative at parameter `t`.
    fn evaluate_derivative(&self, t: f64) -> Result<Point<D>>;

    /// Evaluate the second derivative at parameter `t`.
    fn evaluate_2nd_derivative(&self, t: f64) -> Result<Point<D>>;

    fn get_domain_lower_bound(&self) -> f64;

    fn get_domain_upper_bound(&self) -> f64;

    fn degree(&self) -> usize;

    fn tolerance(&self) -> Tolerance {
        Tolerance::default()
    }

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64) {
        (self.get_domain_lower_bound(), self.get_domain_upper_bound())
    }

    fn in_domain(&self, t: f64) -> bool {
        let (lower, upper) = self.domain();
        self.tolerance().in_interval(t, lower, upper)
    }

    /// Reject `t` outside the domain, otherwise snap it onto `[lower, upper]`.
    fn check_domain(&self, t: f64) -> Result<f64> {
        let (lower, upper) = self.domain();
        check_parameter(self.tolerance(), t, lower, upper)
    }

    /// Whether splitting at `t` yields two non-empty pieces.
    fn is_split_point_valid(&self, t: f64) -> Result<bool> {
        self.check_domain(t)?;
        let (lower, upper) = self.domain();
        Ok(t != lower && t != upper)
    }

    /// Number of uniform samples per level of the inversion search.
    fn inversion_samples(&self) -> usize {
        2 * (self.degree() + 1)
    }

    /// Parameter in `[lower, upper]` whose point is closest to `point`.
    ///
    /// The bracket is intersected with the curve domain first, so the search
    /// never leaves the domain.
    fn approximate_inverse_evaluate(
        &self,
        point: &Point<D>,
        lower: f64,
        upper: f64,
        level: u32,
    ) -> Result<f64> {
        let (t_min, t_max) = self.domain();
        let a = lower.max(t_min).min(t_max);
        let b = upper.max(t_min).min(t_max);
        inversion::approximate_inverse_evaluate(
            self,
            point,
            self.inversion_samples(),
            a.min(b),
            a.max(b),
            level,
        )
    }

    /// Closest-point parameter over the whole domain at the default level.
    fn inverse_evaluate(&self, point: &Point<D>) -> Result<f64> {
        let (lower, upper) = self.domain();
        self.approximate_inverse_evaluate(point, lower, upper, Tolerance::DEFAULT_INVERSION_LEVEL)
    }

    /// Curvature vector at `t`; zero at stationary points.
    fn evaluate_curvature(&self, t: f64) -> Result<Point<D>> {
        let d1 = self.evaluate_derivative(t)?;
        let d2 = self.evaluate_2nd_derivative(t)?;
        Ok(differential::curvature(&d1, &d2))
    }

    /// Signed angle from the tangent at `t0` to the tangent at `t1` (planar curves only).
    fn get_turning_angle(&self, t0: f64, t1: f64) -> Result<f64> {
        differential::turning_angle(self, t0, t1)
    }

    /// Parameters in `(lower, upper)` where the curvature changes sign.
    fn compute_inflections(&self, _lower: f64, _upper: f64) -> Result<Vec<f64>> {
        Err(CurvixError::unsupported(
            "Inflection computation is not supported for this curve type",
        ))
    }

    /// Split parameters bounding the turning angle of each piece.
    fn reduce_turning_angle(&self, _lower: f64, _upper: f64) -> Result<Vec<f64>> {
        Err(CurvixError::unsupported(
            "Turning angle reduction is not supported for this curve type",
        ))
    }

    /// Parameters where the first derivative vanishes.
    fn compute_singularities(&self, _lower: f64, _upper: f64) -> Result<Vec<f64>> {
        Err(CurvixError::unsupported(
            "Singularity computation is not supported for this curve type",
        ))
    }
}

/// Reject `t` outside `[lower, upper]` widened by the parameter slack,
/// otherwise snap it onto the interval.
pub(crate) fn check_parameter(tol: Tolerance, t: f64, lower: f64, upper: f64) -> Result<f64> {
    if !tol.in_interval(t, lower, upper) {
        return Err(CurvixError::Domain { t, lower, upper });
    }
    Ok(t.max(lower).min(upper))
}
