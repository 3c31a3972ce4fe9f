//! Surface traits and implementations.

mod any;
mod bezier;
mod bspline;
mod nurbs;

pub mod inversion;

use curvix_core::{CurvixError, Result, Tolerance};
use curvix_math::{Point, Point3};

use crate::curve::check_parameter;

pub use any::AnyPatch;
pub use bezier::BezierSurface;
pub use bspline::BSplineSurface;
pub use nurbs::NurbsSurface;

/// Evaluation contract for tensor-product surfaces in `D`-dimensional space.
pub trait Surface<const D: usize> {
    /// Evaluate the surface at parameters `(u, v)`.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point<D>>;

    /// Partial derivative `S_u` at `(u, v)`.
    fn evaluate_derivative_u(&self, u: f64, v: f64) -> Result<Point<D>>;

    /// Partial derivative `S_v` at `(u, v)`.
    fn evaluate_derivative_v(&self, u: f64, v: f64) -> Result<Point<D>>;

    /// Second partials `[S_uu, S_uv, S_vv]` at `(u, v)`.
    fn evaluate_2nd_derivatives(&self, u: f64, v: f64) -> Result<[Point<D>; 3]>;

    /// Return the u-parameter domain `(u_min, u_max)`.
    fn domain_u(&self) -> (f64, f64);

    /// Return the v-parameter domain `(v_min, v_max)`.
    fn domain_v(&self) -> (f64, f64);

    fn degree_u(&self) -> usize;

    fn degree_v(&self) -> usize;

    fn tolerance(&self) -> Tolerance {
        Tolerance::default()
    }

    fn in_domain(&self, u: f64, v: f64) -> bool {
        let tol = self.tolerance();
        let (u_min, u_max) = self.domain_u();
        let (v_min, v_max) = self.domain_v();
        tol.in_interval(u, u_min, u_max) && tol.in_interval(v, v_min, v_max)
    }

    /// Reject parameters outside the domain, otherwise snap them onto it.
    fn check_domain(&self, u: f64, v: f64) -> Result<(f64, f64)> {
        let tol = self.tolerance();
        let (u_min, u_max) = self.domain_u();
        let (v_min, v_max) = self.domain_v();
        Ok((
            check_parameter(tol, u, u_min, u_max)?,
            check_parameter(tol, v, v_min, v_max)?,
        ))
    }

    /// Unit normal `S_u x S_v`, or `+Z` where the partials are parallel.
    fn evaluate_normal(&self, u: f64, v: f64) -> Result<Point3> {
        if D != 3 {
            return Err(CurvixError::Dimensionality {
                expected: 3,
                actual: D,
            });
        }
        let su = self.evaluate_derivative_u(u, v)?;
        let sv = self.evaluate_derivative_v(u, v)?;
        let su = Point3::new(su[0], su[1], su[2]);
        let sv = Point3::new(sv[0], sv[1], sv[2]);

        let n = su.cross(&sv);
        let len = n.norm();
        if self.tolerance().is_degenerate(len) {
            return Ok(Point3::z());
        }
        Ok(n / len)
    }

    /// Samples per level of the inversion search along u.
    fn inversion_samples_u(&self) -> usize {
        2 * (self.degree_u() + 1)
    }

    /// Samples per level of the inversion search along v.
    fn inversion_samples_v(&self) -> usize {
        2 * (self.degree_v() + 1)
    }

    /// Parameters in the given box whose point is closest to `point`.
    ///
    /// The box is intersected with the domain before searching.
    fn approximate_inverse_evaluate(
        &self,
        point: &Point<D>,
        u_lower: f64,
        u_upper: f64,
        v_lower: f64,
        v_upper: f64,
        level: u32,
    ) -> Result<(f64, f64)> {
        let (u_lower, u_upper) = clamp_bracket(u_lower, u_upper, self.domain_u());
        let (v_lower, v_upper) = clamp_bracket(v_lower, v_upper, self.domain_v());
        inversion::approximate_inverse_evaluate(
            self,
            point,
            (self.inversion_samples_u(), self.inversion_samples_v()),
            (u_lower, u_upper),
            (v_lower, v_upper),
            level,
        )
    }

    /// Closest-point parameters over the whole domain at the default level.
    fn inverse_evaluate(&self, point: &Point<D>) -> Result<(f64, f64)> {
        let (u_min, u_max) = self.domain_u();
        let (v_min, v_max) = self.domain_v();
        self.approximate_inverse_evaluate(
            point,
            u_min,
            u_max,
            v_min,
            v_max,
            Tolerance::DEFAULT_INVERSION_LEVEL,
        )
    }
}

fn clamp_bracket(lower: f64, upper: f64, (min, max): (f64, f64)) -> (f64, f64) {
    let a = lower.max(min).min(max);
    let b = upper.max(min).min(max);
    (a.min(b), a.max(b))
}
