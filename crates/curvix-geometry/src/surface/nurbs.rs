//! NURBS surfaces (rational B-spline surfaces).

use curvix_core::{CurvixError, Result};
use curvix_math::homogeneous::{
    dehomogenize, dehomogenize_2nd_partials, dehomogenize_partials, lift_all,
};
use curvix_math::{Homogeneous, Point};
use serde::{Deserialize, Serialize};

use super::{BSplineSurface, Surface};
use crate::basis::{knot_domain, num_spans};
use crate::curve::NurbsCurve;

/// A B-spline surface with one positive weight per grid point.
///
/// Weights follow the u-major layout of the control grid. Queries and
/// iso-curve extraction need [`initialize`](Self::initialize) first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsSurface<const D: usize> {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
    control_points: Vec<Point<D>>,
    weights: Vec<f64>,
    #[serde(skip)]
    homogeneous: Option<BSplineSurface<Homogeneous<D>>>,
}

impl<const D: usize> NurbsSurface<D> {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        control_points: Vec<Point<D>>,
        weights: Vec<f64>,
    ) -> Self {
        Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
            weights,
            homogeneous: None,
        }
    }

    pub fn try_new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        control_points: Vec<Point<D>>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let mut surface = Self::new(degree_u, degree_v, knots_u, knots_v, control_points, weights);
        surface.initialize()?;
        Ok(surface)
    }

    pub fn knots_u(&self) -> &[f64] {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &[f64] {
        &self.knots_v
    }

    pub fn control_points(&self) -> &[Point<D>] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn set_knots(&mut self, knots_u: Vec<f64>, knots_v: Vec<f64>) {
        self.knots_u = knots_u;
        self.knots_v = knots_v;
        self.homogeneous = None;
    }

    pub fn set_control_points(&mut self, control_points: Vec<Point<D>>) {
        self.control_points = control_points;
        self.homogeneous = None;
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) {
        self.weights = weights;
        self.homogeneous = None;
    }

    /// Check weights against the grid and build the lifted B-spline surface.
    pub fn initialize(&mut self) -> Result<()> {
        let lifted = lift_all(&self.control_points, &self.weights)?;
        let surface = BSplineSurface::try_new(
            self.degree_u,
            self.degree_v,
            self.knots_u.clone(),
            self.knots_v.clone(),
            lifted,
        )?;
        self.homogeneous = Some(surface);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.homogeneous.is_some()
    }

    pub fn homogeneous(&self) -> Result<&BSplineSurface<Homogeneous<D>>> {
        self.homogeneous
            .as_ref()
            .ok_or_else(|| CurvixError::configuration("NURBS surface is not initialized"))
    }

    /// The rational curve running along u at fixed `v`.
    pub fn compute_iso_curve_u(&self, v: f64) -> Result<NurbsCurve<D>> {
        NurbsCurve::from_homogeneous(self.homogeneous()?.compute_iso_curve_u(v)?)
    }

    /// The rational curve running along v at fixed `u`.
    pub fn compute_iso_curve_v(&self, u: f64) -> Result<NurbsCurve<D>> {
        NurbsCurve::from_homogeneous(self.homogeneous()?.compute_iso_curve_v(u)?)
    }
}

impl<const D: usize> Surface<D> for NurbsSurface<D> {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point<D>> {
        let lifted = self.homogeneous()?;
        let (u, v) = self.check_domain(u, v)?;
        Ok(dehomogenize(&lifted.derivatives_at(u, v, 0)?[0][0]))
    }

    fn evaluate_derivative_u(&self, u: f64, v: f64) -> Result<Point<D>> {
        let lifted = self.homogeneous()?;
        let (u, v) = self.check_domain(u, v)?;
        let skl = lifted.derivatives_at(u, v, 1)?;
        Ok(dehomogenize_partials(&skl[0][0], &skl[1][0], &skl[0][1]).0)
    }

    fn evaluate_derivative_v(&self, u: f64, v: f64) -> Result<Point<D>> {
        let lifted = self.homogeneous()?;
        let (u, v) = self.check_domain(u, v)?;
        let skl = lifted.derivatives_at(u, v, 1)?;
        Ok(dehomogenize_partials(&skl[0][0], &skl[1][0], &skl[0][1]).1)
    }

    fn evaluate_2nd_derivatives(&self, u: f64, v: f64) -> Result<[Point<D>; 3]> {
        let lifted = self.homogeneous()?;
        let (u, v) = self.check_domain(u, v)?;
        let skl = lifted.derivatives_at(u, v, 2)?;
        Ok(dehomogenize_2nd_partials(
            &skl[0][0], &skl[1][0], &skl[0][1], &skl[2][0], &skl[1][1], &skl[0][2],
        ))
    }

    fn domain_u(&self) -> (f64, f64) {
        knot_domain(self.degree_u, &self.knots_u)
    }

    fn domain_v(&self) -> (f64, f64) {
        knot_domain(self.degree_v, &self.knots_v)
    }

    fn degree_u(&self) -> usize {
        self.degree_u
    }

    fn degree_v(&self) -> usize {
        self.degree_v
    }

    fn inversion_samples_u(&self) -> usize {
        2 * (self.degree_u + 1) * num_spans(self.degree_u, &self.knots_u).max(1)
    }

    fn inversion_samples_v(&self) -> usize {
        2 * (self.degree_v + 1) * num_spans(self.degree_v, &self.knots_v).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use approx::assert_relative_eq;
    use curvix_math::Point3;
    use std::f64::consts::FRAC_1_SQRT_2;

    /// Quarter cylinder of radius 2 around the z axis: the arc runs along u,
    /// the axis along v.
    fn quarter_cylinder() -> NurbsSurface<3> {
        let arc = [(2.0, 0.0, 1.0), (2.0, 2.0, FRAC_1_SQRT_2), (0.0, 2.0, 1.0)];
        let mut grid = Vec::new();
        let mut weights = Vec::new();
        for &(x, y, w) in &arc {
            for z in [0.0, 3.0] {
                grid.push(Point3::new(x, y, z));
                weights.push(w);
            }
        }
        NurbsSurface::try_new(
            2,
            1,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            grid,
            weights,
        )
        .unwrap()
    }

    #[test]
    fn test_cylinder_points_on_radius() {
        let s = quarter_cylinder();
        for i in 0..=8 {
            for j in 0..=4 {
                let (u, v) = (i as f64 / 8.0, j as f64 / 4.0);
                let p = s.evaluate(u, v).unwrap();
                assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 2.0, epsilon = 1e-12);
                assert_relative_eq!(p.z, 3.0 * v, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cylinder_normal_is_radial() {
        let s = quarter_cylinder();
        let p = s.evaluate(0.4, 0.5).unwrap();
        let n = s.evaluate_normal(0.4, 0.5).unwrap();
        let radial = Point3::new(p.x, p.y, 0.0).normalize();
        assert_relative_eq!(n.dot(&radial).abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_second_partials_along_arc() {
        let s = quarter_cylinder();
        let (u, v) = (0.3, 0.6);
        let [suu, suv, svv] = s.evaluate_2nd_derivatives(u, v).unwrap();
        // Arc curvature in u is 1/r; v is a straight ruling
        let su = s.evaluate_derivative_u(u, v).unwrap();
        let k = (suu - su * (su.dot(&suu) / su.norm_squared())) / su.norm_squared();
        assert_relative_eq!(k.norm(), 0.5, epsilon = 1e-10);
        assert_relative_eq!(suv, Point3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(svv, Point3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_iso_curves_agree_with_surface() {
        let s = quarter_cylinder();
        let along_u = s.compute_iso_curve_u(0.6).unwrap();
        let along_v = s.compute_iso_curve_v(0.35).unwrap();
        for &t in &[0.0, 0.2, 0.5, 0.75, 1.0] {
            assert_relative_eq!(along_u.evaluate(t).unwrap(), s.evaluate(t, 0.6).unwrap(), epsilon = 1e-12);
            assert_relative_eq!(along_v.evaluate(t).unwrap(), s.evaluate(0.35, t).unwrap(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_query_before_initialize() {
        let s = quarter_cylinder();
        let mut fresh = NurbsSurface::new(
            2,
            1,
            s.knots_u().to_vec(),
            s.knots_v().to_vec(),
            s.control_points().to_vec(),
            s.weights().to_vec(),
        );
        assert!(matches!(
            fresh.evaluate(0.5, 0.5).unwrap_err(),
            CurvixError::Configuration(_)
        ));
        assert!(fresh.compute_iso_curve_u(0.5).is_err());

        fresh.initialize().unwrap();
        assert_relative_eq!(fresh.evaluate(0.5, 0.5).unwrap(), s.evaluate(0.5, 0.5).unwrap());
    }

    #[test]
    fn test_initialize_rejects_weight_count() {
        let s = quarter_cylinder();
        let mut broken = s.clone();
        broken.set_weights(vec![1.0; 5]);
        assert!(broken.initialize().is_err());
        assert!(!broken.is_initialized());
    }

    #[test]
    fn test_inversion_round_trip() {
        let s = quarter_cylinder();
        let p = s.evaluate(0.45, 0.3).unwrap();
        let (u, v) = s.inverse_evaluate(&p).unwrap();
        assert_relative_eq!(u, 0.45, epsilon = 1e-7);
        assert_relative_eq!(v, 0.3, epsilon = 1e-7);
    }
}
