//! Non-rational B-spline surfaces.

use curvix_core::{CurvixError, Result, Validate};
use curvix_math::{ControlPoint, Point};
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::basis::{deboor, knot_domain, num_spans, validate_knots};
use crate::curve::{check_parameter, BSplineCurve};

/// A B-spline surface defined by degrees, knot vectors, and a grid of control points.
///
/// The grid is flat and u-major: `control_points[i * num_v + j]` is the
/// control point at u-index `i` and v-index `j`, where `num_u` and `num_v`
/// follow from the knot vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSplineSurface<P> {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
    control_points: Vec<P>,
}

impl<P: ControlPoint> BSplineSurface<P> {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        control_points: Vec<P>,
    ) -> Self {
        Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
        }
    }

    pub fn try_new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        control_points: Vec<P>,
    ) -> Result<Self> {
        let surface = Self::new(degree_u, degree_v, knots_u, knots_v, control_points);
        surface.validate()?;
        Ok(surface)
    }

    pub fn degree_u(&self) -> usize {
        self.degree_u
    }

    pub fn degree_v(&self) -> usize {
        self.degree_v
    }

    pub fn knots_u(&self) -> &[f64] {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &[f64] {
        &self.knots_v
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    pub fn set_knots(&mut self, knots_u: Vec<f64>, knots_v: Vec<f64>) {
        self.knots_u = knots_u;
        self.knots_v = knots_v;
    }

    pub fn set_control_points(&mut self, control_points: Vec<P>) {
        self.control_points = control_points;
    }

    /// Control points along u implied by `knots_u`.
    pub fn num_u(&self) -> usize {
        self.knots_u.len().saturating_sub(self.degree_u + 1)
    }

    /// Control points along v implied by `knots_v`.
    pub fn num_v(&self) -> usize {
        self.knots_v.len().saturating_sub(self.degree_v + 1)
    }

    pub fn knot_domain_u(&self) -> (f64, f64) {
        knot_domain(self.degree_u, &self.knots_u)
    }

    pub fn knot_domain_v(&self) -> (f64, f64) {
        knot_domain(self.degree_v, &self.knots_v)
    }

    /// `skl[k][l]` is `S^(k,l)` for `k + l <= order`, without domain checks.
    pub fn derivatives_at(&self, u: f64, v: f64, order: usize) -> Result<Vec<Vec<P>>> {
        self.validate()?;
        Ok(deboor::surface_derivatives(
            self.degree_u,
            self.degree_v,
            &self.knots_u,
            &self.knots_v,
            &self.control_points,
            self.num_v(),
            u,
            v,
            order,
        ))
    }

    /// The curve running along u at fixed `v`.
    pub fn compute_iso_curve_u(&self, v: f64) -> Result<BSplineCurve<P>> {
        self.validate()?;
        let (lower, upper) = self.knot_domain_v();
        let v = check_parameter(Default::default(), v, lower, upper)?;
        let points = deboor::iso_curve_u(
            self.degree_v,
            &self.knots_v,
            &self.control_points,
            self.num_v(),
            v,
        );
        Ok(BSplineCurve::new(self.degree_u, self.knots_u.clone(), points))
    }

    /// The curve running along v at fixed `u`.
    pub fn compute_iso_curve_v(&self, u: f64) -> Result<BSplineCurve<P>> {
        self.validate()?;
        let (lower, upper) = self.knot_domain_u();
        let u = check_parameter(Default::default(), u, lower, upper)?;
        let points = deboor::iso_curve_v(
            self.degree_u,
            &self.knots_u,
            &self.control_points,
            self.num_v(),
            u,
        );
        Ok(BSplineCurve::new(self.degree_v, self.knots_v.clone(), points))
    }
}

impl<P: ControlPoint> Validate for BSplineSurface<P> {
    fn validate(&self) -> Result<()> {
        let (num_u, num_v) = (self.num_u(), self.num_v());
        validate_knots(self.degree_u, num_u, &self.knots_u)?;
        validate_knots(self.degree_v, num_v, &self.knots_v)?;
        if self.control_points.len() != num_u * num_v {
            return Err(CurvixError::configuration(format!(
                "Control grid has {} points, knot vectors imply {} x {}",
                self.control_points.len(),
                num_u,
                num_v
            )));
        }
        Ok(())
    }
}

impl<const D: usize> Surface<D> for BSplineSurface<Point<D>> {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point<D>> {
        self.validate()?;
        let (u, v) = self.check_domain(u, v)?;
        Ok(self.derivatives_at(u, v, 0)?[0][0])
    }

    fn evaluate_derivative_u(&self, u: f64, v: f64) -> Result<Point<D>> {
        self.validate()?;
        let (u, v) = self.check_domain(u, v)?;
        Ok(self.derivatives_at(u, v, 1)?[1][0])
    }

    fn evaluate_derivative_v(&self, u: f64, v: f64) -> Result<Point<D>> {
        self.validate()?;
        let (u, v) = self.check_domain(u, v)?;
        Ok(self.derivatives_at(u, v, 1)?[0][1])
    }

    fn evaluate_2nd_derivatives(&self, u: f64, v: f64) -> Result<[Point<D>; 3]> {
        self.validate()?;
        let (u, v) = self.check_domain(u, v)?;
        let skl = self.derivatives_at(u, v, 2)?;
        Ok([skl[2][0], skl[1][1], skl[0][2]])
    }

    fn domain_u(&self) -> (f64, f64) {
        self.knot_domain_u()
    }

    fn domain_v(&self) -> (f64, f64) {
        self.knot_domain_v()
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
