//! Non-rational B-spline curves.

use curvix_core::{Result, Validate};
use curvix_math::{ControlPoint, Point};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::basis::{deboor, knot_domain, num_spans, validate_knots};

/// A B-spline curve defined by degree, knot vector, and control points.
///
/// The domain is `[knots[degree], knots[len - degree - 1]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSplineCurve<P> {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<P>,
}

impl<P: ControlPoint> BSplineCurve<P> {
    /// Build a curve without validating it; queries validate on use.
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<P>) -> Self {
        Self {
            degree,
            knots,
            control_points,
        }
    }

    /// Build a curve and reject inconsistent degree, knots and control points.
    pub fn try_new(degree: usize, knots: Vec<f64>, control_points: Vec<P>) -> Result<Self> {
        let curve = Self::new(degree, knots, control_points);
        curve.validate()?;
        Ok(curve)
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
    }

    pub fn set_knots(&mut self, knots: Vec<f64>) {
        self.knots = knots;
    }

    pub fn set_control_points(&mut self, control_points: Vec<P>) {
        self.control_points = control_points;
    }

    /// Number of non-empty knot spans in the domain.
    pub fn num_spans(&self) -> usize {
        num_spans(self.degree, &self.knots)
    }

    pub fn knot_domain(&self) -> (f64, f64) {
        knot_domain(self.degree, &self.knots)
    }

    pub fn point_at(&self, t: f64) -> Result<P> {
        self.validate()?;
        Ok(deboor::curve_point(
            self.degree,
            &self.knots,
            &self.control_points,
            t,
        ))
    }

    /// Position followed by derivatives up to `order`, without domain checks.
    pub fn derivatives_at(&self, t: f64, order: usize) -> Result<Vec<P>> {
        self.validate()?;
        Ok(deboor::curve_derivatives(
            self.degree,
            &self.knots,
            &self.control_points,
            t,
            order,
        ))
    }
}

impl<P: ControlPoint> Validate for BSplineCurve<P> {
    fn validate(&self) -> Result<()> {
        validate_knots(self.degree, self.control_points.len(), &self.knots)
    }
}

impl<const D: usize> Curve<D> for BSplineCurve<Point<D>> {
    fn evaluate(&self, t: f64) -> Result<Point<D>> {
        self.validate()?;
        let t = self.check_domain(t)?;
        self.point_at(t)
    }

    fn evaluate_derivative(&self, t: f64) -> Result<Point<D>> {
        self.validate()?;
        let t = self.check_domain(t)?;
        Ok(self.derivatives_at(t, 1)?[1])
    }

    fn evaluate_2nd_derivative(&self, t: f64) -> Result<Point<D>> {
        self.validate()?;
        let t = self.check_domain(t)?;
        Ok(self.derivatives_at(t, 2)?[2])
    }

    fn get_domain_lower_bound(&self) -> f64 {
        self.knot_domain().0
    }

    fn get_domain_upper_bound(&self) -> f64 {
        self.knot_domain().1
    }

    fn degree(&self) -> usize {
        self.degree
    }

    fn inversion_samples(&self) -> usize {
        2 * (self.degree + 1) * self.num_spans().max(1)
    }
}
