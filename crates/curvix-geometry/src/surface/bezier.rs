//! Tensor-product Bezier patches.

use curvix_core::{CurvixError, Result, Tolerance, Validate};
use curvix_math::{ControlPoint, Point};
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::basis::bernstein;
use crate::curve::{check_parameter, BezierCurve};

/// A Bezier patch over `[0, 1]^2`.
///
/// `control_points[i * (degree_v + 1) + j]` is the control point at u-index
/// `i` and v-index `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierSurface<P> {
    degree_u: usize,
    degree_v: usize,
    control_points: Vec<P>,
}

impl<P: ControlPoint> BezierSurface<P> {
    pub fn new(degree_u: usize, degree_v: usize, control_points: Vec<P>) -> Self {
        Self {
            degree_u,
            degree_v,
            control_points,
        }
    }

    pub fn try_new(degree_u: usize, degree_v: usize, control_points: Vec<P>) -> Result<Self> {
        let surface = Self::new(degree_u, degree_v, control_points);
        surface.validate()?;
        Ok(surface)
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    pub fn set_control_points(&mut self, control_points: Vec<P>) -> Result<()> {
        let expected = self.grid_len();
        if control_points.len() != expected {
            return Err(CurvixError::configuration(format!(
                "Bezier patch of degrees ({}, {}) needs {} control points, got {}",
                self.degree_u,
                self.degree_v,
                expected,
                control_points.len()
            )));
        }
        self.control_points = control_points;
        Ok(())
    }

    pub fn degree_u(&self) -> usize {
        self.degree_u
    }

    pub fn degree_v(&self) -> usize {
        self.degree_v
    }

    fn grid_len(&self) -> usize {
        (self.degree_u + 1) * (self.degree_v + 1)
    }

    /// `skl[k][l]` is `S^(k,l)` for `k + l <= order`, without domain checks.
    pub fn derivatives_at(&self, u: f64, v: f64, order: usize) -> Result<Vec<Vec<P>>> {
        self.validate()?;
        Ok(bernstein::surface_derivatives(
            &self.control_points,
            self.degree_v + 1,
            u,
            v,
            order,
        ))
    }

    /// The curve running along u at fixed `v`.
    pub fn compute_iso_curve_u(&self, v: f64) -> Result<BezierCurve<P>> {
        self.validate()?;
        let v = check_parameter(Tolerance::default(), v, 0.0, 1.0)?;
        Ok(BezierCurve::fixed(bernstein::iso_curve_u(
            &self.control_points,
            self.degree_v + 1,
            v,
        )))
    }

    /// The curve running along v at fixed `u`.
    pub fn compute_iso_curve_v(&self, u: f64) -> Result<BezierCurve<P>> {
        self.validate()?;
        let u = check_parameter(Tolerance::default(), u, 0.0, 1.0)?;
        Ok(BezierCurve::fixed(bernstein::iso_curve_v(
            &self.control_points,
            self.degree_v + 1,
            u,
        )))
    }
}

impl<P: ControlPoint> Validate for BezierSurface<P> {
    fn validate(&self) -> Result<()> {
        if self.control_points.len() != self.grid_len() {
            return Err(CurvixError::configuration(format!(
                "Bezier patch of degrees ({}, {}) has {} control points, expected {}",
                self.degree_u,
                self.degree_v,
                self.control_points.len(),
                self.grid_len()
            )));
        }
        Ok(())
    }
}

impl<const D: usize> Surface<D> for BezierSurface<Point<D>> {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point<D>> {
        let (u, v) = self.check_domain(u, v)?;
        Ok(self.derivatives_at(u, v, 0)?[0][0])
    }

    fn evaluate_derivative_u(&self, u: f64, v: f64) -> Result<Point<D>> {
        let (u, v) = self.check_domain(u, v)?;
        Ok(self.derivatives_at(u, v, 1)?[1][0])
    }

    fn evaluate_derivative_v(&self, u: f64, v: f64) -> Result<Point<D>> {
        let (u, v) = self.check_domain(u, v)?;
        Ok(self.derivatives_at(u, v, 1)?[0][1])
    }

    fn evaluate_2nd_derivatives(&self, u: f64, v: f64) -> Result<[Point<D>; 3]> {
        let (u, v) = self.check_domain(u, v)?;
        let skl = self.derivatives_at(u, v, 2)?;
        Ok([skl[2][0], skl[1][1], skl[0][2]])
    }

    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn degree_u(&self) -> usize {
        self.degree_u
    }

    fn degree_v(&self) -> usize {
        self.degree_v
    }
}
