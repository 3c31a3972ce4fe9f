//! NURBS (Non-Uniform Rational B-Spline) curves.

use curvix_core::{CurvixError, Result, Validate};
use curvix_math::homogeneous::{
    dehomogenize, dehomogenize_2nd_derivative, dehomogenize_derivative, lift_all, project_all,
};
use curvix_math::{Homogeneous, Point};
use serde::{Deserialize, Serialize};

use super::{BSplineCurve, Curve};
use crate::basis::{knot_domain, num_spans};

/// A B-spline curve with one positive weight per control point.
///
/// Queries go through a lifted [`BSplineCurve`] built by
/// [`initialize`](Self::initialize); setters invalidate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurve<const D: usize> {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<Point<D>>,
    weights: Vec<f64>,
    #[serde(skip)]
    homogeneous: Option<BSplineCurve<Homogeneous<D>>>,
}

impl<const D: usize> NurbsCurve<D> {
    pub fn new(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Point<D>>,
        weights: Vec<f64>,
    ) -> Self {
        Self {
            degree,
            knots,
            control_points,
            weights,
            homogeneous: None,
        }
    }

    /// Build and initialize in one step.
    pub fn try_new(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Point<D>>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let mut curve = Self::new(degree, knots, control_points, weights);
        curve.initialize()?;
        Ok(curve)
    }

    /// Wrap a B-spline whose control points are already lifted.
    ///
    /// The homogeneous coordinates are taken as-is; weights are recovered
    /// from them rather than applied a second time.
    pub fn from_homogeneous(lifted: BSplineCurve<Homogeneous<D>>) -> Result<Self> {
        lifted.validate()?;
        if let Some(h) = lifted
            .control_points()
            .iter()
            .find(|h| h.weight.is_nan() || h.weight <= 0.0)
        {
            return Err(CurvixError::configuration(format!(
                "Weights must be positive, got {}",
                h.weight
            )));
        }
        let (control_points, weights) = project_all(lifted.control_points());
        Ok(Self {
            degree: lifted.degree(),
            knots: lifted.knots().to_vec(),
            control_points,
            weights,
            homogeneous: Some(lifted),
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point<D>] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
        self.homogeneous = None;
    }

    pub fn set_knots(&mut self, knots: Vec<f64>) {
        self.knots = knots;
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

    /// Validate the configuration and build the lifted B-spline.
    pub fn initialize(&mut self) -> Result<()> {
        let lifted = lift_all(&self.control_points, &self.weights)?;
        let curve = BSplineCurve::try_new(self.degree, self.knots.clone(), lifted)?;
        self.homogeneous = Some(curve);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.homogeneous.is_some()
    }

    pub fn homogeneous(&self) -> Result<&BSplineCurve<Homogeneous<D>>> {
        self.homogeneous
            .as_ref()
            .ok_or_else(|| CurvixError::configuration("NURBS curve is not initialized"))
    }
}

impl<const D: usize> Curve<D> for NurbsCurve<D> {
    fn evaluate(&self, t: f64) -> Result<Point<D>> {
        let lifted = self.homogeneous()?;
        let t = self.check_domain(t)?;
        Ok(dehomogenize(&lifted.point_at(t)?))
    }

    fn evaluate_derivative(&self, t: f64) -> Result<Point<D>> {
        let lifted = self.homogeneous()?;
        let t = self.check_domain(t)?;
        let d = lifted.derivatives_at(t, 1)?;
        Ok(dehomogenize_derivative(&d[0], &d[1]))
    }

    fn evaluate_2nd_derivative(&self, t: f64) -> Result<Point<D>> {
        let lifted = self.homogeneous()?;
        let t = self.check_domain(t)?;
        let d = lifted.derivatives_at(t, 2)?;
        Ok(dehomogenize_2nd_derivative(&d[0], &d[1], &d[2]))
    }

    fn get_domain_lower_bound(&self) -> f64 {
        knot_domain(self.degree, &self.knots).0
    }

    fn get_domain_upper_bound(&self) -> f64 {
        knot_domain(self.degree, &self.knots).1
    }

    fn degree(&self) -> usize {
        self.degree
    }

    fn inversion_samples(&self) -> usize {
        2 * (self.degree + 1) * num_spans(self.degree, &self.knots).max(1)
    }
}
