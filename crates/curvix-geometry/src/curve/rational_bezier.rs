//! Rational Bezier curves, evaluated in homogeneous space.

use curvix_core::{CurvixError, Result, Validate};
use curvix_math::homogeneous::{
    dehomogenize, dehomogenize_2nd_derivative, dehomogenize_derivative, lift_all, project_all,
};
use curvix_math::{Homogeneous, Point};
use serde::{Deserialize, Serialize};

use super::{BezierCurve, Curve};

/// A Bezier curve with one positive weight per control point.
///
/// Evaluation runs on a lifted [`BezierCurve`] over `(w*P, w)` that
/// [`initialize`](Self::initialize) builds. Every setter drops the lift, so
/// queries made before (re)initializing fail with a configuration error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationalBezierCurve<const D: usize> {
    control_points: Vec<Point<D>>,
    weights: Vec<f64>,
    #[serde(skip)]
    homogeneous: Option<BezierCurve<Homogeneous<D>>>,
}

impl<const D: usize> RationalBezierCurve<D> {
    /// An uninitialized curve.
    pub fn new(control_points: Vec<Point<D>>, weights: Vec<f64>) -> Self {
        Self {
            control_points,
            weights,
            homogeneous: None,
        }
    }

    /// A curve that is ready for queries.
    pub fn try_new(control_points: Vec<Point<D>>, weights: Vec<f64>) -> Result<Self> {
        let mut curve = Self::new(control_points, weights);
        curve.initialize()?;
        Ok(curve)
    }

    /// Wrap an already lifted curve; weights are read back from it, not reapplied.
    pub fn from_homogeneous(lifted: BezierCurve<Homogeneous<D>>) -> Result<Self> {
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
            control_points,
            weights,
            homogeneous: Some(lifted),
        })
    }

    pub fn control_points(&self) -> &[Point<D>] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn set_control_points(&mut self, control_points: Vec<Point<D>>) {
        self.control_points = control_points;
        self.homogeneous = None;
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) {
        self.weights = weights;
        self.homogeneous = None;
    }

    /// Validate weights against the control polygon and build the lift.
    pub fn initialize(&mut self) -> Result<()> {
        let lifted = BezierCurve::new(lift_all(&self.control_points, &self.weights)?);
        lifted.validate()?;
        self.homogeneous = Some(lifted);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.homogeneous.is_some()
    }

    /// The lifted polynomial curve.
    pub fn homogeneous(&self) -> Result<&BezierCurve<Homogeneous<D>>> {
        self.homogeneous.as_ref().ok_or_else(|| {
            CurvixError::configuration("Rational Bezier curve is not initialized")
        })
    }
}

impl<const D: usize> Curve<D> for RationalBezierCurve<D> {
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
        0.0
    }

    fn get_domain_upper_bound(&self) -> f64 {
        1.0
    }

    fn degree(&self) -> usize {
        self.control_points.len().saturating_sub(1)
    }
}
