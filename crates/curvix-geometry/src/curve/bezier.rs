//! Polynomial Bezier curves of fixed or generic degree.

use curvix_core::{CurvixError, Result, Validate};
use curvix_math::{ControlPoint, Point, Point2};
use serde::{Deserialize, Serialize};

use super::{differential, Curve};
use crate::basis::bernstein;

/// A Bezier curve over `[0, 1]`.
///
/// A fixed-degree curve rejects control polygons of any other size; a
/// generic curve takes its degree from the polygon it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierCurve<P> {
    control_points: Vec<P>,
    fixed_degree: Option<usize>,
}

impl<P: ControlPoint> BezierCurve<P> {
    /// A generic-degree curve.
    pub fn new(control_points: Vec<P>) -> Self {
        Self {
            control_points,
            fixed_degree: None,
        }
    }

    /// An empty fixed-degree curve awaiting `degree + 1` control points.
    pub fn with_degree(degree: usize) -> Self {
        Self {
            control_points: Vec::new(),
            fixed_degree: Some(degree),
        }
    }

    /// A fixed-degree curve whose degree is set by `control_points`.
    pub fn fixed(control_points: Vec<P>) -> Self {
        let degree = control_points.len().saturating_sub(1);
        Self {
            control_points,
            fixed_degree: Some(degree),
        }
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    /// Replace the control polygon, taking ownership of it.
    pub fn set_control_points(&mut self, control_points: Vec<P>) -> Result<()> {
        if let Some(degree) = self.fixed_degree {
            if control_points.len() != degree + 1 {
                return Err(CurvixError::configuration(format!(
                    "Degree {} Bezier curve needs {} control points, got {}",
                    degree,
                    degree + 1,
                    control_points.len()
                )));
            }
        }
        self.control_points = control_points;
        Ok(())
    }

    pub fn is_fixed_degree(&self) -> bool {
        self.fixed_degree.is_some()
    }

    pub fn degree(&self) -> usize {
        self.fixed_degree
            .unwrap_or_else(|| self.control_points.len().saturating_sub(1))
    }

    /// Position followed by derivatives up to `order`, without domain checks.
    pub fn derivatives_at(&self, t: f64, order: usize) -> Result<Vec<P>> {
        self.validate()?;
        Ok(bernstein::derivatives(&self.control_points, t, order))
    }

    pub fn point_at(&self, t: f64) -> Result<P> {
        self.validate()?;
        Ok(bernstein::de_casteljau(&self.control_points, t))
    }
}

impl<P: ControlPoint> Validate for BezierCurve<P> {
    fn validate(&self) -> Result<()> {
        if self.control_points.is_empty() {
            return Err(CurvixError::configuration(
                "Bezier curve has no control points",
            ));
        }
        if let Some(degree) = self.fixed_degree {
            if self.control_points.len() != degree + 1 {
                return Err(CurvixError::configuration(format!(
                    "Degree {} Bezier curve has {} control points",
                    degree,
                    self.control_points.len()
                )));
            }
        }
        Ok(())
    }
}

impl<const D: usize> BezierCurve<Point<D>> {
    /// Power-basis coefficients of a planar curve of degree <= 3, or the
    /// reason the topological queries cannot be answered exactly.
    fn planar_power_form(&self, query: &str) -> Result<Vec<Point2>> {
        self.validate()?;
        if D != 2 || self.degree() > 3 {
            return Err(CurvixError::unsupported(format!(
                "{} is only supported for planar Bezier curves up to degree 3",
                query
            )));
        }
        let planar: Vec<Point2> = self
            .control_points
            .iter()
            .map(|p| Point2::new(p[0], p[1]))
            .collect();
        Ok(bernstein::power_coefficients(&planar))
    }
}

impl<const D: usize> Curve<D> for BezierCurve<Point<D>> {
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
        0.0
    }

    fn get_domain_upper_bound(&self) -> f64 {
        1.0
    }

    fn degree(&self) -> usize {
        BezierCurve::<Point<D>>::degree(self)
    }

    fn compute_inflections(&self, lower: f64, upper: f64) -> Result<Vec<f64>> {
        let power = self.planar_power_form("Inflection computation")?;
        Ok(differential::planar_cubic_inflections(&power, lower, upper))
    }

    fn reduce_turning_angle(&self, lower: f64, upper: f64) -> Result<Vec<f64>> {
        let power = self.planar_power_form("Turning angle reduction")?;
        Ok(differential::planar_cubic_axis_splits(&power, lower, upper))
    }

    fn compute_singularities(&self, lower: f64, upper: f64) -> Result<Vec<f64>> {
        let power = self.planar_power_form("Singularity computation")?;
        Ok(differential::planar_cubic_singularities(&power, lower, upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use curvix_math::Point3;
    use std::f64::consts::PI;

    fn arch() -> BezierCurve<Point2> {
        BezierCurve::fixed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        ])
    }

    fn s_curve() -> BezierCurve<Point2> {
        BezierCurve::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, -1.0),
            Point2::new(3.0, 0.0),
        ])
    }

    #[test]
    fn test_endpoint_interpolation() {
        let curve = s_curve();
        assert_relative_eq!(curve.evaluate(0.0).unwrap(), Point2::new(0.0, 0.0));
        assert_relative_eq!(curve.evaluate(1.0).unwrap(), Point2::new(3.0, 0.0));
    }

    #[test]
    fn test_arch_midpoint_and_tangents() {
        let curve = arch();
        assert_relative_eq!(curve.evaluate(0.5).unwrap(), Point2::new(1.0, 1.0));
        // Start tangent is degree * (P1 - P0)
        assert_relative_eq!(
            curve.evaluate_derivative(0.0).unwrap(),
            Point2::new(2.0, 4.0)
        );
        assert_relative_eq!(
            curve.evaluate_2nd_derivative(0.3).unwrap(),
            Point2::new(0.0, -8.0)
        );
    }

    #[test]
    fn test_arch_turning_angle_clockwise() {
        let angle = arch().get_turning_angle(0.0, 1.0).unwrap();
        assert!(angle < 0.0);
        assert!(angle.abs() < PI);
        // atan2(cross((2,4),(2,-4)), dot((2,4),(2,-4)))
        assert_relative_eq!(angle, (-16.0_f64).atan2(-12.0), epsilon = 1e-12);
    }

    #[test]
    fn test_domain_errors() {
        let curve = arch();
        assert!(curve.in_domain(1.0 + f64::EPSILON));
        assert!(!curve.in_domain(1.01));
        let err = curve.evaluate(1.01).unwrap_err();
        assert!(matches!(err, CurvixError::Domain { .. }));
        assert!(curve.evaluate_derivative(-0.5).is_err());
    }

    #[test]
    fn test_split_point_validity() {
        let curve = arch();
        assert!(!curve.is_split_point_valid(0.0).unwrap());
        assert!(!curve.is_split_point_valid(1.0).unwrap());
        assert!(curve.is_split_point_valid(0.4).unwrap());
        assert!(curve.is_split_point_valid(2.0).is_err());
    }

    #[test]
    fn test_fixed_degree_rejects_resize() {
        let mut curve = BezierCurve::<Point2>::with_degree(2);
        assert!(curve.evaluate(0.5).is_err());
        assert!(curve
            .set_control_points(vec![Point2::zeros(), Point2::new(1.0, 0.0)])
            .is_err());
        curve
            .set_control_points(vec![Point2::zeros(), Point2::new(1.0, 1.0), Point2::new(2.0, 0.0)])
            .unwrap();
        assert_eq!(curve.degree(), 2);
    }

    #[test]
    fn test_generic_degree_follows_polygon() {
        let mut curve = BezierCurve::new(vec![Point2::zeros(), Point2::new(1.0, 0.0)]);
        assert_eq!(curve.degree(), 1);
        curve.set_control_points(s_curve().control_points().to_vec()).unwrap();
        assert_eq!(curve.degree(), 3);
        assert!(!curve.is_fixed_degree());
    }

    #[test]
    fn test_line_has_zero_curvature() {
        let line = BezierCurve::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)]);
        for i in 0..=10 {
            let k = line.evaluate_curvature(i as f64 / 10.0).unwrap();
            assert_eq!(k, Point3::zeros());
        }
    }

    #[test]
    fn test_inversion_round_trip() {
        let curve = s_curve();
        for &t in &[0.1, 0.35, 0.5, 0.72, 0.9] {
            let p = curve.evaluate(t).unwrap();
            let found = curve.inverse_evaluate(&p).unwrap();
            assert!((found - t).abs() < 1e-6, "t={} inverted to {}", t, found);
        }
    }

    #[test]
    fn test_inflection_of_s_curve() {
        let inflections = s_curve().compute_inflections(0.0, 1.0).unwrap();
        assert_eq!(inflections.len(), 1);
        assert_relative_eq!(inflections[0], 0.5, epsilon = 1e-12);
        assert!(arch().compute_inflections(0.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_singularity_of_collapsed_handle() {
        let curve = BezierCurve::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
        ]);
        assert_eq!(curve.compute_singularities(0.0, 1.0).unwrap(), vec![0.0]);
        assert!(s_curve().compute_singularities(0.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_turning_angle_nudges_degenerate_start() {
        let curve = BezierCurve::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
        ]);
        assert_eq!(curve.evaluate_derivative(0.0).unwrap(), Point2::zeros());
        // The start tangent after the nudge points along (1, 1), the end along (1, -1)
        let angle = curve.get_turning_angle(0.0, 1.0).unwrap();
        assert!((angle + PI / 2.0).abs() < 1e-2, "angle={}", angle);
    }

    #[test]
    fn test_turning_angle_nudges_degenerate_end() {
        let curve = BezierCurve::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert_eq!(curve.evaluate_derivative(1.0).unwrap(), Point2::zeros());
        // The end tangent after the nudge points along (1, -1)
        let angle = curve.get_turning_angle(0.0, 1.0).unwrap();
        assert!((angle + PI / 2.0).abs() < 1e-2, "angle={}", angle);
    }

    #[test]
    fn test_turning_angle_of_constant_curve() {
        // Both ends stay degenerate after every retry, the angle is still computed
        let curve = BezierCurve::new(vec![Point2::new(1.5, -2.0); 4]);
        assert_eq!(curve.get_turning_angle(0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_reduce_turning_angle_pieces_are_monotone() {
        let splits = s_curve().reduce_turning_angle(0.0, 1.0).unwrap();
        let mut bounds = vec![0.0];
        bounds.extend(&splits);
        bounds.push(1.0);
        for w in bounds.windows(2) {
            let angle = s_curve().get_turning_angle(w[0], w[1]).unwrap();
            assert!(angle.abs() <= PI / 2.0 + 1e-9, "piece {:?} turns {}", w, angle);
        }
    }

    #[test]
    fn test_topology_queries_unsupported_in_3d() {
        let curve = BezierCurve::new(vec![Point3::zeros(), Point3::new(1.0, 1.0, 1.0)]);
        let err = curve.compute_inflections(0.0, 1.0).unwrap_err();
        assert!(err.is_unsupported());
        let err = curve.get_turning_angle(0.0, 1.0).unwrap_err();
        assert!(matches!(err, CurvixError::Dimensionality { expected: 2, actual: 3 }));
    }
}
