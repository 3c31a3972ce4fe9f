use std::f64::consts::FRAC_1_SQRT_2;

use approx::assert_relative_eq;
use curvix_core::CurvixError;
use curvix_geometry::{AnyPatch, BSplineSurface, BezierSurface, Curve, NurbsSurface, Surface};
use curvix_math::{Point2, Point3};

/// Half cylinder of radius 1.5 and height 2, two rational quarter arcs along u.
fn half_cylinder() -> NurbsSurface<3> {
    let w = FRAC_1_SQRT_2;
    let arc = [
        (1.5, 0.0, 1.0),
        (1.5, 1.5, w),
        (0.0, 1.5, 1.0),
        (-1.5, 1.5, w),
        (-1.5, 0.0, 1.0),
    ];
    let mut grid = Vec::new();
    let mut weights = Vec::new();
    for &(x, y, weight) in &arc {
        for z in [0.0, 2.0] {
            grid.push(Point3::new(x, y, z));
            weights.push(weight);
        }
    }
    NurbsSurface::try_new(
        2,
        1,
        vec![0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0],
        vec![0.0, 0.0, 1.0, 1.0],
        grid,
        weights,
    )
    .unwrap()
}

fn bumpy_grid() -> Vec<Point3> {
    let mut grid = Vec::new();
    for i in 0..4 {
        for j in 0..3 {
            let row = if i == 1 || i == 2 { 0.8 } else { 0.0 };
            let column = if j == 1 { 1.0 } else { 0.25 };
            grid.push(Point3::new(j as f64, i as f64, row * column));
        }
    }
    grid
}

#[test]
fn test_half_cylinder_radius_and_height() {
    let s = half_cylinder();
    for i in 0..=12 {
        for j in 0..=3 {
            let (u, v) = (i as f64 / 12.0, j as f64 / 3.0);
            let p = s.evaluate(u, v).unwrap();
            assert_relative_eq!(Point2::new(p.x, p.y).norm(), 1.5, epsilon = 1e-12);
            assert_relative_eq!(p.z, 2.0 * v, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_equal_weights_reduce_to_bspline_surface() {
    let knots_u = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
    let knots_v = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let bspline = BSplineSurface::try_new(3, 2, knots_u.clone(), knots_v.clone(), bumpy_grid()).unwrap();
    let nurbs = NurbsSurface::try_new(3, 2, knots_u, knots_v, bumpy_grid(), vec![0.4; 12]).unwrap();

    for &(u, v) in &[(0.1, 0.9), (0.5, 0.5), (0.75, 0.2), (1.0, 0.0)] {
        assert_relative_eq!(nurbs.evaluate(u, v).unwrap(), bspline.evaluate(u, v).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(
            nurbs.evaluate_derivative_u(u, v).unwrap(),
            bspline.evaluate_derivative_u(u, v).unwrap(),
            epsilon = 1e-10
        );
        assert_relative_eq!(
            nurbs.evaluate_derivative_v(u, v).unwrap(),
            bspline.evaluate_derivative_v(u, v).unwrap(),
            epsilon = 1e-10
        );
        let rational = nurbs.evaluate_2nd_derivatives(u, v).unwrap();
        let polynomial = bspline.evaluate_2nd_derivatives(u, v).unwrap();
        for (r, p) in rational.iter().zip(&polynomial) {
            assert_relative_eq!(*r, *p, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_bezier_patch_matches_clamped_bspline() {
    let bezier = BezierSurface::try_new(3, 2, bumpy_grid()).unwrap();
    let bspline = BSplineSurface::try_new(
        3,
        2,
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        bumpy_grid(),
    )
    .unwrap();

    for &(u, v) in &[(0.0, 0.0), (0.3, 0.6), (0.9, 0.1), (1.0, 1.0)] {
        assert_relative_eq!(bezier.evaluate(u, v).unwrap(), bspline.evaluate(u, v).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(
            bezier.evaluate_derivative_u(u, v).unwrap(),
            bspline.evaluate_derivative_u(u, v).unwrap(),
            epsilon = 1e-11
        );
    }
}

#[test]
fn test_nurbs_iso_curves_agree_with_surface() {
    let s = half_cylinder();
    let along_u = s.compute_iso_curve_u(0.4).unwrap();
    let along_v = s.compute_iso_curve_v(0.7).unwrap();
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert_relative_eq!(along_u.evaluate(t).unwrap(), s.evaluate(t, 0.4).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(along_v.evaluate(t).unwrap(), s.evaluate(0.7, t).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(
            along_u.evaluate_derivative(t).unwrap(),
            s.evaluate_derivative_u(t, 0.4).unwrap(),
            epsilon = 1e-10
        );
    }
    // An iso-curve along the arc keeps the radius
    assert_relative_eq!(along_u.evaluate_curvature(0.3).unwrap().norm(), 1.0 / 1.5, epsilon = 1e-9);
}

#[test]
fn test_uninitialized_nurbs_surface() {
    let mut s = half_cylinder();
    s.set_weights(s.weights().to_vec());
    assert!(!s.is_initialized());
    assert!(matches!(
        s.evaluate(0.5, 0.5).unwrap_err(),
        CurvixError::Configuration(_)
    ));
    assert!(matches!(
        s.compute_iso_curve_v(0.5).unwrap_err(),
        CurvixError::Configuration(_)
    ));
    s.initialize().unwrap();
    assert!(s.evaluate(0.5, 0.5).is_ok());
}

#[test]
fn test_surface_inversion_round_trip() {
    let patches: Vec<AnyPatch<3>> = vec![
        half_cylinder().into(),
        BezierSurface::try_new(3, 2, bumpy_grid()).unwrap().into(),
    ];
    for patch in &patches {
        for &(u, v) in &[(0.3, 0.4), (0.62, 0.55), (0.8, 0.25)] {
            let p = patch.evaluate(u, v).unwrap();
            let (fu, fv) = patch.inverse_evaluate(&p).unwrap();
            assert!(
                (fu - u).abs() < 1e-6 && (fv - v).abs() < 1e-6,
                "({}, {}) inverted to ({}, {})",
                u,
                v,
                fu,
                fv
            );
        }
    }
}

#[test]
fn test_normal_requires_three_dimensions() {
    let flat = BezierSurface::try_new(
        1,
        1,
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ],
    )
    .unwrap();
    assert_eq!(
        flat.evaluate_normal(0.5, 0.5).unwrap_err(),
        CurvixError::Dimensionality {
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn test_degenerate_normal_falls_back_to_z() {
    // Every control point of the first u-row coincides: the edge u = 0 is a pole
    let mut grid = bumpy_grid();
    for p in grid.iter_mut().take(3) {
        *p = Point3::new(1.0, 0.0, 0.0);
    }
    let patch = BezierSurface::try_new(3, 2, grid).unwrap();
    assert_eq!(patch.evaluate_normal(0.0, 0.5).unwrap(), Point3::z());
}

#[test]
fn test_deserialized_surface_needs_initialize() {
    let s = half_cylinder();
    let json = serde_json::to_string(&s).unwrap();
    let mut restored: NurbsSurface<3> = serde_json::from_str(&json).unwrap();
    assert!(restored.evaluate(0.2, 0.2).is_err());
    restored.initialize().unwrap();
    assert_eq!(restored, s);
}
