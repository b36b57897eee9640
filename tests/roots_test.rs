use numkit::prelude::*;
use std::f64::consts::PI;

// f(x) = x^3 - 2x - 5, with |f| <= 1e-6 clamped to an exact zero
fn cubic(x: f64) -> f64 {
    let f = x * x * x - 2.0 * x - 5.0;
    if f.abs() <= 1.0e-6 {
        return 0.0;
    }
    f
}

fn boxed<F: ObjFn + 'static>(f: F) -> Box<dyn ObjFn> {
    Box::new(f)
}

fn tan_minus_x(x: f64) -> f64 {
    let f = x.tan() - x;
    if f.abs() <= 1.0e-6 {
        return 0.0;
    }
    f
}

#[test]
fn test_bracket_then_secant_cubic() {
    let mut search = BracketSearch::new(cubic);
    let result = search.false_position(2.0, 2.5, 0.1, 20, 100000.0).unwrap();
    assert_eq!(result.x, 2.0945514816982445);
    assert_eq!(result.fx, 0.0);
}

#[test]
fn test_fixed_point_sqrt3() {
    let g = |x: f64| 0.5 * (x + 3.0 / x);
    let mut fixed = FixedPoint::new(g).with_options(
        RootOptions::new()
            .with_tolerance(1e-5)
            .with_max_iters(usize::MAX),
    );
    let result = fixed.solve(2.0).unwrap();
    assert!(result.converged);
    assert!((result.x - 1.73205).abs() < 1e-5);
}

#[test]
fn test_tangent_pole() {
    for refinement in [Refinement::HalfInterval, Refinement::FalsePosition] {
        let mut search = BracketSearch::new(tan_minus_x);
        let err = search
            .search(refinement, 1.0, 100.0, 0.1, 20, 1000.0)
            .unwrap_err();
        assert!(
            matches!(
                err,
                RootError::Discontinuity { .. } | RootError::IterationLimit { .. }
            ),
            "unexpected error {:?}",
            err
        );
        let (x, _) = err.point().unwrap();
        assert!((x - PI / 2.0).abs() < 1e-3);
    }
}

#[test]
fn test_reciprocal_is_discontinuous() {
    let reciprocal = |x: f64| 1.0 / x;

    let mut finder = RootFinder::new(reciprocal).with_options(
        RootOptions::new()
            .with_step(0.1)
            .with_value_limit(1000.0),
    );
    let err = finder.solve(1e-4).unwrap_err();
    assert!(err.is_discontinuity());

    let mut search = BracketSearch::new(reciprocal);
    let err = search.half_interval(-0.55, 1.0, 0.1, 20, 1000.0).unwrap_err();
    assert!(err.is_discontinuity());
}

#[test]
fn test_bracket_search_beats_one_bisection() {
    let cases: Vec<(Box<dyn ObjFn>, f64, f64)> = vec![
        (boxed(|x: f64| x * x * x - 2.0 * x - 5.0), 2.0, 3.0),
        (boxed(|x: f64| x.exp() - 2.0), 0.0, 1.0),
        (boxed(|x: f64| x - x.cos()), 0.0, 1.0),
        (boxed(|x: f64| (x - 0.3).atan()), -1.0, 2.0),
        (boxed(|x: f64| x.powi(5) - 0.5), 0.0, 1.0),
    ];
    for (f, a, b) in cases {
        let midpoint = f.call_scalar(0.5 * (a + b)).abs();
        for refinement in [Refinement::HalfInterval, Refinement::FalsePosition] {
            let mut search = BracketSearch::new_boxed(f.clone());
            let x = match search.search(refinement, a, b, b - a, 20, 1e10) {
                Ok(result) => result.x,
                Err(RootError::IterationLimit { x, .. }) => x,
                Err(e) => panic!("unexpected error {:?}", e),
            };
            assert!(f.call_scalar(x).abs() <= midpoint);
        }
    }
}

#[test]
fn test_converged_root_is_stable() {
    let cases: Vec<(Box<dyn ObjFn>, f64)> = vec![
        (boxed(|x: f64| x * x - 2.0), 1.0),
        (boxed(|x: f64| x.cos() - x), 0.0),
    ];
    for (f, x_init) in cases {
        let options = RootOptions::new().with_step(0.1);
        let mut finder = RootFinder::new_boxed(f.clone()).with_options(options);
        let first = finder.solve(x_init).unwrap();
        assert!(first.converged);

        let mut finder = RootFinder::new_boxed(f).with_options(options.with_tolerance(1e-9));
        let second = finder.solve(first.x).unwrap();
        assert!(second.converged);
        let first_tol = if x_init != 0.0 {
            1e-6 * x_init.abs()
        } else {
            1e-6
        };
        assert!((second.x - first.x).abs() <= first_tol);
    }
}

#[test]
fn test_acceleration_on_triple_root() {
    let mut finder = RootFinder::new(|x: f64| (x - 1.0).powi(3)).with_options(
        RootOptions::new()
            .with_step(0.1)
            .with_tolerance(1e-12)
            .with_max_iters(60),
    );
    let result = finder.solve(2.0).unwrap();
    assert!(result.converged);
    assert!(result.used(Method::Acceleration));
    assert!(result.methods[..12]
        .iter()
        .all(|m| *m != Method::Acceleration));
    assert!((result.x - 1.0).abs() < 1e-4);
}

#[test]
fn test_non_convergence_is_silent() {
    let mut finder = RootFinder::new(|x: f64| x * x + 1.0)
        .with_options(RootOptions::new().with_step(0.1).with_max_iters(5));
    let result = finder.solve(1.0).unwrap();
    assert!(!result.converged);
    assert_eq!(result.iters, 5);
    assert_eq!(result.methods.len(), 5);
}

#[test]
fn test_bracketed_driver_matches_search() {
    let mut finder = RootFinder::new(|x: f64| x * x * x - 2.0 * x - 5.0).with_options(
        RootOptions::new()
            .with_step(0.1)
            .with_tolerance(1e-12)
            .with_max_iters(30),
    );
    let result = finder.solve_bracketed(1.0, 3.0).unwrap();
    assert!(result.converged);
    assert!((result.x - 2.0945514816982445).abs() < 1e-9);
}

#[test]
fn test_scan_lists_display() {
    let mut search = BracketSearch::new(tan_minus_x);
    let entries = search
        .scan_roots(Refinement::FalsePosition, 1.0, 11.0, 0.1, 20, 1000.0, 10)
        .unwrap();
    let roots: Vec<f64> = entries
        .iter()
        .filter(|e| e.kind == ScanKind::Root)
        .map(|e| e.x)
        .collect();
    assert_eq!(roots.len(), 3);
    let poles = entries.iter().filter(|e| e.kind == ScanKind::Pole).count();
    assert_eq!(poles, 3);
    for entry in &entries {
        assert!(entry.to_string().starts_with("x = "));
    }
}
