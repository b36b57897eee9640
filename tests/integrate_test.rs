use numkit::prelude::*;

#[test]
fn test_romberg_inverse_hyperbolic() {
    let mut romberg = Romberg::new(|x: f64| 1.0 / (1.0 + x * x).sqrt());
    let result = romberg.integrate(0.0, 1.0, 1.0e-6).unwrap();
    assert!(result.converged);
    assert!((result.area - 0.8813735883780485).abs() < 1e-12);
    assert!((result.area - 1_f64.asinh()).abs() < 1e-8);
    assert_eq!(result.levels, 4);
    assert_eq!(result.fn_evals, 17);
}

#[test]
fn test_romberg_x_sin_x() {
    let area = integrate(-1.0, 1.0, |x: f64| x * x.sin(), 1.0e-6);
    assert!((area - 0.602337357879467).abs() < 1e-12);
    assert!((area - 2.0 * (1_f64.sin() - 1_f64.cos())).abs() < 1e-8);
}

#[test]
fn test_romberg_log() {
    let area = integrate(1.0, 3.0, |x: f64| 1.0 / x, 1.0e-6);
    assert!((area - 1.098612289805927).abs() < 1e-12);
    assert!((area - 3_f64.ln()).abs() < 1e-8);
}

#[test]
fn test_integrand_shares_root_callback() {
    // The same boxed callback drives a root search and a quadrature
    let f: Box<dyn ObjFn> = Box::new(|x: f64| x * x - 2.0);
    let mut finder =
        RootFinder::new_boxed(f.clone()).with_options(RootOptions::new().with_step(0.1));
    let root = finder.solve(1.0).unwrap().x;
    let area = Romberg::new_boxed(f)
        .integrate(0.0, root, 1e-10)
        .unwrap()
        .area;
    let exact = root.powi(3) / 3.0 - 2.0 * root;
    assert!((area - exact).abs() < 1e-10);
}
