use crate::error::RootError;
use crate::roots::search::exceeds;
use crate::roots::{estimate, EstimatorState, Method, ObjFn};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Options shared by the root drivers
///
/// A zero `tol`, `max_iters` or `value_limit` selects the default value, so
/// partially filled configs behave like the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootOptions {
    /// Convergence tolerance on `|x_next - x|`, relative to `|x_init|` when
    /// `x_init != 0`.
    /// Default: 1e-6
    pub tol: f64,

    /// Maximum number of estimator iterations.
    /// Default: 12
    pub max_iters: usize,

    /// Limit on `|f(x)|`; larger values are reported as a discontinuity.
    /// Default: 1e30
    pub value_limit: f64,

    /// Fallback increment used until the estimator has a better guess.
    /// Default: 0.0, i.e. step by `f(x)` itself
    pub step: f64,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            tol: Self::DEFAULT_TOL,
            max_iters: Self::DEFAULT_MAX_ITERS,
            value_limit: Self::DEFAULT_VALUE_LIMIT,
            step: 0.0,
        }
    }
}

impl RootOptions {
    pub const DEFAULT_TOL: f64 = 1e-6;
    pub const DEFAULT_MAX_ITERS: usize = 12;
    pub const DEFAULT_VALUE_LIMIT: f64 = 1e30;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_value_limit(mut self, value_limit: f64) -> Self {
        self.value_limit = value_limit;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), RootError> {
        if !(self.tol >= 0.0) {
            return Err(RootError::InvalidTolerance);
        }
        if !self.step.is_finite() {
            return Err(RootError::InvalidStepSize);
        }
        Ok(())
    }

    pub(crate) fn iterations(&self) -> usize {
        if self.max_iters == 0 {
            Self::DEFAULT_MAX_ITERS
        } else {
            self.max_iters
        }
    }

    pub(crate) fn absolute_tol(&self) -> f64 {
        if self.tol == 0.0 {
            Self::DEFAULT_TOL
        } else {
            self.tol
        }
    }

    pub(crate) fn tolerance_for(&self, x_init: f64) -> f64 {
        let tol = self.absolute_tol();
        if x_init != 0.0 {
            tol * x_init.abs()
        } else {
            tol
        }
    }

    pub(crate) fn limit(&self) -> f64 {
        if self.value_limit == 0.0 {
            Self::DEFAULT_VALUE_LIMIT
        } else {
            self.value_limit
        }
    }
}

/// Result of a root driver
///
/// Hitting `max_iters` is not an error for the estimator drivers; check
/// `converged` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RootResult {
    pub x: f64,
    /// `f(x)`, or `g(x)` for the fixed-point drivers
    pub fx: f64,
    pub iters: usize,
    pub fn_evals: usize,
    pub converged: bool,
    /// Estimator method used at each step, including bracket nudges
    pub methods: Vec<Method>,
}

impl RootResult {
    pub fn used(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

/// Root of `f(x) = 0` driven by the step estimator
#[derive(Clone)]
pub struct RootFinder {
    f: Box<dyn ObjFn>,
    options: RootOptions,
    x: f64,
    fx: f64,
    iters: usize,
    converged: bool,
}

impl RootFinder {
    pub fn new<F>(f: F) -> Self
    where
        F: ObjFn + 'static,
    {
        Self::new_boxed(Box::new(f))
    }

    pub fn new_boxed(f: Box<dyn ObjFn>) -> Self {
        RootFinder {
            f,
            options: RootOptions::default(),
            x: 0.0,
            fx: 0.0,
            iters: 0,
            converged: false,
        }
    }

    pub fn with_options(mut self, options: RootOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RootOptions {
        &self.options
    }

    /// Solve `f(x) = 0` starting from `x_init`.
    ///
    /// Each iteration evaluates `f` at the current point and asks the
    /// estimator for the next one. Stops when two successive points are within
    /// the tolerance.
    ///
    /// # Errors
    /// * `Discontinuity` if `|f(x)|` exceeds `value_limit` before convergence
    /// * `InvalidTolerance` / `InvalidStepSize` for bad options
    pub fn solve(&mut self, x_init: f64) -> Result<RootResult, RootError> {
        self.options.validate()?;
        self.converged = false;
        let max_iters = self.options.iterations();
        let tol = self.options.tolerance_for(x_init);
        let limit = self.options.limit();

        let mut state = EstimatorState::new();
        let mut methods = Vec::new();
        let mut next = x_init;
        let (mut x, mut fx) = (x_init, 0.0);

        for iter in 1..=max_iters {
            x = next;
            fx = self.f.call_scalar(x);
            let (step, updated) = estimate(x, fx, self.options.step, iter == 1, state);
            state = updated;
            methods.push(step.method);
            next = step.next;
            trace!(iter, x, fx, next, method = ?step.method, "root driver");

            if (next - x).abs() <= tol {
                debug!(iter, x, fx, "root driver converged");
                return Ok(self.finish(x, fx, iter, iter, true, methods));
            }
            if exceeds(fx, limit) {
                warn!(x, fx, limit, "root driver stopped at a possible discontinuity");
                self.record(x, fx, iter);
                return Err(RootError::Discontinuity { x, fx, limit });
            }
        }

        debug!(max_iters, x, fx, "root driver did not converge");
        Ok(self.finish(x, fx, max_iters, max_iters, false, methods))
    }

    /// Solve `f(x) = 0` for a root between `x_init` and `x_final`.
    ///
    /// Like [`RootFinder::solve`], but the second iteration must still lie in
    /// `[x_init, x_final]` and, while `f` has not changed sign, the driver
    /// keeps stepping towards `x_final` by `|step|` before resuming.
    ///
    /// # Errors
    /// * `OutOfRange` if the second iteration point leaves the interval
    /// * `NoRoot` if a nudge of `|step|` no longer moves the point
    /// * `Discontinuity` if `|f(x)|` exceeds `value_limit` before convergence
    /// * `InvalidStepSize` if `step` is zero or not finite
    pub fn solve_bracketed(&mut self, x_init: f64, x_final: f64) -> Result<RootResult, RootError> {
        self.options.validate()?;
        if self.options.step == 0.0 {
            return Err(RootError::InvalidStepSize);
        }
        self.converged = false;
        let max_iters = self.options.iterations();
        let tol = self.options.tolerance_for(x_init);
        let limit = self.options.limit();

        // Only a zero span keeps the span / 16 step
        let span = x_final - x_init;
        let mut dx = span / 16.0;
        if dx != 0.0 {
            dx = self.options.step.abs().copysign(span);
        }

        let mut state = EstimatorState::new();
        let mut methods = Vec::new();
        let mut evals = 0;
        let mut next = x_init;
        let (mut x, mut fx) = (x_init, 1.0);

        for iter in 1..=max_iters {
            loop {
                let f_prev = fx;
                x = next;
                fx = self.f.call_scalar(x);
                evals += 1;
                if iter != 2 {
                    break;
                }
                if (x_final - x) * (x_init - x) > 0.0 {
                    warn!(x, fx, x_init, x_final, "bracketed driver left its interval");
                    self.record(x, fx, iter);
                    return Err(RootError::OutOfRange {
                        x_init,
                        x_final,
                        x,
                        fx,
                    });
                }
                if !(fx * f_prev > 0.0) {
                    break;
                }
                let (step, updated) = estimate(x, fx, dx, true, state);
                state = updated;
                methods.push(step.method);
                next = step.next;
                trace!(x, fx, next, "bracketed driver nudge");
                // step below one ulp of x, the nudges never reach x_final
                if next == x {
                    debug!(x, fx, x_init, x_final, "bracketed driver cannot advance");
                    self.record(x, fx, iter);
                    return Err(RootError::NoRoot {
                        xmin: x_init,
                        xmax: x_final,
                        x,
                        fx,
                    });
                }
            }

            let (step, updated) = estimate(x, fx, dx, iter == 1, state);
            state = updated;
            methods.push(step.method);
            next = step.next;
            trace!(iter, x, fx, next, method = ?step.method, "bracketed driver");

            if (next - x).abs() <= tol {
                debug!(iter, x, fx, evals, "bracketed driver converged");
                return Ok(self.finish(x, fx, iter, evals, true, methods));
            }
            if exceeds(fx, limit) {
                warn!(x, fx, limit, "bracketed driver stopped at a possible discontinuity");
                self.record(x, fx, iter);
                return Err(RootError::Discontinuity { x, fx, limit });
            }
        }

        debug!(max_iters, x, fx, "bracketed driver did not converge");
        Ok(self.finish(x, fx, max_iters, evals, false, methods))
    }

    fn finish(
        &mut self,
        x: f64,
        fx: f64,
        iters: usize,
        fn_evals: usize,
        converged: bool,
        methods: Vec<Method>,
    ) -> RootResult {
        self.record(x, fx, iters);
        self.converged = converged;
        RootResult {
            x,
            fx,
            iters,
            fn_evals,
            converged,
            methods,
        }
    }

    fn record(&mut self, x: f64, fx: f64, iters: usize) {
        self.x = x;
        self.fx = fx;
        self.iters = iters;
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn fx(&self) -> f64 {
        self.fx
    }

    pub fn iters(&self) -> usize {
        self.iters
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl fmt::Debug for RootFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RootFinder( x: {}, fx: {}, iters: {}, converged: {})",
            self.x, self.fx, self.iters, self.converged
        )
    }
}
