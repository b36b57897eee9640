use crate::error::RootError;
use crate::roots::{estimate, EstimatorState, ObjFn, RootOptions, RootResult};
use std::fmt;
use tracing::{debug, trace};

/// Fixed point of `x = g(x)`
///
/// Convergence of plain substitution requires `|g'(x)| < 1` near the fixed
/// point; [`FixedPoint::solve`] relaxes this through the step estimator.
#[derive(Clone)]
pub struct FixedPoint {
    g: Box<dyn ObjFn>,
    options: RootOptions,
    iters: usize,
    converged: bool,
}

impl FixedPoint {
    pub fn new<G>(g: G) -> Self
    where
        G: ObjFn + 'static,
    {
        Self::new_boxed(Box::new(g))
    }

    pub fn new_boxed(g: Box<dyn ObjFn>) -> Self {
        FixedPoint {
            g,
            options: RootOptions::default(),
            iters: 0,
            converged: false,
        }
    }

    /// Only `tol` and `max_iters` apply, `step` and `value_limit` are ignored.
    pub fn with_options(mut self, options: RootOptions) -> Self {
        self.options = options;
        self
    }

    /// Solve `x = g(x)` through the step estimator.
    ///
    /// The estimator is fed the residual `g(x) - x` with no fallback step, so
    /// its first move is plain substitution and later moves use the secant,
    /// false position and acceleration methods. Returns `(x, g(x))`; running
    /// out of iterations is reported through `converged`, not as an error.
    pub fn solve(&mut self, x_init: f64) -> Result<RootResult, RootError> {
        self.options.validate()?;
        self.converged = false;
        let max_iters = self.options.iterations();
        let tol = self.options.tolerance_for(x_init);

        let mut state = EstimatorState::new();
        let mut methods = Vec::new();
        let mut next = x_init;
        let (mut x, mut gx) = (x_init, x_init);

        for iter in 1..=max_iters {
            x = next;
            gx = self.g.call_scalar(x);
            let (step, updated) = estimate(x, gx - x, 0.0, iter == 1, state);
            state = updated;
            methods.push(step.method);
            next = step.next;
            trace!(iter, x, gx, next, method = ?step.method, "fixed point");

            if (next - x).abs() <= tol {
                debug!(iter, x, gx, "fixed point converged");
                self.iters = iter;
                self.converged = true;
                return Ok(RootResult {
                    x,
                    fx: gx,
                    iters: iter,
                    fn_evals: iter,
                    converged: true,
                    methods,
                });
            }
        }

        debug!(max_iters, x, gx, "fixed point did not converge");
        self.iters = max_iters;
        Ok(RootResult {
            x,
            fx: gx,
            iters: max_iters,
            fn_evals: max_iters,
            converged: false,
            methods,
        })
    }

    /// Plain direct substitution `x_{k+1} = g(x_k)`.
    ///
    /// Stops when `|x_{k+1} - x_k| <= tol` (absolute) and returns
    /// `(x_k, g(x_k))`.
    ///
    /// # Errors
    /// * `NotConverged` after `max_iters` iterations
    pub fn substitute(&mut self, x_init: f64) -> Result<RootResult, RootError> {
        self.options.validate()?;
        self.converged = false;
        let max_iters = self.options.iterations();
        let tol = self.options.absolute_tol();

        let mut x = x_init;
        let (mut last, mut gx) = (x_init, x_init);
        let mut change = f64::INFINITY;

        for iter in 1..=max_iters {
            last = x;
            gx = self.g.call_scalar(x);
            change = (gx - x).abs();
            trace!(iter, x, gx, change, "direct substitution");
            if change <= tol {
                debug!(iter, x = gx, change, "direct substitution converged");
                self.iters = iter;
                self.converged = true;
                return Ok(RootResult {
                    x,
                    fx: gx,
                    iters: iter,
                    fn_evals: iter,
                    converged: true,
                    methods: Vec::new(),
                });
            }
            x = gx;
        }

        self.iters = max_iters;
        Err(RootError::NotConverged {
            iters: max_iters,
            x: last,
            gx,
            residual: change,
        })
    }

    pub fn iters(&self) -> usize {
        self.iters
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixedPoint( iters: {}, converged: {})",
            self.iters, self.converged
        )
    }
}
