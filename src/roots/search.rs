use crate::error::RootError;
use crate::roots::{Bracket, History, ObjFn, Sample};
use std::fmt;
use tracing::{debug, trace, warn};

/// How a sign change found by the forward scan is refined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    /// Midpoint of the bracketing pair
    HalfInterval,
    /// Secant through the two newest samples, false position between the
    /// bracketing pair when the secant point leaves the bracket
    FalsePosition,
}

/// Result of a successful bracket search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub x: f64,
    /// Always exactly `0.0`; the search only succeeds on an exact zero.
    pub fx: f64,
    pub fn_evals: usize,
}

/// Outcome of one search inside [`BracketSearch::scan_roots`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Root,
    Pole,
    Unconverged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanEntry {
    pub x: f64,
    pub fx: f64,
    pub kind: ScanKind,
}

impl fmt::Display for ScanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x = {:13.6e}, f(x) = {:13.6e}", self.x, self.fx)?;
        match self.kind {
            ScanKind::Root => Ok(()),
            ScanKind::Pole => write!(f, "  # may be a discontinuous point"),
            ScanKind::Unconverged => write!(f, "  # iteration limit reached"),
        }
    }
}

/// `|fx| > limit`, with NaN counted as exceeding any limit
pub(crate) fn exceeds(fx: f64, limit: f64) -> bool {
    !(fx.abs() <= limit)
}

/// Forward scan for a sign change followed by a bounded refinement.
///
/// Starting at `xmin` the function is sampled every `dx` until the best
/// positive and best negative samples bracket a root, then refined with the
/// selected [`Refinement`]. Only an exact zero counts as success; once the
/// sign change is found the search gets `icut` more evaluations.
#[derive(Clone)]
pub struct BracketSearch {
    f: Box<dyn ObjFn>,
    fn_evals: usize,
}

impl BracketSearch {
    pub fn new<F>(f: F) -> Self
    where
        F: ObjFn + 'static,
    {
        BracketSearch {
            f: Box::new(f),
            fn_evals: 0,
        }
    }

    pub fn new_boxed(f: Box<dyn ObjFn>) -> Self {
        BracketSearch { f, fn_evals: 0 }
    }

    /// Total evaluations over every search run by this instance
    pub fn fn_evals(&self) -> usize {
        self.fn_evals
    }

    /// Bisection refinement, see [`Refinement::HalfInterval`]
    pub fn half_interval(
        &mut self,
        xmin: f64,
        xmax: f64,
        dx: f64,
        icut: usize,
        flmt: f64,
    ) -> Result<SearchResult, RootError> {
        self.search(Refinement::HalfInterval, xmin, xmax, dx, icut, flmt)
    }

    /// Secant / false position refinement, see [`Refinement::FalsePosition`]
    pub fn false_position(
        &mut self,
        xmin: f64,
        xmax: f64,
        dx: f64,
        icut: usize,
        flmt: f64,
    ) -> Result<SearchResult, RootError> {
        self.search(Refinement::FalsePosition, xmin, xmax, dx, icut, flmt)
    }

    /// Find a root of `f` in `[xmin, xmax]`
    ///
    /// # Arguments
    /// * `xmin`, `xmax` - Scan range, sampled at `xmin + i * dx`
    /// * `dx` - Scan increment, must be positive and finite
    /// * `icut` - Extra evaluations allowed after the sign change
    /// * `flmt` - Limit on `|f(x)|`, larger values are reported as a pole
    ///
    /// # Errors
    /// * `InvalidStepSize` if `dx` is not positive and finite
    /// * `Discontinuity` if `|f(x)| > flmt` at an evaluated point
    /// * `NoRoot` if the scan passes `xmax`, or can no longer advance by `dx`,
    ///   without a sign change
    /// * `IterationLimit` if refinement uses more than `icut` evaluations
    pub fn search(
        &mut self,
        refinement: Refinement,
        xmin: f64,
        xmax: f64,
        dx: f64,
        icut: usize,
        flmt: f64,
    ) -> Result<SearchResult, RootError> {
        if !(dx > 0.0 && dx.is_finite()) {
            return Err(RootError::InvalidStepSize);
        }

        let mut bracket = Bracket::default();
        let mut history = History::default();
        let mut x = xmin;
        let mut evals = 0;
        let mut limit = 0;

        loop {
            let fx = self.f.call_scalar(x);
            evals += 1;
            self.fn_evals += 1;
            trace!(evals, x, fx, "bracket search");

            if fx == 0.0 {
                debug!(x, evals, "bracket search hit an exact zero");
                return Ok(SearchResult {
                    x,
                    fx,
                    fn_evals: evals,
                });
            }
            if exceeds(fx, flmt) {
                warn!(x, fx, flmt, "bracket search stopped at a possible discontinuity");
                return Err(RootError::Discontinuity { x, fx, limit: flmt });
            }

            let sample = Sample::new(x, fx);
            history.push(sample);
            bracket.record(sample);

            if !bracket.is_valid() {
                let next = x + dx;
                // dx below one ulp of x never reaches xmax
                if x > xmax || next == x {
                    debug!(x, fx, evals, "bracket search found no sign change");
                    return Err(RootError::NoRoot { xmin, xmax, x, fx });
                }
                x = next;
                limit = evals.saturating_add(icut);
                continue;
            }

            match refinement {
                Refinement::HalfInterval => {
                    x = 0.5 * (bracket.negative.x + bracket.positive.x);
                }
                Refinement::FalsePosition => {
                    let [_, s1, s2] = *history.samples();
                    if s1.fx != s2.fx {
                        x = s1.x - s1.fx * (s1.x - s2.x) / (s1.fx - s2.fx);
                        if bracket.excludes(x) {
                            if let Some(next) = bracket.false_position() {
                                x = next;
                            }
                        }
                    }
                }
            }

            if evals > limit {
                debug!(icut, x, fx, "bracket search ran out of iterations");
                return Err(RootError::IterationLimit { icut, x, fx });
            }
        }
    }

    /// Collect successive roots and poles in `[xmin, xmax]`.
    ///
    /// Each search restarts at `x + dx` after the previous outcome. The scan
    /// stops at the first `NoRoot`, once a result lies beyond `xmax`, or after
    /// `max_entries` entries.
    #[allow(clippy::too_many_arguments)]
    pub fn scan_roots(
        &mut self,
        refinement: Refinement,
        xmin: f64,
        xmax: f64,
        dx: f64,
        icut: usize,
        flmt: f64,
        max_entries: usize,
    ) -> Result<Vec<ScanEntry>, RootError> {
        let mut entries = Vec::new();
        let mut start = xmin;

        while entries.len() < max_entries {
            let (x, fx, kind) = match self.search(refinement, start, xmax, dx, icut, flmt) {
                Ok(result) => (result.x, result.fx, ScanKind::Root),
                Err(RootError::Discontinuity { x, fx, .. }) => (x, fx, ScanKind::Pole),
                Err(RootError::IterationLimit { x, fx, .. }) => (x, fx, ScanKind::Unconverged),
                Err(RootError::NoRoot { .. }) => break,
                Err(e) => return Err(e),
            };
            let entry = ScanEntry { x, fx, kind };
            debug!(%entry, "scan");
            entries.push(entry);
            if x > xmax {
                break;
            }
            start = x + dx;
        }

        Ok(entries)
    }
}

impl fmt::Debug for BracketSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BracketSearch( fn_evals: {})", self.fn_evals)
    }
}
