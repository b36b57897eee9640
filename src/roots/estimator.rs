//! Next trial point for a scalar root search.
//!
//! [`estimate`] consumes one evaluated sample and proposes where to evaluate
//! next. It keeps the three most recent samples and the best sample seen on
//! each side of zero, and picks the first applicable method of
//!
//! 1. acceleration: secant on `u(x) = f(x) / f'(x)` built from three samples,
//!    only after [`ACCELERATION_MIN_STEPS`] steps, for slow convergence on
//!    multiple roots
//! 2. secant through the two newest samples
//! 3. false position between the bracketing samples, also used whenever the
//!    candidate above falls outside the bracket
//! 4. a naive step `x + dx`, or `x + f(x)` when `dx == 0`, which is direct
//!    substitution if the caller passes `f(x) = g(x) - x`
//!
//! The state is a plain value owned by a single search and threaded through
//! each call.

/// Number of steps before the acceleration method is tried.
pub const ACCELERATION_MIN_STEPS: usize = 13;

/// An evaluated point `(x, f(x))`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub x: f64,
    pub fx: f64,
}

impl Sample {
    pub fn new(x: f64, fx: f64) -> Self {
        Sample { x, fx }
    }
}

/// The three newest samples in call order, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct History {
    samples: [Sample; 3],
}

impl History {
    pub fn push(&mut self, sample: Sample) {
        self.samples.rotate_left(1);
        self.samples[2] = sample;
    }

    pub fn samples(&self) -> &[Sample; 3] {
        &self.samples
    }
}

/// Best samples seen on the positive (`fx >= 0`) and negative side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub positive: Sample,
    pub negative: Sample,
}

impl Default for Bracket {
    // Sentinels with the wrong sign so that no bracket is assumed
    fn default() -> Self {
        Bracket {
            positive: Sample::new(0.0, -1.0),
            negative: Sample::new(0.0, 1.0),
        }
    }
}

impl Bracket {
    pub fn record(&mut self, sample: Sample) {
        if sample.fx < 0.0 {
            self.negative = sample;
        } else {
            self.positive = sample;
        }
    }

    pub fn is_valid(&self) -> bool {
        self.positive.fx >= 0.0 && self.negative.fx < 0.0
    }

    /// True when `x` lies strictly outside the bracketing pair
    pub fn excludes(&self, x: f64) -> bool {
        (x - self.positive.x) * (x - self.negative.x) > 0.0
    }

    pub fn false_position(&self) -> Option<f64> {
        if !self.is_valid() {
            return None;
        }
        let (p, n) = (self.positive, self.negative);
        Some(p.x - p.fx * (p.x - n.x) / (p.fx - n.fx))
    }
}

/// Method that produced a trial point, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Acceleration,
    Secant,
    FalsePosition,
    NaiveStep,
}

/// Proposed next point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next: f64,
    pub method: Method,
}

/// Everything carried between two calls of [`estimate`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimatorState {
    pub history: History,
    pub bracket: Bracket,
    pub steps: usize,
}

impl EstimatorState {
    pub fn new() -> Self {
        Self::default()
    }

    fn acceleration(&self) -> Option<f64> {
        if self.steps < ACCELERATION_MIN_STEPS {
            return None;
        }
        let [s0, s1, s2] = *self.history.samples();
        let d21 = s2.fx - s1.fx;
        let d10 = s1.fx - s0.fx;
        if d21 == 0.0 || d10 == 0.0 {
            return None;
        }
        let u1 = s1.fx * (s1.x - s0.x) / d10;
        let u2 = s2.fx * (s2.x - s1.x) / d21;
        if u2 - u1 == 0.0 {
            return None;
        }
        Some(s2.x - u2 * (s2.x - s1.x) / (u2 - u1))
    }

    fn secant(&self) -> Option<f64> {
        if self.steps < 2 {
            return None;
        }
        let [_, s1, s2] = *self.history.samples();
        let d21 = s2.fx - s1.fx;
        if d21 == 0.0 {
            return None;
        }
        Some(s2.x - s2.fx * (s2.x - s1.x) / d21)
    }
}

/// Records `(x, fx)` and returns the next trial point with the updated state.
///
/// `first_call` starts a fresh search and discards `state`. `fallback_dx` is
/// only used when neither the interpolating methods nor the bracket apply.
pub fn estimate(
    x: f64,
    fx: f64,
    fallback_dx: f64,
    first_call: bool,
    state: EstimatorState,
) -> (Step, EstimatorState) {
    let mut state = if first_call {
        EstimatorState::new()
    } else {
        state
    };

    let sample = Sample::new(x, fx);
    state.steps += 1;
    state.history.push(sample);
    state.bracket.record(sample);

    let candidate = state
        .acceleration()
        .map(|next| Step {
            next,
            method: Method::Acceleration,
        })
        .or_else(|| {
            state.secant().map(|next| Step {
                next,
                method: Method::Secant,
            })
        });

    let step = match candidate {
        Some(step) if !(state.bracket.is_valid() && state.bracket.excludes(step.next)) => step,
        _ => match state.bracket.false_position() {
            Some(next) => Step {
                next,
                method: Method::FalsePosition,
            },
            None => Step {
                next: if fallback_dx != 0.0 {
                    x + fallback_dx
                } else {
                    x + fx
                },
                method: Method::NaiveStep,
            },
        },
    };

    (step, state)
}
