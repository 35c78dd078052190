//! Truncated-Newton minimization under bound constraints
//!
//! A flat-slice minimizer driven by a status-code callback. Variables are
//! scaled to comparable magnitudes, the search direction solves the Newton
//! system on the free variables by truncated conjugate gradient (Hessian
//! products by finite differences of the gradient), and steps are taken by a
//! projected backtracking line search.
//!
//! Infinite bounds are written as `±`[`HUGE_BOUND`] (or `±inf`).

use bitflags::bitflags;
use std::fmt;
use tracing::debug;

/// Value standing for an infinite bound
pub const HUGE_BOUND: f64 = f64::MAX;

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 30;

/// Final state of the routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    NoMemory,
    /// Slices of inconsistent lengths
    InvalidParameters,
    /// Some lower bound exceeds its upper bound
    Infeasible,
    /// Projected gradient small enough
    LocalMinimum,
    FConverged,
    XConverged,
    MaxFunctionEvaluations,
    LineSearchFailed,
    /// Every variable is fixed
    Constant,
    NoProgress,
    /// The callback returned a non-zero status
    UserAbort,
}

impl ReturnCode {
    pub fn code(self) -> i32 {
        match self {
            ReturnCode::NoMemory => -3,
            ReturnCode::InvalidParameters => -2,
            ReturnCode::Infeasible => -1,
            ReturnCode::LocalMinimum => 0,
            ReturnCode::FConverged => 1,
            ReturnCode::XConverged => 2,
            ReturnCode::MaxFunctionEvaluations => 3,
            ReturnCode::LineSearchFailed => 4,
            ReturnCode::Constant => 5,
            ReturnCode::NoProgress => 6,
            ReturnCode::UserAbort => 7,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ReturnCode::NoMemory => "Memory allocation failed",
            ReturnCode::InvalidParameters => "Invalid parameters (n<0)",
            ReturnCode::Infeasible => "Infeasible (low bound > up bound)",
            ReturnCode::LocalMinimum => "Local minimum reached (|pg| ~= 0)",
            ReturnCode::FConverged => "Converged (|f_n-f_(n-1)| ~= 0)",
            ReturnCode::XConverged => "Converged (|x_n-x_(n-1)| ~= 0)",
            ReturnCode::MaxFunctionEvaluations => "Maximum number of function evaluations reached",
            ReturnCode::LineSearchFailed => "Linear search failed",
            ReturnCode::Constant => "All lower bounds are equal to the upper bounds",
            ReturnCode::NoProgress => "Unable to progress",
            ReturnCode::UserAbort => "User requested end of minimization",
        }
    }

    /// Local minimum, f-converged or x-converged
    pub fn is_converged(self) -> bool {
        matches!(
            self,
            ReturnCode::LocalMinimum | ReturnCode::FConverged | ReturnCode::XConverged
        )
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

bitflags! {
    /// Diagnostics the routine emits through `tracing`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Messages: u8 {
        /// One line per iteration
        const ITERATIONS = 0b0001;
        /// Resolved settings
        const INFO = 0b0010;
        /// Routine identification
        const VERSION = 0b0100;
        /// Exit code
        const EXIT = 0b1000;
        const ALL = Self::ITERATIONS.bits() | Self::INFO.bits() | Self::VERSION.bits() | Self::EXIT.bits();
    }
}

/// Tuning of [`minimize`]
///
/// Out-of-range values select the defaults:
/// - `max_cg_iterations < 0`: `max(1, min(50, n / 2))`; `0` means steepest descent
/// - `eta` outside `[0, 1]`: `0.25`
/// - `stepmx` too small: `10`
/// - `accuracy <= EPSILON`: `sqrt(EPSILON)`
/// - `ftol < 0`: `accuracy`
/// - `xtol < 0`: `sqrt(EPSILON)`
/// - `pgtol < 0`: `1e-2 * sqrt(accuracy)`
/// - `rescale < 0`: `1.3`
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineOptions {
    pub messages: Messages,
    /// Hessian-vector products per iteration
    pub max_cg_iterations: i32,
    /// Function evaluation budget
    pub max_evaluations: usize,
    /// Line search severity
    pub eta: f64,
    /// Maximum line search step, may grow during the run
    pub stepmx: f64,
    /// Relative precision of the finite differences
    pub accuracy: f64,
    /// Estimate of the minimum value, sizes steepest-descent steps
    pub fmin: f64,
    pub ftol: f64,
    /// Applies to scaled variables
    pub xtol: f64,
    /// Applies to the scaled projected gradient
    pub pgtol: f64,
    /// log10 of the gradient norm beyond which f is rescaled; 0 rescales every iteration
    pub rescale: f64,
    /// Per-variable scale; `0` marks a variable as constant
    pub scale: Option<Vec<f64>>,
    /// Per-variable offset subtracted before scaling
    pub offset: Option<Vec<f64>>,
}

impl Default for RoutineOptions {
    fn default() -> Self {
        Self {
            messages: Messages::empty(),
            max_cg_iterations: -1,
            max_evaluations: 100,
            eta: -1.0,
            stepmx: 0.0,
            accuracy: 0.0,
            fmin: 0.0,
            ftol: -1.0,
            xtol: -1.0,
            pgtol: -1.0,
            rescale: -1.0,
            scale: None,
            offset: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Resolved {
    max_cg: usize,
    eta: f64,
    stepmx: f64,
    accuracy: f64,
    ftol: f64,
    xtol: f64,
    pgtol: f64,
    rescale: f64,
}

impl RoutineOptions {
    fn resolve(&self, n: usize) -> Resolved {
        let eps = f64::EPSILON;
        let rteps = eps.sqrt();
        let max_cg = if self.max_cg_iterations < 0 {
            (n / 2).clamp(1, 50)
        } else {
            self.max_cg_iterations as usize
        };
        let accuracy = if self.accuracy <= eps { rteps } else { self.accuracy };
        Resolved {
            max_cg,
            eta: if (0.0..=1.0).contains(&self.eta) { self.eta } else { 0.25 },
            stepmx: if self.stepmx < rteps * 10.0 { 10.0 } else { self.stepmx },
            accuracy,
            ftol: if self.ftol < 0.0 { accuracy } else { self.ftol },
            xtol: if self.xtol < 0.0 { rteps } else { self.xtol },
            pgtol: if self.pgtol < 0.0 { 1e-2 * accuracy.sqrt() } else { self.pgtol },
            rescale: if self.rescale < 0.0 { 1.3 } else { self.rescale },
        }
    }
}

/// What [`minimize`] leaves behind besides the updated point
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub code: ReturnCode,
    /// Objective at the returned point
    pub f: f64,
    /// Gradient at the returned point, zero on constant variables
    pub gradient: Vec<f64>,
    pub evaluations: usize,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn is_finite_bound(v: f64) -> bool {
    v.is_finite() && v.abs() < HUGE_BOUND
}

/// Calls the user function on unscaled points and scales what it returns
struct Evaluator<F> {
    callback: F,
    xscale: Vec<f64>,
    xoffset: Vec<f64>,
    fscale: f64,
    evaluations: usize,
    max_evaluations: usize,
    x: Vec<f64>,
    g: Vec<f64>,
}

impl<F> Evaluator<F>
where
    F: FnMut(&[f64], &mut f64, &mut [f64]) -> i32,
{
    fn unscale(&self, y: &[f64], x: &mut [f64]) {
        for i in 0..y.len() {
            x[i] = y[i] * self.xscale[i] + self.xoffset[i];
        }
    }

    fn evaluate(&mut self, y: &[f64], g: &mut [f64]) -> Result<f64, ReturnCode> {
        if self.evaluations >= self.max_evaluations {
            return Err(ReturnCode::MaxFunctionEvaluations);
        }
        for i in 0..y.len() {
            self.x[i] = y[i] * self.xscale[i] + self.xoffset[i];
        }
        let mut f = 0.0;
        let status = (self.callback)(&self.x, &mut f, &mut self.g);
        self.evaluations += 1;
        if status != 0 {
            return Err(ReturnCode::UserAbort);
        }
        for i in 0..y.len() {
            g[i] = self.g[i] * self.xscale[i] * self.fscale;
        }
        Ok(f * self.fscale)
    }
}

/// Search space after scaling, with the free-variable mask
struct Space {
    low: Vec<f64>,
    up: Vec<f64>,
    constant: Vec<bool>,
}

impl Space {
    fn project(&self, y: &[f64], p: &[f64], alpha: f64) -> Vec<f64> {
        y.iter()
            .zip(p)
            .enumerate()
            .map(|(i, (yi, pi))| (yi + alpha * pi).max(self.low[i]).min(self.up[i]))
            .collect()
    }

    /// Variables not held at a bound by the gradient
    fn free(&self, y: &[f64], g: &[f64]) -> Vec<bool> {
        (0..y.len())
            .map(|i| {
                !self.constant[i]
                    && !(y[i] <= self.low[i] && g[i] > 0.0)
                    && !(y[i] >= self.up[i] && g[i] < 0.0)
            })
            .collect()
    }

    fn is_feasible(&self, y: &[f64]) -> bool {
        y.iter()
            .enumerate()
            .all(|(i, &v)| v >= self.low[i] && v <= self.up[i])
    }
}

fn masked(v: &[f64], free: &[bool]) -> Vec<f64> {
    v.iter()
        .zip(free)
        .map(|(&x, &is_free)| if is_free { x } else { 0.0 })
        .collect()
}

/// Finite-difference product of the Hessian with `d`, restricted to free variables
fn hessian_vector<F>(
    eval: &mut Evaluator<F>,
    space: &Space,
    y: &[f64],
    g: &[f64],
    d: &[f64],
    free: &[bool],
    accuracy: f64,
) -> Result<Vec<f64>, ReturnCode>
where
    F: FnMut(&[f64], &mut f64, &mut [f64]) -> i32,
{
    let dnorm = norm(d);
    if dnorm == 0.0 {
        return Ok(vec![0.0; d.len()]);
    }
    let delta = accuracy.sqrt() * (1.0 + norm(y)) / dnorm;
    let mut shifted: Vec<f64> = y.iter().zip(d).map(|(yi, di)| yi + delta * di).collect();
    // Backward difference when the forward point leaves the box
    let sign = if space.is_feasible(&shifted) {
        1.0
    } else {
        shifted = y.iter().zip(d).map(|(yi, di)| yi - delta * di).collect();
        -1.0
    };
    let mut gp = vec![0.0; d.len()];
    eval.evaluate(&shifted, &mut gp)?;
    let hd: Vec<f64> = gp
        .iter()
        .zip(g)
        .map(|(a, b)| sign * (a - b) / delta)
        .collect();
    Ok(masked(&hd, free))
}

/// Approximate Newton direction; the flag tells a steepest-descent fallback
///
/// CG stops once the residual falls below `forcing` times the projected
/// gradient norm.
#[allow(clippy::too_many_arguments)]
fn truncated_cg<F>(
    eval: &mut Evaluator<F>,
    space: &Space,
    y: &[f64],
    g: &[f64],
    free: &[bool],
    forcing: f64,
    settings: &Resolved,
) -> Result<(Vec<f64>, bool), ReturnCode>
where
    F: FnMut(&[f64], &mut f64, &mut [f64]) -> i32,
{
    let mut r: Vec<f64> = masked(g, free).iter().map(|v| -v).collect();
    // CG is exact after as many steps as there are free variables
    let max_cg = settings.max_cg.min(free.iter().filter(|&&f| f).count());
    if max_cg == 0 {
        return Ok((r, true));
    }
    let tolerance = forcing * norm(&r);
    let mut p = vec![0.0; r.len()];
    let mut d = r.clone();
    let mut rr = dot(&r, &r);

    for k in 0..max_cg {
        let hd = hessian_vector(eval, space, y, g, &d, free, settings.accuracy)?;
        let curvature = dot(&d, &hd);
        if curvature <= f64::EPSILON * dot(&d, &d) {
            if k == 0 {
                return Ok((d, true));
            }
            break;
        }
        let a = rr / curvature;
        for i in 0..p.len() {
            p[i] += a * d[i];
            r[i] -= a * hd[i];
        }
        let rr_next = dot(&r, &r);
        if rr_next.sqrt() <= tolerance {
            break;
        }
        let beta = rr_next / rr;
        for i in 0..d.len() {
            d[i] = r[i] + beta * d[i];
        }
        rr = rr_next;
    }
    Ok((p, false))
}

struct Step {
    y: Vec<f64>,
    f: f64,
    g: Vec<f64>,
    alpha: f64,
    /// Evaluation failure met while extrapolating past an accepted point
    interrupted: Option<ReturnCode>,
}

/// Projected backtracking line search, extrapolating while the slope stays steep
#[allow(clippy::too_many_arguments)]
fn line_search<F>(
    eval: &mut Evaluator<F>,
    space: &Space,
    y: &[f64],
    f: f64,
    g: &[f64],
    p: &[f64],
    alpha0: f64,
    alpha_max: f64,
    eta: f64,
) -> Result<Step, ReturnCode>
where
    F: FnMut(&[f64], &mut f64, &mut [f64]) -> i32,
{
    let slope = dot(g, p);
    let mut alpha = alpha0;
    let mut trial_g = vec![0.0; y.len()];
    let mut accepted = None;

    for attempt in 0..MAX_BACKTRACKS {
        let trial = space.project(y, p, alpha);
        if trial == y {
            return Err(ReturnCode::NoProgress);
        }
        let ft = eval.evaluate(&trial, &mut trial_g)?;
        let decrease: f64 = dot(g, &trial) - dot(g, y);
        if ft.is_finite() && ft < f && ft <= f + ARMIJO * decrease {
            accepted = Some((trial, ft, attempt == 0));
            break;
        }
        // Safeguarded quadratic interpolation
        let quadratic = -slope * alpha * alpha / (2.0 * (ft - f - slope * alpha));
        alpha = if quadratic.is_finite() {
            quadratic.clamp(0.1 * alpha, 0.5 * alpha)
        } else {
            0.5 * alpha
        };
    }

    let Some((mut best, mut best_f, first_try)) = accepted else {
        return Err(ReturnCode::LineSearchFailed);
    };
    let mut interrupted = None;
    if first_try {
        let mut next_g = vec![0.0; y.len()];
        while alpha < alpha_max {
            let trial_slope = dot(&trial_g, p);
            if trial_slope >= 0.0 || trial_slope.abs() <= eta * slope.abs() {
                break;
            }
            let next_alpha = (2.0 * alpha).min(alpha_max);
            let next = space.project(y, p, next_alpha);
            if next == best {
                break;
            }
            match eval.evaluate(&next, &mut next_g) {
                Ok(fn_) if fn_ < best_f => {
                    alpha = next_alpha;
                    best = next;
                    best_f = fn_;
                    std::mem::swap(&mut trial_g, &mut next_g);
                }
                Ok(_) => break,
                Err(code) => {
                    interrupted = Some(code);
                    break;
                }
            }
        }
    }
    Ok(Step {
        y: best,
        f: best_f,
        g: trial_g,
        alpha,
        interrupted,
    })
}

/// Minimize the function behind `callback` over the box `[low, up]`
///
/// `x` holds the starting point on entry and the solution on exit. The
/// callback receives a point, writes the objective and its gradient, and
/// returns `0`; any other status ends the minimization with
/// [`ReturnCode::UserAbort`].
pub fn minimize<F>(
    x: &mut [f64],
    low: &[f64],
    up: &[f64],
    options: &RoutineOptions,
    callback: F,
) -> Minimum
where
    F: FnMut(&[f64], &mut f64, &mut [f64]) -> i32,
{
    let n = x.len();
    let mut minimum = Minimum {
        code: ReturnCode::InvalidParameters,
        f: 0.0,
        gradient: vec![0.0; n],
        evaluations: 0,
    };
    let lengths_ok = low.len() == n
        && up.len() == n
        && options.scale.as_ref().map_or(true, |s| s.len() == n)
        && options.offset.as_ref().map_or(true, |o| o.len() == n);
    if !lengths_ok {
        return minimum;
    }
    if low.iter().zip(up).any(|(l, u)| l > u) {
        minimum.code = ReturnCode::Infeasible;
        return minimum;
    }

    let settings = options.resolve(n);
    if options.messages.contains(Messages::VERSION) {
        debug!("truncated-Newton bound-constrained minimizer, {n} variables");
    }
    if options.messages.contains(Messages::INFO) {
        debug!(?settings, max_evaluations = options.max_evaluations, "resolved settings");
    }

    for i in 0..n {
        x[i] = x[i].max(low[i]).min(up[i]);
    }

    // Scaling: y = (x - offset) / scale, constant variables have scale 0
    let mut xscale = vec![0.0; n];
    let mut xoffset = vec![0.0; n];
    let mut constant = vec![false; n];
    for i in 0..n {
        let bounded = is_finite_bound(low[i]) && is_finite_bound(up[i]);
        let user_scale = options.scale.as_ref().map(|s| s[i].abs());
        constant[i] = low[i] == up[i] || user_scale == Some(0.0);
        if constant[i] {
            xoffset[i] = x[i];
            continue;
        }
        xscale[i] = match user_scale {
            Some(s) => s,
            None if bounded => up[i] - low[i],
            None => 1.0 + x[i].abs(),
        };
        xoffset[i] = match &options.offset {
            Some(offset) => offset[i],
            None if bounded => 0.5 * (up[i] + low[i]),
            None => x[i],
        };
    }
    let scaled = |v: f64, i: usize, infinite: f64| {
        if constant[i] {
            0.0
        } else if is_finite_bound(v) {
            (v - xoffset[i]) / xscale[i]
        } else {
            infinite
        }
    };
    let space = Space {
        low: (0..n).map(|i| scaled(low[i], i, f64::NEG_INFINITY)).collect(),
        up: (0..n).map(|i| scaled(up[i], i, f64::INFINITY)).collect(),
        constant: constant.clone(),
    };
    let mut y: Vec<f64> = (0..n).map(|i| scaled(x[i], i, 0.0)).collect();

    let mut eval = Evaluator {
        callback,
        xscale,
        xoffset,
        fscale: 1.0,
        evaluations: 0,
        max_evaluations: options.max_evaluations,
        x: vec![0.0; n],
        g: vec![0.0; n],
    };
    let mut g = vec![0.0; n];
    let mut f = 0.0;

    let code = run(&mut eval, &space, &settings, options, &mut y, &mut f, &mut g);

    eval.unscale(&y, x);
    minimum.code = code;
    minimum.f = f / eval.fscale;
    for i in 0..n {
        minimum.gradient[i] = if eval.xscale[i] == 0.0 {
            0.0
        } else {
            g[i] / (eval.xscale[i] * eval.fscale)
        };
    }
    minimum.evaluations = eval.evaluations;
    if options.messages.contains(Messages::EXIT) {
        debug!(code = code.code(), evaluations = minimum.evaluations, f = minimum.f, "{}", code.message());
    }
    minimum
}

fn run<F>(
    eval: &mut Evaluator<F>,
    space: &Space,
    settings: &Resolved,
    options: &RoutineOptions,
    y: &mut Vec<f64>,
    f: &mut f64,
    g: &mut Vec<f64>,
) -> ReturnCode
where
    F: FnMut(&[f64], &mut f64, &mut [f64]) -> i32,
{
    *f = match eval.evaluate(y, g) {
        Ok(value) => value,
        Err(code) => return code,
    };
    if space.constant.iter().all(|&c| c) {
        return ReturnCode::Constant;
    }

    let mut stepmx = settings.stepmx;
    let mut initial_pgnorm = None;
    for iteration in 0usize.. {
        let gnorm = norm(g);
        if gnorm > 10.0 * f64::EPSILON
            && (settings.rescale == 0.0 || gnorm.log10().abs() > settings.rescale)
        {
            let factor = 1.0 / gnorm;
            *f *= factor;
            g.iter_mut().for_each(|v| *v *= factor);
            eval.fscale *= factor;
        }

        let free = space.free(y, g);
        let pg = masked(g, &free);
        let pgnorm = norm(&pg);
        if options.messages.contains(Messages::ITERATIONS) {
            debug!(
                iteration,
                evaluations = eval.evaluations,
                f = *f / eval.fscale,
                pgnorm = pgnorm / eval.fscale,
                "tnc iteration"
            );
        }
        if pgnorm <= settings.pgtol * eval.fscale {
            return ReturnCode::LocalMinimum;
        }

        // Forcing term relative to the first projected gradient, independent of fscale
        let true_pgnorm = pgnorm / eval.fscale;
        let reference = *initial_pgnorm.get_or_insert(true_pgnorm);
        let forcing = (true_pgnorm / reference).sqrt().min(0.5);
        let direction = truncated_cg(eval, space, y, g, &free, forcing, settings);
        let (mut p, mut steepest) = match direction {
            Ok(direction) => direction,
            Err(code) => return code,
        };
        let mut slope = dot(g, &p);
        if slope >= 0.0 {
            p = pg.iter().map(|v| -v).collect();
            slope = -pgnorm * pgnorm;
            steepest = true;
        }
        let pnorm = norm(&p);
        if pnorm == 0.0 || slope >= 0.0 {
            return ReturnCode::NoProgress;
        }

        let alpha_max = stepmx / pnorm;
        let mut alpha0 = alpha_max.min(1.0);
        let fmin = options.fmin * eval.fscale;
        if steepest && *f > fmin {
            alpha0 = alpha0.min(2.0 * (*f - fmin) / -slope);
        }

        let step = match line_search(eval, space, y, *f, g, &p, alpha0, alpha_max, settings.eta) {
            Ok(step) => step,
            Err(code) => return code,
        };
        if step.alpha >= alpha_max {
            stepmx *= 10.0;
        }
        let dx = norm(
            &step
                .y
                .iter()
                .zip(y.iter())
                .map(|(a, b)| a - b)
                .collect::<Vec<_>>(),
        );
        let df = *f - step.f;
        *y = step.y;
        *f = step.f;
        *g = step.g;

        if let Some(code) = step.interrupted {
            return code;
        }
        if df.abs() <= settings.ftol * eval.fscale {
            return ReturnCode::FConverged;
        }
        if dx <= settings.xtol {
            return ReturnCode::XConverged;
        }
    }
    ReturnCode::NoProgress
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// (x0 - 1)^2 + 10 (x1 + 2)^2
    fn quadratic(x: &[f64], f: &mut f64, g: &mut [f64]) -> i32 {
        *f = (x[0] - 1.0).powi(2) + 10.0 * (x[1] + 2.0).powi(2);
        g[0] = 2.0 * (x[0] - 1.0);
        g[1] = 20.0 * (x[1] + 2.0);
        0
    }

    fn unbounded(n: usize) -> (Vec<f64>, Vec<f64>) {
        (vec![-HUGE_BOUND; n], vec![HUGE_BOUND; n])
    }

    #[test]
    fn test_default_resolution() {
        let resolved = RoutineOptions::default().resolve(10);
        assert_eq!(resolved.max_cg, 5);
        assert_eq!(resolved.eta, 0.25);
        assert_eq!(resolved.stepmx, 10.0);
        assert_eq!(resolved.accuracy, f64::EPSILON.sqrt());
        assert_eq!(resolved.ftol, resolved.accuracy);
        assert_eq!(resolved.xtol, f64::EPSILON.sqrt());
        assert_relative_eq!(resolved.pgtol, 1e-2 * resolved.accuracy.sqrt());
        assert_eq!(resolved.rescale, 1.3);

        assert_eq!(RoutineOptions::default().resolve(1).max_cg, 1);
        assert_eq!(RoutineOptions::default().resolve(1000).max_cg, 50);
    }

    #[test]
    fn test_unconstrained_quadratic() {
        let (low, up) = unbounded(2);
        let mut x = vec![5.0, 5.0];
        let options = RoutineOptions {
            max_cg_iterations: 5,
            max_evaluations: 200,
            ftol: 1e-14,
            ..Default::default()
        };
        let minimum = minimize(&mut x, &low, &up, &options, quadratic);
        assert!(minimum.code.is_converged(), "{}", minimum.code);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(x[1], -2.0, epsilon = 1e-4);
        assert!(minimum.f < 1e-7);
        assert!(minimum.evaluations <= 200);
    }

    #[test]
    fn test_minimum_on_bound() {
        let mut x = vec![0.0, 0.0];
        let low = vec![-HUGE_BOUND, -1.0];
        let up = vec![0.5, HUGE_BOUND];
        let options = RoutineOptions {
            max_evaluations: 200,
            ..Default::default()
        };
        let minimum = minimize(&mut x, &low, &up, &options, quadratic);
        assert!(minimum.code.is_converged(), "{}", minimum.code);
        assert_relative_eq!(x[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(x[1], -1.0, epsilon = 1e-6);
        assert_relative_eq!(minimum.f, 10.25, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_and_infeasible() {
        let mut x = vec![0.0, 0.0];
        let minimum = minimize(&mut x, &[0.0], &[1.0, 1.0], &RoutineOptions::default(), quadratic);
        assert_eq!(minimum.code, ReturnCode::InvalidParameters);
        assert_eq!(minimum.evaluations, 0);

        let minimum = minimize(&mut x, &[0.0, 2.0], &[1.0, 1.0], &RoutineOptions::default(), quadratic);
        assert_eq!(minimum.code, ReturnCode::Infeasible);
        assert_eq!(minimum.code.code(), -1);
    }

    #[test]
    fn test_all_constant() {
        let mut x = vec![3.0, 4.0];
        let minimum = minimize(&mut x, &[0.5, -1.0], &[0.5, -1.0], &RoutineOptions::default(), quadratic);
        assert_eq!(minimum.code, ReturnCode::Constant);
        assert_eq!(x, vec![0.5, -1.0]);
        assert_eq!(minimum.evaluations, 1);
        assert_relative_eq!(minimum.f, 10.25);
    }

    #[test]
    fn test_user_abort_and_budget() {
        let (low, up) = unbounded(2);
        let mut calls = 0;
        let mut x = vec![5.0, 5.0];
        let minimum = minimize(&mut x, &low, &up, &RoutineOptions::default(), |x, f, g| {
            calls += 1;
            if calls > 3 {
                return 1;
            }
            quadratic(x, f, g)
        });
        assert_eq!(minimum.code, ReturnCode::UserAbort);
        assert_eq!(minimum.evaluations, 4);

        let mut x = vec![5.0, 5.0];
        let options = RoutineOptions {
            max_evaluations: 2,
            ..Default::default()
        };
        let minimum = minimize(&mut x, &low, &up, &options, quadratic);
        assert_eq!(minimum.code, ReturnCode::MaxFunctionEvaluations);
        assert_eq!(minimum.evaluations, 2);
    }

    #[test]
    fn test_steepest_descent_only() {
        let (low, up) = unbounded(2);
        let mut x = vec![2.0, -1.0];
        let options = RoutineOptions {
            max_cg_iterations: 0,
            max_evaluations: 500,
            messages: Messages::ALL,
            ..Default::default()
        };
        let minimum = minimize(&mut x, &low, &up, &options, quadratic);
        assert!(minimum.code.is_converged(), "{}", minimum.code);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(x[1], -2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ReturnCode::LocalMinimum.code(), 0);
        assert_eq!(ReturnCode::UserAbort.code(), 7);
        assert!(ReturnCode::XConverged.is_converged());
        assert!(!ReturnCode::MaxFunctionEvaluations.is_converged());
        assert_eq!(
            ReturnCode::LineSearchFailed.to_string(),
            "Linear search failed (4)"
        );
        assert!(Messages::ALL.contains(Messages::EXIT));
    }
}
