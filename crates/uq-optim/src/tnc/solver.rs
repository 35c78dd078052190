//! Truncated-Newton solver for bound-constrained problems

use super::parameters::TncParameters;
use super::routine::{self, HUGE_BOUND};
use crate::config::SolverSettings;
use crate::problem::OptimizationProblem;
use crate::result::OptimizationResult;
use crate::solver::OptimizationSolver;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uq_core::{Error, Id, Interval, PersistentId, Point, Result, Sample};
use uq_persistence::{Advocate, Buildable, PersistentObject};

/// Bridges an [`OptimizationProblem`] to [`routine::minimize`]
///
/// Only bound constraints are supported; multi-objective and constrained
/// problems are rejected before the routine runs.
///
/// ```rust
/// use uq_core::{Interval, Point};
/// use uq_optim::{ClosureFunction, OptimizationProblem, OptimizationSolver, Tnc};
///
/// let objective = ClosureFunction::scalar(1, |x| (x[0] - 3.0).powi(2));
/// let problem = OptimizationProblem::new(objective)
///     .with_bounds(Interval::new(Point::new(vec![0.0]), Point::new(vec![2.0]))?)?;
/// let mut solver = Tnc::new(problem);
/// solver.set_starting_point(Point::new(vec![1.0]));
/// solver.run()?;
/// assert!((solver.result().optimal_point[0] - 2.0).abs() < 1e-6);
/// # Ok::<(), uq_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tnc {
    id: PersistentId,
    problem: Option<OptimizationProblem>,
    starting_point: Point,
    settings: SolverSettings,
    parameters: TncParameters,
    result: OptimizationResult,
}

impl Tnc {
    /// Solver for `problem`; the problem is checked when the solver runs
    pub fn new(problem: OptimizationProblem) -> Self {
        Self {
            problem: Some(problem),
            ..Self::default()
        }
    }

    pub fn with_parameters(parameters: TncParameters, problem: OptimizationProblem) -> Self {
        Self {
            parameters,
            ..Self::new(problem)
        }
    }

    pub fn parameters(&self) -> &TncParameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: TncParameters) {
        self.parameters = parameters;
    }
}

impl OptimizationSolver for Tnc {
    fn check_problem(&self, problem: &OptimizationProblem) -> Result<()> {
        if problem.has_multiple_objective() {
            return Err(Error::InvalidArgument(
                "Tnc does not support multi-objective optimization".to_string(),
            ));
        }
        let outputs = problem.objective().output_dimension();
        if outputs != 1 {
            return Err(Error::InvalidArgument(format!(
                "Tnc needs a scalar objective, got {outputs} outputs"
            )));
        }
        if problem.has_equality_constraint() || problem.has_inequality_constraint() {
            return Err(Error::InvalidArgument(
                "Tnc does not support constraints".to_string(),
            ));
        }
        Ok(())
    }

    fn problem(&self) -> Option<&OptimizationProblem> {
        self.problem.as_ref()
    }

    fn set_problem(&mut self, problem: OptimizationProblem) -> Result<()> {
        self.check_problem(&problem)?;
        self.problem = Some(problem);
        Ok(())
    }

    fn starting_point(&self) -> &Point {
        &self.starting_point
    }

    fn set_starting_point(&mut self, point: Point) {
        self.starting_point = point;
    }

    fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut SolverSettings {
        &mut self.settings
    }

    #[instrument(skip_all, fields(solver = "Tnc"))]
    fn run(&mut self) -> Result<()> {
        self.result = OptimizationResult::default();
        let problem = self
            .problem
            .clone()
            .ok_or_else(|| Error::InvalidArgument("Tnc has no problem to solve".to_string()))?;
        self.check_problem(&problem)?;

        let dimension = problem.dimension();
        let bounds = problem
            .bounds()
            .cloned()
            .unwrap_or_else(|| Interval::unbounded(dimension));
        if bounds.dimension() != dimension {
            return Err(Error::dimension_mismatch(
                dimension,
                bounds.dimension(),
                "bounds of a bound-constrained problem",
            ));
        }
        let (low, up) = sentinel_bounds(&bounds);

        let mut x = self.starting_point.to_vec();
        if x.len() != dimension {
            warn!(
                expected = dimension,
                actual = x.len(),
                "The given starting point has a dimension incompatible with the objective function. \
                 Using the midpoint of the constraints as a starting point."
            );
            x = low.iter().zip(&up).map(|(l, u)| 0.5 * (l + u)).collect();
        }

        let sign = if problem.is_minimization() { 1.0 } else { -1.0 };
        let options = self.parameters.routine_options(&self.settings);
        let mut state = CallbackState::new(&problem);
        let minimum = routine::minimize(&mut x, &low, &up, &options, |x, f, g| {
            state.compute_objective_and_gradient(x, f, g)
        });
        let (input_history, output_history, failure) = state.into_parts();
        if let Some(err) = failure {
            return Err(err);
        }

        let errors = ErrorEstimates::from_history(&input_history, &output_history, &bounds, &low, &up);
        self.result = OptimizationResult {
            optimal_point: Point::new(x),
            optimal_value: sign * minimum.f,
            evaluation_number: minimum.evaluations,
            absolute_error: errors.absolute,
            relative_error: errors.relative,
            residual_error: errors.residual,
            constraint_error: errors.constraint,
            input_history,
            output_history,
        };
        debug!(
            code = minimum.code.code(),
            evaluations = minimum.evaluations,
            value = self.result.optimal_value,
            "tnc finished"
        );

        let settings = &self.settings;
        let convergence = (errors.absolute < settings.maximum_absolute_error
            && errors.relative < settings.maximum_relative_error)
            || (errors.residual < settings.maximum_residual_error
                && errors.constraint < settings.maximum_constraint_error);
        if !minimum.code.is_converged() {
            warn!(
                "TNC algorithm failed to converge. The error message is {}",
                minimum.code.message()
            );
        } else if !convergence {
            warn!("The TNC algorithm could not enforce the convergence criteria");
        }
        Ok(())
    }

    fn result(&self) -> &OptimizationResult {
        &self.result
    }
}

/// Bounds with infinite sides replaced by `±HUGE_BOUND`
pub fn sentinel_bounds(bounds: &Interval) -> (Vec<f64>, Vec<f64>) {
    let low = bounds
        .lower_bound()
        .iter()
        .zip(bounds.finite_lower_bound())
        .map(|(&v, &finite)| if finite { v } else { -HUGE_BOUND })
        .collect();
    let up = bounds
        .upper_bound()
        .iter()
        .zip(bounds.finite_upper_bound())
        .map(|(&v, &finite)| if finite { v } else { HUGE_BOUND })
        .collect();
    (low, up)
}

/// What the routine callback works on
///
/// Every successful evaluation is appended to the histories: the input
/// point, then the objective value and the gradient norm.
pub struct CallbackState<'a> {
    problem: &'a OptimizationProblem,
    input_history: Sample,
    output_history: Sample,
    failure: Option<Error>,
}

impl<'a> CallbackState<'a> {
    pub fn new(problem: &'a OptimizationProblem) -> Self {
        Self {
            problem,
            input_history: Sample::with_dimension(problem.dimension()),
            output_history: Sample::with_dimension(2),
            failure: None,
        }
    }

    /// Histories and the error that made the callback stop, if any
    pub fn into_parts(self) -> (Sample, Sample, Option<Error>) {
        (self.input_history, self.output_history, self.failure)
    }

    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    pub fn evaluation_count(&self) -> usize {
        self.input_history.len()
    }

    /// Routine callback: writes the signed objective and gradient
    ///
    /// Returns `1` when the problem has an unsupported shape or the
    /// objective fails (the error is kept), and also when the gradient fails
    /// (the error is dropped so the routine decides what to do).
    pub fn compute_objective_and_gradient(&mut self, x: &[f64], f: &mut f64, g: &mut [f64]) -> i32 {
        let problem = self.problem;
        if problem.has_multiple_objective() {
            self.failure = Some(Error::InvalidArgument(
                "Tnc does not support multi-objective optimization".to_string(),
            ));
            return 1;
        }
        if problem.has_inequality_constraint() || problem.has_equality_constraint() {
            self.failure = Some(Error::InvalidArgument(
                "Tnc does not support constraints".to_string(),
            ));
            return 1;
        }

        let objective = problem.objective();
        let value = match objective.evaluate(x) {
            Ok(y) => match y.first() {
                Some(&value) => value,
                None => {
                    self.failure = Some(Error::Evaluation(
                        "objective returned no value".to_string(),
                    ));
                    return 1;
                }
            },
            Err(err) => {
                self.failure = Some(Error::Evaluation(format!(
                    "objective evaluation failed: {err}"
                )));
                return 1;
            }
        };
        let sign = if problem.is_minimization() { 1.0 } else { -1.0 };
        *f = sign * value;

        let gradient = match objective.gradient(x) {
            Ok(gradient) => gradient,
            Err(err) => {
                debug!(%err, "gradient evaluation failed");
                return 1;
            }
        };
        if gradient.nrows() != g.len() || gradient.ncols() == 0 {
            debug!(
                rows = gradient.nrows(),
                columns = gradient.ncols(),
                expected = g.len(),
                "gradient has the wrong shape"
            );
            return 1;
        }
        let mut norm_squared = 0.0;
        for (i, gi) in g.iter_mut().enumerate() {
            let component = gradient[(i, 0)];
            *gi = sign * component;
            norm_squared += component * component;
        }

        let recorded = self
            .input_history
            .add(x)
            .and_then(|_| self.output_history.add(&[value, norm_squared.sqrt()]));
        if let Err(err) = recorded {
            self.failure = Some(err);
            return 1;
        }
        0
    }
}

struct ErrorEstimates {
    absolute: f64,
    relative: f64,
    residual: f64,
    constraint: f64,
}

impl ErrorEstimates {
    /// Errors between the last two evaluations, `-1` each with fewer than two
    fn from_history(inputs: &Sample, outputs: &Sample, bounds: &Interval, low: &[f64], up: &[f64]) -> Self {
        let size = inputs.len();
        let (Some(previous), Some(last), Some(y_previous), Some(y_last)) = (
            size.checked_sub(2).and_then(|i| inputs.row(i)),
            size.checked_sub(1).and_then(|i| inputs.row(i)),
            size.checked_sub(2).and_then(|i| outputs.row(i)),
            size.checked_sub(1).and_then(|i| outputs.row(i)),
        ) else {
            return Self {
                absolute: -1.0,
                relative: -1.0,
                residual: -1.0,
                constraint: -1.0,
            };
        };

        let absolute = last
            .iter()
            .zip(previous)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        let last_norm = last.iter().map(|v| v * v).sum::<f64>().sqrt();
        let relative = if last_norm > 0.0 { absolute / last_norm } else { absolute };
        let residual = (y_last[0] - y_previous[0]).abs();
        let mut constraint = 0.0;
        for (j, &xj) in last.iter().enumerate() {
            if bounds.finite_lower_bound()[j] && xj < low[j] {
                constraint += low[j] - xj;
            }
            if bounds.finite_upper_bound()[j] && up[j] < xj {
                constraint += xj - up[j];
            }
        }
        Self {
            absolute,
            relative,
            residual,
            constraint,
        }
    }
}

impl PersistentObject for Tnc {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        self.settings.save(adv)?;
        adv.save_values("starting_point", self.starting_point.as_slice())?;
        adv.save_object_attribute("parameters", &self.parameters)
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        self.settings.load(adv)?;
        let mut starting_point: Vec<f64> = Vec::new();
        adv.load_values("starting_point", &mut starting_point)?;
        self.starting_point = Point::new(starting_point);
        if let Some(parameters) = adv.load_object_attribute::<TncParameters>("parameters")? {
            self.parameters = Arc::try_unwrap(parameters).unwrap_or_else(|shared| (*shared).clone());
        }
        Ok(())
    }
}

impl Buildable for Tnc {
    const CLASS_NAME: &'static str = "Tnc";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{ClosureFunction, Function};
    use approx::assert_relative_eq;

    fn shifted_paraboloid() -> OptimizationProblem {
        OptimizationProblem::new(ClosureFunction::scalar(2, |x| {
            (x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2)
        }))
    }

    #[test]
    fn test_sentinel_bounds() {
        let bounds = Interval::new(
            Point::new(vec![f64::NEG_INFINITY, -1.0]),
            Point::new(vec![3.0, f64::INFINITY]),
        )
        .unwrap();
        let (low, up) = sentinel_bounds(&bounds);
        assert_eq!(low, vec![-HUGE_BOUND, -1.0]);
        assert_eq!(up, vec![3.0, HUGE_BOUND]);
    }

    #[test]
    fn test_callback_records_history() {
        let problem = shifted_paraboloid();
        let mut state = CallbackState::new(&problem);
        let mut f = 0.0;
        let mut g = [0.0; 2];
        assert_eq!(state.compute_objective_and_gradient(&[0.0, 0.0], &mut f, &mut g), 0);
        assert_relative_eq!(f, 5.0);
        assert_relative_eq!(g[0], -2.0, epsilon = 1e-6);
        assert_relative_eq!(g[1], -4.0, epsilon = 1e-6);
        assert_eq!(state.evaluation_count(), 1);

        let (inputs, outputs, failure) = state.into_parts();
        assert!(failure.is_none());
        assert_eq!(inputs.row(0), Some(&[0.0, 0.0][..]));
        assert_relative_eq!(outputs.row(0).unwrap()[1], 20f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_callback_maximization_flips_sign() {
        let problem = shifted_paraboloid().maximize();
        let mut state = CallbackState::new(&problem);
        let mut f = 0.0;
        let mut g = [0.0; 2];
        state.compute_objective_and_gradient(&[0.0, 0.0], &mut f, &mut g);
        assert_relative_eq!(f, -5.0);
        assert_relative_eq!(g[0], 2.0, epsilon = 1e-6);
        // history keeps the unsigned value
        let (_, outputs, _) = state.into_parts();
        assert_relative_eq!(outputs.row(0).unwrap()[0], 5.0);
    }

    #[test]
    fn test_gradient_failure_is_a_status() {
        let objective = ClosureFunction::scalar(1, |x| x[0] * x[0])
            .with_gradient(|_| Err(Error::Evaluation("no gradient".to_string())));
        let problem = OptimizationProblem::new(objective);
        let mut state = CallbackState::new(&problem);
        let mut f = 0.0;
        let mut g = [0.0];
        assert_eq!(state.compute_objective_and_gradient(&[3.0], &mut f, &mut g), 1);
        assert_relative_eq!(f, 9.0);
        assert!(state.failure().is_none());
        assert_eq!(state.evaluation_count(), 0);
    }

    #[derive(Debug)]
    struct NarrowGradient;

    impl Function for NarrowGradient {
        fn input_dimension(&self) -> usize {
            2
        }

        fn output_dimension(&self) -> usize {
            1
        }

        fn evaluate(&self, x: &[f64]) -> Result<Point> {
            Ok(Point::new(vec![x[0] * x[0] + x[1] * x[1]]))
        }

        fn gradient(&self, _x: &[f64]) -> Result<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::zeros(1, 1))
        }
    }

    #[test]
    fn test_callback_rejects_wrong_gradient_shape() {
        let problem = OptimizationProblem::new(NarrowGradient);
        let mut state = CallbackState::new(&problem);
        let mut f = 0.0;
        let mut g = [0.0; 2];
        assert_eq!(state.compute_objective_and_gradient(&[1.0, 2.0], &mut f, &mut g), 1);
        assert!(state.failure().is_none());
        assert_eq!(state.evaluation_count(), 0);
    }

    #[test]
    fn test_callback_without_objective_value() {
        let problem = OptimizationProblem::new(ClosureFunction::new(1, 0, |_| Ok(vec![])));
        let mut state = CallbackState::new(&problem);
        let mut f = 0.0;
        let mut g = [0.0];
        assert_eq!(state.compute_objective_and_gradient(&[1.0], &mut f, &mut g), 1);
        assert!(matches!(state.failure(), Some(Error::Evaluation(_))));
    }

    #[test]
    fn test_check_problem() {
        let solver = Tnc::default();
        assert!(solver.check_problem(&shifted_paraboloid()).is_ok());

        let multi = OptimizationProblem::new(ClosureFunction::new(1, 2, |x| Ok(vec![x[0], x[0]])));
        assert!(solver.check_problem(&multi).unwrap_err().is_invalid_argument());

        let no_output = OptimizationProblem::new(ClosureFunction::new(1, 0, |_| Ok(vec![])));
        assert!(solver.check_problem(&no_output).unwrap_err().is_invalid_argument());

        let constrained =
            shifted_paraboloid().with_equality_constraint(ClosureFunction::scalar(2, |x| x[0]));
        assert!(solver.check_problem(&constrained).unwrap_err().is_invalid_argument());

        let mut solver = Tnc::default();
        assert!(solver.set_problem(constrained).is_err());
        assert!(solver.problem().is_none());
        assert!(solver.run().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_error_estimates_need_two_evaluations() {
        let bounds = Interval::unbounded(1);
        let (low, up) = sentinel_bounds(&bounds);
        let mut inputs = Sample::with_dimension(1);
        let mut outputs = Sample::with_dimension(2);
        inputs.add(&[1.0]).unwrap();
        outputs.add(&[4.0, 0.5]).unwrap();
        let errors = ErrorEstimates::from_history(&inputs, &outputs, &bounds, &low, &up);
        assert_eq!(errors.absolute, -1.0);

        inputs.add(&[2.0]).unwrap();
        outputs.add(&[3.0, 0.1]).unwrap();
        let errors = ErrorEstimates::from_history(&inputs, &outputs, &bounds, &low, &up);
        assert_relative_eq!(errors.absolute, 1.0);
        assert_relative_eq!(errors.relative, 0.5);
        assert_relative_eq!(errors.residual, 1.0);
        assert_eq!(errors.constraint, 0.0);
    }
}
