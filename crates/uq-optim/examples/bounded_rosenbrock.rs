//! Bounded Rosenbrock minimization with the TNC solver
//!
//! Run with `RUST_LOG=debug` to follow the routine.

use tracing_subscriber::EnvFilter;
use uq_core::{Interval, Point};
use uq_optim::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Bounded Rosenbrock ===\n");

    let rosenbrock = ClosureFunction::scalar(2, |x| {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    })
    .with_name("rosenbrock");

    // 1. Unconstrained minimum (1, 1) inside the box
    let problem = OptimizationProblem::new(rosenbrock).with_bounds(Interval::new(
        Point::new(vec![-2.0, -2.0]),
        Point::new(vec![2.0, 2.0]),
    )?)?;
    let mut solver = Tnc::new(problem.clone());
    solver.set_starting_point(Point::new(vec![-1.2, 1.0]));
    solver.settings_mut().maximum_iterations_number = 1000;
    solver.run()?;
    report("box [-2, 2]^2", &solver);

    // 2. Same function with the minimum cut off by the bounds
    let mut clipped = problem;
    clipped.set_bounds(Interval::new(
        Point::new(vec![-2.0, -2.0]),
        Point::new(vec![0.5, 2.0]),
    )?)?;
    solver.set_problem(clipped)?;
    solver.run()?;
    report("box [-2, 0.5] x [-2, 2]", &solver);

    // 3. Steepest descent only
    let mut steepest = TncParameters::default();
    steepest.max_cg_iterations = 0;
    solver.set_parameters(steepest);
    solver.run()?;
    report("steepest descent", &solver);

    Ok(())
}

fn report(label: &str, solver: &Tnc) {
    let result = solver.result();
    println!("{label}");
    println!("  optimal point:  {:?}", result.optimal_point.as_slice());
    println!("  optimal value:  {:.6e}", result.optimal_value);
    println!("  evaluations:    {}", result.evaluation_number);
    println!(
        "  errors:         abs {:.2e}, rel {:.2e}, res {:.2e}, cons {:.2e}\n",
        result.absolute_error, result.relative_error, result.residual_error, result.constraint_error
    );
}
