use good_lp::{constraint, microlp, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable};
use num::traits::{Signed, Zero};

use crate::rational::{self, Rational};
use crate::row::Row;

/// Outcome of maximising a linear objective over a row set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LpOutcome {
    Optimal(f64),
    Unbounded,
    Infeasible,
}

/* Abstract linear-programming facility. Rows are the usual rational
 * a*x >= b vectors; conversion to floating point happens inside the
 * backend and nowhere else. The oracle is assumed total: anything other
 * than a clean optimal/unbounded/infeasible answer is a fatal error.
 */
pub trait LpSolver {
    fn feasible(&self, nvars: usize, lines: &[Row]) -> bool;
    fn maximise(&self, nvars: usize, objective: &[Rational], lines: &[Row]) -> LpOutcome;
}

/// LP oracle backed by the pure-Rust microlp simplex. Each call builds
/// a throwaway model over free variables and drops it before returning.
#[derive(Copy, Clone, Debug, Default)]
pub struct MicroLp;

impl MicroLp {
    fn run(&self, nvars: usize, objective: &[Rational], lines: &[Row]) -> LpOutcome {
        assert_eq!(nvars, objective.len(), "objective over {} of {} variables", objective.len(), nvars);
        // constant rows 0 >= b never reach the backend: a positive b is
        // an immediate contradiction, anything else is trivially true
        for line in lines {
            assert_eq!(
                nvars + 1,
                line.len(),
                "row of length {} in an lp over {} variables",
                line.len(),
                nvars
            );
            if line[..nvars].iter().all(|a| a.is_zero()) && line[nvars].is_positive() {
                return LpOutcome::Infeasible;
            }
        }
        if nvars == 0 {
            return LpOutcome::Optimal(0.0);
        }

        let mut vars = variables!();
        let xs: Vec<Variable> = vars.add_vector(variable(), nvars);
        let obj: Expression = xs
            .iter()
            .zip(objective)
            .map(|(&x, c)| x * rational::to_f64(c))
            .sum();

        let mut model = vars.maximise(obj).using(microlp);
        for line in lines {
            if line[..nvars].iter().all(|a| a.is_zero()) {
                continue;
            }
            let lhs: Expression = xs
                .iter()
                .zip(&line[..nvars])
                .map(|(&x, a)| x * rational::to_f64(a))
                .sum();
            let rhs = rational::to_f64(&line[nvars]);
            model = model.with(constraint!(lhs >= rhs));
        }

        match model.solve() {
            Ok(sol) => {
                let value = xs
                    .iter()
                    .zip(objective)
                    .map(|(&x, c)| sol.value(x) * rational::to_f64(c))
                    .sum();
                LpOutcome::Optimal(value)
            }
            Err(ResolutionError::Infeasible) => LpOutcome::Infeasible,
            Err(ResolutionError::Unbounded) => LpOutcome::Unbounded,
            Err(e) => panic!("lp solver failure: {}", e),
        }
    }
}

impl LpSolver for MicroLp {
    fn feasible(&self, nvars: usize, lines: &[Row]) -> bool {
        let zero = vec![Rational::zero(); nvars];
        self.run(nvars, &zero, lines) != LpOutcome::Infeasible
    }

    fn maximise(&self, nvars: usize, objective: &[Rational], lines: &[Row]) -> LpOutcome {
        self.run(nvars, objective, lines)
    }
}

#[cfg(test)]
use crate::rational::rat;

#[cfg(test)]
fn int_row(entries: &[i64]) -> Row {
    entries.iter().map(|&n| rat(n)).collect()
}

#[test]
fn box_is_feasible() {
    let lines = vec![int_row(&[1, 0, 0]), int_row(&[0, 1, 0]), int_row(&[-1, -1, -2])];
    assert!(MicroLp.feasible(2, &lines));
}

#[test]
fn conflicting_bounds_are_infeasible() {
    // x >= 1 and x <= 0
    let lines = vec![int_row(&[1, 1]), int_row(&[-1, 0])];
    assert!(!MicroLp.feasible(1, &lines));
}

#[test]
fn maximisation_reaches_the_facet() {
    // max x0 over x0 >= 0, x1 >= 0, x0 + x1 <= 2
    let lines = vec![int_row(&[1, 0, 0]), int_row(&[0, 1, 0]), int_row(&[-1, -1, -2])];
    match MicroLp.maximise(2, &[rat(1), rat(0)], &lines) {
        LpOutcome::Optimal(v) => assert!((v - 2.0).abs() < 1e-6, "optimum was {}", v),
        other => panic!("expected an optimum, got {:?}", other),
    }
}

#[test]
fn open_directions_are_unbounded() {
    let lines = vec![int_row(&[1, 0])];
    assert_eq!(LpOutcome::Unbounded, MicroLp.maximise(1, &[rat(1)], &lines));
}

#[test]
fn empty_systems_are_trivially_feasible() {
    assert!(MicroLp.feasible(0, &[]));
    assert!(!MicroLp.feasible(0, &[int_row(&[1])]));
}
