use log::debug;
use num::bigint::BigInt;
use num::traits::{Signed, Zero};

use crate::bounds::{simplify_single_var, VarBounds};
use crate::lp::LpSolver;
use crate::rational::Rational;
use crate::row::Row;
use crate::redundancy::remove_redundant;
use crate::system::System;
use crate::Infeasible;

/* UTVPI over-approximation by recursive Fourier-Motzkin projection.
 *
 * Every UTVPI constraint touches at most two variables, so it suffices
 * to project the input onto every variable pair and read the eight
 * candidate bounds off each two-variable face. The f/g/h recursion
 * shares sub-projections so that every unordered pair reaches
 * find_bounds exactly once:
 *
 *   f: pairs not involving the last variable (recurse without it),
 *      pairs with the last but not the second-to-last (g), and the
 *      pair (second-to-last, last) itself (h)
 *   g: peel second-to-last variables, then h for the remaining pair
 *   h: peel leading variables until only the target pair is left
 *
 * Original variable indices ride along the recursion next to each
 * projected system; labels stay in the System for printing only.
 */
pub fn find_oa(sys: &System, reduce: Option<&dyn LpSolver>) -> Result<System, Infeasible> {
    let mut emit = Emitter::new(sys, reduce);
    match sys.nvars() {
        0 => check_constant_rows(sys)?,
        1 => {
            let bounds = simplify_single_var(&sys.lines)?;
            emit.push_bounds(&[(0, 1)], &bounds);
        }
        _ => {
            let vars: Vec<usize> = (0..sys.nvars()).collect();
            emit.f(sys, &vars)?;
        }
    }
    Ok(emit.into_system())
}

/// Pair-by-pair variant: projects every pair independently, eliminating
/// the other variables one at a time. Same result as find_oa up to the
/// work it repeats; kept as the oracle the f/g/h scheme is tested
/// against.
pub fn vanilla_fm_oa(sys: &System, reduce: Option<&dyn LpSolver>) -> Result<System, Infeasible> {
    let nvars = sys.nvars();
    let mut emit = Emitter::new(sys, reduce);
    match nvars {
        0 => check_constant_rows(sys)?,
        1 => {
            let bounds = simplify_single_var(&sys.lines)?;
            emit.push_bounds(&[(0, 1)], &bounds);
        }
        _ => {
            for i in 0..nvars {
                for j in i + 1..nvars {
                    let mut proj = sys.clone();
                    for k in (0..nvars).rev() {
                        if k != i && k != j {
                            proj = emit.project(&proj, k);
                        }
                    }
                    emit.find_bounds(&proj, i, j)?;
                }
            }
        }
    }
    Ok(emit.into_system())
}

/// A zero-variable system holds only rows 0 >= b.
fn check_constant_rows(sys: &System) -> Result<(), Infeasible> {
    for line in &sys.lines {
        if line[0].is_positive() {
            return Err(Infeasible);
        }
    }
    Ok(())
}

/// Change of basis s = u + v, t = u - v on a two-variable system:
/// a*u + b*v >= c holds iff (a+b)*s + (a-b)*t >= 2c. The doubling of
/// the right-hand side happens here and nowhere else.
fn rotate(sys: &System) -> System {
    assert_eq!(2, sys.nvars(), "rotating a system over {} variables", sys.nvars());
    let mut res = System::new(vec!["s".to_string(), "t".to_string()]);
    for line in &sys.lines {
        let (a, b, c) = (&line[0], &line[1], &line[2]);
        res.push(vec![a + b, a - b, c + c]);
    }
    res
}

/// Collects output rows over the original variable layout, skipping
/// exact duplicates (a pair bound and a later axis bound can coincide).
struct Emitter<'a> {
    width: usize,
    var_labels: Vec<String>,
    lines: Vec<Row>,
    reduce: Option<&'a dyn LpSolver>,
}

impl<'a> Emitter<'a> {
    fn new(sys: &System, reduce: Option<&'a dyn LpSolver>) -> Emitter<'a> {
        Emitter {
            width: sys.nvars() + 1,
            var_labels: sys.var_labels.clone(),
            lines: Vec::new(),
            reduce,
        }
    }

    fn into_system(self) -> System {
        System {
            lines: self.lines,
            var_labels: self.var_labels,
        }
    }

    /// One projection step, followed by the redundancy sweep when a
    /// solver was supplied.
    fn project(&self, sys: &System, k: usize) -> System {
        let mut res = sys.remove_var(k);
        if let Some(solver) = self.reduce {
            remove_redundant(&mut res, solver);
        }
        res
    }

    fn f(&mut self, sys: &System, vars: &[usize]) -> Result<(), Infeasible> {
        if sys.nvars() == 2 {
            return self.find_bounds(sys, vars[0], vars[1]);
        }
        let last = sys.nvars() - 1;
        let second = last - 1;
        self.f(&self.project(sys, last), &drop_at(vars, last))?;
        self.g(&self.project(sys, second), &drop_at(vars, second))?;
        self.h(sys, vars)
    }

    fn g(&mut self, sys: &System, vars: &[usize]) -> Result<(), Infeasible> {
        if sys.nvars() == 2 {
            return self.find_bounds(sys, vars[0], vars[1]);
        }
        let second = sys.nvars() - 2;
        self.g(&self.project(sys, second), &drop_at(vars, second))?;
        self.h(sys, vars)
    }

    fn h(&mut self, sys: &System, vars: &[usize]) -> Result<(), Infeasible> {
        if sys.nvars() == 2 {
            return self.find_bounds(sys, vars[0], vars[1]);
        }
        self.h(&self.project(sys, 0), &vars[1..])
    }

    /// Up to eight UTVPI facets of one two-variable projection, with
    /// iu < iv the original indices of its columns.
    fn find_bounds(&mut self, sys: &System, iu: usize, iv: usize) -> Result<(), Infeasible> {
        debug_assert_eq!(2, sys.nvars());
        debug!("bounds for the pair ({}, {})", self.var_labels[iu], self.var_labels[iv]);

        let u = simplify_single_var(&sys.remove_var(1).lines)?;
        self.push_bounds(&[(iu, 1)], &u);
        let v = simplify_single_var(&sys.remove_var(0).lines)?;
        self.push_bounds(&[(iv, 1)], &v);

        let rotated = rotate(sys);
        let s = simplify_single_var(&rotated.remove_var(1).lines)?;
        self.push_bounds(&[(iu, 1), (iv, 1)], &s);
        let t = simplify_single_var(&rotated.remove_var(0).lines)?;
        self.push_bounds(&[(iu, 1), (iv, -1)], &t);
        Ok(())
    }

    /// pos_max bounds the sum of terms from above, neg_max bounds its
    /// negation; upper bounds come first.
    fn push_bounds(&mut self, terms: &[(usize, i64)], bounds: &VarBounds) {
        if let Some(pos) = &bounds.pos_max {
            self.push_row(terms, -1, pos);
        }
        if let Some(neg) = &bounds.neg_max {
            self.push_row(terms, 1, neg);
        }
    }

    /// The constraint sign*(sum of terms) >= -c over the full variable
    /// layout, i.e. the UTVPI inequality -sign*(sum) <= c.
    fn push_row(&mut self, terms: &[(usize, i64)], sign: i64, c: &Rational) {
        let mut line: Row = vec![Rational::zero(); self.width];
        for &(idx, coef) in terms {
            line[idx] = Rational::from_integer(BigInt::from(sign * coef));
        }
        line[self.width - 1] = -c;
        if !self.lines.contains(&line) {
            self.lines.push(line);
        }
    }
}

fn drop_at(vars: &[usize], k: usize) -> Vec<usize> {
    let mut res = vars.to_vec();
    res.remove(k);
    res
}

#[cfg(test)]
mod tests {
    use num::traits::{One, Signed, Zero};
    use rand::Rng;

    use super::{find_oa, vanilla_fm_oa};
    use crate::lp::{LpOutcome, LpSolver, MicroLp};
    use crate::rational::{rat, Rational};
    use crate::row::{negated, Row};
    use crate::system::System;
    use crate::Infeasible;

    fn int_row(entries: &[i64]) -> Row {
        entries.iter().map(|&n| rat(n)).collect()
    }

    #[test]
    fn nonnegative_quadrant() {
        // x0 >= 0, x1 >= 0
        let sys = System::parse("2 4  1 1 0 0  1 0 1 0");
        let oa = find_oa(&sys, None).unwrap();
        assert_eq!(
            vec![int_row(&[1, 0, 0]), int_row(&[0, 1, 0]), int_row(&[1, 1, 0])],
            oa.lines
        );
    }

    #[test]
    fn single_variable_equality() {
        // x0 = 1
        let sys = System::parse("1 3  0 1 -1");
        let oa = find_oa(&sys, None).unwrap();
        // x0 <= 1 then x0 >= 1
        assert_eq!(vec![int_row(&[-1, -1]), int_row(&[1, 1])], oa.lines);
    }

    #[test]
    fn bounded_triangle() {
        // x0 >= 0, x1 >= 0, x0 + x1 <= 2
        let sys = System::parse("3 4  1 1 0 0  1 0 1 0  1 -1 -1 2");
        let oa = find_oa(&sys, None).unwrap();
        for expected in [
            int_row(&[-1, 0, -2]), // +x0 <= 2
            int_row(&[1, 0, 0]),   // -x0 <= 0
            int_row(&[0, -1, -2]), // +x1 <= 2
            int_row(&[0, 1, 0]),   // -x1 <= 0
            int_row(&[-1, -1, -2]), // +x0+x1 <= 2
            int_row(&[1, 1, 0]),   // -x0-x1 <= 0
        ] {
            assert!(oa.lines.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn contradiction_is_reported() {
        // x0 >= 0 and x0 <= -1, x1 free
        let sys = System::parse("2 4  1 1 0 0  1 -1 0 -1");
        assert_eq!(Err(Infeasible), find_oa(&sys, None));
        assert_eq!(Err(Infeasible), vanilla_fm_oa(&sys, None));
    }

    #[test]
    fn single_variable_contradiction() {
        // x0 >= 0 and x0 <= -1 with no second variable
        let sys = System::parse("2 3  1 1 0  1 -1 -1");
        assert_eq!(Err(Infeasible), find_oa(&sys, None));
    }

    #[test]
    fn halfplane_keeps_only_the_difference_bound() {
        // x0 - x1 >= 0
        let sys = System::parse("1 4  1 1 -1 0");
        let oa = find_oa(&sys, None).unwrap();
        assert_eq!(vec![int_row(&[1, -1, 0])], oa.lines);
    }

    #[test]
    fn octant_gets_all_pairwise_lower_bounds() {
        let sys = System::parse("3 5  1 1 0 0 0  1 0 1 0 0  1 0 0 1 0");
        let oa = find_oa(&sys, None).unwrap();
        assert_eq!(
            vec![
                int_row(&[1, 0, 0, 0]),
                int_row(&[0, 1, 0, 0]),
                int_row(&[1, 1, 0, 0]),
                int_row(&[0, 0, 1, 0]),
                int_row(&[1, 0, 1, 0]),
                int_row(&[0, 1, 1, 0]),
            ],
            oa.lines
        );
    }

    #[test]
    fn output_rows_are_utvpi_shaped() {
        let sys = System::parse("4 5  1 2 1 0 -1  1 -1 3 1 0  0 1 1 1 -3  1 0 -2 -1 4");
        if let Ok(oa) = find_oa(&sys, None) {
            for line in &oa.lines {
                let nonzero: Vec<&Rational> =
                    line[..oa.nvars()].iter().filter(|a| !a.is_zero()).collect();
                assert!(nonzero.len() <= 2, "row {:?} has too many terms", line);
                for a in nonzero {
                    assert!(a.abs().is_one(), "row coefficient {} is not a unit", a);
                }
            }
        }
    }

    #[test]
    fn per_projection_reduction_changes_nothing() {
        // three variables, so the recursion actually projects and filters
        let sys = System::parse("4 5  1 1 0 0 0  1 0 1 0 0  1 0 0 1 0  1 -1 -1 -1 3");
        let plain = find_oa(&sys, None).unwrap();
        let reduced = find_oa(&sys, Some(&MicroLp)).unwrap();
        assert_eq!(plain.lines, reduced.lines);
    }

    fn random_system(rng: &mut impl Rng, nvars: usize, nlines: usize) -> System {
        let mut sys = System::new((0..nvars).map(|i| format!("x[{}]", i)).collect());
        for _ in 0..nlines {
            let mut line: Row = (0..nvars).map(|_| rat(rng.gen_range(-3..=3))).collect();
            line.push(rat(rng.gen_range(-4..=4)));
            sys.push(line);
        }
        sys
    }

    #[test]
    fn fgh_matches_the_vanilla_oracle() {
        let mut rng = rand::thread_rng();
        for _ in 0..25 {
            let nvars = rng.gen_range(2..=4);
            let nrows = rng.gen_range(2..=5);
            let sys = random_system(&mut rng, nvars, nrows);
            let fast = find_oa(&sys, None);
            let slow = vanilla_fm_oa(&sys, None);
            match (fast, slow) {
                (Ok(a), Ok(b)) => {
                    let mut a = a.lines;
                    let mut b = b.lines;
                    a.sort();
                    b.sort();
                    assert_eq!(a, b, "diverging covers for {:?}", sys.lines);
                }
                (Err(Infeasible), Err(Infeasible)) => {}
                (fast, slow) => panic!(
                    "feasibility verdicts diverge ({:?} vs {:?}) for {:?}",
                    fast.is_ok(),
                    slow.is_ok(),
                    sys.lines
                ),
            }
        }
    }

    #[test]
    fn every_output_row_is_implied_by_the_input() {
        let mut rng = rand::thread_rng();
        let mut checked = 0;
        while checked < 15 {
            let sys = random_system(&mut rng, 3, 4);
            let oa = match find_oa(&sys, None) {
                Ok(oa) => oa,
                Err(Infeasible) => continue,
            };
            checked += 1;
            for line in &oa.lines {
                // maximise the violation of a*x >= b over the input
                let objective: Vec<Rational> = negated(line)[..sys.nvars()].to_vec();
                match MicroLp.maximise(sys.nvars(), &objective, &sys.lines) {
                    LpOutcome::Optimal(v) => {
                        let bound = crate::rational::to_f64(&-&line[sys.nvars()]);
                        assert!(
                            v <= bound + 1e-6,
                            "row {:?} violated by {} over {:?}",
                            line,
                            v - bound,
                            sys.lines
                        );
                    }
                    LpOutcome::Unbounded => {
                        panic!("row {:?} unbounded over {:?}", line, sys.lines)
                    }
                    LpOutcome::Infeasible => {} // empty inputs imply anything
                }
            }
        }
    }
}
