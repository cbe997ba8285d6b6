use log::debug;

use crate::lp::LpSolver;
use crate::row::{self, Row};
use crate::system::System;

/* Drop every line that is implied by the rest of the system.
 *
 * Line i is implied when no point satisfies the other lines while
 * violating line i. The probe system keeps every other line and flips
 * line i (the strict violation  a*x < b  relaxed to  -a*x >= -b); an
 * infeasible probe means line i can go. Deletion happens in place and
 * the index stays put afterwards, because an unexamined line has just
 * moved into position i. One oracle call per surviving or deleted line.
 */
pub fn remove_redundant(sys: &mut System, solver: &dyn LpSolver) {
    let nvars = sys.nvars();
    let mut i = 0;
    while i < sys.lines.len() {
        let probe: Vec<Row> = sys
            .lines
            .iter()
            .enumerate()
            .map(|(j, line)| if j == i { row::negated(line) } else { line.clone() })
            .collect();
        if solver.feasible(nvars, &probe) {
            i += 1;
        } else {
            debug!("line {} is implied, dropping it", i);
            sys.lines.remove(i);
        }
    }
}

#[cfg(test)]
use crate::lp::MicroLp;
#[cfg(test)]
use crate::rational::rat;

#[test]
fn implied_bound_is_dropped() {
    // x0 >= 0 makes x0 >= -1 redundant
    let mut sys = System::parse("2 3  1 1 0  1 1 1");
    remove_redundant(&mut sys, &MicroLp);
    assert_eq!(vec![vec![rat(1), rat(0)]], sys.lines);
}

#[test]
fn facets_survive() {
    let mut sys = System::parse("3 4  1 1 0 0  1 0 1 0  1 -1 -1 2");
    let before = sys.lines.clone();
    remove_redundant(&mut sys, &MicroLp);
    assert_eq!(before, sys.lines);
}

#[test]
fn consecutive_implied_lines_are_both_examined() {
    // two loose lower bounds behind the tight one
    let mut sys = System::parse("3 3  1 1 0  1 1 1  1 1 2");
    remove_redundant(&mut sys, &MicroLp);
    assert_eq!(vec![vec![rat(1), rat(0)]], sys.lines);
}

#[test]
fn filter_is_idempotent() {
    let mut sys = System::parse("4 4  1 1 0 0  1 0 1 0  1 -1 -1 2  1 1 1 1");
    remove_redundant(&mut sys, &MicroLp);
    let once = sys.lines.clone();
    remove_redundant(&mut sys, &MicroLp);
    assert_eq!(once, sys.lines);
}
