use num::traits::{Signed, Zero};

use crate::rational::Rational;
use crate::row::Row;
use crate::Infeasible;

/// Tightest axis-aligned bounds of a one-variable system:
/// x <= pos_max and -x <= neg_max, each absent when that direction
/// is unbounded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarBounds {
    pub pos_max: Option<Rational>,
    pub neg_max: Option<Rational>,
}

/// Scan a one-variable system of rows [a, b], each meaning a*x >= b.
///
/// a > 0 gives the lower bound x >= b/a, recorded as the candidate -b/a
/// for neg_max; a < 0 gives the upper bound x <= b/a, a candidate for
/// pos_max. Both directions keep the minimum of their candidates, which
/// is the tightest constraint of that direction. A row 0 >= b with b > 0
/// is a contradiction, as is an upper bound lying below the lower bound.
pub fn simplify_single_var(lines: &[Row]) -> Result<VarBounds, Infeasible> {
    let mut bounds = VarBounds::default();
    for line in lines {
        assert_eq!(2, line.len(), "single-variable row of length {}", line.len());
        let (a, b) = (&line[0], &line[1]);
        if a.is_zero() {
            if b.is_positive() {
                return Err(Infeasible); // 0 >= b > 0
            }
            continue;
        }
        if a.is_positive() {
            tighten(&mut bounds.neg_max, -(b / a));
        } else {
            tighten(&mut bounds.pos_max, b / a);
        }
    }
    if let (Some(pos), Some(neg)) = (&bounds.pos_max, &bounds.neg_max) {
        if *pos < -neg {
            return Err(Infeasible); // empty interval
        }
    }
    Ok(bounds)
}

fn tighten(slot: &mut Option<Rational>, candidate: Rational) {
    match slot {
        Some(current) if *current <= candidate => {}
        _ => *slot = Some(candidate),
    }
}

#[cfg(test)]
use crate::rational::{rat, ratio};

#[test]
fn bounds_take_the_minimum_candidate() {
    // 2x >= 1, x >= -3, -x >= -5, -3x >= -6
    let lines = vec![
        vec![rat(2), rat(1)],
        vec![rat(1), rat(-3)],
        vec![rat(-1), rat(-5)],
        vec![rat(-3), rat(-6)],
    ];
    let bounds = simplify_single_var(&lines).unwrap();
    // x <= 2 beats x <= 5; x >= 1/2 beats x >= -3, stored as -x <= -1/2
    assert_eq!(Some(rat(2)), bounds.pos_max);
    assert_eq!(Some(ratio(-1, 2)), bounds.neg_max);
}

#[test]
fn unbounded_directions_stay_absent() {
    let lines = vec![vec![rat(1), rat(0)]];
    let bounds = simplify_single_var(&lines).unwrap();
    assert_eq!(None, bounds.pos_max);
    assert_eq!(Some(rat(0)), bounds.neg_max);

    assert_eq!(VarBounds::default(), simplify_single_var(&[]).unwrap());
}

#[test]
fn trivial_rows_are_ignored() {
    let lines = vec![vec![rat(0), rat(0)], vec![rat(0), rat(-4)], vec![rat(-1), rat(-1)]];
    let bounds = simplify_single_var(&lines).unwrap();
    assert_eq!(Some(rat(1)), bounds.pos_max);
    assert_eq!(None, bounds.neg_max);
}

#[test]
fn contradictory_constant_row_is_infeasible() {
    let lines = vec![vec![rat(1), rat(0)], vec![rat(0), ratio(1, 2)]];
    assert_eq!(Err(Infeasible), simplify_single_var(&lines));
}

#[test]
fn empty_interval_is_infeasible() {
    // x >= 0 and x <= -1
    let lines = vec![vec![rat(1), rat(0)], vec![rat(-1), rat(1)]];
    assert_eq!(Err(Infeasible), simplify_single_var(&lines));
}

#[test]
fn touching_bounds_are_feasible() {
    // x >= 1 and x <= 1
    let lines = vec![vec![rat(1), rat(1)], vec![rat(-1), rat(-1)]];
    let bounds = simplify_single_var(&lines).unwrap();
    assert_eq!(Some(rat(1)), bounds.pos_max);
    assert_eq!(Some(rat(-1)), bounds.neg_max);
}
