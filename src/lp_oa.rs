use log::debug;
use num::bigint::BigInt;
use num::traits::{FromPrimitive, Signed, Zero};

use crate::lp::{LpOutcome, LpSolver};
use crate::rational::{rat, Rational};
use crate::row::Row;
use crate::system::System;
use crate::Infeasible;

/// Upward-rounding granularity: bounds are rounded to multiples of
/// 1/2^DEFAULT_PRECISION.
pub const DEFAULT_PRECISION: u32 = 10;

/// Smallest multiple of 1/2^precision that is >= v. Quantising the
/// oracle's double keeps the emitted bound sound regardless of how the
/// solver rounded internally.
pub fn ceil_num(v: f64, precision: u32) -> Rational {
    assert!(precision < 63, "precision {} out of range", precision);
    let scale = 1u64 << precision;
    let scaled = (v * scale as f64).ceil();
    let numer = BigInt::from_f64(scaled)
        .unwrap_or_else(|| panic!("lp optimum {} is not a finite number", v));
    Rational::new(numer, BigInt::from(scale))
}

/* Alternative to the projector: enumerate every UTVPI shape and ask
 * the LP oracle how far it can grow over the input. A finite optimum m
 * for the shape e yields the constraint e <= ceil(m), stored as
 * -e >= -ceil(m); an unbounded direction yields nothing. The first
 * infeasible answer aborts the whole procedure, the input itself is
 * empty.
 */
pub fn find_oa_lp(
    sys: &System,
    solver: &dyn LpSolver,
    precision: u32,
) -> Result<System, Infeasible> {
    let nvars = sys.nvars();
    if nvars == 0 {
        for line in &sys.lines {
            if line[0].is_positive() {
                return Err(Infeasible);
            }
        }
        return Ok(System::new(Vec::new()));
    }

    let mut shapes: Vec<Vec<(usize, i64)>> = Vec::new();
    for i in 0..nvars {
        shapes.push(vec![(i, 1)]);
        shapes.push(vec![(i, -1)]);
    }
    for i in 0..nvars {
        for j in i + 1..nvars {
            shapes.push(vec![(i, 1), (j, 1)]);
            shapes.push(vec![(i, -1), (j, -1)]);
            shapes.push(vec![(i, 1), (j, -1)]);
            shapes.push(vec![(i, -1), (j, 1)]);
        }
    }

    let mut res = System::new(sys.var_labels.clone());
    for shape in shapes {
        let mut objective = vec![Rational::zero(); nvars];
        for &(idx, coef) in &shape {
            objective[idx] = rat(coef);
        }
        match solver.maximise(nvars, &objective, &sys.lines) {
            LpOutcome::Infeasible => return Err(Infeasible),
            LpOutcome::Unbounded => {
                debug!("shape {:?} is unbounded", shape);
            }
            LpOutcome::Optimal(v) => {
                let bound = ceil_num(v, precision);
                let mut line: Row = vec![Rational::zero(); nvars + 1];
                for &(idx, coef) in &shape {
                    line[idx] = rat(-coef);
                }
                line[nvars] = -&bound;
                debug!("shape {:?} bounded by {}", shape, bound);
                res.push(line);
            }
        }
    }
    Ok(res)
}

#[cfg(test)]
use crate::lp::MicroLp;
#[cfg(test)]
use crate::rational::ratio;

#[test]
fn rounding_goes_up_to_the_next_dyadic() {
    assert_eq!(ratio(1, 2), ceil_num(0.5, 10));
    assert_eq!(ratio(513, 1024), ceil_num(0.5001, 10));
    assert_eq!(rat(-3), ceil_num(-3.0, 10));
    assert_eq!(rat(1), ceil_num(0.75, 0));
}

#[test]
fn box_bounds_come_back_through_the_oracle() {
    // 0 <= x0 <= 1, 0 <= x1 <= 2
    let sys = System::parse("4 4  1 1 0 0  1 -1 0 1  1 0 1 0  1 0 -1 2");
    let oa = find_oa_lp(&sys, &MicroLp, DEFAULT_PRECISION).unwrap();
    // every one of the eight shapes is bounded here
    assert_eq!(8, oa.nlines());
    let upper_x0: Vec<Row> = oa
        .lines
        .iter()
        .filter(|line| line[0] == rat(-1) && line[1].is_zero())
        .cloned()
        .collect();
    assert_eq!(1, upper_x0.len());
    // x0 <= 1 up to the dyadic rounding slack
    let bound = -&upper_x0[0][2];
    assert!(bound >= rat(1) && bound <= rat(1) + ratio(1, 1024), "bound was {}", bound);
}

#[test]
fn unbounded_shapes_are_skipped() {
    // x0 - x1 >= 0 bounds only the shape -x0 + x1
    let sys = System::parse("1 4  1 1 -1 0");
    let oa = find_oa_lp(&sys, &MicroLp, DEFAULT_PRECISION).unwrap();
    assert_eq!(1, oa.nlines());
    assert_eq!(rat(1), oa.lines[0][0]);
    assert_eq!(rat(-1), oa.lines[0][1]);
    assert!(-&oa.lines[0][2] >= rat(0));
}

#[test]
fn empty_input_aborts_at_the_first_oracle_call() {
    let sys = System::parse("2 3  1 1 0  1 -1 -1");
    assert_eq!(Err(Infeasible), find_oa_lp(&sys, &MicroLp, DEFAULT_PRECISION));
}
