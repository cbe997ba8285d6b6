use num::bigint::BigInt;
use num::traits::{One, Zero};
use num::Integer;

use crate::rational::Rational;

/* One inequality  a_1*x_1 + ... + a_n*x_n >= b  stored as n+1 entries,
 * coefficients first, right-hand side last.
 */
pub type Row = Vec<Rational>;

/// Componentwise a*x + b*y over equal-length rows.
pub fn linear_combination(a: &Rational, x: &Row, b: &Rational, y: &Row) -> Row {
    assert_eq!(
        x.len(),
        y.len(),
        "linear combination of rows with lengths {} and {}",
        x.len(),
        y.len()
    );
    x.iter().zip(y).map(|(xi, yi)| a * xi + b * yi).collect()
}

/// Scale the row by the lcm of its denominators, leaving integer entries.
/// Positive scaling does not change the inequality.
pub fn clear_denominators(line: &mut Row) {
    let mut scale = BigInt::one();
    for r in line.iter() {
        scale = scale.lcm(r.denom());
    }
    if scale.is_one() {
        return;
    }
    for r in line.iter_mut() {
        *r = Rational::new(r.numer() * &scale, r.denom().clone());
    }
}

pub fn is_all_zero(line: &Row) -> bool {
    line.iter().all(|r| r.is_zero())
}

/// The row of the reversed inequality, used for equality expansion and
/// the redundancy probe.
pub fn negated(line: &Row) -> Row {
    line.iter().map(|r| -r).collect()
}

#[cfg(test)]
use crate::rational::{rat, ratio};

#[test]
fn linear_combination_works() {
    let x = vec![rat(1), rat(0), rat(2)];
    let y = vec![rat(0), rat(1), rat(-1)];
    let combined = linear_combination(&rat(3), &x, &rat(2), &y);
    assert_eq!(vec![rat(3), rat(2), rat(4)], combined);
}

#[test]
fn linear_combination_with_fractions() {
    let x = vec![ratio(1, 2), rat(1)];
    let y = vec![ratio(1, 3), rat(0)];
    let combined = linear_combination(&rat(2), &x, &rat(-3), &y);
    assert_eq!(vec![rat(0), rat(2)], combined);
}

#[test]
#[should_panic]
fn length_mismatch_aborts() {
    linear_combination(&rat(1), &vec![rat(1)], &rat(1), &vec![rat(1), rat(2)]);
}

#[test]
fn clearing_denominators_scales_by_lcm() {
    let mut line = vec![ratio(1, 2), ratio(1, 3), rat(5)];
    clear_denominators(&mut line);
    assert_eq!(vec![rat(3), rat(2), rat(30)], line);
}

#[test]
fn clearing_integer_row_is_identity() {
    let mut line = vec![rat(2), rat(-7), rat(0)];
    clear_denominators(&mut line);
    assert_eq!(vec![rat(2), rat(-7), rat(0)], line);
}

#[test]
fn zero_test_and_negation() {
    assert!(is_all_zero(&vec![rat(0), rat(0)]));
    assert!(!is_all_zero(&vec![rat(0), ratio(1, 9)]));
    assert_eq!(vec![rat(-1), rat(2), rat(0)], negated(&vec![rat(1), rat(-2), rat(0)]));
}
