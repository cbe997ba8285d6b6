use num::bigint::BigInt;
use num::rational::BigRational;
use num::traits::ToPrimitive;

/* Exact rational scalar used throughout the core.
 *
 * Ratio<BigInt> keeps the canonical form this crate relies on: the
 * denominator is always positive, numerator and denominator are coprime,
 * and zero is 0/1. Construction with a zero denominator panics, which is
 * the contract for division by zero.
 */
pub type Rational = BigRational;

/// Integer-valued rational.
pub fn rat(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// Rational from an integer pair; the sign moves to the numerator.
pub fn ratio(n: i64, d: i64) -> Rational {
    Rational::new(BigInt::from(n), BigInt::from(d))
}

/// Parse an input token of the form "p" or "p/q".
pub fn parse(token: &str) -> Rational {
    match token.parse::<BigRational>() {
        Ok(r) => r,
        Err(e) => panic!("malformed rational token {:?}: {}", token, e),
    }
}

/// Conversion used only at the LP oracle boundary.
pub fn to_f64(r: &Rational) -> f64 {
    r.to_f64()
        .unwrap_or_else(|| panic!("rational {} has no double representation", r))
}

#[test]
fn parses_both_token_forms() {
    assert_eq!(rat(17), parse("17"));
    assert_eq!(rat(-4), parse("-4"));
    assert_eq!(ratio(3, 7), parse("3/7"));
    assert_eq!(ratio(-3, 7), parse("-3/7"));
}

#[test]
fn parsing_canonicalises() {
    assert_eq!(ratio(1, 2), parse("2/4"));
    assert_eq!(ratio(-1, 2), parse("1/-2"));
    assert_eq!(rat(0), parse("0/9"));
    assert!(parse("5/-10").denom() > &BigInt::from(0));
}

#[test]
#[should_panic]
fn zero_denominator_aborts() {
    parse("1/0");
}

#[test]
#[should_panic]
fn garbage_token_aborts() {
    parse("x0");
}

#[test]
fn display_matches_token_forms() {
    assert_eq!("5", rat(5).to_string());
    assert_eq!("-5", rat(-5).to_string());
    assert_eq!("2/3", ratio(4, 6).to_string());
    assert_eq!("-2/3", ratio(4, -6).to_string());
}

#[test]
fn boundary_conversion() {
    assert_eq!(0.5, to_f64(&ratio(1, 2)));
    assert_eq!(-3.0, to_f64(&rat(-3)));
}
