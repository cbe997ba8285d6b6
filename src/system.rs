use std::io::{self, Write};
use std::str::SplitWhitespace;

use log::debug;
use num::traits::{Signed, Zero};

use crate::rational;
use crate::row::{self, Row};

/// Ordered conjunction of linear inequalities  a*x >= b  over labelled
/// variables. Every row has nvars + 1 entries; labels are positional.
/// Projection returns a fresh System, no rows are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct System {
    pub lines: Vec<Row>,
    pub var_labels: Vec<String>,
}

impl System {
    pub fn new(var_labels: Vec<String>) -> System {
        System {
            lines: Vec::new(),
            var_labels,
        }
    }

    pub fn nvars(&self) -> usize {
        self.var_labels.len()
    }

    pub fn nlines(&self) -> usize {
        self.lines.len()
    }

    pub fn push(&mut self, line: Row) {
        assert_eq!(
            self.nvars() + 1,
            line.len(),
            "row of length {} in a system over {} variables",
            line.len(),
            self.nvars()
        );
        self.lines.push(line);
    }

    /* Input format, whitespace-separated tokens:
     *
     *   L N
     *   t a_1 ... a_M c      (L times, N = M + 2)
     *
     * A row means  a_1*x_0 + ... + a_M*x_{M-1} + c >= 0  and is stored
     * with the constant negated, as  a*x >= -c.  Type t = 0 marks an
     * equality: the negated row is stored right after the row itself.
     */
    pub fn parse(input: &str) -> System {
        let mut tokens = input.split_whitespace();
        let nlines = parse_count(next_token(&mut tokens, "row count"));
        let width = parse_count(next_token(&mut tokens, "variable count"));
        assert!(width >= 2, "variable count token must be at least 2, got {}", width);
        let nvars = width - 2;

        let mut sys = System::new((0..nvars).map(|i| format!("x[{}]", i)).collect());
        for _ in 0..nlines {
            let ty = next_token(&mut tokens, "row type");
            let mut line: Row = Vec::with_capacity(nvars + 1);
            for _ in 0..nvars {
                line.push(rational::parse(next_token(&mut tokens, "coefficient")));
            }
            let c = rational::parse(next_token(&mut tokens, "constant"));
            line.push(-c);
            match ty {
                "1" => sys.push(line),
                "0" => {
                    let neg = row::negated(&line);
                    sys.push(line);
                    sys.push(neg);
                }
                _ => panic!("row type must be 0 or 1, got {:?}", ty),
            }
        }
        assert!(
            tokens.next().is_none(),
            "trailing tokens after {} rows",
            nlines
        );
        sys
    }

    /// Header with the variable labels and "c", then one line per row:
    /// the inequality marker 1, the coefficients, and the constant
    /// flipped back so the line reads "a*x + c >= 0" again.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for label in &self.var_labels {
            write!(out, " {}", label)?;
        }
        writeln!(out, " c")?;
        for line in &self.lines {
            write!(out, "1")?;
            for a in &line[..self.nvars()] {
                write!(out, " {}", a)?;
            }
            writeln!(out, " {}", -&line[self.nvars()])?;
        }
        Ok(())
    }

    /* Fourier-Motzkin elimination of one variable.
     *
     * Rows with a zero coefficient at `var` are copied with the column
     * excised. Each row with a positive coefficient c_p is combined with
     * every row with a negative coefficient c_q as
     * (-c_q)*row_p + c_p*row_q; both multipliers are positive, so the
     * combination is again a valid >= row, and its entry at `var`
     * cancels. Combinations that vanish entirely carry no information
     * and are dropped. The pass preserves input row order, which the
     * bound extraction relies on for stable tie-breaking.
     */
    pub fn remove_var(&self, var: usize) -> System {
        assert!(
            var < self.nvars(),
            "removing variable {} from a system over {} variables",
            var,
            self.nvars()
        );
        let mut labels = self.var_labels.clone();
        labels.remove(var);
        let mut res = System::new(labels);

        for (i, line_i) in self.lines.iter().enumerate() {
            let ci = &line_i[var];
            if ci.is_zero() {
                let mut line = line_i.clone();
                line.remove(var);
                res.lines.push(line);
                continue;
            }
            if ci.is_negative() {
                continue;
            }
            for (j, line_j) in self.lines.iter().enumerate() {
                if j == i || !line_j[var].is_negative() {
                    continue;
                }
                let mcj = -&line_j[var];
                let mut line = row::linear_combination(&mcj, line_i, ci, line_j);
                assert!(line[var].is_zero(), "eliminated column failed to cancel");
                line.remove(var);
                if row::is_all_zero(&line) {
                    continue;
                }
                row::clear_denominators(&mut line);
                res.lines.push(line);
            }
        }
        debug!(
            "eliminated {}: {} lines -> {}",
            self.var_labels[var],
            self.nlines(),
            res.nlines()
        );
        res
    }
}

fn next_token<'a>(tokens: &mut SplitWhitespace<'a>, what: &str) -> &'a str {
    match tokens.next() {
        Some(t) => t,
        None => panic!("input ended while reading {}", what),
    }
}

fn parse_count(token: &str) -> usize {
    match token.parse() {
        Ok(n) => n,
        Err(e) => panic!("malformed count token {:?}: {}", token, e),
    }
}

#[cfg(test)]
use crate::lp::{LpSolver, MicroLp};
#[cfg(test)]
use crate::rational::{rat, ratio};
#[cfg(test)]
use rand::Rng;

#[test]
fn parsing_negates_the_constant() {
    let sys = System::parse("2 4  1 1 0 0  1 2 -1 3");
    assert_eq!(2, sys.nvars());
    assert_eq!(vec!["x[0]", "x[1]"], sys.var_labels);
    assert_eq!(
        vec![
            vec![rat(1), rat(0), rat(0)],
            vec![rat(2), rat(-1), rat(-3)],
        ],
        sys.lines
    );
}

#[test]
fn equality_rows_are_doubled() {
    let sys = System::parse("1 3  0 1 -1");
    assert_eq!(
        vec![vec![rat(1), rat(1)], vec![rat(-1), rat(-1)]],
        sys.lines
    );
}

#[test]
fn parsing_accepts_fraction_tokens() {
    let sys = System::parse("1 3  1 1/2 -2/3");
    assert_eq!(vec![vec![ratio(1, 2), ratio(2, 3)]], sys.lines);
}

#[test]
#[should_panic]
fn truncated_input_aborts() {
    System::parse("2 4  1 1 0 0");
}

#[test]
#[should_panic]
fn trailing_tokens_abort() {
    System::parse("1 3  1 1 0  7");
}

#[test]
#[should_panic]
fn unknown_row_type_aborts() {
    System::parse("1 3  2 1 0");
}

#[test]
fn printing_restores_the_input_constants() {
    let sys = System::parse("2 4  1 1 0 0  1 2 -1 3");
    let mut out = Vec::new();
    sys.print(&mut out).unwrap();
    assert_eq!(
        " x[0] x[1] c\n1 1 0 0\n1 2 -1 3\n",
        String::from_utf8(out).unwrap()
    );
}

#[test]
fn print_then_parse_is_pointwise_equal() {
    let sys = System::parse("3 4  1 1 2/3 -1  0 1 -1 0  1 0 1 5");
    let mut out = Vec::new();
    sys.print(&mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();
    // re-read through the input grammar: same rows, equalities already expanded
    let reread = System::parse(&format!(
        "{} 4 {}",
        sys.nlines(),
        printed.lines().skip(1).collect::<Vec<_>>().join(" ")
    ));
    assert_eq!(sys.lines, reread.lines);
}

#[test]
fn projection_partitions_by_sign() {
    // x0 >= 0, x1 >= 0, -x0 - x1 >= -2
    let sys = System::parse("3 4  1 1 0 0  1 0 1 0  1 -1 -1 2");
    let proj = sys.remove_var(1);
    assert_eq!(vec!["x[0]"], proj.var_labels);
    // zero row copied, then the positive/negative pair combined
    assert_eq!(
        vec![vec![rat(1), rat(0)], vec![rat(-1), rat(-2)]],
        proj.lines
    );
}

#[test]
fn projection_drops_vanishing_combinations() {
    // x0 + x1 >= 0 and -x0 - x1 >= 0 combine to the zero row
    let sys = System::parse("2 4  1 1 1 0  1 -1 -1 0");
    let proj = sys.remove_var(0);
    assert_eq!(0, proj.nlines());
}

#[cfg(test)]
fn fix_variable(lines: &mut Vec<Row>, nvars: usize, var: usize, value: i64) {
    let mut lower: Row = vec![rat(0); nvars + 1];
    lower[var] = rat(1);
    lower[nvars] = rat(value);
    let upper = row::negated(&lower);
    lines.push(lower);
    lines.push(upper);
}

// remove_var must be the exact projection: a point satisfies the
// projected system iff it extends to a point of the original, which
// the LP oracle can decide.
#[test]
fn projection_agrees_with_the_lp_oracle() {
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let mut sys = System::new((0..3).map(|i| format!("x[{}]", i)).collect());
        for _ in 0..4 {
            let mut line: Row = (0..3).map(|_| rat(rng.gen_range(-2..=2))).collect();
            line.push(rat(rng.gen_range(-3..=3)));
            sys.push(line);
        }
        let proj = sys.remove_var(1);
        for y0 in -3..=3i64 {
            for y2 in -3..=3i64 {
                let satisfies = proj.lines.iter().all(|line| {
                    line[0].clone() * rat(y0) + line[1].clone() * rat(y2) >= line[2]
                });
                let mut probe = sys.lines.clone();
                fix_variable(&mut probe, 3, 0, y0);
                fix_variable(&mut probe, 3, 2, y2);
                let extends = MicroLp.feasible(3, &probe);
                assert_eq!(
                    satisfies, extends,
                    "projection disagrees at ({}, {}) for {:?}",
                    y0, y2, sys.lines
                );
            }
        }
    }
}

#[test]
fn projection_clears_denominators() {
    // x0/2 + x1 >= 1 and -x0/3 >= -1 combine on x0 to x1/3 >= -1/6,
    // scaled through by 6
    let sys = System::parse("2 4  1 1/2 1 -1  1 -1/3 0 1");
    let proj = sys.remove_var(0);
    assert_eq!(vec![vec![rat(2), rat(-1)]], proj.lines);
}
